//! JSON form of an annotation, as printed by `--json`:
//!
//! ```text
//! {
//!   "t": "annotation",
//!   "entry": "0x...",
//!   "notices": [ { "kind": "loop", "message": "..." }, ... ],
//!   "loops": [ { "number": 1, "start": "0x...", "end": "0x...", "color": "red" }, ... ],
//!   "recursive_calls": [ { "address": "0x...", "color": "red" }, ... ],
//!   "lines": [ "...", ... ]
//! }
//! ```

use serde_json::json;
use serde_json::Value;

use crate::annotate::Annotation;

/// Serialize an `Annotation` into a compact JSON document.
pub fn serialize_annotation(annotation: &Annotation) -> Value {
    // Addresses as hex strings for JS safe handling
    let loops: Vec<Value> = annotation
        .loops
        .iter()
        .map(|span| {
            json!({
                "number": span.number,
                "start": format!("0x{:x}", span.start),
                "end": format!("0x{:x}", span.end),
                "color": span.color,
            })
        })
        .collect();

    let calls: Vec<Value> = annotation
        .recursive_calls
        .iter()
        .map(|mark| {
            json!({
                "address": format!("0x{:x}", mark.address),
                "color": mark.color,
            })
        })
        .collect();

    json!({
        "t": "annotation",
        "entry": format!("0x{:x}", annotation.entry_address),
        "notices": annotation.notices,
        "loops": Value::Array(loops),
        "recursive_calls": Value::Array(calls),
        "lines": annotation.lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::{annotate, Detect};
    use crate::annotation::Markup;
    use crate::config::AnnotateOptions;

    #[test]
    fn serialize_annotation_basic() {
        let options = AnnotateOptions::default().with_markup(Markup::Plain);
        let annotation = annotate(
            "0x10 push\n0x14 call 0x10\n0x18 jl 0x10\n0x1c ret",
            Detect::All,
            &options,
        )
        .unwrap();

        let v = serialize_annotation(&annotation);
        assert_eq!(v["t"], "annotation");
        assert_eq!(v["entry"], "0x10");
        assert_eq!(v["notices"][0]["kind"], "loop");
        assert_eq!(v["notices"][1]["kind"], "recursion");
        assert_eq!(v["loops"][0]["start"], "0x10");
        assert_eq!(v["loops"][0]["end"], "0x18");
        assert_eq!(v["loops"][0]["color"], "red");
        assert_eq!(v["recursive_calls"][0]["address"], "0x14");
        let lines = v["lines"].as_array().expect("lines array");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3], "0x1c ret");
    }
}
