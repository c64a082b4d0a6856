// Copyright (c) 2026 MCU-Debug Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Parsing of single disassembly lines as printed by gdb's `disassemble`.
//!
//! A typical line looks like
//!
//! ```text
//!    0x0000555555555160 <+23>:	jl     0x555555555150 <main+7>
//! ```
//!
//! We only need three things out of it: the instruction's own address (first
//! hex literal), the mnemonic, and the branch/call target (second hex literal).
//! Everything else is kept as raw text for re-emission.
use regex::Regex;
use std::sync::OnceLock;

use crate::annotation::Layer;
use crate::error::AnnotateError;

fn hex_literal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"0x[0-9a-fA-F]+").unwrap())
}

fn mnemonic_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[a-z]{2,}").unwrap())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionLine {
    address: u64,
    pub raw_text: String,
    pub mnemonic: String,
    /// Own address first, then the target when it converted. Any further
    /// literals on the line are not kept.
    pub operand_addresses: Vec<u64>,
    pub target: Option<u64>,
    /// False when the target literal could not be converted; the line is still
    /// rendered but detectors leave it alone.
    pub analyzable: bool,
    layers: Vec<Layer>,
}

impl InstructionLine {
    pub fn new(address: u64, raw_text: String, mnemonic: String, target: Option<u64>) -> Self {
        Self {
            address,
            raw_text,
            mnemonic,
            operand_addresses: std::iter::once(address).chain(target).collect(),
            target,
            analyzable: true,
            layers: Vec::new(),
        }
    }

    pub fn address(&self) -> u64 {
        self.address
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Stack another annotation on this line. Existing layers are kept.
    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn is_annotated(&self) -> bool {
        !self.layers.is_empty()
    }
}

fn parse_hex(literal: &str) -> Option<u64> {
    u64::from_str_radix(&literal[2..], 16).ok()
}

/// Skip a `<symbol+offset>:` annotation right after the address so the symbol
/// name is not mistaken for the mnemonic.
fn skip_symbol_annotation(rest: &str) -> &str {
    let trimmed = rest.trim_start();
    if let Some(after_open) = trimmed.strip_prefix('<') {
        if let Some(close) = after_open.find('>') {
            let tail = &after_open[close + 1..];
            return tail.strip_prefix(':').unwrap_or(tail);
        }
    }
    trimmed
}

/// Parse one line of a listing.
///
/// Returns `Ok(None)` for lines without any hex literal (headers, trailers,
/// blank lines). Returns `Err(AnnotateError::Parse)` if the own-address literal
/// does not fit in 64 bits; the caller decides whether to keep the text.
pub fn parse_line(text: &str) -> Result<Option<InstructionLine>, AnnotateError> {
    let mut literals = hex_literal_re().find_iter(text);
    let addr_match = match literals.next() {
        Some(m) => m,
        None => return Ok(None),
    };

    let address = parse_hex(addr_match.as_str()).ok_or_else(|| AnnotateError::Parse {
        line: text.to_string(),
        literal: addr_match.as_str().to_string(),
    })?;

    // The mnemonic always precedes the operands, so stop at the next literal.
    let rest = skip_symbol_annotation(&text[addr_match.end()..]);
    let head = match hex_literal_re().find(rest) {
        Some(m) => &rest[..m.start()],
        None => rest,
    };
    let mnemonic = mnemonic_re()
        .find(head)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let mut line = InstructionLine::new(address, text.to_string(), mnemonic, None);
    if let Some(literal) = literals.next() {
        match parse_hex(literal.as_str()) {
            Some(target) => {
                line.target = Some(target);
                line.operand_addresses.push(target);
            }
            None => {
                log::warn!(
                    "skipping analysis of 0x{:x}: operand {} does not fit in 64 bits",
                    address,
                    literal.as_str()
                );
                line.analyzable = false;
            }
        }
    }
    Ok(Some(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gdb_style_branch() {
        let text = "   0x0000555555555160 <+23>:\tjl     0x555555555150 <main+7>";
        let line = parse_line(text).unwrap().unwrap();
        assert_eq!(line.address(), 0x555555555160);
        assert_eq!(line.mnemonic, "jl");
        assert_eq!(line.target, Some(0x555555555150));
        assert_eq!(line.raw_text, text);
    }

    #[test]
    fn symbol_annotation_is_not_the_mnemonic() {
        let line = parse_line("0x1000 <fact+12>: callq 0x0ff4 <fact>")
            .unwrap()
            .unwrap();
        assert_eq!(line.mnemonic, "callq");
        assert_eq!(line.target, Some(0xff4));
    }

    #[test]
    fn current_pc_marker_is_tolerated() {
        let line = parse_line("=> 0x0000000000401136 <+4>:\tmov    $0x0,%eax")
            .unwrap()
            .unwrap();
        assert_eq!(line.address(), 0x401136);
        assert_eq!(line.mnemonic, "mov");
    }

    #[test]
    fn header_lines_are_not_instructions() {
        assert_eq!(parse_line("Dump of assembler code for function main:"), Ok(None));
        assert_eq!(parse_line("End of assembler dump."), Ok(None));
        assert_eq!(parse_line(""), Ok(None));
    }

    #[test]
    fn missing_mnemonic_is_empty() {
        let line = parse_line("0x20 <+4>: 17").unwrap().unwrap();
        assert_eq!(line.mnemonic, "");
        assert_eq!(line.target, None);

        let line = parse_line("0x24 0xab").unwrap().unwrap();
        assert_eq!(line.mnemonic, "");
        assert_eq!(line.target, Some(0xab));
    }

    #[test]
    fn extra_literals_are_ignored() {
        let line = parse_line("0x10 jmp 0x4 0x8 0xc").unwrap().unwrap();
        assert_eq!(line.target, Some(0x4));
        assert_eq!(line.operand_addresses, vec![0x10, 0x4]);
    }

    #[test]
    fn oversized_trailing_literal_does_not_disable_analysis() {
        let line = parse_line("0x18 jl 0x10 0x1ffffffffffffffffff").unwrap().unwrap();
        assert!(line.analyzable);
        assert_eq!(line.target, Some(0x10));
        assert_eq!(line.operand_addresses, vec![0x18, 0x10]);
    }

    #[test]
    fn oversized_own_address_is_a_parse_error() {
        let err = parse_line("0x1ffffffffffffffff mov").unwrap_err();
        assert!(matches!(err, AnnotateError::Parse { .. }));
        assert!(!err.is_structural());
    }

    #[test]
    fn oversized_target_disables_analysis_only() {
        let line = parse_line("0x18 jl 0x1ffffffffffffffff").unwrap().unwrap();
        assert_eq!(line.address(), 0x18);
        assert!(!line.analyzable);
        assert_eq!(line.target, None);
    }
}
