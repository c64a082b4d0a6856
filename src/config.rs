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

//! Rendering options, optionally read from a JSON file such as
//!
//! ```json
//! { "palette": ["cyan", "magenta", "yellow", "green"], "notice_color": "bright_green", "markup": "ansi" }
//! ```
//!
//! Every field may be omitted; missing fields take their defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::annotation::{Color, Markup, Palette};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnnotateOptions {
    pub palette: Palette,
    pub notice_color: Color,
    pub markup: Markup,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            notice_color: Color::Green,
            markup: Markup::Ansi,
        }
    }
}

impl AnnotateOptions {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse annotator config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn with_markup(mut self, markup: Markup) -> Self {
        self.markup = markup;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_is_default() {
        assert_eq!(AnnotateOptions::from_json("{}").unwrap(), AnnotateOptions::default());
    }

    #[test]
    fn partial_config_overrides_fields() {
        let options = AnnotateOptions::from_json(
            r#"{ "palette": ["cyan", "magenta", "yellow", "green"], "markup": "plain" }"#,
        )
        .unwrap();
        assert_eq!(options.palette.len(), 4);
        assert_eq!(options.palette.color(0), Color::Cyan);
        assert_eq!(options.markup, Markup::Plain);
        assert_eq!(options.notice_color, Color::Green);
    }

    #[test]
    fn rejects_small_palette_and_unknown_keys() {
        assert!(AnnotateOptions::from_json(r#"{ "palette": ["red", "blue"] }"#).is_err());
        assert!(AnnotateOptions::from_json(r#"{ "colour": "red" }"#).is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "notice_color": "bright_cyan" }}"#).unwrap();
        let options = AnnotateOptions::load(file.path()).unwrap();
        assert_eq!(options.notice_color, Color::BrightCyan);

        assert!(AnnotateOptions::load(Path::new("/nonexistent/annotator.json")).is_err());
    }
}
