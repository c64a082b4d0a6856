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

//! Annotation layers and the styling vocabulary they are built from.
//!
//! A line never stores its annotated text. Detectors push `Layer`s onto it and
//! the renderer resolves them, in priority order, into the final string. That
//! way a later detector can only add to what an earlier one did.

use serde::{Deserialize, Serialize};

use crate::error::AnnotateError;

const SGR_BOLD: &str = "\x1b[1m";
const SGR_UNDERLINE: &str = "\x1b[4m";
const SGR_RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
}

impl Color {
    pub fn sgr(self) -> &'static str {
        match self {
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Yellow => "\x1b[33m",
            Color::Blue => "\x1b[34m",
            Color::Magenta => "\x1b[35m",
            Color::Cyan => "\x1b[36m",
            Color::White => "\x1b[37m",
            Color::BrightRed => "\x1b[91m",
            Color::BrightGreen => "\x1b[92m",
            Color::BrightYellow => "\x1b[93m",
            Color::BrightBlue => "\x1b[94m",
            Color::BrightMagenta => "\x1b[95m",
            Color::BrightCyan => "\x1b[96m",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
            Color::Magenta => "magenta",
            Color::Cyan => "cyan",
            Color::White => "white",
            Color::BrightRed => "bright_red",
            Color::BrightGreen => "bright_green",
            Color::BrightYellow => "bright_yellow",
            Color::BrightBlue => "bright_blue",
            Color::BrightMagenta => "bright_magenta",
            Color::BrightCyan => "bright_cyan",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub emphasis: bool,
    pub underline: bool,
    pub color: Color,
}

impl Style {
    /// Bold + underline + color, used for loop boundaries and recursive calls.
    pub fn highlight(color: Color) -> Self {
        Self {
            emphasis: true,
            underline: true,
            color,
        }
    }

    /// Color only, used for the body of a loop.
    pub fn tint(color: Color) -> Self {
        Self {
            emphasis: false,
            underline: false,
            color,
        }
    }
}

/// Detectors in the order their layers are stacked. Later variants are drawn
/// on top of earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DetectorRank {
    Loop,
    Recursion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority {
    pub rank: DetectorRank,
    pub seq: u32,
}

impl Priority {
    pub fn new(rank: DetectorRank, seq: u32) -> Self {
        Self { rank, seq }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub priority: Priority,
    pub style: Style,
    pub label: Option<String>,
}

impl Layer {
    pub fn new(priority: Priority, style: Style, label: Option<String>) -> Self {
        Self {
            priority,
            style,
            label,
        }
    }
}

/// Fixed, ordered set of colors cycled through by the detectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Color>", into = "Vec<Color>")]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub const MIN_COLORS: usize = 4;

    pub fn new(colors: Vec<Color>) -> Result<Self, AnnotateError> {
        if colors.len() < Self::MIN_COLORS {
            return Err(AnnotateError::InvalidPalette(format!(
                "need at least {} colors, got {}",
                Self::MIN_COLORS,
                colors.len()
            )));
        }
        for (i, color) in colors.iter().enumerate() {
            if colors[..i].contains(color) {
                return Err(AnnotateError::InvalidPalette(format!(
                    "color {} appears more than once",
                    color.name()
                )));
            }
        }
        Ok(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Color at `index`, wrapping around the end of the palette.
    pub fn color(&self, index: usize) -> Color {
        self.colors[index % self.colors.len()]
    }

    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.colors.len()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: vec![
                Color::Red,
                Color::Green,
                Color::Yellow,
                Color::Blue,
                Color::Magenta,
                Color::Cyan,
            ],
        }
    }
}

impl TryFrom<Vec<Color>> for Palette {
    type Error = AnnotateError;

    fn try_from(colors: Vec<Color>) -> Result<Self, Self::Error> {
        Palette::new(colors)
    }
}

impl From<Palette> for Vec<Color> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}

/// Rotation state threaded through one detector scan. Each scan starts from
/// `DetectorState::default()`; nothing is shared between scans or requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectorState {
    pub palette_index: usize,
    pub loop_number: u32,
}

impl Default for DetectorState {
    fn default() -> Self {
        Self {
            palette_index: 0,
            loop_number: 1,
        }
    }
}

impl DetectorState {
    pub fn current_color(&self, palette: &Palette) -> Color {
        palette.color(self.palette_index)
    }

    pub fn advance_color(&mut self, palette: &Palette) {
        self.palette_index = palette.next_index(self.palette_index);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Loop,
    Recursion,
}

/// A message printed ahead of the annotated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn loop_found(start: u64, end: u64) -> Self {
        Self {
            kind: NoticeKind::Loop,
            message: format!("loop found: from 0x{:x} to 0x{:x}.", start, end),
        }
    }

    pub fn recursive_call(address: u64) -> Self {
        Self {
            kind: NoticeKind::Recursion,
            message: format!("recursive call found at 0x{:x}.", address),
        }
    }
}

/// How styles are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Markup {
    /// SGR escape sequences for a terminal.
    #[default]
    Ansi,
    /// Labels only, no escape sequences.
    Plain,
}

impl Markup {
    pub fn prefix(self, style: &Style) -> String {
        match self {
            Markup::Plain => String::new(),
            Markup::Ansi => {
                let mut out = String::new();
                if style.underline {
                    out.push_str(SGR_UNDERLINE);
                }
                if style.emphasis {
                    out.push_str(SGR_BOLD);
                }
                out.push_str(style.color.sgr());
                out
            }
        }
    }

    pub fn reset(self) -> &'static str {
        match self {
            Markup::Plain => "",
            Markup::Ansi => SGR_RESET,
        }
    }

    pub fn paint(self, text: &str, color: Color) -> String {
        match self {
            Markup::Plain => text.to_string(),
            Markup::Ansi => format!("{}{}{}", color.sgr(), text, SGR_RESET),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_rejects_short_or_repeated_colors() {
        let short = Palette::new(vec![Color::Red, Color::Green, Color::Blue]);
        assert!(matches!(short, Err(AnnotateError::InvalidPalette(_))));

        let repeated = Palette::new(vec![Color::Red, Color::Green, Color::Red, Color::Blue]);
        assert!(matches!(repeated, Err(AnnotateError::InvalidPalette(_))));
    }

    #[test]
    fn palette_index_wraps() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 6);
        assert_eq!(palette.next_index(5), 0);
        assert_eq!(palette.color(6), Color::Red);
    }

    #[test]
    fn palette_deserializes_from_color_names() {
        let palette: Palette =
            serde_json::from_str(r#"["blue", "bright_cyan", "white", "red"]"#).unwrap();
        assert_eq!(palette.color(1), Color::BrightCyan);

        let bad: Result<Palette, _> = serde_json::from_str(r#"["blue"]"#);
        assert!(bad.is_err());
    }

    #[test]
    fn priorities_stack_recursion_above_loops() {
        let loop_layer = Priority::new(DetectorRank::Loop, 40);
        let call_layer = Priority::new(DetectorRank::Recursion, 0);
        assert!(loop_layer < call_layer);
    }

    #[test]
    fn plain_markup_emits_no_escapes() {
        let style = Style::highlight(Color::Blue);
        assert_eq!(Markup::Plain.prefix(&style), "");
        assert_eq!(Markup::Ansi.prefix(&style), "\x1b[4m\x1b[1m\x1b[34m");
        assert_eq!(Markup::Ansi.prefix(&Style::tint(Color::Red)), "\x1b[31m");
    }
}
