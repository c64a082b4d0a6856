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

use crate::annotation::{Color, Layer, Markup, Notice};
use crate::instruction::InstructionLine;
use crate::listing::{InstructionTable, Row};

const LABEL_SEPARATOR: &str = "\t# ";

/// Resolve a line's layers into its final text.
///
/// Layers are applied lowest priority first, so styles from later layers end up
/// on top. Labels follow the raw text in the same order.
pub fn render_line(line: &InstructionLine, markup: Markup) -> String {
    if !line.is_annotated() {
        return line.raw_text.clone();
    }

    let mut layers: Vec<&Layer> = line.layers().iter().collect();
    layers.sort_by_key(|layer| layer.priority);

    let mut out = String::with_capacity(line.raw_text.len() + 32);
    for layer in &layers {
        out.push_str(&markup.prefix(&layer.style));
    }
    out.push_str(&line.raw_text);
    for label in layers.iter().filter_map(|layer| layer.label.as_deref()) {
        out.push_str(LABEL_SEPARATOR);
        out.push_str(label);
    }
    out.push_str(markup.reset());
    out
}

pub fn render_row(row: &Row, markup: Markup) -> String {
    match row {
        Row::Instruction(line) => render_line(line, markup),
        Row::Verbatim(text) => text.clone(),
    }
}

/// Every row of the table in program order.
pub fn render_lines(table: &InstructionTable, markup: Markup) -> Vec<String> {
    table.rows().map(|row| render_row(row, markup)).collect()
}

pub fn render_notice(notice: &Notice, markup: Markup, color: Color) -> String {
    markup.paint(&notice.message, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{DetectorRank, Priority, Style};

    fn sample_line() -> InstructionLine {
        InstructionLine::new(0x10, "0x10 mov".to_string(), "mov".to_string(), None)
    }

    #[test]
    fn unannotated_line_is_unchanged() {
        assert_eq!(render_line(&sample_line(), Markup::Ansi), "0x10 mov");
    }

    #[test]
    fn layers_render_in_priority_order() {
        let mut line = sample_line();
        // pushed out of order on purpose
        line.add_layer(Layer::new(
            Priority::new(DetectorRank::Recursion, 0),
            Style::highlight(Color::Blue),
            Some("this is a recursive call".to_string()),
        ));
        line.add_layer(Layer::new(
            Priority::new(DetectorRank::Loop, 1),
            Style::tint(Color::Red),
            None,
        ));

        assert_eq!(
            render_line(&line, Markup::Ansi),
            "\x1b[31m\x1b[4m\x1b[1m\x1b[34m0x10 mov\t# this is a recursive call\x1b[0m"
        );
        assert_eq!(
            render_line(&line, Markup::Plain),
            "0x10 mov\t# this is a recursive call"
        );
    }

    #[test]
    fn verbatim_rows_pass_through() {
        let row = Row::Verbatim("0x1ffffffffffffffff nop".to_string());
        assert_eq!(render_row(&row, Markup::Ansi), "0x1ffffffffffffffff nop");
    }

    #[test]
    fn notices_are_painted_only_with_ansi() {
        let notice = Notice::loop_found(0x10, 0x18);
        assert_eq!(
            render_notice(&notice, Markup::Plain, Color::Green),
            "loop found: from 0x10 to 0x18."
        );
        assert_eq!(
            render_notice(&notice, Markup::Ansi, Color::Green),
            "\x1b[32mloop found: from 0x10 to 0x18.\x1b[0m"
        );
    }
}
