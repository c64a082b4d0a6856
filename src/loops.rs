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

//! Loop detection over a single function listing.
//!
//! A loop is any backward branch whose target still lies inside the function:
//! `entry <= target < source`. Every instruction in `[target, source]` gets a
//! layer in the loop's color; the two ends are also bolded, underlined and
//! labelled. Nested loops simply stack their layers.

use serde::Serialize;

use crate::annotation::{
    Color, DetectorRank, DetectorState, Layer, Notice, Palette, Priority, Style,
};
use crate::listing::InstructionTable;

/// Unconditional jump plus every x86 condition-code jump, including the
/// negated aliases (`jg` == `jnle`, ...).
pub const BRANCH_MNEMONICS: &[&str] = &[
    "jmp", "je", "jz", "jne", "jnz", "js", "jns", "jg", "jnle", "jge", "jnl", "jl", "jnge", "jle",
    "jng", "ja", "jnbe", "jae", "jnb", "jb", "jnae", "jbe", "jna",
];

pub fn is_branch(mnemonic: &str) -> bool {
    BRANCH_MNEMONICS.contains(&mnemonic)
}

/// Summary of one declared loop. The span itself is not stored in the table,
/// only the layers it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoopSpan {
    pub number: u32,
    pub start: u64,
    pub end: u64,
    pub color: Color,
}

#[derive(Debug, Default)]
pub struct LoopReport {
    pub loops: Vec<LoopSpan>,
    pub notices: Vec<Notice>,
}

/// Find backward branches in program order and return their spans, numbered
/// and colored in the order their closing instruction appears.
pub fn find_loops(table: &InstructionTable, palette: &Palette) -> Vec<LoopSpan> {
    let entry = match table.entry_address() {
        Ok(entry) => entry,
        Err(_) => return Vec::new(),
    };

    let mut state = DetectorState::default();
    let mut spans = Vec::new();
    for line in table.ordered_lines() {
        if !line.analyzable || !is_branch(&line.mnemonic) {
            continue;
        }
        let Some(target) = line.target else {
            continue;
        };
        let source = line.address();
        if target < source && target >= entry {
            spans.push(LoopSpan {
                number: state.loop_number,
                start: target,
                end: source,
                color: state.current_color(palette),
            });
            state.loop_number += 1;
            state.advance_color(palette);
        } else {
            log::trace!(
                "branch at 0x{:x} to 0x{:x} is not a loop edge",
                source,
                target
            );
        }
    }
    spans
}

fn apply_span(table: &mut InstructionTable, span: &LoopSpan) {
    let priority = Priority::new(DetectorRank::Loop, span.number);
    for address in table.addresses_in(span.start, span.end) {
        let Some(line) = table.get_mut(address) else {
            continue;
        };
        let layer = if address == span.start {
            Layer::new(
                priority,
                Style::highlight(span.color),
                Some(format!("loop {} starts here.", span.number)),
            )
        } else if address == span.end {
            Layer::new(
                priority,
                Style::highlight(span.color),
                Some(format!("loop {} ends here.", span.number)),
            )
        } else {
            Layer::new(priority, Style::tint(span.color), None)
        };
        line.add_layer(layer);
    }
}

/// Detect loops and layer their styling onto the table.
pub fn annotate_loops(table: &mut InstructionTable, palette: &Palette) -> LoopReport {
    let loops = find_loops(table, palette);
    let mut notices = Vec::with_capacity(loops.len());
    for span in &loops {
        log::info!(
            "loop {} found: 0x{:x}..0x{:x} ({})",
            span.number,
            span.start,
            span.end,
            span.color.name()
        );
        notices.push(Notice::loop_found(span.start, span.end));
        apply_span(table, span);
    }
    LoopReport { loops, notices }
}
