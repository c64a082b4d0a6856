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

//! Direct self-recursion: a call whose textual target is the function's own
//! entry address. Calls through another function are invisible here, since we
//! only ever see one function's listing.
use serde::Serialize;

use crate::annotation::{
    Color, DetectorRank, DetectorState, Layer, Notice, Palette, Priority, Style,
};
use crate::listing::InstructionTable;

pub const CALL_MNEMONICS: &[&str] = &["call", "callq"];

pub const RECURSIVE_CALL_LABEL: &str = "this is a recursive call";

pub fn is_call(mnemonic: &str) -> bool {
    CALL_MNEMONICS.contains(&mnemonic)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecursiveCallMark {
    pub address: u64,
    pub color: Color,
}

#[derive(Debug, Default)]
pub struct RecursionReport {
    pub calls: Vec<RecursiveCallMark>,
    pub notices: Vec<Notice>,
}

pub fn find_recursive_calls(table: &InstructionTable, palette: &Palette) -> Vec<RecursiveCallMark> {
    let entry = match table.entry_address() {
        Ok(entry) => entry,
        Err(_) => return Vec::new(),
    };

    let mut state = DetectorState::default();
    let mut marks = Vec::new();
    for line in table.ordered_lines() {
        if line.analyzable && is_call(&line.mnemonic) && line.target == Some(entry) {
            marks.push(RecursiveCallMark {
                address: line.address(),
                color: state.current_color(palette),
            });
            state.advance_color(palette);
        }
    }
    marks
}

pub fn annotate_recursion(table: &mut InstructionTable, palette: &Palette) -> RecursionReport {
    let calls = find_recursive_calls(table, palette);
    let mut notices = Vec::with_capacity(calls.len());
    for (seq, mark) in (0u32..).zip(calls.iter()) {
        log::info!("recursive call at 0x{:x}", mark.address);
        notices.push(Notice::recursive_call(mark.address));
        if let Some(line) = table.get_mut(mark.address) {
            line.add_layer(Layer::new(
                Priority::new(DetectorRank::Recursion, seq),
                Style::highlight(mark.color),
                Some(RECURSIVE_CALL_LABEL.to_string()),
            ));
        }
    }
    RecursionReport { calls, notices }
}
