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

//! One annotation request: parse a listing, run the selected detectors over it
//! and render the result. Nothing survives the call.
use std::time::Instant;

use crate::annotation::{Color, Markup, Notice};
use crate::config::AnnotateOptions;
use crate::error::AnnotateError;
use crate::listing::InstructionTable;
use crate::loops::{annotate_loops, LoopSpan};
use crate::recursion::{annotate_recursion, RecursiveCallMark};
use crate::render::{render_lines, render_notice};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detect {
    Loops,
    Recursion,
    All,
}

impl Detect {
    pub fn loops(self) -> bool {
        matches!(self, Detect::Loops | Detect::All)
    }

    pub fn recursion(self) -> bool {
        matches!(self, Detect::Recursion | Detect::All)
    }
}

#[derive(Debug, Clone)]
pub struct Annotation {
    pub entry_address: u64,
    pub notices: Vec<Notice>,
    pub lines: Vec<String>,
    pub loops: Vec<LoopSpan>,
    pub recursive_calls: Vec<RecursiveCallMark>,
    markup: Markup,
    notice_color: Color,
}

impl Annotation {
    pub fn notice_lines(&self) -> Vec<String> {
        self.notices
            .iter()
            .map(|n| render_notice(n, self.markup, self.notice_color))
            .collect()
    }

    /// Notices first, then the annotated listing, one line each.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in self.notice_lines().iter().chain(self.lines.iter()) {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Annotate a single function listing.
///
/// Fails without rendering anything if two lines share an address or if the
/// text holds no instruction at all.
pub fn annotate(
    text: &str,
    detect: Detect,
    options: &AnnotateOptions,
) -> Result<Annotation, AnnotateError> {
    let now = Instant::now();
    let mut table = InstructionTable::from_text(text)?;
    let entry_address = table.entry_address()?;

    let mut notices = Vec::new();
    let mut loops = Vec::new();
    let mut recursive_calls = Vec::new();

    if detect.loops() {
        let report = annotate_loops(&mut table, &options.palette);
        notices.extend(report.notices);
        loops = report.loops;
    }
    if detect.recursion() {
        let report = annotate_recursion(&mut table, &options.palette);
        notices.extend(report.notices);
        recursive_calls = report.calls;
    }

    let lines = render_lines(&table, options.markup);
    log::debug!(
        "annotated {} lines from entry 0x{:x}: {} loops, {} recursive calls in {:.2?}",
        lines.len(),
        entry_address,
        loops.len(),
        recursive_calls.len(),
        now.elapsed()
    );

    Ok(Annotation {
        entry_address,
        notices,
        lines,
        loops,
        recursive_calls,
        markup: options.markup,
        notice_color: options.notice_color,
    })
}
