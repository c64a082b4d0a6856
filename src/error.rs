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

use thiserror::Error;

/// Errors produced while building or annotating an instruction listing.
///
/// `DuplicateAddress` and `EmptyInput` are structural: the whole request is
/// rejected and nothing is rendered. `Parse` is local to one line and is
/// absorbed by the scan (the line is kept, only its analysis is skipped).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotateError {
    #[error("invalid hex literal {literal:?} in line {line:?}")]
    Parse { line: String, literal: String },
    #[error("duplicate instruction address 0x{address:x}")]
    DuplicateAddress { address: u64 },
    #[error("no instructions found")]
    EmptyInput,
    #[error("invalid palette: {0}")]
    InvalidPalette(String),
}

impl AnnotateError {
    /// Structural errors abort the whole request.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            AnnotateError::DuplicateAddress { .. } | AnnotateError::EmptyInput
        )
    }
}
