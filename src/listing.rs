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

use std::collections::BTreeMap;

use crate::error::AnnotateError;
use crate::instruction::{parse_line, InstructionLine};

/// One row of the listing, in the order it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Instruction(InstructionLine),
    /// A line that looked like an instruction but whose address could not be
    /// converted. It is re-emitted unchanged and never analyzed.
    Verbatim(String),
}

/// Instructions of one function, keyed by address and kept in program order.
///
/// The first instruction inserted defines the function's entry address. Rows
/// are never removed or reordered.
#[derive(Debug, Default)]
pub struct InstructionTable {
    rows: Vec<Row>,
    addr_map: BTreeMap<u64, usize>, // address to index in rows
    entry: Option<u64>,
}

impl InstructionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a raw listing. Header lines are dropped, lines with an
    /// unconvertible address are kept verbatim.
    pub fn from_text(text: &str) -> Result<Self, AnnotateError> {
        let mut table = Self::new();
        for raw in text.lines() {
            let raw = raw.trim_end_matches('\r');
            match parse_line(raw) {
                Ok(Some(line)) => table.insert(line)?,
                Ok(None) => log::debug!("dropping non-instruction line {:?}", raw),
                Err(e) => {
                    log::warn!("{}; keeping line unanalyzed", e);
                    table.insert_verbatim(raw.to_string());
                }
            }
        }
        log::debug!(
            "listing parsed: {} instructions, {} rows",
            table.len(),
            table.rows.len()
        );
        Ok(table)
    }

    pub fn insert(&mut self, line: InstructionLine) -> Result<(), AnnotateError> {
        let address = line.address();
        if self.addr_map.contains_key(&address) {
            return Err(AnnotateError::DuplicateAddress { address });
        }
        self.addr_map.insert(address, self.rows.len());
        if self.entry.is_none() {
            self.entry = Some(address);
        }
        self.rows.push(Row::Instruction(line));
        Ok(())
    }

    pub fn insert_verbatim(&mut self, text: String) {
        self.rows.push(Row::Verbatim(text));
    }

    pub fn get(&self, address: u64) -> Option<&InstructionLine> {
        match self.rows.get(*self.addr_map.get(&address)?) {
            Some(Row::Instruction(line)) => Some(line),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, address: u64) -> Option<&mut InstructionLine> {
        let index = *self.addr_map.get(&address)?;
        match self.rows.get_mut(index) {
            Some(Row::Instruction(line)) => Some(line),
            _ => None,
        }
    }

    pub fn entry_address(&self) -> Result<u64, AnnotateError> {
        self.entry.ok_or(AnnotateError::EmptyInput)
    }

    /// Instruction lines in program order.
    pub fn ordered_lines(&self) -> impl Iterator<Item = &InstructionLine> + '_ {
        self.rows.iter().filter_map(|row| match row {
            Row::Instruction(line) => Some(line),
            Row::Verbatim(_) => None,
        })
    }

    /// All rows in program order, verbatim ones included.
    pub fn rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.rows.iter()
    }

    /// Addresses of the instructions in `[start, end]`, in program order.
    pub fn addresses_in(&self, start: u64, end: u64) -> Vec<u64> {
        self.ordered_lines()
            .map(InstructionLine::address)
            .filter(|a| (start..=end).contains(a))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.addr_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addr_map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(address: u64, mnemonic: &str) -> InstructionLine {
        InstructionLine::new(
            address,
            format!("0x{:x} {}", address, mnemonic),
            mnemonic.to_string(),
            None,
        )
    }

    #[test]
    fn keeps_insertion_order() {
        let mut table = InstructionTable::new();
        table.insert(line(0x20, "mov")).unwrap();
        table.insert(line(0x10, "cmp")).unwrap();
        table.insert(line(0x30, "ret")).unwrap();

        let order: Vec<u64> = table.ordered_lines().map(|l| l.address()).collect();
        assert_eq!(order, vec![0x20, 0x10, 0x30]);
        assert_eq!(table.entry_address(), Ok(0x20));
        // restartable
        assert_eq!(table.ordered_lines().count(), 3);
    }

    #[test]
    fn duplicate_address_is_rejected() {
        let mut table = InstructionTable::new();
        table.insert(line(0x10, "mov")).unwrap();
        let err = table.insert(line(0x10, "add")).unwrap_err();
        assert_eq!(err, AnnotateError::DuplicateAddress { address: 0x10 });
        assert_eq!(table.get(0x10).unwrap().mnemonic, "mov");
    }

    #[test]
    fn empty_table_has_no_entry() {
        let table = InstructionTable::new();
        assert_eq!(table.entry_address(), Err(AnnotateError::EmptyInput));
        assert!(table.get(0x10).is_none());
    }

    #[test]
    fn from_text_drops_headers_and_keeps_verbatim_rows() {
        let text = "Dump of assembler code for function f:\n\
                    0x10 mov\n\
                    0x1ffffffffffffffff nop\n\
                    0x14 ret\n\
                    End of assembler dump.\n";
        let table = InstructionTable::from_text(text).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows().count(), 3);
        assert!(matches!(table.rows().nth(1), Some(Row::Verbatim(_))));
        assert_eq!(table.entry_address(), Ok(0x10));
    }

    #[test]
    fn addresses_in_is_inclusive() {
        let table = InstructionTable::from_text("0x10 a\n0x14 b\n0x18 c\n0x1c d").unwrap();
        assert_eq!(table.addresses_in(0x14, 0x18), vec![0x14, 0x18]);
        assert!(table.addresses_in(0x20, 0x30).is_empty());
    }
}
