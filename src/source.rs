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

//! Where a function listing comes from.
//!
//! The annotator never disassembles anything itself. It either reads text that
//! somebody already produced (a file, or stdin), or asks gdb in batch mode to
//! run `disassemble <function>` against a binary and captures what it prints.
use anyhow::{bail, Context, Result};
use std::fs;
use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingSource {
    File(PathBuf),
    Stdin,
    Gdb {
        gdb: String,
        binary: PathBuf,
        function: String,
    },
}

impl ListingSource {
    pub fn read(&self) -> Result<String> {
        match self {
            ListingSource::File(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read listing {}", path.display())),
            ListingSource::Stdin => {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read listing from stdin")?;
                Ok(text)
            }
            ListingSource::Gdb {
                gdb,
                binary,
                function,
            } => disassemble_with_gdb(gdb, binary.to_string_lossy().as_ref(), function),
        }
    }
}

/// Run `gdb -batch -ex "disassemble <function>" <binary>` and return its stdout.
pub fn disassemble_with_gdb(gdb: &str, binary: &str, function: &str) -> Result<String> {
    // Stream gdb's stdout, stderr goes straight to the user
    let mut child = Command::new(gdb)
        .args(["-batch", "-nx", "-ex"])
        .arg(format!("disassemble {}", function))
        .arg(binary)
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .with_context(|| format!("Failed to start {}", gdb))?;

    let stdout = child
        .stdout
        .take()
        .context("Failed to capture gdb stdout")?;

    let mut reader = BufReader::with_capacity(64 * 1024, stdout);
    let mut buf: Vec<u8> = Vec::with_capacity(1024);
    let mut text = String::new();
    let mut count = 0;
    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            break; // EOF
        }

        // strip trailing CR/LF
        while buf
            .last()
            .map(|b| *b == b'\n' || *b == b'\r')
            .unwrap_or(false)
        {
            buf.pop();
        }

        text.push_str(&String::from_utf8_lossy(&buf));
        text.push('\n');
        count += 1;
    }

    let status = child.wait()?;
    if !status.success() {
        bail!("{} exited with {} while disassembling {}", gdb, status, function);
    }
    log::debug!("gdb produced {} lines for {}", count, function);
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_listing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0x10 mov\n0x14 jl 0x10").unwrap();
        let text = ListingSource::File(file.path().to_path_buf()).read().unwrap();
        assert_eq!(text, "0x10 mov\n0x14 jl 0x10\n");
    }

    #[test]
    fn missing_file_is_an_error() {
        let source = ListingSource::File(PathBuf::from("/nonexistent/listing.txt"));
        let err = source.read().unwrap_err();
        assert!(err.to_string().contains("Failed to read listing"));
    }

    #[test]
    fn missing_gdb_is_an_error() {
        let err = disassemble_with_gdb("/nonexistent/gdb-binary", "a.out", "main").unwrap_err();
        assert!(err.to_string().contains("Failed to start"));
    }
}
