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

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use flexi_logger::{Logger, LoggerHandle};
use std::io::IsTerminal;
use std::path::PathBuf;

use disasm_annotator::serializer::serialize_annotation;
use disasm_annotator::source::ListingSource;
use disasm_annotator::{annotate, AnnotateError, AnnotateOptions, Detect, Markup};

#[derive(Parser, Debug)]
#[command(
    name = "disasm-annotator",
    version,
    about = "Highlights loops and recursive calls in a function's disassembly"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Color loops and nested loops in a function
    Loops(AnnotateArgs),
    /// Highlight recursive calls in a function
    Recursion(AnnotateArgs),
    /// Run both detectors
    All(AnnotateArgs),
}

#[derive(Args, Debug)]
struct AnnotateArgs {
    /// Listing file (one instruction per line). Reads stdin when omitted
    input: Option<PathBuf>,

    /// Disassemble with gdb from this binary instead of reading a listing
    #[arg(long = "gdb", value_name = "BINARY", conflicts_with = "input", requires = "function")]
    gdb_binary: Option<PathBuf>,

    /// Function to disassemble (with --gdb)
    #[arg(short = 'f', long = "function", requires = "gdb_binary")]
    function: Option<String>,

    /// gdb executable
    #[arg(long = "gdb-path", default_value = "gdb")]
    gdb_path: String,

    /// JSON configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long = "json", default_value_t = false)]
    json: bool,

    /// Never emit color escape sequences
    #[arg(long = "no-color", default_value_t = false, conflicts_with = "color")]
    no_color: bool,

    /// Emit color escape sequences even when stdout is not a terminal
    #[arg(long = "color", default_value_t = false)]
    color: bool,

    /// Enable debug output
    #[arg(short = 'd', long = "debug", default_value_t = false)]
    debug: bool,
}

impl AnnotateArgs {
    fn source(&self) -> ListingSource {
        match (&self.gdb_binary, &self.function, &self.input) {
            (Some(binary), Some(function), _) => ListingSource::Gdb {
                gdb: self.gdb_path.clone(),
                binary: binary.clone(),
                function: function.clone(),
            },
            (_, _, Some(path)) => ListingSource::File(path.clone()),
            _ => ListingSource::Stdin,
        }
    }

    fn options(&self) -> Result<AnnotateOptions> {
        let options = match &self.config {
            Some(path) => AnnotateOptions::load(path)?,
            None => AnnotateOptions::default(),
        };
        let markup = if self.no_color {
            Markup::Plain
        } else if self.color {
            Markup::Ansi
        } else if !std::io::stdout().is_terminal() {
            Markup::Plain
        } else {
            options.markup
        };
        Ok(options.with_markup(markup))
    }
}

fn start_logger(debug: bool) -> Result<LoggerHandle> {
    let level = if debug { "debug" } else { "warn" };
    let handle = Logger::try_with_env_or_str(level)?.log_to_stderr().start()?;
    Ok(handle)
}

fn run(detect: Detect, args: AnnotateArgs) -> Result<()> {
    let options = args.options()?;
    let source = args.source();
    log::debug!("reading listing from {:?}", source);
    let text = source.read()?;

    match detect {
        Detect::Loops => log::info!("Looking for loops..."),
        Detect::Recursion => log::info!("Looking for recursive calls..."),
        Detect::All => log::info!("Looking for loops and recursive calls..."),
    }

    match annotate(&text, detect, &options) {
        Ok(annotation) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&serialize_annotation(&annotation))?);
            } else {
                print!("{}", annotation.to_text());
            }
            Ok(())
        }
        Err(AnnotateError::EmptyInput) => {
            println!("{}", AnnotateError::EmptyInput);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (detect, args) = match cli.command {
        Commands::Loops(args) => (Detect::Loops, args),
        Commands::Recursion(args) => (Detect::Recursion, args),
        Commands::All(args) => (Detect::All, args),
    };
    let _logger = start_logger(args.debug)?;
    run(detect, args)
}
