//! Command-line host for tally documents
//!
//! Usage:
//!   tally eval [FILE] [--active-line N] [--extended]   - Evaluate a document (stdin when FILE is absent)
//!   tally adjust OLD NEW                               - Renumber references in NEW after editing OLD

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tally::{Engine, EngineOptions, GrammarSet, adjust_references};

#[derive(Parser)]
#[command(name = "tally")]
#[command(version, about = "Evaluate reference-aware calculation documents")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate every line and print the rendered document
    Eval {
        /// Document to evaluate; reads stdin when absent
        file: Option<PathBuf>,
        /// 1-based logical line being edited; its spacing is kept as typed
        #[arg(long)]
        active_line: Option<usize>,
        /// Also try the percentage, programmer and permissions grammars
        #[arg(long)]
        extended: bool,
        /// Print one JSON record per logical line instead of the document
        #[arg(long)]
        json: bool,
    },
    /// Print NEW with its references renumbered for the edit from OLD
    Adjust {
        /// Document before the edit
        old: PathBuf,
        /// Document after the edit
        new: PathBuf,
    },
}

fn main() {
    let args = Args::parse();

    match args.command {
        Command::Eval {
            file,
            active_line,
            extended,
            json,
        } => {
            let text = match file {
                Some(path) => read_file(&path),
                None => read_stdin(),
            };
            let grammars = if extended {
                GrammarSet::Extended
            } else {
                GrammarSet::Standard
            };
            let engine = Engine::with_options(EngineOptions::default().with_grammars(grammars));

            if json {
                print_json(&engine, &text, active_line);
                return;
            }

            let lines: Vec<&str> = text.lines().collect();
            for line in engine.evaluate_document_at(&lines, active_line) {
                for rendered in line.rendered_lines() {
                    println!("{rendered}");
                }
            }
        }
        Command::Adjust { old, new } => {
            let old = read_file(&old);
            let new = read_file(&new);
            print!("{}", adjust_references(&old, &new));
        }
    }
}

fn read_file(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path.display(), e);
        std::process::exit(1);
    })
}

fn read_stdin() -> String {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text).unwrap_or_else(|e| {
        eprintln!("Error reading stdin: {}", e);
        std::process::exit(1);
    });
    text
}

#[cfg(feature = "serde")]
fn print_json(engine: &Engine, text: &str, active_line: Option<usize>) {
    let lines: Vec<&str> = text.lines().collect();
    for record in engine.records_at(&lines, active_line) {
        let json = serde_json::to_string(&record).unwrap_or_else(|e| {
            eprintln!("Error formatting record: {}", e);
            std::process::exit(1);
        });
        println!("{json}");
    }
}

#[cfg(not(feature = "serde"))]
fn print_json(_engine: &Engine, _text: &str, _active_line: Option<usize>) {
    eprintln!("JSON output needs tally built with the `serde` feature");
    std::process::exit(2);
}
