//! Sable CLI
//!
//! Command-line interface for the Sable lexer.

use std::fs;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use sable_core::diagnostics::LexOutput;
use sable_core::{Diagnostic, Lexer, Token, TokenValue};

#[derive(Parser)]
#[command(name = "sable")]
#[command(author, version, about = "Lexer for the Sable language", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lex a source file and print its token stream
    Lex {
        /// Path to the source file
        file: Option<String>,

        /// Lex this text instead of reading a file
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,

        /// Output format (human, json)
        #[arg(short, long, default_value = "human")]
        format: String,

        /// Skip whitespace and comment tokens in the output
        #[arg(long)]
        skip_trivia: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Lex {
            file,
            text,
            format,
            skip_trivia,
        } => cmd_lex(file.as_deref(), text.as_deref(), &format, skip_trivia),
    }
}

fn cmd_lex(file: Option<&str>, text: Option<&str>, format: &str, skip_trivia: bool) -> ExitCode {
    let source = match (file, text) {
        (_, Some(text)) => text.to_string(),
        (Some(file), None) => match fs::read_to_string(file) {
            Ok(s) => s,
            Err(e) => {
                eprintln!(
                    "{} Failed to read file '{}': {}",
                    "error:".red().bold(),
                    file,
                    e
                );
                return ExitCode::from(2);
            }
        },
        (None, None) => {
            eprintln!(
                "{} No input: pass a file path or --text",
                "error:".red().bold()
            );
            return ExitCode::from(2);
        }
    };

    let mut lexer = Lexer::new(&source);
    let mut tokens = lexer.tokenize();
    let had_error = lexer.had_error();
    let diagnostics = lexer.into_diagnostics();

    if skip_trivia {
        tokens.retain(|t| !t.kind.is_trivia());
    }

    match format {
        "json" => {
            let output = LexOutput::new(tokens, &diagnostics);
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
        }
        _ => {
            for token in &tokens {
                println!("{:<14} `{}`", token.kind.to_string(), display_value(token));
            }

            if !diagnostics.is_empty() {
                println!();
            }
            for diag in diagnostics.iter() {
                print_diagnostic(diag);
                println!();
            }
        }
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

/// Token value with control characters escaped so one token stays on one
/// output line.
fn display_value(token: &Token) -> String {
    match &token.value {
        TokenValue::Text(s) => s
            .replace('\\', "\\\\")
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t"),
        value => value.to_string(),
    }
}

/// Print a diagnostic with its header colored, leaving the caret row and
/// quoted source line untouched.
fn print_diagnostic(diag: &Diagnostic) {
    for (i, line) in diag.to_string().lines().enumerate() {
        if i == 0 {
            println!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }
}
