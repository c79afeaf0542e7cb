use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use cddl_core::ValidateError;
use cddl_lsp::position::offset_to_position;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// CDDL schema language toolchain.
#[derive(Parser)]
#[command(name = "cddl", version, about = "CDDL schema language toolchain")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a .cddl file and report syntax errors
    Check {
        /// Path to the .cddl schema file
        file: PathBuf,
    },

    /// Validate a JSON document against a .cddl schema
    Validate {
        /// Path to the .cddl schema file
        schema: PathBuf,
        /// Path to the JSON document to validate
        #[arg(long)]
        json: PathBuf,
    },

    /// Start the Language Server Protocol server over stdio
    Lsp,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { file } => {
            cmd_check(&file, cli.output, cli.quiet);
        }
        Commands::Validate { schema, json } => {
            cmd_validate(&schema, &json, cli.output, cli.quiet);
        }
        Commands::Lsp => {
            if let Err(e) = cddl_lsp::run() {
                eprintln!("LSP server error: {}", e);
                process::exit(1);
            }
        }
    }
}

fn cmd_check(file: &Path, output: OutputFormat, quiet: bool) {
    let src = read_file(file, output, quiet);

    match cddl_core::parse(&src) {
        Ok(rules) => {
            if !quiet {
                match output {
                    OutputFormat::Text => println!("ok: {} rule(s)", rules.len()),
                    OutputFormat::Json => {
                        println!("{{\"valid\": true, \"rules\": {}}}", rules.len())
                    }
                }
            }
        }
        Err(errors) => {
            match output {
                OutputFormat::Text => {
                    if !quiet {
                        for e in &errors {
                            // 1-based line:column for humans, editors agree
                            let pos = offset_to_position(&src, e.span.start);
                            eprintln!(
                                "{}:{}:{}: error: {}",
                                file.display(),
                                pos.line + 1,
                                pos.character + 1,
                                e.message
                            );
                        }
                    }
                }
                OutputFormat::Json => {
                    let errors: Vec<serde_json::Value> = errors
                        .iter()
                        .map(|e| {
                            let pos = offset_to_position(&src, e.span.start);
                            serde_json::json!({
                                "line": pos.line + 1,
                                "column": pos.character + 1,
                                "message": e.message,
                            })
                        })
                        .collect();
                    let json = serde_json::json!({ "valid": false, "errors": errors });
                    eprintln!(
                        "{}",
                        serde_json::to_string_pretty(&json).unwrap_or_default()
                    );
                }
            }
            process::exit(1);
        }
    }
}

fn cmd_validate(schema_path: &Path, json_path: &Path, output: OutputFormat, quiet: bool) {
    let schema = read_file(schema_path, output, quiet);
    let doc = read_file(json_path, output, quiet);

    match cddl_core::validate_json_str(&schema, &doc) {
        Ok(()) => {
            if !quiet {
                match output {
                    OutputFormat::Text => println!("valid"),
                    OutputFormat::Json => println!("{{\"valid\": true}}"),
                }
            }
        }
        Err(e) => {
            let errors = flatten_errors(e);
            match output {
                OutputFormat::Text => {
                    if !quiet {
                        eprintln!("invalid");
                        for err in &errors {
                            eprintln!("  - {}", err);
                        }
                    }
                }
                OutputFormat::Json => {
                    let json = serde_json::json!({ "valid": false, "errors": errors });
                    eprintln!(
                        "{}",
                        serde_json::to_string_pretty(&json).unwrap_or_default()
                    );
                }
            }
            process::exit(1);
        }
    }
}

/// One message per failure; a multi-failure result is listed flat.
fn flatten_errors(error: ValidateError) -> Vec<String> {
    match error {
        ValidateError::Multi(errors) => errors.into_iter().map(|e| e.to_string()).collect(),
        other => vec![other.to_string()],
    }
}

fn read_file(path: &Path, output: OutputFormat, quiet: bool) -> String {
    match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            report_error(
                &format!("error reading file '{}': {}", path.display(), e),
                output,
                quiet,
            );
            process::exit(1);
        }
    }
}

fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{{\"error\": \"{}\"}}", msg.replace('"', "\\\""));
        }
    }
}
