//! Minimal CLI: convert (JSON → .proto) and validate (.proto lint).
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;

use crate::synth::{self, Options, Syntax};
use crate::validate;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// synthesize a protobuf schema from JSON sample data, or lint .proto text
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// infer a .proto schema from a JSON document
    Convert(ConvertCmd),
    /// check .proto text for structural problems
    Validate(ValidateCmd),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// input file, a quoted glob pattern resolving to one file, or '-' for stdin
    input: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SyntaxArg {
    Proto3,
    Proto2,
}

impl From<SyntaxArg> for Syntax {
    fn from(arg: SyntaxArg) -> Self {
        match arg {
            SyntaxArg::Proto3 => Syntax::Proto3,
            SyntaxArg::Proto2 => Syntax::Proto2,
        }
    }
}

#[derive(Args, Debug)]
struct ConvertCmd {
    #[command(flatten)]
    input_settings: InputSettings,

    /// proto package name
    #[arg(long, default_value = "com.example.api")]
    package: String,

    /// proto syntax version
    #[arg(long, value_enum, default_value = "proto3")]
    syntax: SyntaxArg,

    /// root message name (inferred from the input if omitted)
    #[arg(long)]
    root_message: Option<String>,

    /// emit a CRUD service stub with this name
    #[arg(long)]
    service: Option<String>,

    /// do not emit import lines for well-known types
    #[arg(long)]
    no_auto_import: bool,

    /// map null fields to google.protobuf.NullValue instead of `optional`
    #[arg(long)]
    no_optional: bool,

    /// run the validator over the generated schema and report findings
    #[arg(long)]
    validate: bool,

    /// print run statistics as JSON to stderr
    #[arg(long)]
    stats: bool,

    /// output .proto file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ValidateCmd {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output report file (colored stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> Result<String> {
        if self.input == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            return Ok(buf);
        }
        let path = resolve_file_path_pattern(&self.input)?;
        std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read input file {}", path.display()))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Convert(target) => run_convert(target),
            Command::Validate(target) => run_validate(target),
        }
    }
}

fn run_convert(target: &ConvertCmd) -> Result<()> {
    let json_text = target.input_settings.load()?;
    let options = Options {
        package: target.package.clone(),
        syntax: target.syntax.into(),
        root_message: target.root_message.clone(),
        service_name: target.service.clone(),
        auto_import: !target.no_auto_import,
        use_optional: !target.no_optional,
    };

    let conversion = match synth::convert(&json_text, &options) {
        Ok(c) => c,
        Err(failure) => {
            for warning in &failure.warnings {
                eprintln!("{} {warning}", "warning:".yellow().bold());
            }
            bail!("{}", failure.message);
        }
    };

    for warning in &conversion.warnings {
        eprintln!("{} {warning}", "warning:".yellow().bold());
    }
    if target.stats {
        eprintln!("{}", serde_json::to_string_pretty(&conversion.stats)?);
    }

    write_output(target.out.as_deref(), &conversion.proto)?;

    if target.validate {
        let report = validate::validate(&conversion.proto);
        print_report(&report);
        if !report.valid {
            bail!("generated schema failed validation");
        }
    }
    Ok(())
}

fn run_validate(target: &ValidateCmd) -> Result<()> {
    let proto_text = target.input_settings.load()?;
    let report = validate::validate(&proto_text);

    if let Some(out) = target.out.as_deref() {
        write_output(Some(out), &validate::report::render(&report))?;
    } else {
        print_report(&report);
    }

    if !report.valid {
        bail!("{}", report.summary);
    }
    Ok(())
}

fn print_report(report: &validate::Report) {
    let status = if report.valid {
        "VALID".green().bold()
    } else {
        "INVALID".red().bold()
    };
    println!("Status: {status}");
    println!("{}", report.summary);
    for error in &report.errors {
        println!("  {} {error}", "error:".red().bold());
    }
    for warning in &report.warnings {
        println!("  {} {warning}", "warning:".yellow().bold());
    }
    for note in &report.info {
        println!("  {} {note}", "info:".cyan());
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_output(out: Option<&std::path::Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

fn resolve_file_path_pattern(pattern: &str) -> Result<PathBuf> {
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    if !has_glob_chars(pattern) {
        return Ok(PathBuf::from(pattern));
    }

    let mut matches = Vec::new();
    for entry in glob::glob(pattern)? {
        matches.push(entry?);
    }
    match matches.len() {
        0 => bail!("glob pattern matched no files: {pattern}"),
        1 => Ok(matches.remove(0)),
        n => bail!("glob pattern matched {n} files, expected exactly one: {pattern}"),
    }
}
