//! officetext CLI - text extraction from DOCX and XLSX files
//!
//! Exit codes: 0 success, 1 unsupported file type, 2 file read failure,
//! 3 parse failure, 4 unexpected error.

use clap::Parser;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use officetext::{Error, ParserOptions};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extract text from DOCX and XLSX files
#[derive(Parser)]
#[command(
    name = "officetext",
    author = "iyulab",
    version,
    about = "Extract text from DOCX and XLSX files"
)]
struct Cli {
    /// Path to the file to parse
    file: PathBuf,

    /// Include metadata in output
    #[arg(short, long)]
    metadata: bool,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        match e {
            Error::UnsupportedFileType { .. } | Error::FileRead { .. } | Error::Parse { .. } => {
                eprintln!("{}", format!("❌ {}", e).red());
            }
            _ => eprintln!("{}", format!("❌ Unexpected error: {}", e).red()),
        }
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    // Resolved on the path as given, before it is made absolute
    let file_type = officetext::require_file_type(&cli.file.to_string_lossy())?;

    let resolved = std::path::absolute(&cli.file).map_err(|source| Error::FileRead {
        path: cli.file.clone(),
        source,
    })?;
    debug!(path = %resolved.display(), %file_type, "resolved input path");

    let options = ParserOptions::new()
        .with_metadata(cli.metadata)
        .with_normalize_whitespace(true);

    let pb = create_spinner("Parsing document...");
    let result = officetext::extract_file(&resolved, &options);
    pb.finish_and_clear();
    let result = result?;

    let output = if cli.json {
        result.to_json_pretty()?
    } else {
        result.text
    };

    write_output(cli.output.as_deref(), &output)?;

    if let Some(path) = cli.output {
        println!(
            "{}",
            format!("✓ Output written to {}", path.display()).green()
        );
    }

    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), Error> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from(["officetext", "report.docx", "-m", "-j", "-o", "out.json"])
            .unwrap();
        assert_eq!(cli.file, PathBuf::from("report.docx"));
        assert!(cli.metadata);
        assert!(cli.json);
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));

        let cli = Cli::try_parse_from(["officetext", "data.xlsx"]).unwrap();
        assert!(!cli.metadata && !cli.json);
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_file_is_required() {
        assert!(Cli::try_parse_from(["officetext"]).is_err());
    }
}
