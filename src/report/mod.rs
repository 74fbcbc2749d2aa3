use crate::scope::Outcome;
use colored::Colorize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write file list: {0}")]
    FileWrite(#[from] std::io::Error),
}

/// Print the outcome to stdout, then write the bare file list to
/// `output_path` when one is given.
#[instrument(skip(outcome, extensions), fields(files = outcome.files().len()))]
pub fn output(
    outcome: &Outcome,
    extensions: &[String],
    output_path: Option<&Path>,
) -> Result<(), ReportError> {
    print_terminal_report(outcome, extensions);
    if let Some(path) = output_path {
        debug!(path = %path.display(), "writing file list");
        write_file_list(outcome, path)?;
    }
    Ok(())
}

/// One human-readable line summarizing the outcome.
fn status_line(outcome: &Outcome, extensions: &[String]) -> String {
    let kind = describe_extensions(extensions);
    match outcome {
        Outcome::NotAPullRequest => "Not a pull request, nothing to check.".to_string(),
        Outcome::NoChangedFiles { target } => {
            format!("No {kind} changed against {target}, no files to check.")
        }
        Outcome::Changed { target, files } => {
            format!("{} {kind} changed against {target}:", files.len())
        }
    }
}

/// `PHP files`, `PHP/INC files`, or plain `files` when unfiltered.
fn describe_extensions(extensions: &[String]) -> String {
    if extensions.is_empty() {
        return "files".to_string();
    }
    let names: Vec<String> = extensions.iter().map(|ext| ext.to_uppercase()).collect();
    format!("{} files", names.join("/"))
}

/// Status line in color, followed by one path per line for the lint step.
fn print_terminal_report(outcome: &Outcome, extensions: &[String]) {
    let line = status_line(outcome, extensions);
    match outcome {
        Outcome::Changed { files, .. } => {
            println!("{}", line.yellow().bold());
            for file in files {
                println!("{file}");
            }
        }
        _ => println!("{}", line.green().bold()),
    }
}

/// Newline-separated paths; an empty file when nothing needs checking.
fn write_file_list(outcome: &Outcome, path: &Path) -> Result<(), ReportError> {
    let mut contents = outcome.files().join("\n");
    if !contents.is_empty() {
        contents.push('\n');
    }
    std::fs::write(path, contents)?;
    Ok(())
}
