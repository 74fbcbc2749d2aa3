mod config;
#[cfg(test)]
mod fakes;
mod pr;
mod report;
mod scope;
mod vcs;

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// PR Scope — lists the files a pull request build changes against its
/// target branch, so a lint step can check only those.
#[derive(Parser, Debug)]
#[command(name = "pr-scope", version, about)]
struct Cli {
    /// Working copy to inspect. It is checked out and reset in place.
    #[arg(long, default_value = ".")]
    repo_dir: PathBuf,

    /// Config file (defaults to .pr-scope.toml in the current directory, if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// File extension to keep; repeat for several (overrides the config file)
    #[arg(short, long = "extension", value_name = "EXT")]
    extensions: Vec<String>,

    /// Remote whose tracking branch the target branch is reset to
    #[arg(long)]
    remote: Option<String>,

    /// Fetch the target branch from the remote before resetting it
    #[arg(long)]
    fetch: bool,

    /// Also write the newline-separated file list to this path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", failure_message(err.as_ref()));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    info!("loading configuration");
    let mut config = config::Config::load(cli.config.as_deref())?;
    if !cli.extensions.is_empty() {
        config.scope.extensions = cli.extensions;
    }
    if let Some(remote) = cli.remote {
        config.scope.remote = remote;
    }
    config.scope.fetch |= cli.fetch;
    debug!(scope = ?config.scope, api_url = %config.github.api_url, "effective configuration");

    let ctx = scope::BuildContext::from_env();
    let http = pr::ReqwestClient::new(config.github.timeout())?;
    let git = vcs::GitCli::new(cli.repo_dir);
    debug!(repo = %git.repo_dir().display(), "using working copy");

    let outcome = scope::resolve(&ctx, &config, &http, &git).await?;

    report::output(
        &outcome,
        &config.scope.normalized_extensions(),
        cli.output.as_deref(),
    )?;
    info!(files = outcome.files().len(), "done");

    Ok(())
}

/// The single stderr line printed when a run fails.
fn failure_message(err: &dyn std::error::Error) -> String {
    format!("{} {err}", "error:".red().bold())
}
