use std::io;

use clap::Parser;
use interfaces_github_issue_comments::index::{build_client, FetchIssueCommentsError};
use projects_comment_tally::config::{Args, ConfigError, TallyConfig};
use projects_comment_tally::driver;
use projects_comment_tally::report::write_report;
use projects_comment_tally::source::GitHubPageSource;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum MainError {
    #[error("TracingInit: {source}")]
    TracingInit {
        #[source]
        source: utils_trace::TracingInitError,
    },
    #[error("Config: {source}")]
    Config {
        #[source]
        source: ConfigError,
    },
    #[error("ClientBuild: {source}")]
    ClientBuild {
        #[source]
        source: FetchIssueCommentsError,
    },
    #[error("WriteReport: {source}")]
    WriteReport {
        #[source]
        source: io::Error,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), MainError> {
    let dotenv = dotenvy::dotenv();
    let args = Args::parse();

    utils_trace::init(&args.log_level).map_err(|source| MainError::TracingInit { source })?;

    if let Ok(path) = dotenv {
        debug!(path = %path.display(), "Loaded .env");
    }

    let config = TallyConfig::try_from(&args).map_err(|source| MainError::Config { source })?;
    let client = build_client().map_err(|source| MainError::ClientBuild { source })?;

    info!(base_url = %config.base_url, "Tallying issue comments");

    let mut source = GitHubPageSource::new(
        client,
        config.base_url.clone(),
        config.credentials.clone(),
        config.dump_file.clone(),
    );
    let summary = driver::run(&mut source, config.policy).await;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&summary.tally, &mut out).map_err(|source| MainError::WriteReport { source })?;

    Ok(())
}
