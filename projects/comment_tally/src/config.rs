use std::path::PathBuf;

use clap::Parser;
use interfaces_github_issue_comments::index::Credentials;
use reqwest::Url;
use thiserror::Error;

use crate::decoder::DEFAULT_DUMP_FILE;
use crate::driver::TerminationPolicy;

pub const DEFAULT_BASE_URL: &str = "https://api.github.com/repos/tripal/tripal";

#[derive(Parser)]
#[command(
    name = "comment_tally",
    about = "Count issue comments per author for a GitHub repository"
)]
pub struct Args {
    /// GitHub username
    #[arg(short = 'u', long = "username", env = "GITHUB_USERNAME", default_value = "")]
    pub username: String,

    /// GitHub password or token
    #[arg(
        short = 'p',
        long = "password",
        env = "GITHUB_PASSWORD",
        default_value = "",
        hide_env_values = true
    )]
    pub password: String,

    /// Repository API root, e.g. https://api.github.com/repos/OWNER/NAME
    #[arg(long, env = "COMMENT_TALLY_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Stop after this many requests even if pages keep coming
    #[arg(
        long,
        env = "COMMENT_TALLY_MAX_PAGES",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_pages: Option<u32>,

    /// Consecutive failed pages to skip before stopping
    #[arg(long, env = "COMMENT_TALLY_MAX_FAILURES", default_value_t = 0)]
    pub max_failures: u32,

    /// Where bodies that are not valid JSON get written
    #[arg(long, env = "COMMENT_TALLY_DUMP_FILE", default_value = DEFAULT_DUMP_FILE)]
    pub dump_file: PathBuf,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "COMMENT_TALLY_LOG", default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct TallyConfig {
    pub credentials: Credentials,
    pub base_url: Url,
    pub policy: TerminationPolicy,
    pub dump_file: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("InvalidBaseUrl: {value}: {reason}")]
    InvalidBaseUrl { value: String, reason: String },
}

impl TryFrom<&Args> for TallyConfig {
    type Error = ConfigError;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        Ok(Self {
            credentials: Credentials::new(args.username.as_str(), args.password.as_str()),
            base_url: parse_base_url(&args.base_url)?,
            policy: TerminationPolicy {
                max_pages: args.max_pages,
                max_failures: args.max_failures,
            },
            dump_file: args.dump_file.clone(),
        })
    }
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        value: value.to_string(),
        reason,
    };

    let url = Url::parse(value).map_err(|err| invalid(err.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("not a hierarchical URL".to_string()));
    }

    Ok(url)
}
