use std::path::PathBuf;

use async_trait::async_trait;
use interfaces_github_issue_comments::index::{
    fetch_issue_comments_page, Credentials, GitHubRestResult, PageRequest,
};
use interfaces_github_issue_comments::models::ErrorBody;
use reqwest::{Client, Url};

use crate::decoder::{decode_page, dump_if_malformed};
use crate::driver::{PageOutcome, PageSource};

/// Pages of `{base_url}/issues/comments` fetched over the GitHub REST API.
pub struct GitHubPageSource {
    client: Client,
    base_url: Url,
    credentials: Credentials,
    dump_path: PathBuf,
}

impl GitHubPageSource {
    pub fn new(
        client: Client,
        base_url: Url,
        credentials: Credentials,
        dump_path: PathBuf,
    ) -> Self {
        Self {
            client,
            base_url,
            credentials,
            dump_path,
        }
    }
}

#[async_trait]
impl PageSource for GitHubPageSource {
    async fn fetch_page(&mut self, page: u32) -> PageOutcome {
        let request = PageRequest::for_page(&self.base_url, page, self.credentials.clone());

        let GitHubRestResult { body, status } =
            match fetch_issue_comments_page(&self.client, &request).await {
                Ok(result) => result,
                Err(err) => {
                    return PageOutcome::TransportFailure {
                        reason: err.to_string(),
                    }
                }
            };

        if !status.is_success() {
            dump_if_malformed(&body, &self.dump_path);

            let message = serde_json::from_slice::<ErrorBody>(&body)
                .map(|error| error.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());

            return PageOutcome::TransportFailure {
                reason: format!("HTTP {status}: {message}"),
            };
        }

        match decode_page(&body, &self.dump_path) {
            Ok(comments) => PageOutcome::Success(comments),
            Err(err) => PageOutcome::DecodeFailure {
                reason: err.to_string(),
                raw: body,
            },
        }
    }
}
