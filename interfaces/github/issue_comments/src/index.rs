use std::fmt;

use bytes::Bytes;
use reqwest::{header, Client, StatusCode, Url};
use thiserror::Error;
use tracing::debug;

pub const USER_AGENT: &str = "comment-tally";

/// HTTP basic credentials. Empty values are sent as-is.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// One page of the comment listing, built fresh for every request.
#[derive(Debug, Clone)]
pub struct PageRequest {
    url: Url,
    credentials: Credentials,
}

impl PageRequest {
    pub fn new(url: Url, credentials: Credentials) -> Self {
        Self { url, credentials }
    }

    pub fn for_page(base_url: &Url, page: u32, credentials: Credentials) -> Self {
        Self::new(comments_url(base_url, page), credentials)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// `{base_url}/issues/comments?state=all`, with `&page=N` from page 2 on.
pub fn comments_url(base_url: &Url, page: u32) -> Url {
    let mut url = base_url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(["issues", "comments"]);
    }

    {
        let mut query = url.query_pairs_mut();
        query.clear().append_pair("state", "all");
        if page > 1 {
            query.append_pair("page", &page.to_string());
        }
    }

    url
}

pub fn build_client() -> Result<Client, FetchIssueCommentsError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|source| FetchIssueCommentsError::ClientBuild { source })
}

pub struct GitHubRestResult {
    pub body: Bytes,
    pub status: StatusCode,
}

pub async fn fetch_issue_comments_page(
    client: &Client,
    request: &PageRequest,
) -> Result<GitHubRestResult, FetchIssueCommentsError> {
    let credentials = request.credentials();

    debug!(url = %request.url(), "Fetching issue comments page");

    let response = client
        .get(request.url().clone())
        .basic_auth(&credentials.username, Some(&credentials.password))
        .header(header::ACCEPT, "application/vnd.github+json")
        .send()
        .await
        .map_err(|source| FetchIssueCommentsError::RequestSend { source })?;

    let status = response.status();

    // Reading to the end hands the connection back to the pool.
    let body = response
        .bytes()
        .await
        .map_err(|source| FetchIssueCommentsError::ResponseRead { source })?;

    debug!(%status, bytes = body.len(), "Issue comments page received");

    Ok(GitHubRestResult { body, status })
}

#[derive(Debug, Error)]
pub enum FetchIssueCommentsError {
    #[error("ClientBuild: {source}")]
    ClientBuild {
        source: reqwest::Error,
    },

    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base() -> Url {
        Url::parse("https://api.github.com/repos/tripal/tripal").unwrap()
    }

    #[test]
    fn first_page_omits_page_parameter() {
        assert_eq!(
            comments_url(&base(), 1).as_str(),
            "https://api.github.com/repos/tripal/tripal/issues/comments?state=all"
        );
    }

    #[test]
    fn later_pages_carry_page_parameter() {
        assert_eq!(
            comments_url(&base(), 2).as_str(),
            "https://api.github.com/repos/tripal/tripal/issues/comments?state=all&page=2"
        );
        assert_eq!(
            comments_url(&base(), 17).as_str(),
            "https://api.github.com/repos/tripal/tripal/issues/comments?state=all&page=17"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let base = Url::parse("http://127.0.0.1:8080/").unwrap();
        assert_eq!(
            comments_url(&base, 3).as_str(),
            "http://127.0.0.1:8080/issues/comments?state=all&page=3"
        );
    }

    #[test]
    fn credentials_debug_hides_password() {
        let rendered = format!("{:?}", Credentials::new("alice", "hunter2"));
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn page_request_keeps_credentials() {
        let request = PageRequest::for_page(&base(), 4, Credentials::new("u", "p"));
        assert_eq!(request.credentials(), &Credentials::new("u", "p"));
        assert_eq!(request.url().query(), Some("state=all&page=4"));
    }
}
