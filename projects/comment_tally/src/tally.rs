use std::collections::HashMap;

use interfaces_github_issue_comments::models::IssueComment;

/// Comment count per author login. Logins are compared byte-for-byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    counts: HashMap<String, u64>,
    records: u64,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, login: &str) {
        *self.counts.entry(login.to_owned()).or_insert(0) += 1;
        self.records += 1;
    }

    pub fn fold(&mut self, comments: &[IssueComment]) {
        for comment in comments {
            self.record(comment.author_login());
        }
    }

    pub fn get(&self, login: &str) -> Option<u64> {
        self.counts.get(login).copied()
    }

    /// Number of distinct authors.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of comments folded in; always the sum of all counts.
    pub fn total(&self) -> u64 {
        self.records
    }

    /// Unordered.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts
            .iter()
            .map(|(login, count)| (login.as_str(), *count))
    }
}
