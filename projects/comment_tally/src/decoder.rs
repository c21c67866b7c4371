use std::fs;
use std::io;
use std::path::Path;

use interfaces_github_issue_comments::models::IssueComment;
use serde::de::IgnoredAny;
use thiserror::Error;
use tracing::{error, warn};

pub const DEFAULT_DUMP_FILE: &str = "response.json";

#[derive(Debug, Error)]
pub enum DecodePageError {
    #[error("DeserializeResponseBody: {source}")]
    DeserializeResponseBody {
        #[from]
        source: serde_json::Error,
    },
}

/// Decodes one page of the comment listing, keeping server order.
///
/// Bytes that are not JSON at all are written to `dump_path` before the
/// decode error is returned.
pub fn decode_page(body: &[u8], dump_path: &Path) -> Result<Vec<IssueComment>, DecodePageError> {
    dump_if_malformed(body, dump_path);

    let comments = serde_json::from_slice(body)?;
    Ok(comments)
}

/// Writes `body` to `dump_path` when it is not a single JSON document.
/// Returns whether a dump was attempted.
pub fn dump_if_malformed(body: &[u8], dump_path: &Path) -> bool {
    if serde_json::from_slice::<IgnoredAny>(body).is_ok() {
        return false;
    }

    warn!(
        bytes = body.len(),
        dump = %dump_path.display(),
        "Response body is not valid JSON, dumping it"
    );

    if let Err(err) = dump_raw_body(dump_path, body) {
        error!(dump = %dump_path.display(), error = %err, "Failed to write response dump");
    }

    true
}

/// Overwrites `path` with `body`, mode 0644.
pub fn dump_raw_body(path: &Path, body: &[u8]) -> io::Result<()> {
    fs::write(path, body)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o644))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_comments_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("response.json");
        let body = br#"[
            {"id": 3, "user": {"login": "carol"}},
            {"id": 1, "user": {"login": "alice"}},
            {"id": 2, "user": {"login": "bob"}}
        ]"#;

        let comments = decode_page(body, &dump).unwrap();

        let ids: Vec<u64> = comments.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert!(!dump.exists());
    }

    #[test]
    fn empty_array_is_an_empty_page() {
        let dir = tempfile::tempdir().unwrap();
        let comments = decode_page(b"[]", &dir.path().join("response.json")).unwrap();
        assert!(comments.is_empty());
    }

    #[test]
    fn wrong_shape_fails_without_dump() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("response.json");

        let err = decode_page(br#"{"message": "Not Found"}"#, &dump).unwrap_err();

        assert!(matches!(err, DecodePageError::DeserializeResponseBody { .. }));
        assert!(!dump.exists());
    }

    #[test]
    fn malformed_body_is_dumped_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("response.json");
        fs::write(&dump, b"previous contents that are longer than the new ones").unwrap();
        let body = b"<html>502 Bad Gateway";

        let err = decode_page(body, &dump).unwrap_err();

        assert!(matches!(err, DecodePageError::DeserializeResponseBody { .. }));
        assert_eq!(fs::read(&dump).unwrap(), body.to_vec());
    }

    #[cfg(unix)]
    #[test]
    fn dump_is_not_world_writable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("response.json");

        dump_raw_body(&dump, b"{").unwrap();

        let mode = fs::metadata(&dump).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn valid_json_is_not_dumped() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("response.json");

        assert!(!dump_if_malformed(br#"{"message": "Server Error"}"#, &dump));
        assert!(!dump.exists());
    }

    #[test]
    fn odd_timestamp_does_not_drop_the_page() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("response.json");
        let body = br#"[
            {"user": {"login": "alice"}, "created_at": "2020-01-01 00:00:00"},
            {"user": {"login": "bob"}, "updated_at": 1577836800}
        ]"#;

        let comments = decode_page(body, &dump).unwrap();

        let logins: Vec<&str> = comments.iter().map(|c| c.author_login()).collect();
        assert_eq!(logins, vec!["alice", "bob"]);
        assert_eq!(comments[0].created_at, None);
        assert_eq!(comments[1].updated_at, None);
        assert!(!dump.exists());
    }

    #[test]
    fn empty_body_is_dumped() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("response.json");

        assert!(decode_page(b"", &dump).is_err());
        assert_eq!(fs::read(&dump).unwrap(), Vec::<u8>::new());
    }
}
