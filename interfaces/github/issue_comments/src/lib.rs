//! GitHub REST interface for repository issue comments
//!
//! - `index`: authenticated, page-by-page fetch of `/issues/comments`
//! - `models`: wire shapes of the comment listing

pub mod index;
pub mod models;
