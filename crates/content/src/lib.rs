//! Flat-file blog content for the portfolio server.
//!
//! Posts are Markdown files with YAML front-matter, read from a directory
//! and cached briefly in memory.

pub mod config;
pub mod error;
pub mod post;
pub mod store;

pub use config::*;
pub use error::{ContentError, Result};
pub use post::{Post, PostSummary};
pub use store::*;
