//! sessionkey - stable project keys for Claude Code session sync.
//!
//! Session-sync code needs to recognise one project directory across local
//! and remote contexts, even when the same directory is spelled
//! `test_temp_01`, `test.temp.01` or `test-temp-01`. This crate maps raw
//! filesystem paths to a canonical key that matches the directory names
//! Claude Code uses under `~/.claude/projects`, and joins that key with a
//! machine identifier into a project key.
//!
//! # Modules
//!
//! - [`normalize`]: Raw path to [`CanonicalKey`](normalize::CanonicalKey)
//! - [`project_key`]: `machine-id:canonical-key` project keys
//! - [`report`]: Batch normalization and collision grouping
//! - [`projects`]: Project and session lookup under the Claude directory
//! - [`config`]: Configuration from environment variables
//! - [`error`]: Error types
//!
//! # Example
//!
//! ```
//! use sessionkey::{PathNormalizer, ProjectKeyBuilder};
//!
//! let builder = ProjectKeyBuilder::new("machine-123", PathNormalizer::with_home("/Users/x"))?;
//! let key = builder.key_for_path("~/Documents/test_temp_01")?;
//! assert_eq!(key.to_string(), "machine-123:-Users-x-Documents-test-temp-01");
//! # Ok::<(), sessionkey::KeyError>(())
//! ```

pub mod config;
pub mod error;
pub mod normalize;
pub mod project_key;
pub mod projects;
pub mod report;

pub use error::{InvalidPathReason, KeyError, Result, SessionKeyError};
pub use normalize::{normalize_path_for_key, CanonicalKey, PathNormalizer};
pub use project_key::{ProjectKey, ProjectKeyBuilder};
pub use report::NormalizationReport;
