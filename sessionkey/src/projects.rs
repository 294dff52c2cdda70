//! Lookup of Claude Code project directories by canonical key.
//!
//! Claude Code keeps one directory per project under `<claude_dir>/projects/`,
//! named with the same slug [`PathNormalizer`](crate::normalize::PathNormalizer)
//! produces, holding one JSONL transcript per session:
//!
//! ```text
//! ~/.claude/projects/
//! +-- -Users-x-Documents-test-temp-01/
//! |   +-- 6e45a55c-3124-4cc8-ad85-040a5c316009.jsonl  # Active session
//! |   +-- a1b2c3d4-5678-90ab-cdef-1234567890ab.jsonl  # Completed session
//! +-- -home-ubuntu-Projects-SMILE/
//!     +-- 60fc5b5e-a285-4a6d-b9cc-9a315eb90ea8.jsonl
//! ```
//!
//! # Session Activity Detection
//!
//! A session is **active** while its transcript has no summary event
//! (`{"type": "summary", ...}`); once one is written it is **completed**.
//!
//! Only directory names, session IDs and the summary marker are read.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::normalize::{CanonicalKey, PathNormalizer};

/// Subdirectory of the Claude Code directory holding project directories.
pub const PROJECTS_DIR: &str = "projects";

/// Extension of session transcript files.
const SESSION_EXTENSION: &str = "jsonl";

/// One session transcript inside a project directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEntry {
    pub session_id: Uuid,
    pub path: PathBuf,
    pub is_active: bool,
}

/// Returns the project directory Claude Code uses for `key`.
///
/// # Example
///
/// ```
/// use std::path::{Path, PathBuf};
/// use sessionkey::normalize::CanonicalKey;
/// use sessionkey::projects::project_dir;
///
/// let key = CanonicalKey::parse("-Users-x-code").unwrap();
/// assert_eq!(
///     project_dir(Path::new("/Users/x/.claude"), &key),
///     PathBuf::from("/Users/x/.claude/projects/-Users-x-code")
/// );
/// ```
#[must_use]
pub fn project_dir(claude_dir: &Path, key: &CanonicalKey) -> PathBuf {
    claude_dir.join(PROJECTS_DIR).join(key.as_str())
}

/// Lists the canonical keys of every project directory, sorted.
///
/// Entries that are not directories or whose names are not canonical keys are
/// skipped. A missing `projects/` directory yields an empty list.
///
/// # Errors
///
/// Returns an I/O error if the projects directory exists but cannot be read.
pub fn list_projects(claude_dir: &Path) -> Result<Vec<CanonicalKey>> {
    let projects_dir = claude_dir.join(PROJECTS_DIR);
    let entries = match fs::read_dir(&projects_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(dir = %projects_dir.display(), "Projects directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut keys = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        match name.to_str().and_then(CanonicalKey::parse) {
            Some(key) => keys.push(key),
            None => debug!(name = ?name, "Skipping non-canonical project directory"),
        }
    }
    keys.sort();

    info!(dir = %projects_dir.display(), count = keys.len(), "Listed projects");
    Ok(keys)
}

/// Lists the session transcripts of the project with `key`, sorted by path.
///
/// Files whose stem is not a UUID are skipped. A missing project directory
/// yields an empty list.
///
/// # Errors
///
/// Returns an I/O error if the project directory cannot be read. Unreadable
/// transcripts are logged and skipped.
pub fn list_sessions(claude_dir: &Path, key: &CanonicalKey) -> Result<Vec<SessionEntry>> {
    let dir = project_dir(claude_dir, key);
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "Project directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut sessions = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let Some(session_id) = session_id_from_path(&path) else {
            continue;
        };
        if !path.is_file() {
            debug!(path = %path.display(), "Skipping non-file session entry");
            continue;
        }
        // Transcripts are appended to while we read, so a partial multibyte
        // write at the end is expected.
        let content = match fs::read(&path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read session transcript");
                continue;
            }
        };
        sessions.push(SessionEntry {
            session_id,
            is_active: !has_summary_event(&content),
            path,
        });
    }
    sessions.sort_by(|a, b| a.path.cmp(&b.path));

    info!(
        dir = %dir.display(),
        sessions = sessions.len(),
        active = sessions.iter().filter(|s| s.is_active).count(),
        "Listed sessions"
    );
    Ok(sessions)
}

/// Normalizes `raw_path` and lists the sessions of the matching project.
///
/// # Errors
///
/// Returns [`SessionKeyError::Key`](crate::error::SessionKeyError::Key) if
/// the path cannot be normalized, or an I/O error from [`list_sessions`].
pub fn sessions_for_path(
    claude_dir: &Path,
    normalizer: &PathNormalizer,
    raw_path: &str,
) -> Result<(CanonicalKey, Vec<SessionEntry>)> {
    let key = normalizer.normalize(raw_path)?;
    let sessions = list_sessions(claude_dir, &key)?;
    Ok((key, sessions))
}

/// Extracts the session UUID from a `<uuid>.jsonl` path.
fn session_id_from_path(path: &Path) -> Option<Uuid> {
    if path.extension()?.to_str()? != SESSION_EXTENSION {
        return None;
    }
    Uuid::parse_str(path.file_stem()?.to_str()?).ok()
}

/// Checks whether JSONL content contains a summary event.
///
/// The summary event may appear on any line, not only the last one.
/// Lines that are not valid JSON are ignored.
///
/// # Example
///
/// ```
/// use sessionkey::projects::has_summary_event;
///
/// let completed = r#"{"type": "user", "message": "hello"}
/// {"type": "summary", "summary": "Done"}
/// "#;
/// assert!(has_summary_event(completed));
///
/// let active = r#"{"type": "user", "message": "hello"}"#;
/// assert!(!has_summary_event(active));
/// ```
#[must_use]
pub fn has_summary_event(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .any(|value| value.get("type").and_then(|t| t.as_str()) == Some("summary"))
}
