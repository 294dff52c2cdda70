//! Batch normalization with per-path outcomes.
//!
//! A bad path never aborts the batch: each input gets its own
//! [`PathOutcome`], and the caller decides how to surface failures.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::KeyError;
use crate::normalize::{CanonicalKey, PathNormalizer};
use crate::project_key::{ProjectKey, ProjectKeyBuilder};

/// Result of normalizing one raw path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathOutcome {
    /// The path as supplied.
    pub raw_path: String,

    /// The canonical key, if normalization succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_key: Option<CanonicalKey>,

    /// The project key, when a machine identifier was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_key: Option<ProjectKey>,

    /// Human-readable error, if normalization failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PathOutcome {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Paths that normalized to the same canonical key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollisionGroup {
    pub canonical_key: CanonicalKey,
    pub raw_paths: Vec<String>,
}

/// Outcomes for a batch of raw paths, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationReport {
    pub outcomes: Vec<PathOutcome>,
}

impl NormalizationReport {
    /// Normalizes every path in `paths`.
    pub fn run<I, S>(normalizer: &PathNormalizer, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let outcomes = paths
            .into_iter()
            .map(|raw| {
                let raw = raw.as_ref();
                match normalizer.normalize(raw) {
                    Ok(key) => {
                        debug!(raw_path = raw, canonical_key = %key, "Normalized path");
                        PathOutcome {
                            raw_path: raw.to_string(),
                            canonical_key: Some(key),
                            project_key: None,
                            error: None,
                        }
                    }
                    Err(e) => failed(raw, &e),
                }
            })
            .collect();

        Self { outcomes }
    }

    /// Normalizes every path in `paths` and builds its project key.
    pub fn run_with_project_keys<I, S>(builder: &ProjectKeyBuilder, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let outcomes = paths
            .into_iter()
            .map(|raw| {
                let raw = raw.as_ref();
                match builder.key_for_path(raw) {
                    Ok(project_key) => {
                        debug!(raw_path = raw, project_key = %project_key, "Built project key");
                        PathOutcome {
                            raw_path: raw.to_string(),
                            canonical_key: Some(project_key.canonical_key().clone()),
                            project_key: Some(project_key),
                            error: None,
                        }
                    }
                    Err(e) => failed(raw, &e),
                }
            })
            .collect();

        Self { outcomes }
    }

    /// Returns true if any path failed to normalize.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| !o.is_ok())
    }

    /// Number of paths that failed to normalize.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_ok()).count()
    }

    /// Groups of two or more raw paths sharing a canonical key, ordered by key.
    ///
    /// Failed paths never take part in a collision.
    #[must_use]
    pub fn collisions(&self) -> Vec<CollisionGroup> {
        let mut by_key: BTreeMap<&CanonicalKey, Vec<String>> = BTreeMap::new();
        for outcome in &self.outcomes {
            if let Some(key) = &outcome.canonical_key {
                by_key
                    .entry(key)
                    .or_default()
                    .push(outcome.raw_path.clone());
            }
        }

        by_key
            .into_iter()
            .filter(|(_, paths)| paths.len() > 1)
            .map(|(key, raw_paths)| CollisionGroup {
                canonical_key: key.clone(),
                raw_paths,
            })
            .collect()
    }
}

fn failed(raw: &str, err: &KeyError) -> PathOutcome {
    warn!(raw_path = raw, error = %err, "Failed to normalize path");
    PathOutcome {
        raw_path: raw.to_string(),
        canonical_key: None,
        project_key: None,
        error: Some(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATHS: [&str; 5] = [
        "/Users/x/Documents/test_temp_01",
        "/Users/x/Documents/test.temp.01",
        "/Users/x/Documents/test-temp-01",
        "/Users/x/Documents/testtemp01",
        "~/Documents/test_temp_01",
    ];

    fn normalizer() -> PathNormalizer {
        PathNormalizer::with_home("/Users/x")
    }

    #[test]
    fn keeps_input_order() {
        let report = NormalizationReport::run(&normalizer(), PATHS);
        let raw: Vec<&str> = report.outcomes.iter().map(|o| o.raw_path.as_str()).collect();
        assert_eq!(raw, PATHS);
        assert!(!report.has_failures());
    }

    #[test]
    fn failures_do_not_abort_the_batch() {
        let report = NormalizationReport::run(&normalizer(), ["/a", "", "/b"]);

        assert_eq!(report.outcomes.len(), 3);
        assert!(report.has_failures());
        assert_eq!(report.failure_count(), 1);
        assert!(report.outcomes[0].is_ok());
        assert!(!report.outcomes[1].is_ok());
        assert_eq!(
            report.outcomes[2].canonical_key.as_ref().map(CanonicalKey::as_str),
            Some("-b")
        );
    }

    #[test]
    fn groups_colliding_paths() {
        let report = NormalizationReport::run(&normalizer(), PATHS);
        let groups = report.collisions();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].canonical_key.as_str(), "-Users-x-Documents-test-temp-01");
        assert_eq!(
            groups[0].raw_paths,
            vec![
                "/Users/x/Documents/test_temp_01",
                "/Users/x/Documents/test.temp.01",
                "/Users/x/Documents/test-temp-01",
                "~/Documents/test_temp_01",
            ]
        );
    }

    #[test]
    fn failed_paths_never_collide() {
        let report = NormalizationReport::run(&PathNormalizer::without_home(), ["", "  ", "~/a"]);
        assert_eq!(report.failure_count(), 3);
        assert!(report.collisions().is_empty());
    }

    #[test]
    fn project_keys_are_filled_in() {
        let builder = ProjectKeyBuilder::new("machine-123", normalizer()).unwrap();
        let report = NormalizationReport::run_with_project_keys(&builder, ["~/a_b", ""]);

        assert_eq!(
            report.outcomes[0].project_key.as_ref().map(ToString::to_string),
            Some("machine-123:-Users-x-a-b".to_string())
        );
        assert!(report.outcomes[1].project_key.is_none());
        assert!(report.outcomes[1].error.is_some());
    }

    #[test]
    fn serializes_to_camel_case_json() {
        let report = NormalizationReport::run(&normalizer(), ["/a", ""]);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["outcomes"][0]["rawPath"], "/a");
        assert_eq!(json["outcomes"][0]["canonicalKey"], "-a");
        assert!(json["outcomes"][0].get("error").is_none());
        assert_eq!(json["outcomes"][1]["error"], "invalid path '': path is empty");
    }
}
