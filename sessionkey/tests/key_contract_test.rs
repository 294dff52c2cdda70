//! Integration tests for canonical key and project key derivation.
//!
//! These tests pin the collision behaviour session sync relies on: naming
//! variants of one directory share a key, distinct directories and distinct
//! machines do not, and invalid input is rejected instead of producing an
//! ambiguous key.

use std::sync::Arc;
use std::thread;

use sessionkey::{
    normalize_path_for_key, InvalidPathReason, KeyError, NormalizationReport, PathNormalizer,
    ProjectKey, ProjectKeyBuilder,
};

// =============================================================================
// Test Helpers
// =============================================================================

const HOME: &str = "/Users/iml1s";
const MACHINE_ID: &str = "machine-123";

const UNDERSCORE: &str = "/Users/iml1s/Documents/test_temp_01";
const DOT: &str = "/Users/iml1s/Documents/test.temp.01";
const DASH: &str = "/Users/iml1s/Documents/test-temp-01";
const NO_SEPARATOR: &str = "/Users/iml1s/Documents/testtemp01";
const HOME_RELATIVE: &str = "~/Documents/test_temp_01";

fn normalizer() -> PathNormalizer {
    PathNormalizer::with_home(HOME)
}

fn key(raw: &str) -> String {
    normalizer()
        .normalize(raw)
        .unwrap_or_else(|e| panic!("{raw:?} should normalize: {e}"))
        .into_string()
}

// =============================================================================
// Collisions
// =============================================================================

/// Underscore, dot and dash spellings of one directory share a key.
#[test]
fn separator_variants_collide() {
    let expected = "-Users-iml1s-Documents-test-temp-01";
    for raw in [UNDERSCORE, DOT, DASH] {
        assert_eq!(key(raw), expected, "{raw}");
    }
}

/// Dropping separators entirely names a different directory.
#[test]
fn separator_free_variant_is_distinct() {
    assert_eq!(key(NO_SEPARATOR), "-Users-iml1s-Documents-testtemp01");
    assert_ne!(key(NO_SEPARATOR), key(UNDERSCORE));
}

/// A home-relative path matches its absolute spelling once `~` is expanded.
#[test]
fn home_relative_matches_absolute() {
    assert_eq!(key(HOME_RELATIVE), key(UNDERSCORE));
}

/// Normalizing a canonical key again changes nothing.
#[test]
fn normalization_is_idempotent() {
    for raw in [UNDERSCORE, DOT, DASH, NO_SEPARATOR, HOME_RELATIVE, "/", "rel/a.b"] {
        let once = key(raw);
        assert_eq!(key(&once), once, "{raw}");
    }
}

/// The batch report sees exactly one collision group among the sample paths.
#[test]
fn report_finds_the_collision_group() {
    let report = NormalizationReport::run(
        &normalizer(),
        [UNDERSCORE, DOT, DASH, NO_SEPARATOR, HOME_RELATIVE],
    );
    let groups = report.collisions();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].raw_paths.len(), 4);
    assert!(!groups[0].raw_paths.iter().any(|p| p == NO_SEPARATOR));
}

// =============================================================================
// Project keys
// =============================================================================

/// Colliding paths on one machine produce one project key.
#[test]
fn same_machine_colliding_paths_share_project_key() {
    let builder = ProjectKeyBuilder::new(MACHINE_ID, normalizer()).unwrap();
    let a = builder.key_for_path(UNDERSCORE).unwrap();
    let b = builder.key_for_path(DOT).unwrap();
    let c = builder.key_for_path(HOME_RELATIVE).unwrap();

    assert_eq!(a, b);
    assert_eq!(b, c);
    assert_eq!(
        a.to_string(),
        "machine-123:-Users-iml1s-Documents-test-temp-01"
    );
}

/// One path on two machines produces two project keys.
#[test]
fn different_machines_get_different_project_keys() {
    let a = ProjectKeyBuilder::new("machine-a", normalizer())
        .unwrap()
        .key_for_path(UNDERSCORE)
        .unwrap();
    let b = ProjectKeyBuilder::new("machine-b", normalizer())
        .unwrap()
        .key_for_path(UNDERSCORE)
        .unwrap();

    assert_ne!(a, b);
}

/// Project keys split back into machine and canonical key.
#[test]
fn project_key_round_trips_through_its_string_form() {
    let builder = ProjectKeyBuilder::new("host:with:colons", normalizer()).unwrap();
    let key = builder.key_for_path(DASH).unwrap();

    let parsed: ProjectKey = key.to_string().parse().unwrap();
    assert_eq!(parsed, key);
    assert_eq!(parsed.machine_id(), "host:with:colons");
}

// =============================================================================
// Errors
// =============================================================================

/// An empty path is an error, never an empty key.
#[test]
fn empty_path_is_invalid() {
    let err = normalize_path_for_key("", Some(HOME)).unwrap_err();
    assert_eq!(
        err,
        KeyError::InvalidPath {
            path: String::new(),
            reason: InvalidPathReason::Empty,
        }
    );
}

/// Without an injected home directory, `~` cannot be resolved.
#[test]
fn home_relative_without_home_is_invalid() {
    let err = normalize_path_for_key(HOME_RELATIVE, None).unwrap_err();
    assert!(matches!(
        err,
        KeyError::InvalidPath {
            reason: InvalidPathReason::UnresolvedHome,
            ..
        }
    ));
}

/// Unrelated invalid inputs do not collide with each other.
#[test]
fn invalid_inputs_report_individually() {
    let report = NormalizationReport::run(&normalizer(), ["", "\0", UNDERSCORE]);

    assert_eq!(report.failure_count(), 2);
    assert!(report.collisions().is_empty());
    assert!(report.outcomes[2].is_ok());
}

// =============================================================================
// Concurrency
// =============================================================================

/// A shared normalizer gives the same answer on every thread.
#[test]
fn shared_normalizer_is_consistent_across_threads() {
    let normalizer = Arc::new(normalizer());
    let expected = normalizer.normalize(UNDERSCORE).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let normalizer = Arc::clone(&normalizer);
            thread::spawn(move || {
                let raw = [UNDERSCORE, DOT, DASH, HOME_RELATIVE][i % 4];
                normalizer.normalize(raw).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
