//! Unique scratch names for test harnesses and temporary targets.

use std::sync::atomic::{AtomicUsize, Ordering};

use uuid::Uuid;

/// Source of unique directory names.
///
/// Injected wherever a caller needs fresh names, so nothing depends on
/// process-wide randomness directly.
pub trait NameGenerator: Send + Sync {
    fn next_name(&self, prefix: &str) -> String;
}

/// Random, collision-resistant names: `<prefix>_<12 hex chars>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidNames;

impl NameGenerator for UuidNames {
    fn next_name(&self, prefix: &str) -> String {
        let id = Uuid::new_v4().simple().to_string();
        format!("{prefix}_{}", &id[..12])
    }
}

/// Deterministic names: `<prefix>_1`, `<prefix>_2`, ...
#[derive(Debug, Default)]
pub struct SequentialNames {
    next: AtomicUsize,
}

impl NameGenerator for SequentialNames {
    fn next_name(&self, prefix: &str) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{prefix}_{n}")
    }
}
