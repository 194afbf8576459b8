//! Run-scoped snapshot configuration.
//!
//! Options are handed to the store and the inline matcher at construction
//! time; nothing in snapmark reads them from global state afterwards.

use serde::{Deserialize, Serialize};

/// Environment variable enabling update-all mode in [`SnapshotOptions::from_env`]
pub const UPDATE_ENV_VAR: &str = "SNAPMARK_UPDATE";

/// Environment variable enabling frozen mode in [`SnapshotOptions::from_env`]
pub const FREEZE_ENV_VAR: &str = "SNAPMARK_FREEZE";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnapshotOptions {
    /// Treat every stored snapshot as stale and re-record it
    pub update_snapshots: bool,
    /// Forbid any snapshot file or inline source mutation
    pub freeze_snapshots: bool,
}

impl SnapshotOptions {
    pub fn new(update_snapshots: bool, freeze_snapshots: bool) -> Self {
        Self {
            update_snapshots,
            freeze_snapshots,
        }
    }

    /// Read both flags from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read both flags through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| lookup(key).is_some_and(|value| is_truthy(&value));
        Self {
            update_snapshots: flag(UPDATE_ENV_VAR),
            freeze_snapshots: flag(FREEZE_ENV_VAR),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
