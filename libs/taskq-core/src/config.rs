//! Tunables for the dispatch core.

use crate::error::{Result, TaskQError};
use serde::{Deserialize, Serialize};

/// Configuration record for [`crate::DispatchCore`], passed once at
/// construction. No process-wide mutable singleton holds this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Minimum interval between ledger refreshes, in milliseconds.
    pub avail_refresh_ms: i64,

    /// New-task wait before using a host's last slot, in milliseconds.
    pub last_slot_delay_ms: i64,

    /// Master switch for migration admission.
    pub migration_enabled: bool,

    /// Size below which a task is always migratable, in bytes.
    pub migration_min_bytes: i64,

    /// Hard ceiling for aged tasks, in bytes.
    pub migration_max_bytes: i64,

    /// Time for the size limit to reach `migration_max_bytes`, in
    /// milliseconds.
    pub migration_growth_ms: i64,

    /// `MigrationGate` TTL per host, in milliseconds.
    pub migration_interval_per_host_ms: i64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            avail_refresh_ms: 60_000,
            last_slot_delay_ms: 90_000,
            migration_enabled: true,
            migration_min_bytes: 50_000_000,
            migration_max_bytes: 10_000_000_000,
            migration_growth_ms: 1_200_000,
            migration_interval_per_host_ms: 240_000,
        }
    }
}

impl DispatchConfig {
    /// Validate tunables, rejecting configurations that would make
    /// `sizeAgeAdmits` ill-defined or the ledger refresh pointless.
    pub fn validate(&self) -> Result<()> {
        if self.migration_min_bytes > self.migration_max_bytes {
            return Err(TaskQError::InvalidConfig(format!(
                "migration_min_bytes ({}) must not exceed migration_max_bytes ({})",
                self.migration_min_bytes, self.migration_max_bytes
            )));
        }
        if self.migration_growth_ms <= 0 {
            return Err(TaskQError::InvalidConfig(
                "migration_growth_ms must be positive".into(),
            ));
        }
        if self.avail_refresh_ms < 0
            || self.last_slot_delay_ms < 0
            || self.migration_interval_per_host_ms < 0
        {
            return Err(TaskQError::InvalidConfig(
                "interval tunables must be non-negative".into(),
            ));
        }
        Ok(())
    }

}
