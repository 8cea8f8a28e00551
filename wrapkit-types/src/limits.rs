//! Resource limits

use crate::constants::{HARD_MAX_ALIAS_BYTES, HARD_MAX_INSCRIPTION_BYTES, HARD_MAX_MEMBERS};
use crate::error::{Result, WrapError};
use serde::{Deserialize, Serialize};

/// Limits enforced by wrappers and inscriptions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    /// Maximum members per wrapper (default: 65,536, hard: 1,000,000)
    pub max_members: usize,
    /// Maximum alias length in bytes (default: 256, hard: 64 KiB)
    pub max_alias_bytes: usize,
    /// Maximum size of one inscription payload (default: 256 KiB, hard: 16 MiB)
    pub max_inscription_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_members: 65_536,
            max_alias_bytes: 256,
            max_inscription_bytes: 256 * 1024,
        }
    }
}

impl Limits {
    /// Reject zero values and values above the hard caps.
    pub fn validate(&self) -> Result<()> {
        check("max_members", self.max_members, HARD_MAX_MEMBERS)?;
        check("max_alias_bytes", self.max_alias_bytes, HARD_MAX_ALIAS_BYTES)?;
        check(
            "max_inscription_bytes",
            self.max_inscription_bytes,
            HARD_MAX_INSCRIPTION_BYTES,
        )
    }

    /// Fail with `LimitExceeded` if a wrapper holding `current` members cannot
    /// accept `incoming` more.
    pub fn check_members(&self, current: usize, incoming: usize) -> Result<()> {
        let total = current.saturating_add(incoming);
        if total > self.max_members {
            return Err(WrapError::LimitExceeded(format!(
                "{} members exceeds max_members {}",
                total, self.max_members
            )));
        }
        Ok(())
    }
}

fn check(field: &str, value: usize, hard_max: usize) -> Result<()> {
    if value == 0 || value > hard_max {
        return Err(WrapError::Config(format!(
            "{} must be between 1 and {} (got {})",
            field, hard_max, value
        )));
    }
    Ok(())
}
