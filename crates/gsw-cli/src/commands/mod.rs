//! Command handler modules for gsw-cli.
//!
//! Shared utilities used by multiple command paths live here.
//! Command-specific logic lives in the submodules.

pub mod pipeline;
pub mod sheet;

use anyhow::{anyhow, Result};
use gsw_config::{Catalog, ResourceCatalog};

/// How variants of a tier are requested and labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One request per (tier, enchant) item code, labels `T<tier>.<enchant>`.
    Sweep,
    /// One request per tier for its base-level code(s), label `T<tier>`.
    Single,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Sweep => "sweep",
            Mode::Single => "single",
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// `(tier, sheet_line)` for every tier to run, resolved before any fetch so a
/// missing `t{N}_line` fails the run up front.
pub fn tier_lines(
    catalog: &Catalog,
    resource: &ResourceCatalog,
    only: Option<u8>,
) -> Result<Vec<(u8, u32)>> {
    let tiers: Vec<u8> = match only {
        Some(t) => vec![t],
        None => catalog.market.tiers.iter().collect(),
    };
    tiers
        .into_iter()
        .map(|t| {
            resource
                .sheet_line(t)
                .map(|line| (t, line))
                .ok_or_else(|| anyhow!("resource '{}' has no t{}_line", resource.name, t))
        })
        .collect()
}
