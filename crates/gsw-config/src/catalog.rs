//! Typed view over the merged item catalog.
//!
//! ```yaml
//! allowed_cities: [Bridgewatch, Fort Sterling, Lymhurst, Martlock, Thetford]
//! workbook: GSW Macroeconomics   # optional
//! market:                # optional, every field defaulted
//!   base_url: https://west.albion-online-data.com
//!   time_scale: "24"
//!   tiers: { start: 4, end: 8 }
//!   enchants: { start: 0, end: 3 }
//! ore:                   # any other top-level key is a resource
//!   sheetName: Ore
//!   target: [T4_ORE, T4_ORE_LEVEL1@1, ...]
//!   t4_line: 2
//!   t5_line: 40
//! ```

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::LoadedConfig;

const ALLOWED_CITIES_KEY: &str = "allowed_cities";
const MARKET_KEY: &str = "market";
const WORKBOOK_KEY: &str = "workbook";
const DEFAULT_WORKBOOK: &str = "GSW Macroeconomics";

/// Inclusive level range (tiers or enchantment levels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LevelRange {
    pub start: u8,
    pub end: u8,
}

impl LevelRange {
    pub fn iter(&self) -> RangeInclusive<u8> {
        self.start..=self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarketSettings {
    pub base_url: String,
    /// `time-scale` query value: "1", "6" or "24".
    pub time_scale: String,
    pub tiers: LevelRange,
    pub enchants: LevelRange,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            base_url: "https://west.albion-online-data.com".to_string(),
            time_scale: "24".to_string(),
            tiers: LevelRange { start: 4, end: 8 },
            enchants: LevelRange { start: 0, end: 3 },
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawResource {
    #[serde(rename = "sheetName")]
    sheet_name: String,
    #[serde(default)]
    target: Vec<String>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

/// One resource kind: its sheet, its item codes and per-tier row offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceCatalog {
    pub name: String,
    pub sheet_name: String,
    pub targets: Vec<String>,
    lines: BTreeMap<u8, u32>,
}

impl ResourceCatalog {
    fn from_raw(name: &str, raw: RawResource) -> Result<Self> {
        let mut lines = BTreeMap::new();
        for (key, value) in raw.extra {
            let Some(tier) = parse_line_key(&key) else {
                bail!("resource '{name}': unknown key '{key}'");
            };
            let line = value
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .filter(|v| *v >= 1)
                .ok_or_else(|| anyhow!("resource '{name}': '{key}' must be a row number >= 1"))?;
            lines.insert(tier, line);
        }
        Ok(Self {
            name: name.to_string(),
            sheet_name: raw.sheet_name,
            targets: raw.target,
            lines,
        })
    }

    /// Every item code of `tier` (e.g. `T5_ORE`, `T5_ORE_LEVEL1@1`, ...).
    pub fn tier_targets(&self, tier: u8) -> Vec<&str> {
        let prefix = format!("T{tier}_");
        self.targets
            .iter()
            .filter(|t| t.starts_with(&prefix))
            .map(String::as_str)
            .collect()
    }

    /// Item codes for one tier/enchantment combination.
    ///
    /// The base level is the code ending in the upper-cased resource name
    /// (`T5_ORE`); enchantment `n` is the code ending in `n` (`T5_ORE_LEVEL2@2`).
    pub fn targets_for(&self, tier: u8, enchant: u8) -> Vec<&str> {
        let base = self.name.to_uppercase();
        let suffix = enchant.to_string();
        self.tier_targets(tier)
            .into_iter()
            .filter(|t| {
                if enchant == 0 {
                    t.ends_with(&base)
                } else {
                    t.ends_with(&suffix)
                }
            })
            .collect()
    }

    /// First sheet row of `tier`'s block (header row), from `t{N}_line`.
    pub fn sheet_line(&self, tier: u8) -> Option<u32> {
        self.lines.get(&tier).copied()
    }
}

fn parse_line_key(key: &str) -> Option<u8> {
    key.strip_prefix('t')?.strip_suffix("_line")?.parse().ok()
}

/// Immutable run configuration, passed explicitly to each stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub allowed_cities: Vec<String>,
    pub workbook: String,
    pub market: MarketSettings,
    resources: BTreeMap<String, ResourceCatalog>,
}

impl Catalog {
    pub fn from_loaded(loaded: &LoadedConfig) -> Result<Self> {
        Self::from_json(&loaded.config_json)
    }

    pub fn from_json(v: &Value) -> Result<Self> {
        let root = v
            .as_object()
            .ok_or_else(|| anyhow!("catalog root must be a mapping"))?;

        let allowed_cities: Vec<String> = root
            .get(ALLOWED_CITIES_KEY)
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .context("allowed_cities must be a list of strings")?
            .ok_or_else(|| anyhow!("missing required key '{ALLOWED_CITIES_KEY}'"))?;

        let workbook = match root.get(WORKBOOK_KEY) {
            Some(w) => w
                .as_str()
                .ok_or_else(|| anyhow!("'{WORKBOOK_KEY}' must be a string"))?
                .to_string(),
            None => DEFAULT_WORKBOOK.to_string(),
        };

        let market: MarketSettings = match root.get(MARKET_KEY) {
            Some(m) => serde_json::from_value(m.clone()).context("invalid 'market' section")?,
            None => MarketSettings::default(),
        };
        if market.tiers.start > market.tiers.end || market.enchants.start > market.enchants.end {
            bail!("market: range start must not exceed end");
        }

        let mut resources = BTreeMap::new();
        for (name, body) in root {
            if name == ALLOWED_CITIES_KEY || name == MARKET_KEY || name == WORKBOOK_KEY {
                continue;
            }
            let raw: RawResource = serde_json::from_value(body.clone())
                .with_context(|| format!("invalid resource section '{name}'"))?;
            resources.insert(name.clone(), ResourceCatalog::from_raw(name, raw)?);
        }

        Ok(Self {
            allowed_cities,
            workbook,
            market,
            resources,
        })
    }

    pub fn resource(&self, name: &str) -> Result<&ResourceCatalog> {
        self.resources.get(name).ok_or_else(|| {
            anyhow!(
                "unknown resource '{}'. configured: {}",
                name,
                self.resource_names().collect::<Vec<_>>().join(", ")
            )
        })
    }

    pub fn resource_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.resources.keys().map(String::as_str)
    }
}
