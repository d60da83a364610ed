//! Tier/enchantment qualification and the variant fold.

use std::fmt;

use crate::table::{outer_join, PriceTable};

/// Identifies one resource variant in column names.
///
/// Renders as `T5` for a single-variant run and `T5.0`, `T5.3`, ... for an
/// enchantment sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariantLabel {
    pub tier: u8,
    pub enchant: Option<u8>,
}

impl VariantLabel {
    pub fn tier(tier: u8) -> Self {
        Self {
            tier,
            enchant: None,
        }
    }

    pub fn enchanted(tier: u8, enchant: u8) -> Self {
        Self {
            tier,
            enchant: Some(enchant),
        }
    }
}

impl fmt::Display for VariantLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.enchant {
            Some(e) => write!(f, "T{}.{}", self.tier, e),
            None => write!(f, "T{}", self.tier),
        }
    }
}

/// Rename every data column to `"<name> <label>"`.
pub fn qualify(mut table: PriceTable, label: &VariantLabel) -> PriceTable {
    let suffix = label.to_string();
    for name in table.columns_mut() {
        *name = format!("{name} {suffix}");
    }
    table
}

/// Fold one qualified variant table into the master table.
pub fn accumulate(master: PriceTable, next: &PriceTable) -> PriceTable {
    outer_join(&master, next)
}

/// Fold a sequence of qualified variant tables, starting from the empty table.
pub fn fold_variants<I>(tables: I) -> PriceTable
where
    I: IntoIterator<Item = PriceTable>,
{
    tables
        .into_iter()
        .fold(PriceTable::empty(), |master, next| accumulate(master, &next))
}
