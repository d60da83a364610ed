//! Per-tier orchestration: fetch each variant in order and fold it into the
//! tier's master table.
//!
//! Variants are processed strictly sequentially; a skipped fetch simply leaves
//! its columns out.

use anyhow::{Context, Result};
use gsw_config::{LevelRange, ResourceCatalog};
use gsw_md::{FetchOutcome, HistoryProvider, HistoryRequest, TimeScale};
use gsw_table::{
    accumulate, finalize, prepare_variant, LocationFilter, PriceTable, RawObservation,
    SheetTable, VariantLabel,
};
use tracing::{debug, info, warn};

/// Finished table for one tier plus fetch counters.
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    pub tier: u8,
    pub sheet: SheetTable,
    pub fetched: usize,
    pub skipped: usize,
}

impl TierTable {
    pub fn data_columns(&self) -> usize {
        self.sheet.header.len().saturating_sub(1)
    }
}

struct TierFold<'a> {
    filter: &'a LocationFilter,
    master: PriceTable,
    fetched: usize,
    skipped: usize,
}

impl<'a> TierFold<'a> {
    fn new(filter: &'a LocationFilter) -> Self {
        Self {
            filter,
            master: PriceTable::empty(),
            fetched: 0,
            skipped: 0,
        }
    }

    fn absorb(&mut self, items: &str, outcome: FetchOutcome, label: &VariantLabel) -> Result<()> {
        match outcome {
            FetchOutcome::Fetched(observations) => {
                self.fold(items, &observations, label)?;
                self.fetched += 1;
            }
            FetchOutcome::Skipped { status } => {
                warn!(items, status, label = %label, "variant skipped");
                self.skipped += 1;
            }
        }
        Ok(())
    }

    fn fold(
        &mut self,
        items: &str,
        observations: &[RawObservation],
        label: &VariantLabel,
    ) -> Result<()> {
        let variant = prepare_variant(observations, self.filter, label)
            .with_context(|| format!("reshape failed: {items}"))?;
        debug!(
            items,
            label = %label,
            columns = variant.columns().len(),
            rows = variant.row_count(),
            "variant folded"
        );
        let master = std::mem::take(&mut self.master);
        self.master = accumulate(master, &variant);
        Ok(())
    }

    fn finish(self, tier: u8) -> TierTable {
        TierTable {
            tier,
            sheet: finalize(self.master),
            fetched: self.fetched,
            skipped: self.skipped,
        }
    }
}

/// One request per (tier, enchant) item code; labels `T<tier>.<enchant>`.
pub async fn sweep_tier(
    provider: &dyn HistoryProvider,
    resource: &ResourceCatalog,
    filter: &LocationFilter,
    tier: u8,
    enchants: LevelRange,
    time_scale: TimeScale,
) -> Result<TierTable> {
    let mut fold = TierFold::new(filter);

    for enchant in enchants.iter() {
        let label = VariantLabel::enchanted(tier, enchant);
        for item in resource.targets_for(tier, enchant) {
            let outcome = provider
                .fetch_history(&HistoryRequest::single(item, time_scale))
                .await
                .with_context(|| format!("{} history fetch failed: {item}", provider.name()))?;
            fold.absorb(item, outcome, &label)?;
        }
    }

    Ok(fold.finish(tier))
}

/// Base-level codes of `tier` only, in one request; label `T<tier>`.
///
/// Enchanted codes are left out: they are separate variants and would land in
/// the same `<city> T<tier>` columns.
pub async fn single_tier(
    provider: &dyn HistoryProvider,
    resource: &ResourceCatalog,
    filter: &LocationFilter,
    tier: u8,
    time_scale: TimeScale,
) -> Result<TierTable> {
    let mut fold = TierFold::new(filter);
    let items: Vec<String> = resource
        .targets_for(tier, 0)
        .into_iter()
        .map(String::from)
        .collect();

    if items.is_empty() {
        info!(resource = %resource.name, tier, "no base item code for tier");
        return Ok(fold.finish(tier));
    }

    let joined = items.join(",");
    let outcome = provider
        .fetch_history(&HistoryRequest { items, time_scale })
        .await
        .with_context(|| format!("{} history fetch failed: {joined}", provider.name()))?;
    fold.absorb(&joined, outcome, &VariantLabel::tier(tier))?;

    Ok(fold.finish(tier))
}
