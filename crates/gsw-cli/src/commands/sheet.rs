use anyhow::Result;
use gsw_md::{AlbionHistoryProvider, TimeScale};
use gsw_sheet::{init_run_dir, publish, FileSheetWriter, InitRunDirArgs};
use gsw_table::LocationFilter;
use tracing::info;
use uuid::Uuid;

use super::pipeline::{single_tier, sweep_tier};
use super::{tier_lines, Mode};
use crate::RunArgs;

/// Build and publish one resource's tables for every requested tier.
///
/// stdout carries a `key=value` summary per line; progress is logged.
pub async fn run(args: RunArgs, mode: Mode) -> Result<()> {
    let (loaded, catalog) = gsw_config::load_catalog(&args.config_paths)?;
    let resource = catalog.resource(&args.resource)?;
    let lines = tier_lines(&catalog, resource, args.tier)?;
    let time_scale = TimeScale::parse(&catalog.market.time_scale)?;

    let base_url = args
        .base_url
        .clone()
        .unwrap_or_else(|| catalog.market.base_url.clone());
    let provider = AlbionHistoryProvider::new_with_base_url(base_url);
    let filter = LocationFilter::new(catalog.allowed_cities.iter().cloned());

    let run_id = Uuid::new_v4();
    let run_dir = init_run_dir(InitRunDirArgs {
        out_root: &args.out,
        run_id,
        workbook: &catalog.workbook,
        resource: &resource.name,
        config_hash: &loaded.config_hash,
    })?;
    let mut writer = FileSheetWriter::new(&run_dir);

    println!("run_id={run_id}");
    println!("config_hash={}", loaded.config_hash);
    println!("run_dir={}", run_dir.display());

    info!(
        %run_id,
        mode = mode.as_str(),
        resource = %resource.name,
        sheet = %resource.sheet_name,
        tiers = lines.len(),
        time_scale = time_scale.as_str(),
        "run started"
    );

    for (tier, line) in lines {
        let table = match mode {
            Mode::Sweep => {
                sweep_tier(
                    &provider,
                    resource,
                    &filter,
                    tier,
                    catalog.market.enchants,
                    time_scale,
                )
                .await?
            }
            Mode::Single => single_tier(&provider, resource, &filter, tier, time_scale).await?,
        };

        publish(&mut writer, &resource.sheet_name, &table.sheet, line)?;

        println!(
            "tier={} line={} columns={} rows={} fetched={} skipped={}",
            table.tier,
            line,
            table.data_columns(),
            table.sheet.rows.len(),
            table.fetched,
            table.skipped
        );
        info!(
            tier,
            line,
            columns = table.data_columns(),
            rows = table.sheet.rows.len(),
            "tier published"
        );
    }

    Ok(())
}
