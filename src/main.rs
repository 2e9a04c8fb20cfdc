mod cli;

use anyhow::Context;
use std::sync::Arc;
use tradechart::chart::{
    DrawOutcome, IndicatorContext, IndicatorManager, MemoryChart, PresetManager,
};
use tradechart::config::ConfigManager;
use tradechart::data::{open_store, FramePriceSource};
use tradechart::functions::IndicatorParams;
use tradechart::utils::logging;

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    let config_manager = ConfigManager::new();
    config_manager
        .load_layered(args.config.as_ref())
        .context("Failed to load configuration")?;
    let config = config_manager.get();
    logging::init(&config.logging);

    let store = open_store(&config.storage).context("Failed to open storage")?;
    let prices = FramePriceSource::from_csv(&args.prices)
        .with_context(|| format!("Failed to load prices from {}", args.prices.display()))?;
    log::info!("Price source holds {} rows", prices.height());

    let context = Arc::new(IndicatorContext::new(store.clone(), Arc::new(prices)));
    let timeframe = args.timeframe.unwrap_or(config.chart.default_timeframe);
    let mut manager = IndicatorManager::new(MemoryChart::new(), context, args.symbol.clone(), timeframe);

    let mut presets = args.user.as_ref().map(|user| {
        PresetManager::new(store.clone(), manager.factory().clone(), user.clone(), args.symbol.clone())
    });

    if let (Some(presets), Some(slot)) = (presets.as_mut(), args.load_preset) {
        presets.load().context("Failed to load presets")?;
        match presets.slot(slot)? {
            Some(indicators) => {
                let ids = manager.apply_preset(indicators)?;
                log::info!("Applied preset slot {} ({} indicators)", slot, ids.len());
            }
            None => log::warn!("Preset slot {} is empty", slot),
        }
    }

    for request in &args.indicators {
        let params = match &request.params {
            Some(text) => IndicatorParams::parse(request.kind, text)?.to_vector(),
            None => config.chart.default_params(request.kind),
        };
        manager.create(request.kind, &params)?;
    }

    for warning in manager.take_warnings() {
        eprintln!("warning: indicator {}: {}", warning.id, warning.error);
    }

    let mut ids: Vec<&String> = manager.all().keys().collect();
    ids.sort_by_key(|id| id.parse::<u64>().unwrap_or(u64::MAX));

    println!("{} {} ({} indicators)", manager.symbol(), manager.timeframe(), ids.len());
    for id in &ids {
        let Some(indicator) = manager.get(id) else { continue };
        let last = indicator
            .series_ids()
            .iter()
            .filter_map(|series_id| manager.chart().series(series_id))
            .filter_map(|series| series.points.last())
            .map(|point| format!("{:.4}", point.value))
            .collect::<Vec<_>>();
        let status = match (indicator.is_visible(), indicator.is_drawn()) {
            (false, _) => "hidden".to_string(),
            (true, false) => format!("{:?}", DrawOutcome::NoData),
            (true, true) => format!("last {}", last.join(" / ")),
        };
        println!(
            "  [{}] {} {} -> {}",
            id,
            indicator.kind(),
            indicator.serialize_params(),
            status
        );
    }

    if let (Some(presets), Some(slot)) = (presets.as_mut(), args.save_preset) {
        presets.load().context("Failed to load presets")?;
        let active: Vec<_> = ids.iter().filter_map(|id| manager.get(id)).collect();
        presets.capture(slot, active)?;
        presets.store()?;
        println!("Saved {} indicators to preset slot {}", ids.len(), slot);
    }

    Ok(())
}
