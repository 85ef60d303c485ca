//! Airwave virtual broadcast radio tuner
//!
//! Builds the tuner from the saved settings and prints what it advertises:
//! properties, region configuration and the program list.
//!
//! `airwave init` writes the default settings file if none exists yet.

mod settings;

use std::sync::Arc;

use airwave_hal::{AmFmRegionConfig, BroadcastRadio, MemoryImageStore};
use airwave_sim::VirtualRadio;
use anyhow::Context;
use settings::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "airwave=info,airwave_selector=info,airwave_sim=info,airwave_hal=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if std::env::args().nth(1).as_deref() == Some("init") {
        return init_settings();
    }

    tracing::info!("Starting Airwave tuner");

    let settings = Settings::load();
    let radio = build_radio(&settings)?;

    print_properties(&radio)?;
    print_region("Narrow", &radio.get_am_fm_region_config(false));
    print_region("Full", &radio.get_am_fm_region_config(true));
    println!("DAB channels: {}", radio.get_dab_region_config().len());
    print_programs(&radio);

    Ok(())
}

fn init_settings() -> anyhow::Result<()> {
    let path = Settings::settings_path().context("Could not determine settings path")?;
    if path.exists() {
        println!("Settings already present at {}", path.display());
        return Ok(());
    }
    Settings::default().save()?;
    println!("Wrote default settings to {}", path.display());
    Ok(())
}

fn build_radio(settings: &Settings) -> anyhow::Result<BroadcastRadio> {
    let catalog = VirtualRadio::from_config(settings.catalog.to_config())
        .context("Failed to build catalog")?;

    let mut images = MemoryImageStore::new();
    for (&id, path) in &settings.images {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read image {} from {}", id, path.display()))?;
        images.insert(id, bytes);
    }
    tracing::debug!("Loaded {} images", images.len());

    let radio = BroadcastRadio::with_config(settings.tuner.clone(), catalog, Arc::new(images))
        .context("Failed to start tuner")?;
    Ok(radio)
}

fn print_properties(radio: &BroadcastRadio) -> anyhow::Result<()> {
    let props = radio.get_properties()?;
    println!(
        "{} {} {} (serial {})",
        props.maker, props.product, props.version, props.serial
    );
    let types: Vec<String> = props
        .sorted_identifier_types()
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("Identifier types: {}", types.join(", "));
    Ok(())
}

fn print_region(label: &str, config: &AmFmRegionConfig) {
    println!(
        "{} region: deemphasis {:?}, rds {:?}",
        label, config.fm_deemphasis, config.fm_rds
    );
    for range in &config.ranges {
        println!(
            "  {:>6}..={:<6} kHz step {} seek {}",
            range.lower_bound, range.upper_bound, range.spacing, range.seek_spacing
        );
    }
}

fn print_programs(radio: &BroadcastRadio) {
    let catalog = radio.catalog();
    println!("{}", catalog.summary());
    for program in catalog.program_list() {
        println!("  {:<16} {}", program.program_name, program.selector);
    }
}
