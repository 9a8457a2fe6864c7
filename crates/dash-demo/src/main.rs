// File: crates/dash-demo/src/main.rs
// Summary: Demo drives one dashboard profile (or the world board) and writes chart options and HTML fragments.

mod config;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use dash_core::{CsvSource, Dashboard, DataSource, MemorySurface, RestSource, SyntheticSource, WorldBoard};
use tracing_subscriber::EnvFilter;

use crate::config::{DemoConfig, SourceKind, Target};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cfg = DemoConfig::from_env(&args)?;
    let source = open_source(&cfg)?;

    let mut surface = MemorySurface::new();
    match &cfg.target {
        Target::Dashboard(profile) => {
            let profile = profile.as_ref().clone().with_paging(cfg.paging);
            tracing::info!(profile = %profile.name, source = ?cfg.source, "starting dashboard");
            let dash = Dashboard::new(profile, source).with_theme(cfg.theme);
            dash.start().await;
            if let Some(range) = cfg.range {
                dash.select_range(range).await;
            }
            dash.select_mode(cfg.mode);
            dash.render(&mut surface);
        }
        Target::World => {
            tracing::info!(source = ?cfg.source, "starting world board");
            let board = WorldBoard::new(source).with_paging(cfg.paging).with_theme(cfg.theme);
            let snapshot = board.refresh_all(Utc::now()).await;
            board.render(&snapshot, &mut surface);
        }
    }

    write_surface(&surface, &cfg.out_dir)?;
    for (id, text) in &surface.text {
        println!("{id}: {text}");
    }
    Ok(())
}

fn open_source(cfg: &DemoConfig) -> Result<Box<dyn DataSource>> {
    Ok(match cfg.source {
        SourceKind::Rest => Box::new(RestSource::new(&cfg.rest).context("REST source needs DASH_REST_URL and DASH_REST_KEY")?),
        SourceKind::Synthetic => Box::new(SyntheticSource::new(Utc::now())),
        SourceKind::Csv => {
            let path = cfg.csv_path.as_deref().context("DASH_CSV_PATH is not set")?;
            let csv = CsvSource::from_path(path).with_context(|| format!("failed to load CSV '{}'", path.display()))?;
            tracing::info!(rows = csv.len(), path = %path.display(), "loaded csv source");
            Box::new(csv)
        }
    })
}

fn write_surface(surface: &MemorySurface, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create '{}'", dir.display()))?;
    for (id, option) in &surface.charts {
        let path = dir.join(format!("{id}.json"));
        let json = serde_json::to_string_pretty(option)?;
        std::fs::write(&path, json).with_context(|| format!("failed to write '{}'", path.display()))?;
        println!("Wrote {}", path.display());
    }
    for (id, html) in &surface.html {
        let path = dir.join(format!("{id}.html"));
        std::fs::write(&path, html).with_context(|| format!("failed to write '{}'", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}
