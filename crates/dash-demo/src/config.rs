// File: crates/dash-demo/src/config.rs
// Summary: Demo configuration derived from environment variables and CLI args.

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use dash_core::{theme, DisplayMode, Paging, Profile, RangeSpec, SourceConfig, Theme};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Rest,
    Synthetic,
    Csv,
}

/// What to run: one dashboard profile or the world board.
#[derive(Clone, Debug)]
pub enum Target {
    Dashboard(Box<Profile>),
    World,
}

#[derive(Clone, Debug)]
pub struct DemoConfig {
    pub source: SourceKind,
    pub rest: SourceConfig,
    pub csv_path: Option<PathBuf>,
    pub paging: Paging,
    pub out_dir: PathBuf,
    pub theme: Theme,
    pub target: Target,
    pub range: Option<RangeSpec>,
    pub mode: DisplayMode,
}

fn env_str(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .filter(|&n: &usize| n > 0)
        .unwrap_or(default)
}

impl DemoConfig {
    /// `args` excludes the program name: `<profile|world> [range] [mode]`.
    pub fn from_env(args: &[String]) -> Result<Self> {
        let source = match env_str("DASH_SOURCE", "synthetic").to_ascii_lowercase().as_str() {
            "rest" => SourceKind::Rest,
            "synthetic" | "mock" => SourceKind::Synthetic,
            "csv" => SourceKind::Csv,
            other => bail!("unknown DASH_SOURCE '{other}' (expected rest, synthetic or csv)"),
        };

        let name = args.first().map(String::as_str).unwrap_or("crypto-index");
        let target = if name.eq_ignore_ascii_case("world") {
            Target::World
        } else {
            let profile = Profile::preset(name).with_context(|| format!("unknown profile '{name}'"))?;
            Target::Dashboard(Box::new(profile))
        };
        let range = args
            .get(1)
            .map(|r| r.parse::<RangeSpec>())
            .transpose()
            .context("invalid range argument")?;
        let mode = args
            .get(2)
            .map(|m| m.parse::<DisplayMode>())
            .transpose()
            .context("invalid mode argument")?
            .unwrap_or_default();

        let defaults = Paging::default();
        let csv_path = Some(env_str("DASH_CSV_PATH", "")).filter(|s| !s.is_empty()).map(PathBuf::from);
        if source == SourceKind::Csv && csv_path.is_none() {
            bail!("DASH_SOURCE=csv requires DASH_CSV_PATH");
        }

        Ok(Self {
            source,
            rest: SourceConfig::new(env_str("DASH_REST_URL", ""), env_str("DASH_REST_KEY", "")),
            csv_path,
            paging: Paging::new(
                env_usize("DASH_PAGE_SIZE", defaults.page_size),
                env_usize("DASH_MAX_PAGES", defaults.max_pages),
            ),
            out_dir: PathBuf::from(env_str("DASH_OUT_DIR", "target/out")),
            theme: theme::find(&env_str("DASH_THEME", "light")),
            target,
            range,
            mode,
        })
    }
}
