// File: crates/dash-core/src/theme.rs
// Summary: Light/Dark theming for chart options (CSS color strings consumed by the renderer).

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub background: &'static str,
    pub grid: &'static str,
    pub axis_label: &'static str,
    pub candle_up: &'static str,
    pub candle_down: &'static str,
    pub area_fill: &'static str,
    /// Series colors handed out in key order when a profile fixes none.
    pub palette: &'static [&'static str],
}

const LIGHT_PALETTE: &[&str] = &[
    "#2563eb", "#f97316", "#10b981", "#a855f7", "#ef4444", "#0ea5e9", "#eab308", "#64748b",
];

const DARK_PALETTE: &[&str] = &[
    "#60a5fa", "#fb923c", "#34d399", "#c084fc", "#f87171", "#38bdf8", "#facc15", "#94a3b8",
];

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "light",
            background: "#ffffff",
            grid: "#e5e7eb",
            axis_label: "#475569",
            candle_up: "#16a34a",
            candle_down: "#dc2626",
            area_fill: "rgba(15, 23, 42, 0.08)",
            palette: LIGHT_PALETTE,
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: "#121214",
            grid: "#28282d",
            axis_label: "#ebebf5",
            candle_up: "#28c878",
            candle_down: "#dc5050",
            area_fill: "rgba(96, 165, 250, 0.25)",
            palette: DARK_PALETTE,
        }
    }

    /// Color of the `index`-th series, cycling through the palette.
    pub fn series_color(&self, index: usize) -> &'static str {
        self.palette[index % self.palette.len()]
    }
}

impl Default for Theme {
    fn default() -> Self { Self::light() }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::light(), Theme::dark()]
}

/// Find a theme by its `name`, falling back to light.
pub fn find(name: &str) -> Theme {
    presets()
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .unwrap_or_default()
}
