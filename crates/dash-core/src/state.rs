// File: crates/dash-core/src/state.rs
// Summary: Dashboard view state and its pure event transitions `(state, event) -> state'`.
// Notes:
// - Loads are described, not performed: a transition that needs data issues a
//   request token and records it in `pending`; the controller runs the fetch
//   and feeds the outcome back as `Loaded`/`Failed`.
// - Outcomes carrying a superseded token leave the state untouched.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::config::{Profile, WindowStrategy};
use crate::downsample::bucket_average;
use crate::range::{filter_by_range, RangeSpec};
use crate::timeline::{Reshaped, Timeline};
use crate::token::{RequestSequence, RequestToken};
use crate::transform::DisplayMode;
use crate::types::SeriesKey;

/// How a loaded timeline becomes the visible one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewPolicy {
    pub strategy: WindowStrategy,
    /// Client-side bucket width per range.
    pub buckets: BTreeMap<RangeSpec, Duration>,
}

impl ViewPolicy {
    pub fn from_profile(profile: &Profile) -> Self {
        let buckets = profile
            .ranges
            .iter()
            .filter_map(|&r| profile.source_for(r).bucket.map(|w| (r, w)))
            .collect();
        Self { strategy: profile.strategy, buckets }
    }

    /// Derive the visible timeline of `range` from the loaded one.
    pub fn derive(&self, raw: &Timeline, range: RangeSpec) -> Timeline {
        let windowed = match self.strategy {
            WindowStrategy::ClientFilter => filter_by_range(raw, range),
            WindowStrategy::ServerCutoff => raw.clone(),
        };
        match self.buckets.get(&range) {
            Some(&width) => bucket_average(&windowed, width),
            None => windowed,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Updated(DateTime<Utc>),
    Failed(String),
}

/// An issued load that has not reported back yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pending {
    pub token: RequestToken,
    pub range: RangeSpec,
}

#[derive(Clone, Debug)]
pub enum Event {
    ModeSelected(DisplayMode),
    /// Switch range; `force` reloads even when the range is already shown.
    RangeSelected { range: RangeSpec, force: bool },
    Refresh,
    Loaded { token: RequestToken, reshaped: Reshaped, at: DateTime<Utc> },
    Failed { token: RequestToken, message: String },
}

#[derive(Clone, Debug, Default)]
pub struct DashboardState {
    pub mode: DisplayMode,
    pub range: RangeSpec,
    /// Timeline as loaded (unfiltered); also the percent-baseline fallback.
    pub raw: Timeline,
    /// Timeline currently shown.
    pub view: Timeline,
    pub keys: Vec<SeriesKey>,
    pub status: Status,
    pub requests: RequestSequence,
    pub pending: Option<Pending>,
    pub policy: ViewPolicy,
    loaded: bool,
    /// Range `view` was derived for; `range` falls back to it when a load fails.
    shown: RangeSpec,
}

impl DashboardState {
    pub fn new(policy: ViewPolicy, range: RangeSpec) -> Self {
        Self { policy, range, shown: range, ..Self::default() }
    }

    pub fn for_profile(profile: &Profile) -> Self {
        Self::new(ViewPolicy::from_profile(profile), profile.default_range)
    }

    /// Whether a load has succeeded at least once.
    pub fn is_loaded(&self) -> bool { self.loaded }

    pub fn apply(mut self, event: Event) -> Self {
        match event {
            Event::ModeSelected(mode) => {
                self.mode = mode;
                self
            }
            Event::Refresh => {
                let range = self.range;
                self.select(range, true)
            }
            Event::RangeSelected { range, force } => self.select(range, force),
            Event::Loaded { token, reshaped, at } => {
                if !self.owns(token) {
                    tracing::debug!(token = token.get(), "dropped stale response");
                    return self;
                }
                // The selected range may have moved on locally while this load was in flight.
                self.pending = None;
                self.raw = reshaped.timeline;
                self.keys = reshaped.keys;
                self.view = self.policy.derive(&self.raw, self.range);
                self.shown = self.range;
                self.status = Status::Updated(at);
                self.loaded = true;
                self
            }
            Event::Failed { token, message } => {
                if !self.owns(token) {
                    tracing::debug!(token = token.get(), "dropped stale failure");
                    return self;
                }
                self.pending = None;
                if self.loaded {
                    self.range = self.shown;
                }
                self.status = Status::Failed(message);
                self
            }
        }
    }

    /// `token` is both the latest issued and the one still awaited.
    fn owns(&self, token: RequestToken) -> bool {
        self.requests.is_current(token) && self.pending.is_some_and(|p| p.token == token)
    }

    fn select(mut self, range: RangeSpec, force: bool) -> Self {
        let same = range == self.range;
        let needs_fetch = force
            || !self.loaded
            || (self.policy.strategy == WindowStrategy::ServerCutoff && !same);

        if !needs_fetch {
            if !same {
                self.range = range;
                self.shown = range;
                self.view = self.policy.derive(&self.raw, range);
            }
            return self;
        }
        if !force && same && self.pending.is_some_and(|p| p.range == range) {
            return self;
        }

        let token = self.requests.issue();
        self.range = range;
        self.pending = Some(Pending { token, range });
        self.status = Status::Loading;
        self
    }
}
