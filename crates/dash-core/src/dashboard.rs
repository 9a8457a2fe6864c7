// File: crates/dash-core/src/dashboard.rs
// Summary: Dashboard controller: owns the state container, runs loads and renders into a surface.
// Notes:
// - Handlers only dispatch events; every state change goes through `DashboardState::apply`.
// - The state borrow is released before any await, so overlapping loads on one
//   thread are safe; superseded responses are dropped by token.

use std::cell::{Ref, RefCell};

use chrono::{DateTime, Utc};

use crate::config::Profile;
use crate::pipeline::load_range;
use crate::present::{Presentation, Surface};
use crate::range::RangeSpec;
use crate::source::DataSource;
use crate::state::{DashboardState, Event, Pending};
use crate::theme::Theme;
use crate::transform::DisplayMode;

type Clock = Box<dyn Fn() -> DateTime<Utc>>;

pub struct Dashboard<S> {
    profile: Profile,
    source: S,
    theme: Theme,
    clock: Clock,
    state: RefCell<DashboardState>,
}

impl<S: DataSource> Dashboard<S> {
    pub fn new(profile: Profile, source: S) -> Self {
        let state = RefCell::new(DashboardState::for_profile(&profile));
        Self { profile, source, theme: Theme::default(), clock: Box::new(Utc::now), state }
    }

    /// Replace the wall clock (server cutoffs and "last updated" stamps).
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn profile(&self) -> &Profile { &self.profile }

    pub fn source(&self) -> &S { &self.source }

    pub fn state(&self) -> Ref<'_, DashboardState> { self.state.borrow() }

    /// Apply `event`; returns the load it issued, if any.
    fn dispatch(&self, event: Event) -> Option<Pending> {
        let mut state = self.state.borrow_mut();
        let before = state.pending.map(|p| p.token);
        let next = std::mem::take(&mut *state).apply(event);
        *state = next;
        state.pending.filter(|p| Some(p.token) != before)
    }

    async fn run(&self, pending: Option<Pending>) {
        let Some(Pending { token, range }) = pending else { return };
        let now = (self.clock)();
        let event = match load_range(&self.source, &self.profile, range, now).await {
            Ok(reshaped) => Event::Loaded { token, reshaped, at: (self.clock)() },
            Err(err) => {
                tracing::warn!(profile = %self.profile.name, range = %range, error = %err, "load failed");
                Event::Failed { token, message: err.to_string() }
            }
        };
        self.dispatch(event);
    }

    /// Initial load of the profile's default range.
    pub async fn start(&self) {
        let range = self.state.borrow().range;
        let pending = self.dispatch(Event::RangeSelected { range, force: true });
        self.run(pending).await;
    }

    /// Ranges the profile does not offer are ignored.
    pub async fn select_range(&self, range: RangeSpec) {
        if !self.profile.ranges.contains(&range) {
            tracing::debug!(profile = %self.profile.name, range = %range, "range not offered");
            return;
        }
        let pending = self.dispatch(Event::RangeSelected { range, force: false });
        self.run(pending).await;
    }

    /// Reload the current range unconditionally.
    pub async fn refresh(&self) {
        let pending = self.dispatch(Event::Refresh);
        self.run(pending).await;
    }

    /// Mode switches only change the projection; nothing is fetched.
    pub fn select_mode(&self, mode: DisplayMode) {
        self.dispatch(Event::ModeSelected(mode));
    }

    pub fn present(&self) -> Presentation {
        Presentation::assemble(&self.state.borrow(), &self.profile, &self.theme)
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        self.present().render_into(&self.profile.ids, surface);
    }
}
