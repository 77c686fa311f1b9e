//! The console's screens.
//!
//! Each screen owns a `ScreenFeed` that polls the data source only while the
//! screen is routed: `activate` is the route's enter hook and `deactivate` its
//! exit hook.

use log::debug;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, Gauge, Paragraph};
use ratatui::Frame;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::router::RouteDescriptor;
use crate::telemetry::{DataSource, SystemStatus};
use crate::tui::Theme;

pub mod crew;
pub mod dashboard;
pub mod engineering;
pub mod life_support;
pub mod navigation;

pub use crew::CrewScreen;
pub use dashboard::DashboardScreen;
pub use engineering::EngineeringScreen;
pub use life_support::LifeSupportScreen;
pub use navigation::NavigationScreen;

pub trait Screen: Send + Sync {
    fn id(&self) -> &'static str;
    fn title(&self) -> &'static str;
    fn hotkey(&self) -> &'static str;
    fn feed(&self) -> &Arc<ScreenFeed>;

    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Route wiring: entering starts the feed, leaving stops it
    fn descriptor(&self) -> RouteDescriptor {
        let enter_feed = Arc::clone(self.feed());
        let exit_feed = Arc::clone(self.feed());
        RouteDescriptor::new(self.id(), self.title())
            .hotkey(self.hotkey())
            .on_enter(move || {
                let feed = Arc::clone(&enter_feed);
                async move {
                    feed.activate();
                    anyhow::Ok(())
                }
            })
            .on_exit(move || {
                let feed = Arc::clone(&exit_feed);
                async move {
                    feed.deactivate();
                    anyhow::Ok(())
                }
            })
    }
}

struct FeedState {
    samples: VecDeque<SystemStatus>,
    task: Option<JoinHandle<()>>,
}

/// Polls a data source on an interval while active, keeping a bounded history
pub struct ScreenFeed {
    name: &'static str,
    source: Arc<dyn DataSource>,
    refresh: Duration,
    capacity: usize,
    state: Mutex<FeedState>,
}

impl ScreenFeed {
    pub fn new(
        name: &'static str,
        source: Arc<dyn DataSource>,
        refresh: Duration,
        capacity: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            name,
            source,
            refresh,
            capacity: capacity.max(1),
            state: Mutex::new(FeedState {
                samples: VecDeque::new(),
                task: None,
            }),
        })
    }

    /// Take a sample now and keep sampling every refresh interval. Must run inside a tokio runtime.
    pub fn activate(self: &Arc<Self>) {
        if self.is_active() {
            return;
        }
        self.sample();

        let feed = Arc::downgrade(self);
        let refresh = self.refresh;
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(refresh);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(feed) = feed.upgrade() else {
                    break;
                };
                feed.sample();
            }
        });

        self.lock().task = Some(task);
        debug!("Feed '{}' started", self.name);
    }

    pub fn deactivate(&self) {
        if let Some(task) = self.lock().task.take() {
            task.abort();
            debug!("Feed '{}' stopped", self.name);
        }
    }

    pub fn is_active(&self) -> bool {
        self.lock().task.is_some()
    }

    pub fn latest(&self) -> Option<SystemStatus> {
        self.lock().samples.back().cloned()
    }

    /// One value per retained sample, oldest first
    pub fn series(&self, reading: impl Fn(&SystemStatus) -> f64) -> Vec<u64> {
        self.lock()
            .samples
            .iter()
            .map(|s| reading(s).max(0.0).round() as u64)
            .collect()
    }

    pub fn sample_count(&self) -> usize {
        self.lock().samples.len()
    }

    fn sample(&self) {
        let snapshot = self.source.snapshot();
        let mut state = self.lock();
        if state.samples.len() == self.capacity {
            state.samples.pop_front();
        }
        state.samples.push_back(snapshot);
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for ScreenFeed {
    fn drop(&mut self) {
        if let Some(task) = self.state.get_mut().unwrap_or_else(PoisonError::into_inner).task.take() {
            task.abort();
        }
    }
}

pub(crate) fn panel<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::bordered()
        .title(Line::styled(format!(" {} ", title), theme.title_style()))
        .border_style(theme.border_style())
}

/// Percent gauge coloured by how healthy the reading is
pub(crate) fn level_gauge<'a>(title: &'a str, percent: f64, theme: &Theme) -> Gauge<'a> {
    let percent = percent.clamp(0.0, 100.0);
    Gauge::default()
        .block(panel(title, theme))
        .gauge_style(ratatui::style::Style::default().fg(theme.level_color(percent)).bg(theme.surface0))
        .ratio(percent / 100.0)
        .label(format!("{:.1}%", percent))
}

/// Placeholder until the first sample arrives
pub(crate) fn render_no_signal(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let message = Paragraph::new(Line::styled("Awaiting telemetry...", theme.label_style()))
        .alignment(Alignment::Center)
        .block(panel(title, theme));
    frame.render_widget(message, area);
}
