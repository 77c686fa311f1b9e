use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Sparkline};
use ratatui::Frame;
use std::sync::Arc;
use std::time::Duration;

use super::{level_gauge, panel, render_no_signal, Screen, ScreenFeed};
use crate::telemetry::DataSource;
use crate::tui::Theme;

/// Overview of every subsystem, the console's home screen
pub struct DashboardScreen {
    feed: Arc<ScreenFeed>,
}

impl DashboardScreen {
    pub fn new(source: Arc<dyn DataSource>, refresh: Duration, history: usize) -> Self {
        Self {
            feed: ScreenFeed::new("dashboard", source, refresh, history),
        }
    }
}

impl Screen for DashboardScreen {
    fn id(&self) -> &'static str {
        "dashboard"
    }

    fn title(&self) -> &'static str {
        "Bridge Overview"
    }

    fn hotkey(&self) -> &'static str {
        "F1"
    }

    fn feed(&self) -> &Arc<ScreenFeed> {
        &self.feed
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let Some(status) = self.feed.latest() else {
            render_no_signal(frame, area, self.title(), theme);
            return;
        };

        let [summary, gauges, trend] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .areas(area);

        let label = theme.label_style();
        let summary_text = vec![
            Line::from(vec![
                Span::styled(status.alert.label(), theme.alert_style(status.alert)),
                Span::styled(format!("   Stardate {:.1}", status.stardate), label),
            ]),
            Line::from(vec![
                Span::styled("Course  ", label),
                Span::raw(format!(
                    "{} at {:.1} km/s, {:.2} AU remaining",
                    status.navigation.destination,
                    status.navigation.velocity_kms,
                    status.navigation.distance_au
                )),
            ]),
        ];
        frame.render_widget(
            Paragraph::new(summary_text).block(panel(self.title(), theme)),
            summary,
        );

        let [hull, reactor, fuel, scrubbers] = Layout::horizontal([Constraint::Ratio(1, 4); 4]).areas(gauges);
        frame.render_widget(level_gauge("Hull", status.hull_integrity, theme), hull);
        frame.render_widget(level_gauge("Reactor", status.power.reactor_output, theme), reactor);
        frame.render_widget(level_gauge("Fuel", status.engineering.fuel, theme), fuel);
        frame.render_widget(
            level_gauge("Scrubbers", status.life_support.scrubber_efficiency, theme),
            scrubbers,
        );

        let draw = self.feed.series(|s| s.power.draw_mw);
        frame.render_widget(
            Sparkline::default()
                .block(panel("Power draw (MW)", theme))
                .style(ratatui::style::Style::default().fg(theme.teal))
                .data(&draw),
            trend,
        );
    }
}
