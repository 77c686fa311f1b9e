use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Sparkline};
use ratatui::Frame;
use std::sync::Arc;
use std::time::Duration;

use super::{panel, render_no_signal, Screen, ScreenFeed};
use crate::telemetry::DataSource;
use crate::tui::Theme;

pub struct NavigationScreen {
    feed: Arc<ScreenFeed>,
}

impl NavigationScreen {
    pub fn new(source: Arc<dyn DataSource>, refresh: Duration, history: usize) -> Self {
        Self {
            feed: ScreenFeed::new("navigation", source, refresh, history),
        }
    }
}

impl Screen for NavigationScreen {
    fn id(&self) -> &'static str {
        "navigation"
    }

    fn title(&self) -> &'static str {
        "Navigation"
    }

    fn hotkey(&self) -> &'static str {
        "F3"
    }

    fn feed(&self) -> &Arc<ScreenFeed> {
        &self.feed
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let Some(status) = self.feed.latest() else {
            render_no_signal(frame, area, self.title(), theme);
            return;
        };
        let nav = &status.navigation;

        let [course, trend] = Layout::vertical([Constraint::Length(8), Constraint::Min(3)]).areas(area);

        let label = theme.label_style();
        let value = Style::default().fg(theme.text);
        let lines = vec![
            Line::from(vec![
                Span::styled("Destination   ", label),
                Span::styled(nav.destination.as_str(), theme.title_style()),
            ]),
            Line::from(vec![
                Span::styled("Distance      ", label),
                Span::styled(format!("{:.3} AU", nav.distance_au), value),
            ]),
            Line::from(vec![
                Span::styled("ETA           ", label),
                Span::styled(format_eta(nav.eta_hours), value),
            ]),
            Line::from(vec![
                Span::styled("Velocity      ", label),
                Span::styled(format!("{:.2} km/s", nav.velocity_kms), value),
            ]),
            Line::from(vec![
                Span::styled("Heading       ", label),
                Span::styled(format!("{:05.1}° mark {:+.1}°", nav.heading_deg, nav.pitch_deg), value),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).block(panel(self.title(), theme)), course);

        // Scaled so the sparkline shows the small variations
        let velocity = self.feed.series(|s| (s.navigation.velocity_kms - 30.0) * 10.0);
        frame.render_widget(
            Sparkline::default()
                .block(panel("Velocity", theme))
                .style(Style::default().fg(theme.blue))
                .data(&velocity),
            trend,
        );
    }
}

fn format_eta(hours: f64) -> String {
    let total_minutes = (hours.max(0.0) * 60.0).round() as u64;
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;
    if days > 0 {
        format!("{}d {:02}h {:02}m", days, hours, minutes)
    } else {
        format!("{:02}h {:02}m", hours, minutes)
    }
}
