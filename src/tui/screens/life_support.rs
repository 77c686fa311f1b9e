use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Sparkline};
use ratatui::Frame;
use std::sync::Arc;
use std::time::Duration;

use super::{level_gauge, panel, render_no_signal, Screen, ScreenFeed};
use crate::telemetry::DataSource;
use crate::tui::Theme;

pub struct LifeSupportScreen {
    feed: Arc<ScreenFeed>,
}

impl LifeSupportScreen {
    pub fn new(source: Arc<dyn DataSource>, refresh: Duration, history: usize) -> Self {
        Self {
            feed: ScreenFeed::new("life-support", source, refresh, history),
        }
    }
}

impl Screen for LifeSupportScreen {
    fn id(&self) -> &'static str {
        "life-support"
    }

    fn title(&self) -> &'static str {
        "Life Support"
    }

    fn hotkey(&self) -> &'static str {
        "F2"
    }

    fn feed(&self) -> &Arc<ScreenFeed> {
        &self.feed
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let Some(status) = self.feed.latest() else {
            render_no_signal(frame, area, self.title(), theme);
            return;
        };
        let ls = &status.life_support;

        let [readings, gauges, trend] = Layout::vertical([
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .areas(area);

        let row = |name: &'static str, value: String| {
            Line::from(vec![
                Span::styled(format!("{:<14}", name), theme.label_style()),
                Span::styled(value, Style::default().fg(theme.text)),
            ])
        };
        let lines = vec![
            row("Oxygen", format!("{:.2} %", ls.oxygen)),
            row("CO2", format!("{:.0} ppm", ls.co2_ppm)),
            row("Pressure", format!("{:.1} kPa", ls.pressure_kpa)),
            row("Temperature", format!("{:.1} °C", ls.temperature_c)),
        ];
        frame.render_widget(Paragraph::new(lines).block(panel(self.title(), theme)), readings);

        let [humidity, scrubbers] = Layout::horizontal([Constraint::Ratio(1, 2); 2]).areas(gauges);
        frame.render_widget(level_gauge("Humidity", ls.humidity, theme), humidity);
        frame.render_widget(level_gauge("Scrubbers", ls.scrubber_efficiency, theme), scrubbers);

        let co2 = self.feed.series(|s| s.life_support.co2_ppm);
        frame.render_widget(
            Sparkline::default()
                .block(panel("CO2 (ppm)", theme))
                .style(Style::default().fg(theme.sky))
                .data(&co2),
            trend,
        );
    }
}
