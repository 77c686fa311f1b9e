use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Row, Table};
use ratatui::Frame;
use std::sync::Arc;
use std::time::Duration;

use super::{level_gauge, panel, render_no_signal, Screen, ScreenFeed};
use crate::telemetry::DataSource;
use crate::tui::Theme;

pub struct EngineeringScreen {
    feed: Arc<ScreenFeed>,
}

impl EngineeringScreen {
    pub fn new(source: Arc<dyn DataSource>, refresh: Duration, history: usize) -> Self {
        Self {
            feed: ScreenFeed::new("engineering", source, refresh, history),
        }
    }
}

impl Screen for EngineeringScreen {
    fn id(&self) -> &'static str {
        "engineering"
    }

    fn title(&self) -> &'static str {
        "Engineering"
    }

    fn hotkey(&self) -> &'static str {
        "F4"
    }

    fn feed(&self) -> &Arc<ScreenFeed> {
        &self.feed
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let Some(status) = self.feed.latest() else {
            render_no_signal(frame, area, self.title(), theme);
            return;
        };
        let eng = &status.engineering;

        let [core, gauges, thrusters] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(4),
        ])
        .areas(area);

        let core_style = if eng.core_temperature_k > 1520.0 {
            Style::default().fg(theme.red)
        } else {
            Style::default().fg(theme.text)
        };
        let lines = vec![
            Line::from(vec![
                Span::styled("Core temperature  ", theme.label_style()),
                Span::styled(format!("{:.0} K", eng.core_temperature_k), core_style),
            ]),
            Line::from(vec![
                Span::styled("Power draw        ", theme.label_style()),
                Span::raw(format!("{:.0} MW", status.power.draw_mw)),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).block(panel(self.title(), theme)), core);

        let [coolant, reserve, fuel] = Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(gauges);
        frame.render_widget(level_gauge("Coolant flow", eng.coolant_flow, theme), coolant);
        frame.render_widget(level_gauge("Reserve", status.power.reserve, theme), reserve);
        frame.render_widget(level_gauge("Fuel", eng.fuel, theme), fuel);

        let rows = eng.thrusters.iter().map(|thruster| {
            Row::new(vec![
                thruster.name.clone(),
                format!("{:.1}%", thruster.output),
                format!("{:.0} °C", thruster.temperature_c),
            ])
            .style(Style::default().fg(theme.level_color(thruster.output)))
        });
        let table = Table::new(
            rows,
            [Constraint::Min(16), Constraint::Length(10), Constraint::Length(10)],
        )
        .header(Row::new(vec!["Thruster", "Output", "Temp"]).style(theme.title_style()))
        .block(panel("Thrusters", theme));
        frame.render_widget(table, thrusters);
    }
}
