use ratatui::layout::{Constraint, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Row, Table};
use ratatui::Frame;
use std::sync::Arc;
use std::time::Duration;

use super::{panel, render_no_signal, Screen, ScreenFeed};
use crate::telemetry::{CrewStatus, DataSource};
use crate::tui::Theme;

pub struct CrewScreen {
    feed: Arc<ScreenFeed>,
}

impl CrewScreen {
    pub fn new(source: Arc<dyn DataSource>, refresh: Duration, history: usize) -> Self {
        Self {
            feed: ScreenFeed::new("crew", source, refresh, history),
        }
    }
}

impl Screen for CrewScreen {
    fn id(&self) -> &'static str {
        "crew"
    }

    fn title(&self) -> &'static str {
        "Crew Manifest"
    }

    fn hotkey(&self) -> &'static str {
        "F5"
    }

    fn feed(&self) -> &Arc<ScreenFeed> {
        &self.feed
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let Some(status) = self.feed.latest() else {
            render_no_signal(frame, area, self.title(), theme);
            return;
        };

        let rows = status.crew.iter().map(|member| {
            let color = match member.status {
                CrewStatus::OnDuty => theme.green,
                CrewStatus::OffDuty | CrewStatus::Resting => theme.subtext0,
                CrewStatus::Medical => theme.peach,
            };
            Row::new(vec![
                member.name.clone(),
                member.role.clone(),
                member.station.clone(),
                member.status.label().to_string(),
                format!("{} bpm", member.heart_rate),
            ])
            .style(Style::default().fg(color))
        });

        let table = Table::new(
            rows,
            [
                Constraint::Min(14),
                Constraint::Min(18),
                Constraint::Min(14),
                Constraint::Length(12),
                Constraint::Length(8),
            ],
        )
        .header(
            Row::new(vec!["Name", "Role", "Station", "Status", "Pulse"])
                .style(theme.title_style())
                .bottom_margin(1),
        )
        .block(panel(self.title(), theme));
        frame.render_widget(table, area);
    }
}
