//! The console shell: owns the router, the surface board, the address bar and
//! the boot sequence, and turns key presses into navigation requests.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, info, warn};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};
use ratatui::Frame;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::task::JoinHandle;

use crate::audio::{AudioSink, Cue, TerminalBell};
use crate::boot::BootSequence;
use crate::config::Config;
use crate::router::{self, HistoryLocation, LocationEvents, RouteChange, Router};
use crate::telemetry::{DataSource, SyntheticTelemetry};
use crate::tui::keys::key_name;
use crate::tui::screens::{
    CrewScreen, DashboardScreen, EngineeringScreen, LifeSupportScreen, NavigationScreen, Screen,
};
use crate::tui::{SurfaceBoard, Theme};

/// How a console session starts, after CLI flags are applied to the config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Token the address bar opens on
    pub initial_route: Option<String>,
    pub boot: bool,
    pub animate: bool,
    pub audio: bool,
}

impl LaunchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            initial_route: None,
            boot: config.boot.enabled,
            animate: config.router.animate,
            audio: config.audio.enabled,
        }
    }
}

/// One mounted screen and the surface it draws into
struct Mounted {
    screen: Arc<dyn Screen>,
    surface_id: String,
}

pub struct Console {
    router: Arc<Router>,
    board: Arc<SurfaceBoard>,
    location: Arc<HistoryLocation>,
    events: Option<LocationEvents>,
    boot: Arc<BootSequence>,
    audio: Arc<dyn AudioSink>,
    screens: Vec<Mounted>,
    theme: Theme,
    changes: broadcast::Receiver<RouteChange>,
    last_change: Option<RouteChange>,
    prompt: Option<String>,
    boot_announced: bool,
    tasks: Vec<JoinHandle<()>>,
}

impl Console {
    pub fn new(config: &Config, options: LaunchOptions) -> Self {
        let telemetry = SyntheticTelemetry::new(config.telemetry.seed);
        info!("Telemetry seed {}", telemetry.seed());
        let source: Arc<dyn DataSource> = Arc::new(telemetry);
        let refresh = config.telemetry.refresh_interval();
        let history = config.telemetry.history;

        let screens: Vec<Arc<dyn Screen>> = vec![
            Arc::new(DashboardScreen::new(source.clone(), refresh, history)),
            Arc::new(LifeSupportScreen::new(source.clone(), refresh, history)),
            Arc::new(NavigationScreen::new(source.clone(), refresh, history)),
            Arc::new(EngineeringScreen::new(source.clone(), refresh, history)),
            Arc::new(CrewScreen::new(source, refresh, history)),
        ];

        let mut boot_settings = config.boot.clone();
        boot_settings.enabled = options.boot;
        let boot = Arc::new(BootSequence::from_settings(&boot_settings));

        let audio: Arc<dyn AudioSink> = Arc::new(TerminalBell::new(options.audio));
        let (location, events) = HistoryLocation::new(options.initial_route);
        let location = Arc::new(location);
        let board = Arc::new(SurfaceBoard::new());

        let transition = if options.animate {
            config.router.transition()
        } else {
            std::time::Duration::ZERO
        };

        let mut builder = Router::builder(board.clone())
            .location(location.clone())
            .boot_gate(boot.clone())
            .audio(audio.clone())
            .default_route(config.router.default_route.clone())
            .transition(transition);

        let mut mounted = Vec::with_capacity(screens.len());
        for screen in screens {
            let descriptor = screen.descriptor();
            board.register(descriptor.surface_id.clone());
            mounted.push(Mounted {
                surface_id: descriptor.surface_id.clone(),
                screen,
            });
            builder = builder.route(descriptor);
        }

        let router = builder.build();
        let changes = router.subscribe();

        Self {
            router,
            board,
            location,
            events: Some(events),
            boot_announced: boot.is_complete(),
            boot,
            audio,
            screens: mounted,
            theme: Theme::new(config.theme),
            changes,
            last_change: None,
            prompt: None,
            tasks: Vec::new(),
        }
    }

    /// Spawn the location listener and the initial navigation
    pub fn start(&mut self) {
        let Some(events) = self.events.take() else {
            warn!("Console already started");
            return;
        };
        self.tasks.push(router::listen(self.router.clone(), events));

        let router = self.router.clone();
        self.tasks.push(tokio::spawn(async move {
            if let Err(e) = router.start().await {
                warn!("Initial navigation failed: {}", e);
            }
        }));
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub fn location(&self) -> &Arc<HistoryLocation> {
        &self.location
    }

    pub fn boot(&self) -> &Arc<BootSequence> {
        &self.boot
    }

    pub fn last_change(&self) -> Option<&RouteChange> {
        self.last_change.as_ref()
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    /// Advance the boot sequence and collect route changes. Called once per frame.
    pub fn tick(&mut self) {
        self.boot.tick();
        if !self.boot_announced && self.boot.is_complete() {
            self.boot_announced = true;
            self.audio.play(Cue::Boot);
        }

        loop {
            match self.changes.try_recv() {
                Ok(change) => self.last_change = Some(change),
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!("Skipped {} route changes", skipped);
                }
                Err(_) => break,
            }
        }
    }

    /// Returns false when the console should quit
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if key.kind != KeyEventKind::Press {
            return Ok(true);
        }

        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(false);
        }

        if self.prompt.is_some() {
            self.handle_prompt_key(key);
            return Ok(true);
        }

        // Any key skips the boot log; routing waits for it
        if !self.boot.is_complete() {
            self.boot.finish();
            return Ok(true);
        }

        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Char('q') => return Ok(false),
            KeyCode::Char(':') => self.prompt = Some(String::new()),
            KeyCode::Char('[') => {
                self.location.back();
            }
            KeyCode::Char(']') => {
                self.location.forward();
            }
            KeyCode::Left if alt => {
                self.location.back();
            }
            KeyCode::Right if alt => {
                self.location.forward();
            }
            code => {
                if let Some(name) = key_name(code) {
                    self.dispatch_hotkey(name);
                }
            }
        }
        Ok(true)
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(input) = self.prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.prompt = None,
            KeyCode::Enter => {
                let token = input.trim().to_string();
                self.prompt = None;
                debug!("Address bar edited to '{}'", token);
                self.location.edit(&token);
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            _ => {}
        }
    }

    fn dispatch_hotkey(&self, name: String) {
        if self.router.hotkey_target(&name).is_none() {
            return;
        }
        let router = self.router.clone();
        tokio::spawn(async move {
            router.handle_hotkey(&name).await;
        });
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        if !self.boot.is_complete() {
            self.render_boot(frame, area);
            return;
        }

        let [header, body, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(4),
        ])
        .areas(area);

        frame.buffer_mut().set_style(body, self.theme.body_style());
        self.render_header(frame, header);
        self.render_body(frame, body);
        self.render_footer(frame, footer);
    }

    fn render_boot(&self, frame: &mut Frame, area: Rect) {
        let [log_area, progress] = Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).areas(area);

        let lines: Vec<Line> = self
            .boot
            .visible_lines()
            .into_iter()
            .map(|line| Line::styled(line, Style::default().fg(self.theme.green)))
            .collect();
        let log = Paragraph::new(lines).block(
            Block::bordered()
                .title(Line::styled(" BOOT ", self.theme.title_style()))
                .border_style(self.theme.border_style()),
        );
        frame.render_widget(log, log_area);

        let gauge = Gauge::default()
            .block(Block::bordered().border_style(self.theme.border_style()))
            .gauge_style(Style::default().fg(self.theme.green).bg(self.theme.surface0))
            .ratio(self.boot.progress().clamp(0.0, 1.0))
            .label("press any key to skip");
        frame.render_widget(gauge, progress);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(self.theme.border_style())
            .style(self.theme.chrome_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [title_area, address_area, clock_area] = Layout::horizontal([
            Constraint::Percentage(35),
            Constraint::Percentage(45),
            Constraint::Percentage(20),
        ])
        .areas(inner);

        let title = self
            .router
            .current_route()
            .and_then(|id| self.router.descriptor(&id))
            .map(|route| route.title.clone())
            .unwrap_or_else(|| "Standby".to_string());
        frame.render_widget(
            Paragraph::new(Line::styled(format!(" {}", title), self.theme.title_style())),
            title_area,
        );

        let address = match &self.prompt {
            Some(input) => Line::from(vec![
                Span::styled("ship://", self.theme.label_style()),
                Span::styled(format!("{}_", input), self.theme.hotkey_style()),
            ]),
            None => Line::from(vec![
                Span::styled("ship://", self.theme.label_style()),
                Span::styled(
                    self.router.location_token().unwrap_or_default(),
                    Style::default().fg(self.theme.text),
                ),
            ]),
        };
        frame.render_widget(Paragraph::new(address).alignment(Alignment::Center), address_area);

        let clock = chrono::Local::now().format("%H:%M:%S").to_string();
        frame.render_widget(
            Paragraph::new(Line::styled(format!("{} ", clock), self.theme.label_style()))
                .alignment(Alignment::Right),
            clock_area,
        );
    }

    fn render_body(&self, frame: &mut Frame, area: Rect) {
        let mut drawn = false;
        for mounted in &self.screens {
            let phase = self.board.phase(&mounted.surface_id);
            if !phase.is_visible() {
                continue;
            }
            mounted.screen.render(frame, area, &self.theme);
            if phase.is_fading() {
                frame.buffer_mut().set_style(area, self.theme.fade_style());
            }
            drawn = true;
        }

        if !drawn {
            let idle = Paragraph::new(Line::styled("No screen routed", self.theme.label_style()))
                .alignment(Alignment::Center)
                .block(Block::bordered().border_style(self.theme.border_style()));
            frame.render_widget(idle, area);
        }
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let current = self.router.current_route();
        let mut keys = Vec::new();
        for (key, id) in self.router.hotkey_bindings() {
            let title = self
                .router
                .descriptor(&id)
                .map(|route| route.title.clone())
                .unwrap_or_else(|| id.clone());
            let style = if current.as_deref() == Some(id.as_str()) {
                self.theme.title_style()
            } else {
                self.theme.label_style()
            };
            keys.push(Span::styled(format!(" {} ", key), self.theme.hotkey_style()));
            keys.push(Span::styled(format!("{} ", title), style));
        }

        let help = Line::from(vec![
            Span::styled(" [ ] ", self.theme.hotkey_style()),
            Span::styled("history ", self.theme.label_style()),
            Span::styled(" : ", self.theme.hotkey_style()),
            Span::styled("address ", self.theme.label_style()),
            Span::styled(" q ", self.theme.hotkey_style()),
            Span::styled("quit", self.theme.label_style()),
        ]);

        let change = match &self.last_change {
            Some(change) => format!(
                " {} -> {}",
                change.previous.as_deref().unwrap_or("boot"),
                change.current
            ),
            None => " awaiting first route".to_string(),
        };
        let status = Line::styled(change, Style::default().fg(self.theme.overlay1));

        let footer = Paragraph::new(vec![Line::from(keys), help, status]).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(self.theme.border_style())
                .style(self.theme.chrome_style()),
        );
        frame.render_widget(footer, area);
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        for mounted in &self.screens {
            mounted.screen.feed().deactivate();
        }
    }
}
