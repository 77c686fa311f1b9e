use anyhow::{bail, Context, Result};
use clap::Args;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use is_terminal::IsTerminal;
use log::{info, warn};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::tui::{Console, LaunchOptions};

const FRAME: Duration = Duration::from_millis(16);

#[derive(Args, Debug, Default)]
pub struct TuiArgs {
    /// Open on this route instead of the default, like a bookmark
    #[arg(long)]
    pub route: Option<String>,
    /// Skip the boot sequence
    #[arg(long)]
    pub no_boot: bool,
    /// Swap screens without fading
    #[arg(long)]
    pub no_animation: bool,
    /// Silence audio cues
    #[arg(long)]
    pub mute: bool,
}

impl TuiArgs {
    /// Flags override the config file
    pub fn launch_options(&self, config: &Config) -> LaunchOptions {
        let mut options = LaunchOptions::from_config(config);
        options.initial_route = self.route.clone();
        options.boot &= !self.no_boot;
        options.animate &= !self.no_animation;
        options.audio &= !self.mute;
        options
    }
}

pub async fn tui_command(args: TuiArgs, config: &Config) -> Result<()> {
    if !io::stdout().is_terminal() {
        bail!("The console needs an interactive terminal; try `ship-status snapshot` instead");
    }

    let options = args.launch_options(config);
    info!("Launching console with {:?}", options);
    let mut console = Console::new(config, options);
    console.start();

    let mut terminal = TerminalGuard::enter()?;
    run_console(terminal.terminal(), &mut console).await
}

/// Raw mode and the alternate screen, undone on drop even if the loop errors
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(e).context("Failed to enter alternate screen");
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")?;
        Ok(Self { terminal })
    }

    fn terminal(&mut self) -> &mut Terminal<CrosstermBackend<io::Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to disable raw mode: {}", e);
        }
        if let Err(e) = execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture) {
            warn!("Failed to leave alternate screen: {}", e);
        }
        let _ = self.terminal.show_cursor();
    }
}

async fn run_console<B: Backend>(terminal: &mut Terminal<B>, console: &mut Console) -> Result<()> {
    loop {
        let frame_start = Instant::now();

        // Drain input first so a key press shows up in this frame
        let mut should_quit = false;
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if !console.handle_key(key)? {
                    should_quit = true;
                    break;
                }
            }
        }

        if should_quit {
            info!("Console closed");
            break;
        }

        console.tick();
        terminal.draw(|frame| console.render(frame))?;

        if let Some(remaining) = FRAME.checked_sub(frame_start.elapsed()) {
            tokio::time::sleep(remaining).await;
        }
    }

    Ok(())
}
