use anyhow::Result;
use colored::Colorize;

use crate::config::Config;
use crate::router::Router;
use crate::tui::{Console, LaunchOptions};

pub fn routes_command(config: &Config) -> Result<()> {
    let console = Console::new(config, LaunchOptions::from_config(config));
    let router = console.router();

    println!("{}", "Registered routes:".bold());
    for line in route_lines(router) {
        println!("{}", line);
    }
    println!();
    println!(
        "  {} default route: {}",
        "•".bright_cyan(),
        router.default_route().bright_green().bold()
    );
    Ok(())
}

fn route_lines(router: &Router) -> Vec<String> {
    let default = router.default_route();
    router
        .route_ids()
        .iter()
        .filter_map(|id| router.descriptor(id))
        .map(|route| {
            let marker = if route.id == default {
                "●".bright_green()
            } else {
                "○".dimmed()
            };
            let hotkey = route.hotkey.as_deref().unwrap_or("-");
            format!(
                "  {} {:<6} {:<14} {:<22} {}",
                marker,
                hotkey.bright_yellow().bold(),
                route.id.bright_green(),
                route.title,
                route.surface_id.cyan()
            )
        })
        .collect()
}
