//! Waypoint - headless objective walkthrough: a scripted shift at the warehouse,
//! driven through the objective runtime one frame at a time.

mod config;
mod content;
mod session;

use anyhow::Result;
use objectives::ObjectiveConfig;

use config::GameConfig;
use session::Session;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GameConfig::load();
    let mut objective_config = ObjectiveConfig::load(&config.objective_config);
    let catalog = content::load_catalog(&config.catalog)?;
    if objective_config.starting_objective.is_none() {
        objective_config.starting_objective = catalog.iter().next().map(|o| o.id().clone());
    }
    log::info!(
        "Starting shift: {} objectives, screen {}x{}",
        catalog.len(),
        config.window_width,
        config.window_height
    );

    let mut session = Session::new(config, objective_config, catalog)?;
    session.run()
}
