use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use pathviz_core::{App, AppConfig};
use pathviz_crossterm::CrosstermDriver;
use pathviz_solver::{HttpSolver, LocalSolver, Solver};

use pathviz_lib::config::SolverConfig;
use pathviz_lib::{Args, Config, UI_HEIGHT, UI_WIDTH, VisualizerModel, logging};

fn solver(config: &SolverConfig) -> Result<Arc<dyn Solver>, Box<dyn std::error::Error>> {
    if config.local {
        log::info!("solving in-process");
        return Ok(Arc::new(LocalSolver));
    }
    let http = HttpSolver::new(&config.endpoint, Duration::from_millis(config.timeout_ms))?;
    log::info!("solver endpoint {}", http.url());
    Ok(Arc::new(http))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = Config::load(&args)?;
    logging::init(&config.log)?;

    let solver = solver(&config.solver)?;
    let (width, height) = CrosstermDriver::size().unwrap_or_else(|e| {
        log::warn!("terminal size unavailable ({e}), using {UI_WIDTH}x{UI_HEIGHT}");
        (UI_WIDTH, UI_HEIGHT)
    });
    let model = VisualizerModel::new(&config, solver).with_screen(width, height);
    let mut app = App::new(AppConfig {
        model,
        driver: CrosstermDriver::new(),
        width,
        height,
    });
    app.run()?;
    log::info!("pathviz exited");
    Ok(())
}
