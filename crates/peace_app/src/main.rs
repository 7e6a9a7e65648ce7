use anyhow::Result;
use peace_app::{logging, App, AppConfig};

const DEFAULT_CONFIG: &str = "peace.toml";

fn main() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = AppConfig::load(&path)?;
    logging::init(config.level_filter()?)?;

    let summary = App::new().with_config(config).run()?;
    for pass in &summary.last_frame.passes {
        log::info!(
            "{:>7}: {} drawn, {} culled, {} skipped",
            pass.name,
            pass.draws.drawn,
            pass.draws.culled,
            pass.draws.skipped
        );
    }
    log::info!("{} frames in {:.2}s", summary.frames, summary.elapsed);
    Ok(())
}
