//! Application layer of the PEACE engine.
//!
//! | Module     | Responsibility                                         |
//! |------------|--------------------------------------------------------|
//! | `config`   | `AppConfig`, loaded from TOML                          |
//! | `logging`  | `fern` logger setup                                    |
//! | `shaders`  | Built-in and on-disk shader sources                    |
//! | `editor`   | Ghost placement of cubes and spheres                   |
//! | `engine`   | `Engine`: event handling, per-frame update and render  |
//! | `platform` | `Platform` trait, `PlatformEvent`, `HeadlessPlatform`  |
//! | `runner`   | The main loop                                          |
//!
//! ```rust,ignore
//! use peace_app::App;
//!
//! fn main() -> anyhow::Result<()> {
//!     let summary = App::new().with_title("Sandbox").with_size(800, 600).run()?;
//!     println!("{} frames", summary.frames);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod editor;
pub mod engine;
pub mod logging;
pub mod platform;
pub mod runner;
pub mod shaders;

pub use config::AppConfig;
pub use editor::{Editor, PrimitiveKind};
pub use engine::Engine;
pub use platform::{HeadlessPlatform, Platform, PlatformEvent};
pub use runner::{run, RunSummary};

use anyhow::Result;
use peace_renderer::headless::HeadlessDevice;

/// Builder over [`AppConfig`] that runs the engine on the headless backend.
#[derive(Debug, Clone, Default)]
pub struct App {
    config: AppConfig,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.config.title = title.to_string();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn with_max_frames(mut self, frames: Option<u64>) -> Self {
        self.config.max_frames = frames;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Builds the engine and runs it to completion.
    pub fn run(self) -> Result<RunSummary> {
        log::info!("starting \"{}\" at {}x{}", self.config.title, self.config.width, self.config.height);
        let mut platform = HeadlessPlatform::new(self.config.max_frames);
        let mut engine = Engine::new(self.config, Box::new(HeadlessDevice::new()))?;
        run(&mut engine, &mut platform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_config() {
        let app = App::new().with_title("t").with_size(320, 200).with_max_frames(Some(2));
        assert_eq!(app.config().title, "t");
        assert_eq!((app.config().width, app.config().height), (320, 200));
        assert_eq!(app.config().max_frames, Some(2));
    }

    #[test]
    fn short_run_completes() {
        let config = AppConfig { fps_cap: 0, ..AppConfig::default() };
        let summary = App::new().with_config(config).with_max_frames(Some(2)).run().unwrap();
        assert_eq!(summary.frames, 2);
    }
}
