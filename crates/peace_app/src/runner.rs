use anyhow::Result;
use peace_core::FrameClock;
use peace_renderer::FrameStats;

use crate::engine::Engine;
use crate::platform::Platform;

/// What a finished run reports back.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub frames: u64,
    /// Wall-clock seconds from the first to the last frame.
    pub elapsed: f64,
    pub last_frame: FrameStats,
}

/// Drives `engine` until it stops running, then shuts it down.
///
/// Each iteration polls the platform, updates, renders, presents and sleeps
/// out the rest of the frame budget.  The running flag is checked once per
/// iteration, so a quit takes effect before the next update.
pub fn run(engine: &mut Engine, platform: &mut dyn Platform) -> Result<RunSummary> {
    let mut clock = FrameClock::new(engine.config().fps_cap);
    let mut grabbed = engine.mouse_grabbed();
    platform.set_cursor_grab(grabbed);
    let mut summary = RunSummary::default();

    log::info!("entering main loop");
    while engine.is_running() {
        for event in platform.poll_events() {
            engine.handle_event(event);
        }
        if !engine.is_running() {
            break;
        }
        if engine.mouse_grabbed() != grabbed {
            grabbed = engine.mouse_grabbed();
            platform.set_cursor_grab(grabbed);
        }

        let time = clock.tick();
        engine.update(time.delta);
        engine.render();
        engine.end_frame();
        platform.present();

        summary.frames += 1;
        summary.elapsed = time.elapsed;
        if time.frame_count % 600 == 0 {
            log::debug!("frame {} at {:.1} fps", time.frame_count, time.fps);
        }
        clock.wait_for_next_frame();
    }

    if let Some(stats) = engine.last_stats() {
        summary.last_frame = stats.clone();
    }
    engine.shutdown();
    log::info!("main loop exited after {} frames", summary.frames);
    Ok(summary)
}
