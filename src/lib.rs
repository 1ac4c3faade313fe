pub mod config;
pub mod error;
pub mod main_loop;
pub mod pad;
pub mod session;

use crate::config::PlaybackConfig;
use crate::error::{MediaPlaybackError, Result};
use crate::main_loop::{EventLoop, Termination};
use crate::session::Session;

// Initialize gstreamer, build the graph and loop playback until an error stops it
pub fn play(config: &PlaybackConfig) -> Result<Termination> {
    gstreamer::init().map_err(|e| MediaPlaybackError::InitError(e.to_string()))?;

    let mut session = Session::build(config)?;
    session.start()?;
    log::debug!("playing {}", config.media_path.display());

    let termination = EventLoop::new(config).run(&mut session);

    Ok(finish(termination, session.shutdown()))
}

// Playback already ended, a failed teardown is only worth a log line
fn finish(termination: Termination, shutdown: Result<()>) -> Termination {
    if let Err(err) = shutdown {
        log::warn!("failed to shut down pipeline: {}", err);
    }

    termination
}
