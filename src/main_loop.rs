use crate::config::PlaybackConfig;
use crate::error::Result;
use gstreamer::State;
use std::time::Duration;

/// Bus messages the event loop reacts to, detached from the GStreamer message.
#[derive(Debug, Clone, PartialEq)]
pub enum BusEvent {
    StateChanged {
        // whether the pipeline itself, rather than one of its stages, changed state
        from_pipeline: bool,
        old: State,
        current: State,
    },
    Error {
        source: String,
        message: String,
        debug: Option<String>,
    },
    EndOfStream,
    Other(String),
}

/// The two operations the event loop needs from a running playback session.
pub trait PlaybackControl {
    /// Waits at most `timeout` for the next bus event.
    fn next_event(&mut self, timeout: Duration) -> Option<BusEvent>;

    /// Submits a flushing seek to `position`. Does not wait for it to complete.
    fn restart(&mut self, position: Duration) -> Result<()>;
}

/// Why the event loop stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum Termination {
    StreamError { source: String, message: String },
    SeekFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoopState {
    Running,
    Terminated(Termination),
}

/// Polls a [`PlaybackControl`] until an error ends playback, restarting the
/// stream every time it reaches its end.
pub struct EventLoop {
    poll_interval: Duration,
    restart_position: Duration,
    state: LoopState,
    restarts: u64,
}

impl EventLoop {
    pub fn new(config: &PlaybackConfig) -> Self {
        EventLoop {
            poll_interval: config.poll_interval,
            restart_position: config.restart_position,
            state: LoopState::Running,
            restarts: 0,
        }
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    /// Number of restarts submitted so far.
    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    /// Polls once. A terminated loop never polls again.
    pub fn step<C: PlaybackControl>(&mut self, control: &mut C) -> &LoopState {
        if let LoopState::Terminated(_) = self.state {
            return &self.state;
        }

        if let Some(event) = control.next_event(self.poll_interval) {
            self.state = self.handle(event, control);
        }

        &self.state
    }

    pub fn run<C: PlaybackControl>(mut self, control: &mut C) -> Termination {
        loop {
            if let LoopState::Terminated(termination) = self.step(control) {
                return termination.clone();
            }
        }
    }

    fn handle<C: PlaybackControl>(&mut self, event: BusEvent, control: &mut C) -> LoopState {
        match event {
            BusEvent::Error {
                source,
                message,
                debug,
            } => {
                log::error!("error received from element {}: {}", source, message);
                if let Some(debug) = debug {
                    log::debug!("debugging information: {}", debug);
                }

                LoopState::Terminated(Termination::StreamError { source, message })
            }
            BusEvent::EndOfStream => {
                log::info!("received EOS, restarting");

                match control.restart(self.restart_position) {
                    Ok(()) => {
                        self.restarts += 1;
                        LoopState::Running
                    }
                    Err(err) => {
                        log::error!("failed to seek pipeline: {}", err);
                        LoopState::Terminated(Termination::SeekFailed(err.to_string()))
                    }
                }
            }
            BusEvent::StateChanged {
                from_pipeline,
                old,
                current,
            } => {
                if from_pipeline {
                    log::info!(
                        "pipeline state changed from {} to {}",
                        state_name(old),
                        state_name(current)
                    );
                }

                LoopState::Running
            }
            BusEvent::Other(kind) => {
                log::warn!("unexpected message received: {}", kind);
                LoopState::Running
            }
        }
    }
}

// Same names GStreamer itself prints for element states
pub fn state_name(state: State) -> &'static str {
    match state {
        State::VoidPending => "VOID_PENDING",
        State::Null => "NULL",
        State::Ready => "READY",
        State::Paused => "PAUSED",
        State::Playing => "PLAYING",
        _ => "UNKNOWN",
    }
}
