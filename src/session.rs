use crate::config::PlaybackConfig;
use crate::error::{MediaPlaybackError, Result};
use crate::main_loop::{BusEvent, PlaybackControl};
use crate::pad::{PadLinker, PadOutcome};
use crossbeam_channel::{unbounded, Receiver};
use gstreamer::prelude::*;
use gstreamer::{
    Bus, ClockTime, Element, ElementFactory, Message, MessageType, Pipeline, SeekFlags, SeekType,
    State,
};
use std::time::Duration;

/// A built playback graph: `source ! decode ! convert ! sink`, where the
/// decode to convert edge is only made once the decoder exposes a video pad.
pub struct Session {
    pipeline: Pipeline,
    source: Element,
    decode: Element,
    convert: Element,
    sink: Element,
    bus: Bus,
    pad_outcomes: Receiver<PadOutcome>,
}

// Create a named stage, a missing factory usually means a missing plugin
fn make_element(factory: &str, name: &str) -> Result<Element> {
    ElementFactory::make(factory, Some(name)).map_err(|err| {
        log::error!("cannot create {}: {}", factory, err);
        MediaPlaybackError::CreateElementError(factory.to_string())
    })
}

fn link(src: &Element, dest: &Element) -> Result<()> {
    src.link(dest).map_err(|err| MediaPlaybackError::LinkError {
        src: src.name().to_string(),
        dest: dest.name().to_string(),
        reason: err.to_string(),
    })
}

impl Session {
    pub fn build(config: &PlaybackConfig) -> Result<Session> {
        let stages = &config.stages;

        let source = make_element(&stages.source, "file_src")?;
        let location = config.media_path.to_string_lossy().into_owned();
        source.set_property("location", &location)?;

        let decode = make_element(&stages.decode, "decode_bin")?;
        let convert = make_element(&stages.convert, "video_convert")?;
        let sink = make_element(&stages.sink, "auto_video_sink")?;

        let pipeline = ElementFactory::make("pipeline", Some("pipeline"))
            .map_err(|_| MediaPlaybackError::CreatePipelineError)?
            .downcast::<Pipeline>()
            .map_err(|_| MediaPlaybackError::CreatePipelineError)?;

        pipeline.add_many(&[&source, &decode, &convert, &sink])?;
        link(&source, &decode)?;
        link(&convert, &sink)?;

        if convert.static_pad("sink").is_none() {
            return Err(MediaPlaybackError::MissingPad {
                element: convert.name().to_string(),
                pad: "sink",
            });
        }

        let (sender, pad_outcomes) = unbounded::<PadOutcome>();
        PadLinker::new(&convert, sender).attach(&decode);

        let bus = pipeline.bus().ok_or(MediaPlaybackError::MissingBus)?;

        log::debug!("built playback graph for {}", location);

        Ok(Session {
            pipeline,
            source,
            decode,
            convert,
            sink,
            bus,
            pad_outcomes,
        })
    }

    pub fn start(&self) -> Result<()> {
        self.pipeline.set_state(State::Playing).map_err(|err| {
            log::error!("failed to change pipeline to Playing state");
            MediaPlaybackError::from(err)
        })?;

        Ok(())
    }

    pub fn shutdown(&self) -> Result<()> {
        self.pipeline.set_state(State::Null)?;
        log::debug!("pipeline set to Null");

        Ok(())
    }

    /// Source, decode, convert and sink, in graph order.
    pub fn stages(&self) -> [&Element; 4] {
        [&self.source, &self.decode, &self.convert, &self.sink]
    }

    /// Reports from the pad-added callback, one per pad the decoder exposed.
    pub fn pad_outcomes(&self) -> &Receiver<PadOutcome> {
        &self.pad_outcomes
    }
}

impl PlaybackControl for Session {
    fn next_event(&mut self, timeout: Duration) -> Option<BusEvent> {
        let timeout = ClockTime::from_nseconds(timeout.as_nanos() as u64);
        let msg = self.bus.timed_pop_filtered(
            timeout,
            &[MessageType::StateChanged, MessageType::Error, MessageType::Eos],
        )?;

        Some(bus_event(&self.pipeline, &msg))
    }

    fn restart(&mut self, position: Duration) -> Result<()> {
        let start = ClockTime::from_nseconds(position.as_nanos() as u64);

        self.pipeline
            .seek(
                1.0,
                SeekFlags::FLUSH,
                SeekType::Set,
                Some(start),
                SeekType::None,
                ClockTime::NONE,
            )
            .map_err(|err| MediaPlaybackError::SeekError(err.to_string()))
    }
}

fn bus_event(pipeline: &Pipeline, msg: &Message) -> BusEvent {
    use gstreamer::MessageView;

    match msg.view() {
        MessageView::Error(err) => BusEvent::Error {
            source: msg
                .src()
                .map(|s| s.name().to_string())
                .unwrap_or_else(|| String::from("None")),
            message: err.error().to_string(),
            debug: err.debug(),
        },
        MessageView::Eos(..) => BusEvent::EndOfStream,
        MessageView::StateChanged(state) => BusEvent::StateChanged {
            from_pipeline: msg.src().as_ref() == Some(pipeline.upcast_ref::<gstreamer::Object>()),
            old: state.old(),
            current: state.current(),
        },
        _ => BusEvent::Other(format!("{:?}", msg.type_())),
    }
}
