use crossbeam_channel::Sender;
use gstreamer::prelude::*;
use gstreamer::{Element, Pad};

/// What the pad-added callback did with a newly exposed decode pad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PadOutcome {
    Linked { pad: String },
    Ignored { pad: String, media_type: String },
    LinkFailed { pad: String, reason: String },
}

/// Only video streams are wired up, there is no audio branch in the graph.
pub fn is_video_media_type(media_type: &str) -> bool {
    media_type.starts_with("video")
}

// Context handed to the decode stage's pad-added signal. It holds only what the
// callback writes to: the convert stage (weakly) and the outcome channel.
pub(crate) struct PadLinker {
    convert: glib::WeakRef<Element>,
    outcomes: Sender<PadOutcome>,
}

impl PadLinker {
    pub(crate) fn new(convert: &Element, outcomes: Sender<PadOutcome>) -> Self {
        PadLinker {
            convert: convert.downgrade(),
            outcomes,
        }
    }

    // Runs on a streaming thread, once per pad the decoder exposes.
    pub(crate) fn attach(self, decode: &Element) {
        decode.connect_pad_added(move |src, new_pad| {
            let outcome = self.link(src, new_pad);

            // not an error, the session may no longer be listening
            if self.outcomes.send(outcome).is_err() {
                log::debug!("pad outcome receiver dropped");
            }
        });
    }

    fn link(&self, src: &Element, new_pad: &Pad) -> PadOutcome {
        let pad = new_pad.name().to_string();
        log::info!("received new pad {} from {}", pad, src.name());

        let media_type = media_type(new_pad).unwrap_or_default();
        if !is_video_media_type(&media_type) {
            log::info!("ignoring pad {} with non video type {}", pad, media_type);
            return PadOutcome::Ignored { pad, media_type };
        }

        let convert = match self.convert.upgrade() {
            Some(convert) => convert,
            None => {
                log::error!("convert stage is gone, cannot link pad {}", pad);
                return PadOutcome::LinkFailed {
                    pad,
                    reason: "convert stage dropped".into(),
                };
            }
        };

        let sink_pad = match convert.static_pad("sink") {
            Some(sink_pad) => sink_pad,
            None => {
                log::error!("{} has no sink pad", convert.name());
                return PadOutcome::LinkFailed {
                    pad,
                    reason: "missing sink pad".into(),
                };
            }
        };

        match new_pad.link(&sink_pad) {
            Ok(_) => {
                log::info!("linked pad {} ({}) to {}", pad, media_type, convert.name());
                PadOutcome::Linked { pad }
            }
            Err(err) => {
                log::warn!("failed to link pad {} to video convert sink pad: {:?}", pad, err);
                PadOutcome::LinkFailed {
                    pad,
                    reason: format!("{:?}", err),
                }
            }
        }
    }
}

// Name of the first caps structure, e.g. "video/x-raw" or "audio/x-raw".
fn media_type(pad: &Pad) -> Option<String> {
    let caps = pad.current_caps().unwrap_or_else(|| pad.query_caps(None));
    caps.structure(0).map(|s| s.name().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use gstreamer::{Caps, ElementFactory, PadDirection, PadPresence, PadTemplate};

    // A source pad whose only caps come from its template, the way a decoder
    // pad looks before negotiation.
    fn decoded_pad(name: &str, media_type: &str) -> Pad {
        let caps = Caps::new_simple(media_type, &[]);
        let template =
            PadTemplate::new("src_%u", PadDirection::Src, PadPresence::Sometimes, &caps).unwrap();

        Pad::from_template(&template, Some(name))
    }

    fn convert_and_linker() -> (Element, Element, PadLinker) {
        gstreamer::init().unwrap();

        let decode = gstreamer::Bin::new(Some("decode_bin")).upcast::<Element>();
        let convert = ElementFactory::make("videoconvert", Some("video_convert")).unwrap();
        let (sender, _receiver) = unbounded::<PadOutcome>();
        let linker = PadLinker::new(&convert, sender);

        (decode, convert, linker)
    }

    fn convert_sink_linked(convert: &Element) -> bool {
        convert.static_pad("sink").unwrap().is_linked()
    }

    #[test]
    fn it_leaves_convert_unlinked_for_audio_pads() {
        let (decode, convert, linker) = convert_and_linker();
        let audio = decoded_pad("src_0", "audio/x-raw");

        assert_eq!(
            linker.link(&decode, &audio),
            PadOutcome::Ignored {
                pad: "src_0".into(),
                media_type: "audio/x-raw".into(),
            }
        );
        assert!(!convert_sink_linked(&convert));
    }

    #[test]
    fn it_links_the_first_video_pad_only() {
        let (decode, convert, linker) = convert_and_linker();

        let audio = decoded_pad("src_0", "audio/x-raw");
        let video = decoded_pad("src_1", "video/x-raw");
        let second_video = decoded_pad("src_2", "video/x-raw");

        assert!(matches!(
            linker.link(&decode, &audio),
            PadOutcome::Ignored { .. }
        ));
        assert_eq!(
            linker.link(&decode, &video),
            PadOutcome::Linked {
                pad: "src_1".into()
            }
        );
        assert!(convert_sink_linked(&convert));
        assert!(video.is_linked());

        assert!(matches!(
            linker.link(&decode, &second_video),
            PadOutcome::LinkFailed { .. }
        ));
        assert!(!second_video.is_linked());
    }

    #[test]
    fn it_reports_a_failed_link_once_convert_is_dropped() {
        let (decode, convert, linker) = convert_and_linker();
        drop(convert);

        let video = decoded_pad("src_0", "video/x-raw");

        assert!(matches!(
            linker.link(&decode, &video),
            PadOutcome::LinkFailed { .. }
        ));
    }

    #[test]
    fn it_accepts_video_media_types() {
        assert!(is_video_media_type("video/x-raw"));
        assert!(is_video_media_type("video/x-h264"));
    }

    #[test]
    fn it_ignores_other_media_types() {
        assert!(!is_video_media_type("audio/x-raw"));
        assert!(!is_video_media_type("application/x-rtp"));
        assert!(!is_video_media_type("text/x-raw"));
        assert!(!is_video_media_type(""));
    }
}
