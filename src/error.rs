use glib::{BoolError, Error as GlibError};
use gstreamer::StateChangeError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MediaPlaybackError>;

#[derive(Error, Debug)]
pub enum MediaPlaybackError {
    #[error("Could not create element: {0}")]
    CreateElementError(String),

    #[error("Failed to create a pipeline")]
    CreatePipelineError,

    #[error("Pipeline has no bus")]
    MissingBus,

    #[error("Element {element} has no {pad} pad")]
    MissingPad {
        element: String,
        pad: &'static str,
    },

    #[error("Could not link {src} to {dest}: {reason}")]
    LinkError {
        src: String,
        dest: String,
        reason: String,
    },

    #[error("Error in glib: {0}")]
    GlibError(String),

    #[error("Failed to initialize GStreamer: {0}")]
    InitError(String),

    #[error("Failed to change pipeline state: {0}")]
    StateChangeError(String),

    #[error("Failed to seek pipeline: {0}")]
    SeekError(String),
}

impl From<GlibError> for MediaPlaybackError {
    fn from(error: GlibError) -> Self {
        MediaPlaybackError::GlibError(error.to_string())
    }
}

impl From<BoolError> for MediaPlaybackError {
    fn from(error: BoolError) -> Self {
        MediaPlaybackError::GlibError(error.to_string())
    }
}

impl From<StateChangeError> for MediaPlaybackError {
    fn from(error: StateChangeError) -> Self {
        MediaPlaybackError::StateChangeError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_formats_construction_errors() {
        let error = MediaPlaybackError::CreateElementError("decodebin".into());
        assert_eq!(error.to_string(), "Could not create element: decodebin");

        let error = MediaPlaybackError::LinkError {
            src: "file_src".into(),
            dest: "decode_bin".into(),
            reason: "incompatible".into(),
        };
        assert_eq!(
            error.to_string(),
            "Could not link file_src to decode_bin: incompatible"
        );
    }
}
