use std::path::PathBuf;
use std::time::Duration;

/// The media file played in a loop.
pub const MEDIA_PATH: &str = "media/video_10s.mp4";

/// Factory names used to instantiate each stage of the playback graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageFactories {
    pub source: String,
    pub decode: String,
    pub convert: String,
    pub sink: String,
}

impl Default for StageFactories {
    fn default() -> Self {
        StageFactories {
            source: "filesrc".into(),
            decode: "decodebin".into(),
            convert: "videoconvert".into(),
            sink: "autovideosink".into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PlaybackConfig {
    pub media_path: PathBuf,

    // upper bound on a single bus poll
    pub poll_interval: Duration,

    // where playback restarts after end-of-stream
    pub restart_position: Duration,

    pub stages: StageFactories,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            media_path: PathBuf::from(MEDIA_PATH),
            poll_interval: Duration::from_millis(100),
            restart_position: Duration::from_secs(1),
            stages: StageFactories::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_defaults_to_the_looping_player_settings() {
        let config = PlaybackConfig::default();

        assert_eq!(config.media_path, PathBuf::from(MEDIA_PATH));
        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert_eq!(config.restart_position.as_nanos(), 1_000_000_000);
        assert_eq!(config.stages.decode, "decodebin");
        assert_eq!(config.stages.sink, "autovideosink");
    }
}
