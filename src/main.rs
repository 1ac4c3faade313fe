use env_logger::Env;
use media_playback::config::PlaybackConfig;

fn main() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init();

    match media_playback::play(&PlaybackConfig::default()) {
        Ok(termination) => log::info!("playback stopped: {:?}", termination),
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(-1);
        }
    }
}
