use pronounce_rs::config::{Credentials, ServiceConfig};
use pronounce_rs::pipeline::Pipeline;
use pronounce_rs::server::{AppState, PronounceServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServiceConfig::from_env()?;
    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            log::error!("{e}");
            return Err(e.into());
        }
    };

    let pipeline = Pipeline::from_config(&config, &credentials)?;
    log::info!(
        "Using {} for text, {} for speech, {} voices",
        config.gemini.model,
        config.elevenlabs.model_id,
        pipeline.voices().len()
    );

    let state = AppState::new(pipeline, config.paths.static_dir.clone());
    let mut server = PronounceServer::start(state, &config.bind_addr()).await?;

    tokio::select! {
        _ = server.wait() => {}
        _ = tokio::signal::ctrl_c() => log::info!("Shutting down"),
    }
    server.shutdown();
    Ok(())
}
