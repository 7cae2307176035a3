use std::sync::Arc;

use clap::Parser;
use cloud_upload::{
    config::Config, tracing_config, HttpApi, Transfer, UploadFile, UploadOrchestrator,
};
use tracing::{event, Level};

#[tokio::main]
async fn main() -> Result<(), eyre::Report> {
    color_eyre::install()?;
    dotenv::dotenv().ok();
    let config = Config::parse();

    tracing_config::configure("cloud-upload", std::io::stderr)?;

    let cos_api = HttpApi::new(config.cos_api_url.as_str(), config.api_token.clone())?;
    let files_api = HttpApi::new(config.files_api_url.as_str(), config.api_token.clone())?;

    let mut orchestrator =
        UploadOrchestrator::new(Arc::new(cos_api), Arc::new(files_api), config.provider_config())
            .on_progress(|percent| event!(Level::INFO, percent, "Upload progress"));
    orchestrator.initialize().await?;

    let file = UploadFile::from_path(&config.file, config.content_type.as_deref()).await?;
    let uploaded = orchestrator.upload(&file, &config.dir).await?;

    if uploaded.transfer == Transfer::NotImplemented {
        event!(
            Level::WARN,
            "The file record was created, but Server uploads do not transfer any bytes yet"
        );
    }

    println!("{}", uploaded.id);

    Ok(())
}
