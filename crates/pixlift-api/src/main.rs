use pixlift_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (backends, library, routes)
    let (_state, router) = pixlift_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    pixlift_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
