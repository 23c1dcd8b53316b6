use log::{error, info, LevelFilter};
use rocket::Error as RocketError;
use thiserror::Error;
use upcoming_elections::config::Config;

/// Errors that stop the server from starting or keep it from running.
#[derive(Debug, Error)]
enum Error {
    #[error("Server failed: {0}")]
    Rocket(#[from] RocketError),
}

async fn run() -> Result<(), Error> {
    info!("Configuring server...");
    let rocket = upcoming_elections::build().ignite().await?;
    if let Some(config) = rocket.state::<Config>() {
        info!("...server configured with {config:?}");
    }
    // Disable rocket logging from now on.
    log4rs_dynamic_filters::DynamicLevelFilter::set("rocket", LevelFilter::Off);
    let _ = rocket.launch().await?;
    Ok(())
}

#[rocket::main]
async fn main() {
    // Set up logging.
    log4rs::init_file("log4rs.yaml", log4rs_dynamic_filters::default_deserializers())
        .expect("Failed to initialise logging");
    info!("Initialised logging");

    // Launch server.
    if let Err(err) = run().await {
        error!("{err}");
        error!("Critical failure, shutting down");
        std::process::exit(1)
    }
}
