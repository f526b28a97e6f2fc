#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use trip_planner::{HttpConfig, TripStore, http_api, logging};

    dotenvy::dotenv().ok();
    logging::init_tracing(logging::DEFAULT_FILTER);

    let config = HttpConfig::from_env()?;
    tracing::info!(
        addr = %config.addr,
        link_parse_delay_ms = config.link_parse_delay.as_millis() as u64,
        "starting trip planner HTTP API"
    );
    http_api::serve(config, TripStore::new()).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
