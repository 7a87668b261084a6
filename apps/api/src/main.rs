mod candidates;
mod config;
mod db;
mod errors;
mod extraction;
mod files;
mod gateway;
mod jobs;
mod llm_client;
mod matching;
mod models;
mod reports;
mod routes;
mod state;
mod store;
#[cfg(test)]
mod testing;
mod uploads;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::files::S3FileStore;
use crate::gateway::AiGateway;
use crate::llm_client::LlmClient;
use crate::matching::{LeastRepresentedCountries, MatchingService};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV matcher API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgStore::new(db));

    let s3 = build_s3_client(&config).await;
    let files = Arc::new(S3FileStore::new(s3, config.s3_bucket.clone()));
    info!("CV storage: bucket {} at {}", config.s3_bucket, config.s3_endpoint);

    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let countries = match &config.least_represented_countries {
        Some(list) => LeastRepresentedCountries::new(list.iter().cloned()),
        None => LeastRepresentedCountries::default(),
    };
    info!("{} least-represented countries configured", countries.len());

    let matching = MatchingService::new(store.clone(), AiGateway::new(Arc::new(llm)), countries);

    let state = AppState {
        store,
        matching: Arc::new(matching),
        files,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// S3 client for MinIO locally or AWS in production.
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "matcher-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // MinIO serves buckets by path, not by virtual host.
    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();
    aws_sdk_s3::Client::from_conf(s3_config)
}
