use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{bind_addr_from_env_value, router, AppState};
use symptom_core::config::{output_mode_from_env_value, vocabulary_from_env_value};
use symptom_core::{CoreConfig, SymptomEngine};
use symptom_parser::{parser_config_from_env_values, RemoteParser};

/// Main entry point for the symptom service
///
/// Confirms the dependency parser is reachable, then serves the REST API.
/// Startup fails if the parser cannot be made available.
///
/// # Environment Variables
/// - `PORT`: REST listen port on all interfaces (default: 5001)
/// - `SYMPTOM_OUTPUT_MODE`: `summary` or `detailed` (default: `summary`)
/// - `SYMPTOM_VOCABULARY`: comma-separated symptom phrases replacing the built-in list
/// - `PARSER_URL`: parser sidecar base URL (default: "http://127.0.0.1:8080")
/// - `PARSER_MODEL`: language model requested from the sidecar (default: "en_core_web_sm")
/// - `PARSER_TIMEOUT_SECS`: per-request parser timeout (default: 10)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, parser startup or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("symptom=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = bind_addr_from_env_value(std::env::var("PORT").ok())?;
    let cfg = CoreConfig::new(
        vocabulary_from_env_value(std::env::var("SYMPTOM_VOCABULARY").ok())?,
        output_mode_from_env_value(std::env::var("SYMPTOM_OUTPUT_MODE").ok())?,
    );
    let parser_cfg = parser_config_from_env_values(
        std::env::var("PARSER_URL").ok(),
        std::env::var("PARSER_MODEL").ok(),
        std::env::var("PARSER_TIMEOUT_SECS").ok(),
    )?;

    let parser = RemoteParser::new(&parser_cfg)?;
    tracing::info!("++ Checking parser at {} ({})", parser.base_url(), parser.model());
    parser.ensure_available().await?;

    let engine = SymptomEngine::new(&cfg);
    tracing::info!(
        "++ Loaded {} symptom phrases, output mode {:?}",
        engine.vocabulary().len(),
        engine.output_mode()
    );

    let app = router(AppState::new(Arc::new(engine), Arc::new(parser)));

    tracing::info!("++ Starting symptom REST on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
