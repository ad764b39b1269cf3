//! JUnit Test Generator Server Entry Point

use junitgen_common::config::{ExtractorConfig, ServerConfig, SynthesisConfig};
use junitgen_server::{api, extract, logging, synth, AppState};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() {
    logging::init();

    info!("JUnit Test Generator v{}", env!("CARGO_PKG_VERSION"));

    let server_config = ServerConfig::from_env();
    let extractor_config = ExtractorConfig::from_env();
    let synthesis_config = SynthesisConfig::from_env();

    // パーサツールが見つからない場合はここで起動を中断する
    let extractor = extract::JavaParserExtractor::new(extractor_config)
        .expect("Failed to initialize method extractor");

    let synthesizer =
        synth::create_backend(&synthesis_config).expect("Failed to initialize synthesis backend");

    let state = AppState {
        extractor: Arc::new(extractor),
        synthesizer,
    };

    let app = api::create_router(state);

    let bind_addr = server_config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind to address");

    info!("Test generator server listening on {}", bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
