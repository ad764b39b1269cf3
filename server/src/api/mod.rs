//! REST APIハンドラー
//!
//! テスト生成エンドポイントとCORS設定

/// 共通エラーレスポンス型
pub mod error;
/// テスト生成エンドポイント
pub mod generate;

use crate::AppState;
use axum::{routing::post, Router};
use tower_http::cors::{Any, CorsLayer};

/// APIルーターを作成
///
/// ブラウザUIが別オリジンから呼べるよう、全ルートで全オリジンを許可する。
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/generate-tests", post(generate::generate_tests))
        .layer(cors)
        .with_state(state)
}
