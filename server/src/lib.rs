//! JUnit Test Generator Server
//!
//! Javaソースファイルを受け取り、外部パーサでメソッドを抽出し、
//! LLMバックエンドでJUnitテストを合成してzipで返すHTTPサーバー

#![warn(missing_docs)]

/// REST APIハンドラー
pub mod api;

/// zipアーカイブ組み立て
pub mod archive;

/// メソッド抽出アダプタ（外部Javaパーサ呼び出し）
pub mod extract;

/// ロギング初期化ユーティリティ
pub mod logging;

/// バッチ処理パイプライン
pub mod pipeline;

/// テスト合成アダプタ（LLMバックエンド呼び出し）
pub mod synth;

use std::sync::Arc;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// メソッド抽出アダプタ
    pub extractor: Arc<dyn extract::MethodExtractor>,
    /// テスト合成バックエンド
    pub synthesizer: Arc<dyn synth::TestSynthesisBackend>,
}
