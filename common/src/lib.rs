//! JUnit Test Generator 共通ライブラリ
//!
//! エラー型、プロトコル型、設定構造体

#![warn(missing_docs)]

/// エラー型定義
pub mod error;

/// リクエスト/レスポンスのプロトコル型
pub mod protocol;

/// 設定管理（環境変数からの読み込み）
pub mod config;
