//! リクエスト/レスポンスのプロトコル型
//!
//! `/generate-tests` エンドポイントのワイヤフォーマット

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// アップロードされたJavaソースファイル1件
///
/// 両フィールドともワイヤ上では省略可能。名前が空/欠落、または
/// contentが欠落しているエントリはパイプライン側でスキップされる
/// （contentが空文字列なのは有効な入力）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFileSubmission {
    /// 元のファイル名（例: "Calc.java"）
    #[serde(default)]
    pub name: Option<String>,
    /// ソースコード本文
    #[serde(default)]
    pub content: Option<String>,
}

/// POST /generate-tests 成功レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateTestsResponse {
    /// 生成テスト一式のzipアーカイブ（base64エンコード）
    pub zip: String,
    /// 元ファイル名 → 抽出されたメソッド名リスト
    pub methods: HashMap<String, Vec<String>>,
}

/// テスト出力ファイル名を導出する
///
/// 末尾の拡張子を取り除き、`Test` を付けて `.java` を付け直す。
/// 拡張子区切りが無い名前はそのまま `Test.java` が付く。
pub fn derive_test_file_name(name: &str) -> String {
    let base = match name.rsplit_once('.') {
        Some((base, _ext)) => base,
        None => name,
    };
    format!("{}Test.java", base)
}
