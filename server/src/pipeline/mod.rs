//! バッチ処理パイプライン
//!
//! アップロードされたファイルごとに抽出→メソッド名スキャン→合成を行い、
//! 結果をアーカイブ用マッピングとメソッド索引に集約する。ファイル単位の
//! 失敗はそのファイルのスキップに留め、バッチ全体は続行する。

use crate::extract::MethodExtractor;
use crate::synth::TestSynthesisBackend;
use futures::stream::{self, StreamExt};
use junitgen_common::protocol::{derive_test_file_name, SourceFileSubmission};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// ファイル処理の同時実行数上限
const MAX_CONCURRENT_FILES: usize = 4;

/// メソッド名スキャン用パターン
///
/// 開き括弧の直前にある識別子をすべて拾う。`if`/`for`/`while` 等の
/// 制御構文キーワードも一致する（元実装からの互換動作）。
static METHOD_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\w+)\s*\(").unwrap());

/// バッチ処理の結果
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// テストファイル名 → 生成コード（アーカイブに入る内容）
    pub test_files: HashMap<String, String>,
    /// 元ファイル名 → 抽出されたメソッド名リスト
    pub methods: HashMap<String, Vec<String>>,
}

/// 処理済みファイル1件分
struct ProcessedFile {
    original_name: String,
    test_name: String,
    code: String,
    method_names: Vec<String>,
}

/// 抽出テキストからメソッド名を出現順に列挙する
pub fn scan_method_names(extracted: &str) -> Vec<String> {
    METHOD_NAME_RE
        .captures_iter(extracted)
        .map(|capture| capture[1].to_string())
        .collect()
}

/// バッチ全体を処理する
///
/// ファイルごとの作業は上限付きの並行実行。出力名が衝突した場合は
/// 後から完了した方で上書きされる（許容されたエッジケース）。
pub async fn process_batch(
    extractor: Arc<dyn MethodExtractor>,
    synthesizer: Arc<dyn TestSynthesisBackend>,
    submissions: Vec<SourceFileSubmission>,
) -> BatchOutcome {
    let concurrency = submissions.len().clamp(1, MAX_CONCURRENT_FILES);

    let processed: Vec<Option<ProcessedFile>> = stream::iter(submissions)
        .map(|submission| {
            let extractor = extractor.clone();
            let synthesizer = synthesizer.clone();
            async move { process_file(extractor, synthesizer, submission).await }
        })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    let mut outcome = BatchOutcome::default();
    for file in processed.into_iter().flatten() {
        // 空の生成コードは「書く内容がない」ためアーカイブには入れない
        if !file.code.is_empty() {
            outcome.test_files.insert(file.test_name, file.code);
        }
        outcome.methods.insert(file.original_name, file.method_names);
    }
    outcome
}

/// 1ファイル分を処理する（失敗時はNone = スキップ）
async fn process_file(
    extractor: Arc<dyn MethodExtractor>,
    synthesizer: Arc<dyn TestSynthesisBackend>,
    submission: SourceFileSubmission,
) -> Option<ProcessedFile> {
    let name = submission.name.filter(|n| !n.is_empty())?;
    // contentは空文字列でも有効。欠落のみスキップ
    let content = submission.content?;

    let extracted = match extractor.extract(&content).await {
        Ok(extracted) => extracted,
        Err(e) => {
            debug!("Skipping {}: {}", name, e);
            return None;
        }
    };

    let method_names = scan_method_names(&extracted);

    let code = match synthesizer.synthesize(&extracted).await {
        Ok(code) => code,
        Err(e) => {
            // 合成失敗は「テストなし」として扱い、ファイル自体は処理済みにする
            warn!("Synthesis failed for {}: {}", name, e);
            String::new()
        }
    };

    Some(ProcessedFile {
        test_name: derive_test_file_name(&name),
        original_name: name,
        code,
        method_names,
    })
}
