//! メソッド抽出アダプタ
//!
//! JavaParserベースの外部ツール（ExtractMethod）をサブプロセスとして
//! 呼び出し、ソースファイル中の全メソッド本文をテキストで取得する。

use async_trait::async_trait;
use junitgen_common::config::ExtractorConfig;
use junitgen_common::error::{GeneratorError, GeneratorResult};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::OnceCell;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// クラスパス区切り文字
#[cfg(windows)]
const CLASSPATH_SEP: &str = ";";
#[cfg(not(windows))]
const CLASSPATH_SEP: &str = ":";

/// メソッド抽出のインターフェース
///
/// Errは抽出失敗（パーサエラー、出力なし等）を表し、
/// パイプラインは該当ファイルをスキップする。
#[async_trait]
pub trait MethodExtractor: Send + Sync {
    /// ソーステキストからメソッド本文を抽出する
    async fn extract(&self, source: &str) -> GeneratorResult<String>;
}

/// 外部Javaパーサツールを使う抽出アダプタ
pub struct JavaParserExtractor {
    config: ExtractorConfig,
    /// ツールのコンパイル結果（プロセス単位で1回だけ実行）
    compiled: OnceCell<bool>,
}

impl JavaParserExtractor {
    /// 新しい抽出アダプタを作成
    ///
    /// ツールディレクトリに `ExtractMethod.java` も `ExtractMethod.class` も
    /// 無い場合はエラー（起動時に検出してフェイルファストさせる）。
    pub fn new(config: ExtractorConfig) -> GeneratorResult<Self> {
        let tool_dir = Path::new(&config.tool_dir);
        if !tool_dir.join("ExtractMethod.java").exists()
            && !tool_dir.join("ExtractMethod.class").exists()
        {
            return Err(GeneratorError::Internal(format!(
                "parser tool not found in {}",
                config.tool_dir
            )));
        }

        Ok(Self {
            config,
            compiled: OnceCell::new(),
        })
    }

    /// ツールをコンパイル済みにする（シングルフライト）
    ///
    /// 同時に複数の初回呼び出しが来てもjavacは1回しか走らない。
    /// 結果はプロセス生存中キャッシュされる。
    async fn ensure_compiled(&self) -> bool {
        *self
            .compiled
            .get_or_init(|| async { self.compile_tool().await })
            .await
    }

    async fn compile_tool(&self) -> bool {
        let tool_dir = Path::new(&self.config.tool_dir);
        if tool_dir.join("ExtractMethod.class").exists() {
            debug!("Parser tool already compiled");
            return true;
        }

        let output = Command::new(&self.config.javac_bin)
            .arg("-cp")
            .arg(&self.config.parser_jar)
            .arg("ExtractMethod.java")
            .current_dir(tool_dir)
            .kill_on_drop(true)
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => true,
            Ok(output) => {
                error!(
                    "Failed to compile parser tool: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                false
            }
            Err(e) => {
                error!("Failed to run {}: {}", self.config.javac_bin, e);
                false
            }
        }
    }

    /// スクラッチファイルのパスを生成（呼び出しごとに一意）
    fn scratch_path(&self) -> PathBuf {
        PathBuf::from(&self.config.scratch_dir).join(format!("extract-{}.java", Uuid::new_v4()))
    }

    /// パーサツールを実行し、stdoutを抽出テキストとして返す
    async fn run_parser(&self, source_path: &Path) -> GeneratorResult<String> {
        let jar_path = Path::new(&self.config.tool_dir).join(&self.config.parser_jar);
        let classpath = format!(
            "{}{}{}",
            self.config.tool_dir,
            CLASSPATH_SEP,
            jar_path.display()
        );

        // タイムアウトでfutureがドロップされた時に子プロセスを残さない
        let command = Command::new(&self.config.java_bin)
            .arg("-cp")
            .arg(&classpath)
            .arg("ExtractMethod")
            .arg(source_path)
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(Duration::from_secs(self.config.timeout_secs), command)
            .await
            .map_err(|_| {
                GeneratorError::Timeout(format!(
                    "method extraction exceeded {}s",
                    self.config.timeout_secs
                ))
            })?
            .map_err(GeneratorError::Io)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("Parser tool failed: {}", stderr.trim());
            return Err(GeneratorError::Extraction(format!(
                "parser exited with {}",
                output.status
            )));
        }

        let extracted = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if extracted.is_empty() {
            return Err(GeneratorError::Extraction("no methods found".to_string()));
        }

        Ok(extracted)
    }
}

#[async_trait]
impl MethodExtractor for JavaParserExtractor {
    async fn extract(&self, source: &str) -> GeneratorResult<String> {
        if !self.ensure_compiled().await {
            return Err(GeneratorError::Extraction(
                "parser tool is not available".to_string(),
            ));
        }

        let scratch = self.scratch_path();
        tokio::fs::write(&scratch, source).await?;

        let result = self.run_parser(&scratch).await;

        // 成功・失敗どちらの経路でもスクラッチファイルは必ず消す
        if let Err(e) = tokio::fs::remove_file(&scratch).await {
            warn!("Failed to remove scratch file {}: {}", scratch.display(), e);
        }

        result
    }
}
