//! 設定管理
//!
//! ServerConfig, ExtractorConfig, SynthesisConfig等の設定構造体。
//! すべて環境変数から構築でき、プロセス全体の暗黙デフォルトには依存しない。

use serde::{Deserialize, Serialize};

/// 環境変数を取得（未設定ならNone）
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// 環境変数を取得し、未設定ならデフォルト値を返す
fn env_var_or(name: &str, default: &str) -> String {
    env_var(name).unwrap_or_else(|| default.to_string())
}

/// 環境変数をパースし、未設定・パース失敗ならデフォルト値を返す
fn env_var_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env_var(name).and_then(|s| s.parse().ok()).unwrap_or(default)
}

/// HTTPサーバー設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// ホストアドレス (デフォルト: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// ポート番号 (デフォルト: 8000)
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 環境変数から設定を読み込む（`PORT`、未設定なら8000）
    pub fn from_env() -> Self {
        Self {
            host: default_host(),
            port: env_var_parse("PORT", default_port()),
        }
    }

    /// バインドアドレス文字列を返す
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// メソッド抽出ツール設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// javaコマンドのパス (デフォルト: "java")
    #[serde(default = "default_java_bin")]
    pub java_bin: String,

    /// javacコマンドのパス (デフォルト: "javac")
    #[serde(default = "default_javac_bin")]
    pub javac_bin: String,

    /// ExtractMethod.javaとjavaparser jarのあるディレクトリ (デフォルト: "tools")
    #[serde(default = "default_tool_dir")]
    pub tool_dir: String,

    /// javaparser jarのファイル名 (デフォルト: "javaparser-core-3.25.4.jar")
    #[serde(default = "default_parser_jar")]
    pub parser_jar: String,

    /// スクラッチファイルを書き込むディレクトリ (デフォルト: システムtemp)
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: String,

    /// 抽出サブプロセスのタイムアウト（秒）(デフォルト: 30)
    #[serde(default = "default_extract_timeout")]
    pub timeout_secs: u64,
}

fn default_java_bin() -> String {
    "java".to_string()
}

fn default_javac_bin() -> String {
    "javac".to_string()
}

fn default_tool_dir() -> String {
    "tools".to_string()
}

fn default_parser_jar() -> String {
    "javaparser-core-3.25.4.jar".to_string()
}

fn default_scratch_dir() -> String {
    std::env::temp_dir().to_string_lossy().into_owned()
}

fn default_extract_timeout() -> u64 {
    30
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            java_bin: default_java_bin(),
            javac_bin: default_javac_bin(),
            tool_dir: default_tool_dir(),
            parser_jar: default_parser_jar(),
            scratch_dir: default_scratch_dir(),
            timeout_secs: default_extract_timeout(),
        }
    }
}

impl ExtractorConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Self {
        Self {
            java_bin: env_var_or("JUNITGEN_JAVA_BIN", &default_java_bin()),
            javac_bin: env_var_or("JUNITGEN_JAVAC_BIN", &default_javac_bin()),
            tool_dir: env_var_or("JUNITGEN_TOOL_DIR", &default_tool_dir()),
            parser_jar: env_var_or("JUNITGEN_PARSER_JAR", &default_parser_jar()),
            scratch_dir: env_var_or("JUNITGEN_SCRATCH_DIR", &default_scratch_dir()),
            timeout_secs: env_var_parse("JUNITGEN_EXTRACT_TIMEOUT_SECS", default_extract_timeout()),
        }
    }
}

/// テスト合成バックエンドの種別
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisBackendKind {
    /// OpenAI互換チャットAPI
    OpenAi,
    /// 何も生成しないスタブ（バックエンド未設定時）
    Noop,
}

/// テスト合成設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// 使用するバックエンド
    pub backend: SynthesisBackendKind,

    /// OpenAI互換APIのベースURL (デフォルト: "https://api.openai.com")
    #[serde(default = "default_synth_base_url")]
    pub base_url: String,

    /// APIキー
    #[serde(default)]
    pub api_key: Option<String>,

    /// モデル名 (デフォルト: "gpt-4o")
    #[serde(default = "default_synth_model")]
    pub model: String,

    /// 生成トークン数の上限 (デフォルト: 800)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// バックエンド呼び出しのタイムアウト（秒）(デフォルト: 60)
    #[serde(default = "default_synth_timeout")]
    pub timeout_secs: u64,

    /// トレーシング設定
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_synth_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_synth_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_tokens() -> u32 {
    800
}

fn default_synth_timeout() -> u64 {
    60
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            backend: SynthesisBackendKind::Noop,
            base_url: default_synth_base_url(),
            api_key: None,
            model: default_synth_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_synth_timeout(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl SynthesisConfig {
    /// 環境変数から設定を読み込む
    ///
    /// `OPENAI_API_KEY` が設定されていればOpenAIバックエンド、
    /// なければNoopバックエンドを選択する。
    pub fn from_env() -> Self {
        let api_key = env_var("OPENAI_API_KEY");
        let backend = if api_key.is_some() {
            SynthesisBackendKind::OpenAi
        } else {
            SynthesisBackendKind::Noop
        };

        Self {
            backend,
            base_url: env_var_or("OPENAI_BASE_URL", &default_synth_base_url()),
            api_key,
            model: env_var_or("JUNITGEN_MODEL", &default_synth_model()),
            max_tokens: env_var_parse("JUNITGEN_MAX_TOKENS", default_max_tokens()),
            timeout_secs: env_var_parse("JUNITGEN_SYNTH_TIMEOUT_SECS", default_synth_timeout()),
            telemetry: TelemetryConfig::from_env(),
        }
    }
}

/// トレーシング設定
///
/// 合成アダプタの呼び出しトレースに使う。プロセス全体の環境変数
/// デフォルトではなく、構築時に明示的に渡す。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// トレーシングの有効/無効 (デフォルト: false)
    #[serde(default)]
    pub tracing_enabled: bool,

    /// トレース送信先エンドポイント
    #[serde(default)]
    pub endpoint: Option<String>,

    /// トレースAPIキー
    #[serde(default)]
    pub api_key: Option<String>,

    /// プロジェクト名
    #[serde(default)]
    pub project_name: Option<String>,
}

impl TelemetryConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Self {
        let tracing_enabled = env_var("JUNITGEN_TRACING_ENABLED")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        Self {
            tracing_enabled,
            endpoint: env_var("JUNITGEN_TRACE_ENDPOINT"),
            api_key: env_var("JUNITGEN_TRACE_API_KEY"),
            project_name: env_var("JUNITGEN_TRACE_PROJECT"),
        }
    }
}
