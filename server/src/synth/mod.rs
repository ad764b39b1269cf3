//! テスト合成アダプタ
//!
//! 抽出されたメソッドソースからプロンプトを組み立て、OpenAI互換の
//! チャットAPIにJUnitテストの生成を依頼する。バックエンドは起動時に
//! 設定で選択する（ライブラリ有無の実行時プロービングはしない）。

use async_trait::async_trait;
use junitgen_common::config::{SynthesisBackendKind, SynthesisConfig};
use junitgen_common::error::{GeneratorError, GeneratorResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// テスト合成バックエンドのインターフェース
///
/// 空文字列の返却は「テストが生成されなかった」ことを表し、
/// ハードエラーとは区別される。
#[async_trait]
pub trait TestSynthesisBackend: Send + Sync {
    /// メソッドソースからJUnitテストコードを生成する
    async fn synthesize(&self, method_source: &str) -> GeneratorResult<String>;
}

/// モデルに送る指示文を組み立てる
pub fn craft_prompt(method_source: &str) -> String {
    format!(
        "You are a senior Java developer. \
         Write a JUnit 5 test for the following Java method. \
         Include parameterized tests and Mockito when helpful.\n\n{}",
        method_source
    )
}

/// 設定に応じたバックエンドを構築する
pub fn create_backend(config: &SynthesisConfig) -> GeneratorResult<Arc<dyn TestSynthesisBackend>> {
    match config.backend {
        SynthesisBackendKind::OpenAi => {
            info!("Using OpenAI-compatible synthesis backend: {}", config.model);
            Ok(Arc::new(OpenAiBackend::new(config.clone())?))
        }
        SynthesisBackendKind::Noop => {
            info!("No synthesis backend configured, tests will be empty");
            Ok(Arc::new(NoopBackend))
        }
    }
}

/// OpenAI互換チャットAPIのリクエスト
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

/// チャットメッセージ
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    /// ロール ("user", "assistant", "system")
    role: String,
    /// メッセージ内容
    content: String,
}

/// チャットAPIのレスポンス
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// OpenAI互換バックエンド
pub struct OpenAiBackend {
    config: SynthesisConfig,
    http_client: reqwest::Client,
}

impl OpenAiBackend {
    /// 新しいOpenAiBackendを作成
    pub fn new(config: SynthesisConfig) -> GeneratorResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                GeneratorError::Internal(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl TestSynthesisBackend for OpenAiBackend {
    async fn synthesize(&self, method_source: &str) -> GeneratorResult<String> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: craft_prompt(method_source),
            }],
            max_tokens: self.config.max_tokens,
        };

        if self.config.telemetry.tracing_enabled {
            info!(
                project = self.config.telemetry.project_name.as_deref().unwrap_or(""),
                model = %self.config.model,
                "Requesting completion from LLM"
            );
        } else {
            debug!(model = %self.config.model, "Requesting completion from LLM");
        }

        let mut builder = self.http_client.post(&url).json(&request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                GeneratorError::Timeout(format!("synthesis backend timed out: {}", e))
            } else {
                GeneratorError::Http(format!("Failed to reach synthesis backend: {}", e))
            }
        })?;

        if !response.status().is_success() {
            return Err(GeneratorError::Synthesis(format!(
                "backend returned HTTP {}",
                response.status()
            )));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            GeneratorError::Synthesis(format!("Failed to parse backend response: {}", e))
        })?;

        let code = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(code.trim().to_string())
    }
}

/// 何も生成しないスタブバックエンド
///
/// バックエンド未設定時に選択され、常に空文字列を返す。
pub struct NoopBackend;

#[async_trait]
impl TestSynthesisBackend for NoopBackend {
    async fn synthesize(&self, _method_source: &str) -> GeneratorResult<String> {
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use junitgen_common::config::TelemetryConfig;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> SynthesisConfig {
        SynthesisConfig {
            backend: SynthesisBackendKind::OpenAi,
            base_url,
            api_key: Some("sk-test".to_string()),
            model: "gpt-4o".to_string(),
            max_tokens: 800,
            timeout_secs: 5,
            telemetry: TelemetryConfig::default(),
        }
    }

    #[test]
    fn test_craft_prompt_appends_method_source_verbatim() {
        let prompt = craft_prompt("int add(int a, int b) { return a + b; }");

        assert!(prompt.starts_with("You are a senior Java developer."));
        assert!(prompt.contains("JUnit 5"));
        assert!(prompt.ends_with("int add(int a, int b) { return a + b; }"));
    }

    #[tokio::test]
    async fn test_noop_backend_returns_empty_string() {
        let backend = NoopBackend;
        let code = backend.synthesize("int add() { return 1; }").await.unwrap();
        assert_eq!(code, "");
    }

    #[tokio::test]
    async fn test_openai_backend_returns_trimmed_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({"model": "gpt-4o"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "  // test code\n"}}]
            })))
            .mount(&server)
            .await;

        let backend = OpenAiBackend::new(test_config(server.uri())).unwrap();
        let code = backend.synthesize("int add() { return 1; }").await.unwrap();

        assert_eq!(code, "// test code");
    }

    #[tokio::test]
    async fn test_openai_backend_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let backend = OpenAiBackend::new(test_config(server.uri())).unwrap();
        let result = backend.synthesize("int add() { return 1; }").await;

        assert!(matches!(result, Err(GeneratorError::Synthesis(_))));
    }

    #[tokio::test]
    async fn test_openai_backend_handles_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let backend = OpenAiBackend::new(test_config(server.uri())).unwrap();
        let code = backend.synthesize("int add() { return 1; }").await.unwrap();

        assert_eq!(code, "");
    }

    #[test]
    fn test_create_backend_selects_noop_by_default() {
        let config = SynthesisConfig::default();
        let backend = create_backend(&config);
        assert!(backend.is_ok());
    }
}
