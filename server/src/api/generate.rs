//! テスト生成エンドポイント (POST /generate-tests)

use crate::api::error::AppError;
use crate::{archive, pipeline, AppState};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use junitgen_common::error::{GeneratorError, GeneratorResult};
use junitgen_common::protocol::{GenerateTestsResponse, SourceFileSubmission};
use std::collections::HashMap;
use tracing::info;

/// POST /generate-tests - アップロードされた各ファイルのJUnitテストを生成
pub async fn generate_tests(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<GenerateTestsResponse>, AppError> {
    let submissions = parse_request_body(&headers, &body)?;

    info!("Generating tests for {} file(s)", submissions.len());

    let outcome = pipeline::process_batch(
        state.extractor.clone(),
        state.synthesizer.clone(),
        submissions,
    )
    .await;

    let zip_bytes = archive::build_zip(&outcome.test_files)?;

    Ok(Json(GenerateTestsResponse {
        zip: archive::encode_base64(&zip_bytes),
        methods: outcome.methods,
    }))
}

/// リクエストボディを提出ファイルのリストにパースする
///
/// JSONボディ（`{"files": [...]}`）と、`files` フィールドにリストの
/// JSON文字列を入れたフォームボディの両方を受け付ける。フォーム経路も
/// 構造化データとしてのみパースし、コードとして評価することはない。
fn parse_request_body(
    headers: &HeaderMap,
    body: &[u8],
) -> GeneratorResult<Vec<SourceFileSubmission>> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    let files = if content_type.starts_with("application/json") {
        let data: serde_json::Value = serde_json::from_slice(body)
            .map_err(|_| GeneratorError::InvalidRequest("No files provided".to_string()))?;
        data.get("files").cloned().ok_or_else(|| {
            GeneratorError::InvalidRequest("No files provided".to_string())
        })?
    } else {
        let form: HashMap<String, String> = serde_urlencoded::from_bytes(body)
            .map_err(|_| GeneratorError::InvalidRequest("No files provided".to_string()))?;
        let raw = form
            .get("files")
            .ok_or_else(|| GeneratorError::InvalidRequest("No files provided".to_string()))?;
        serde_json::from_str(raw)
            .map_err(|_| GeneratorError::InvalidRequest("files must be a list".to_string()))?
    };

    let entries = files
        .as_array()
        .ok_or_else(|| GeneratorError::InvalidRequest("files must be a list".to_string()))?;

    // 形の合わないエントリはエラーにせず空の提出として扱う（後段でスキップ）
    let submissions = entries
        .iter()
        .map(|entry| {
            serde_json::from_value(entry.clone()).unwrap_or(SourceFileSubmission {
                name: None,
                content: None,
            })
        })
        .collect();

    Ok(submissions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        headers
    }

    fn form_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded".parse().unwrap(),
        );
        headers
    }

    #[test]
    fn test_parse_json_body() {
        let body = br#"{"files":[{"name":"Calc.java","content":"class Calc {}"}]}"#;
        let submissions = parse_request_body(&json_headers(), body).unwrap();

        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].name.as_deref(), Some("Calc.java"));
    }

    #[test]
    fn test_parse_json_body_missing_files() {
        let result = parse_request_body(&json_headers(), b"{}");

        match result {
            Err(GeneratorError::InvalidRequest(msg)) => assert_eq!(msg, "No files provided"),
            other => panic!("unexpected: {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn test_parse_json_body_files_not_a_list() {
        let result = parse_request_body(&json_headers(), br#"{"files":"not-a-list"}"#);

        match result {
            Err(GeneratorError::InvalidRequest(msg)) => assert_eq!(msg, "files must be a list"),
            other => panic!("unexpected: {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn test_parse_form_body_with_json_encoded_list() {
        let body = serde_urlencoded::to_string([(
            "files",
            r#"[{"name":"Calc.java","content":"class Calc {}"}]"#,
        )])
        .unwrap();

        let submissions = parse_request_body(&form_headers(), body.as_bytes()).unwrap();

        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].name.as_deref(), Some("Calc.java"));
    }

    #[test]
    fn test_parse_form_body_rejects_executable_syntax() {
        // 旧実装はこのフィールドをevalしていた。構造化パースのみ許す
        let body = serde_urlencoded::to_string([("files", "__import__('os').system('rm -rf /')")])
            .unwrap();

        let result = parse_request_body(&form_headers(), body.as_bytes());

        match result {
            Err(GeneratorError::InvalidRequest(msg)) => assert_eq!(msg, "files must be a list"),
            other => panic!("unexpected: {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn test_parse_form_body_missing_files_field() {
        let result = parse_request_body(&form_headers(), b"other=1");

        match result {
            Err(GeneratorError::InvalidRequest(msg)) => assert_eq!(msg, "No files provided"),
            other => panic!("unexpected: {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn test_parse_malformed_entry_becomes_empty_submission() {
        let body = br#"{"files":[42]}"#;
        let submissions = parse_request_body(&json_headers(), body).unwrap();

        assert_eq!(submissions.len(), 1);
        assert!(submissions[0].name.is_none());
        assert!(submissions[0].content.is_none());
    }
}
