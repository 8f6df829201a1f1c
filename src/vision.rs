//! Fridge photo analysis
//!
//! Sends one photo to the vision model and turns its JSON reply into an
//! [`IngredientsResult`].

use crate::ai::{mime, CompletionService, ContentPart, UserContent};
use crate::models::{IngredientSummary, IngredientsResult};
use crate::{prompts, storage, Error, Result};
use base64::Engine as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const VISION_MAX_TOKENS: u32 = 2000;

pub struct VisionService {
    client: Arc<dyn CompletionService>,
}

impl VisionService {
    pub fn new(client: Arc<dyn CompletionService>) -> Self {
        Self { client }
    }

    /// Identify the ingredients visible in the image at `path`.
    ///
    /// A missing file fails with [`Error::NotFound`] before any remote call.
    pub async fn analyze_image(&self, path: &Path) -> Result<IngredientsResult> {
        let content = encode_image(path)?;

        tracing::info!("Analyzing fridge image {}", path.display());

        self.request_analysis(content)
            .await
            .map_err(|e| e.context("Error analyzing image"))
    }

    async fn request_analysis(&self, content: UserContent) -> Result<IngredientsResult> {
        let reply = self
            .client
            .complete(prompts::VISION_SYSTEM, content, VISION_MAX_TOKENS, true)
            .await?;

        let value: serde_json::Value = serde_json::from_str(&reply)?;
        let result = IngredientsResult::from_value(value)?;

        let summary = result.summary();
        tracing::info!(
            "Identified {} ingredients across {} categories",
            summary.total_count,
            summary.categories
        );
        Ok(result)
    }

    pub fn save_analysis(&self, result: &IngredientsResult, output_path: &Path) -> Result<PathBuf> {
        storage::write_json_pretty(result, output_path)
    }

    pub fn summarize(&self, result: &IngredientsResult) -> IngredientSummary {
        result.summary()
    }
}

fn encode_image(path: &Path) -> Result<UserContent> {
    if !path.is_file() {
        return Err(Error::NotFound(format!(
            "Image file not found: {}",
            path.display()
        )));
    }

    let bytes = std::fs::read(path)?;
    let mime = mime::detect_image_mime(&bytes, path);
    let base64_data = base64::engine::general_purpose::STANDARD.encode(&bytes);

    tracing::debug!(
        "Encoded {} ({} bytes, {}) as {} base64 chars",
        path.display(),
        bytes.len(),
        mime,
        base64_data.len()
    );

    Ok(UserContent::Parts(vec![
        ContentPart::Text(prompts::VISION_USER.to_string()),
        ContentPart::Image {
            mime: mime.to_string(),
            base64_data,
        },
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockCompletionClient;
    use base64::Engine as _;
    use serde_json::json;
    use std::fs;

    const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

    fn service(mock: &MockCompletionClient) -> VisionService {
        VisionService::new(Arc::new(mock.clone()))
    }

    fn write_image(dir: &Path) -> PathBuf {
        let path = dir.join("fridge.jpg");
        fs::write(&path, JPEG_BYTES).unwrap();
        path
    }

    #[tokio::test]
    async fn test_analyze_image_parses_reply() {
        let temp = tempfile::tempdir().unwrap();
        let mock = MockCompletionClient::new().with_json_response(json!({
            "ingredients": { "dairy": ["milk", "butter"], "produce": ["lettuce"] }
        }));

        let result = service(&mock)
            .analyze_image(&write_image(temp.path()))
            .await
            .unwrap();

        assert_eq!(result.flatten(), vec!["milk", "butter", "lettuce"]);
    }

    #[tokio::test]
    async fn test_analyze_image_sends_encoded_image_in_json_mode() {
        let temp = tempfile::tempdir().unwrap();
        let mock = MockCompletionClient::new().with_json_response(json!({ "ingredients": {} }));

        service(&mock)
            .analyze_image(&write_image(temp.path()))
            .await
            .unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system_prompt, prompts::VISION_SYSTEM);
        assert_eq!(calls[0].max_tokens, 2000);
        assert!(calls[0].json_mode);

        let expected = base64::engine::general_purpose::STANDARD.encode(JPEG_BYTES);
        match &calls[0].content {
            UserContent::Parts(parts) => {
                assert_eq!(parts[0], ContentPart::Text(prompts::VISION_USER.to_string()));
                assert_eq!(
                    parts[1],
                    ContentPart::Image {
                        mime: "image/jpeg".to_string(),
                        base64_data: expected,
                    }
                );
            }
            other => panic!("expected multipart content, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_image_fails_before_remote_call() {
        let temp = tempfile::tempdir().unwrap();
        let mock = MockCompletionClient::new();

        let err = service(&mock)
            .analyze_image(&temp.path().join("absent.jpg"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(mock.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_reply_is_wrapped() {
        let temp = tempfile::tempdir().unwrap();
        let mock = MockCompletionClient::new().with_response("not json at all");

        let err = service(&mock)
            .analyze_image(&write_image(temp.path()))
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("Error analyzing image: "));
        assert!(matches!(err.root(), Error::Serialization(_)));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_invalid_response() {
        let temp = tempfile::tempdir().unwrap();
        let mock = MockCompletionClient::new().with_json_response(json!({ "foods": ["milk"] }));

        let err = service(&mock)
            .analyze_image(&write_image(temp.path()))
            .await
            .unwrap_err();

        assert!(matches!(err.root(), Error::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_remote_failure_is_wrapped() {
        let temp = tempfile::tempdir().unwrap();
        let mock = MockCompletionClient::new().with_failure("quota exceeded");

        let err = service(&mock)
            .analyze_image(&write_image(temp.path()))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("quota exceeded"));
        assert!(matches!(err.root(), Error::AiProvider(_)));
    }

    #[test]
    fn test_save_analysis_round_trips() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("results/ingredients.json");
        let result = IngredientsResult::from_value(json!({
            "ingredients": { "meat": ["ham"], "dairy": ["cheese"] }
        }))
        .unwrap();

        let svc = service(&MockCompletionClient::new());
        svc.save_analysis(&result, &path).unwrap();

        let reread: IngredientsResult =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reread, result);
    }

    #[test]
    fn test_summarize() {
        let result = IngredientsResult::from_value(json!({
            "ingredients": { "Dairy": ["milk", "yogurt"], "Produce": ["carrot"] }
        }))
        .unwrap();

        let summary = service(&MockCompletionClient::new()).summarize(&result);
        assert_eq!(summary.total_count, 3);
        assert_eq!(summary.categories, 2);
    }
}
