#![allow(dead_code)]

use std::path::Path;

use serde_json::json;

use notelens::config::{Config, FetchConfig, LlmConfig, OcrConfig, ServerConfig};

/// Path to the prompt templates shipped with the repo.
pub fn templates_dir() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("templates")
        .display()
        .to_string()
}

/// A config wired to mock endpoints for the Vintern (OCR) and Qwen
/// (extraction) providers.
pub fn test_config(vintern_url: &str, qwen_url: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            api_key: None,
            api_key_header: "X-API-Key".to_string(),
            enforce_api_key: false,
        },
        fetch: FetchConfig {
            max_file_size_mb: 50,
            timeout_secs: 30,
        },
        ocr: OcrConfig {
            model: "5CD-AI/Vintern-3B-R-beta".to_string(),
            max_image_dimension: 1024,
        },
        llm: LlmConfig {
            default_model: "Qwen/Qwen3-8B".to_string(),
            gemini_api_key: None,
            gemini_base_url: None,
            qwen_base_url: Some(qwen_url.to_string()),
            qwen_token: Some("test-token".to_string()),
            vintern_base_url: Some(vintern_url.to_string()),
            timeout_secs: Some(10),
        },
        templates_dir: templates_dir(),
    }
}

/// OpenAI-style chat completion body with the given assistant content.
pub fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1,
        "model": "test",
        "choices": [
            {
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": content
                },
                "finish_reason": "stop"
            }
        ],
        "usage": {
            "prompt_tokens": 1,
            "completion_tokens": 1,
            "total_tokens": 2
        }
    })
}

/// Encode an RGB image of the given size as PNG bytes.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::new_rgb8(width, height);
    let mut output = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut output),
        image::ImageFormat::Png,
    )
    .unwrap();
    output
}
