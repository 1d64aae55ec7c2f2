use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub fetch: FetchConfig,
    pub ocr: OcrConfig,
    pub llm: LlmConfig,
    pub templates_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Expected API key value. `None` disables the gate entirely.
    pub api_key: Option<String>,
    /// Header the key is read from.
    pub api_key_header: String,
    /// When false (the default), a mismatched key is logged and the request
    /// is allowed through. When true, mismatches are rejected with 401.
    pub enforce_api_key: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    pub max_file_size_mb: u64,
    pub timeout_secs: u64,
}

impl FetchConfig {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }
}

/// OCR stage configuration. The OCR model is process-fixed; callers can only
/// select the extraction model.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub model: String,
    pub max_image_dimension: u32,
}

/// Per-provider connection settings for chat backends.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Default extraction model when the caller omits `model_name`.
    pub default_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: Option<String>,
    pub qwen_base_url: Option<String>,
    pub qwen_token: Option<String>,
    pub vintern_base_url: Option<String>,
    /// Per-call timeout. `None` leaves backend calls unbounded; callers are
    /// expected to impose an overall request timeout at the edge.
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("NOTELENS_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("NOTELENS_PORT", 8000),
                api_key: env::var("API_KEY").ok(),
                api_key_header: env::var("API_KEY_NAME")
                    .unwrap_or_else(|_| "X-API-Key".to_string()),
                enforce_api_key: parse_env_or("API_KEY_ENFORCE", false),
            },
            fetch: FetchConfig {
                max_file_size_mb: parse_env_or("MAX_FILE_SIZE_MB", 50),
                timeout_secs: 30,
            },
            ocr: OcrConfig {
                model: env::var("OCR_MODEL")
                    .unwrap_or_else(|_| "5CD-AI/Vintern-3B-R-beta".to_string()),
                max_image_dimension: parse_env_or("OCR_MAX_DIMENSION", 1024),
            },
            llm: LlmConfig {
                default_model: env::var("LLM_MODEL")
                    .unwrap_or_else(|_| "Qwen/Qwen3-8B".to_string()),
                gemini_api_key: env::var("GEMINI_API_KEY").ok(),
                gemini_base_url: env::var("GEMINI_BASE_URL").ok(),
                qwen_base_url: env::var("QWEN_LLM_URL").ok(),
                qwen_token: env::var("QWEN_TOKEN").ok(),
                vintern_base_url: env::var("VINTERN_LLM_URL").ok(),
                timeout_secs: parse_env_opt("LLM_TIMEOUT"),
            },
            templates_dir: env::var("TEMPLATES_DIR").unwrap_or_else(|_| "templates".to_string()),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
