use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::fetch::ImageFetcher;
use crate::llm::LlmRegistry;
use crate::pipeline::ExtractionPipeline;
use crate::templates::{DocumentType, PromptStore};

/// Process-wide shared state. Everything here is read-only after startup;
/// concurrent jobs share it without locks.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub fetcher: ImageFetcher,
    pub registry: LlmRegistry,
    pub concrete_note: Arc<ExtractionPipeline>,
    pub materials_delivery: Arc<ExtractionPipeline>,
}

impl AppState {
    /// Fails fast on a missing prompt template or an invalid configured
    /// model identifier.
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = ImageFetcher::new(&config.fetch)?;
        let registry = LlmRegistry::new(&config.llm);
        let prompts = PromptStore::load(&config.templates_dir)?;

        let concrete_note = ExtractionPipeline::new(
            DocumentType::ConcreteNote,
            registry.clone(),
            prompts.for_document(DocumentType::ConcreteNote),
            &config.ocr,
            &config.llm.default_model,
        )?;
        let materials_delivery = ExtractionPipeline::new(
            DocumentType::MaterialsDelivery,
            registry.clone(),
            prompts.for_document(DocumentType::MaterialsDelivery),
            &config.ocr,
            &config.llm.default_model,
        )?;

        Ok(Self {
            config: Arc::new(config),
            fetcher,
            registry,
            concrete_note: Arc::new(concrete_note),
            materials_delivery: Arc::new(materials_delivery),
        })
    }
}
