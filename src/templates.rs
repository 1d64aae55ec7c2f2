//! Filesystem prompt templates, loaded once at startup.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GatewayError, Result};

const OCR_TEMPLATE: &str = "ocr.txt";
const CONCRETE_NOTE_TEMPLATE: &str = "concrete_note.txt";
const MATERIALS_DELIVERY_TEMPLATE: &str = "materials_delivery.txt";

/// The placeholder substituted with OCR output in extraction templates.
const OCR_TEXT_PLACEHOLDER: &str = "{ocr_text}";

/// Supported document types, one extraction pipeline each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    ConcreteNote,
    MaterialsDelivery,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConcreteNote => "concrete_note",
            Self::MaterialsDelivery => "materials_delivery",
        }
    }
}

/// Prompt templates for one document type: the OCR instruction plus the
/// extraction instruction with its `{ocr_text}` placeholder.
#[derive(Debug, Clone)]
pub struct DocumentPrompts {
    pub ocr: String,
    extraction: String,
}

impl DocumentPrompts {
    pub fn render_extraction(&self, ocr_text: &str) -> String {
        self.extraction.replace(OCR_TEXT_PLACEHOLDER, ocr_text)
    }
}

/// All prompt text, read from the template directory at startup and treated
/// as immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct PromptStore {
    ocr: String,
    concrete_note: String,
    materials_delivery: String,
}

impl PromptStore {
    /// Fails fast with `PromptTemplateMissing` when any template is absent.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        Ok(Self {
            ocr: read_template(&dir.join(OCR_TEMPLATE))?,
            concrete_note: read_template(&dir.join(CONCRETE_NOTE_TEMPLATE))?,
            materials_delivery: read_template(&dir.join(MATERIALS_DELIVERY_TEMPLATE))?,
        })
    }

    pub fn for_document(&self, doc_type: DocumentType) -> DocumentPrompts {
        let extraction = match doc_type {
            DocumentType::ConcreteNote => self.concrete_note.clone(),
            DocumentType::MaterialsDelivery => self.materials_delivery.clone(),
        };
        DocumentPrompts {
            ocr: self.ocr.clone(),
            extraction,
        }
    }
}

fn read_template(path: &PathBuf) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|_| GatewayError::PromptTemplateMissing(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_templates(dir: &Path) {
        fs::write(dir.join("ocr.txt"), "Transcribe everything.").unwrap();
        fs::write(
            dir.join("concrete_note.txt"),
            "Extract concrete fields from:\n{ocr_text}\n",
        )
        .unwrap();
        fs::write(
            dir.join("materials_delivery.txt"),
            "Extract materials from:\n{ocr_text}\n",
        )
        .unwrap();
    }

    #[test]
    fn test_load_and_render() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(dir.path());

        let store = PromptStore::load(dir.path()).unwrap();
        let prompts = store.for_document(DocumentType::ConcreteNote);
        assert_eq!(prompts.ocr, "Transcribe everything.");

        let rendered = prompts.render_extraction("Qty: 10");
        assert!(rendered.contains("Qty: 10"));
        assert!(!rendered.contains("{ocr_text}"));
    }

    #[test]
    fn test_missing_template_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ocr.txt"), "x").unwrap();
        // concrete_note.txt and materials_delivery.txt absent

        let err = PromptStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, GatewayError::PromptTemplateMissing(_)));
        assert!(err.to_string().contains("concrete_note.txt"));
    }

    #[test]
    fn test_document_types_get_distinct_extraction_prompts() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(dir.path());
        let store = PromptStore::load(dir.path()).unwrap();

        let concrete = store.for_document(DocumentType::ConcreteNote);
        let materials = store.for_document(DocumentType::MaterialsDelivery);
        assert_ne!(
            concrete.render_extraction("t"),
            materials.render_extraction("t")
        );
    }

    #[test]
    fn test_shipped_templates_are_valid() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates");
        let store = PromptStore::load(&dir).expect("repo templates must load");
        let prompts = store.for_document(DocumentType::MaterialsDelivery);
        assert!(prompts.extraction.contains(OCR_TEXT_PLACEHOLDER));
    }
}
