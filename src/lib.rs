//! Notelens: a gateway that turns photos of delivery notes into structured
//! JSON. Each request downloads a remote image, runs it through a
//! vision-language model for OCR, then feeds the recognized text into a
//! second LLM call that extracts document-type-specific fields.

pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod imaging;
pub mod llm;
pub mod pipeline;
pub mod templates;
