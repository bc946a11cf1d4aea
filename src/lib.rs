// src/lib.rs
pub mod decoder;
pub mod document;
pub mod error;
pub mod output_format;
pub mod processor;
pub mod translate;

pub use error::*;

pub use decoder::{BlockBody, Decoder, GuardCondition, MapEntry, NormalizeBlock, ParseDirective, ParseKeyStyle, Statement};
pub use document::{load_document, read_document, render};
pub use output_format::OutputFormat;
pub use processor::{Operation, Processor};
pub use translate::config::TranslateConfig;
pub use translate::{translate_document, translate_processors};
