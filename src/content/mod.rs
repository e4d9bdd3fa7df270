//! Per-document rewriting of help pages into site content pages.

mod chrome;
mod dom;
mod paths;
mod table_fix;
mod transformer;

use std::fmt;

use crate::encoding::DecodeFailure;

pub use dom::{parse_document, select_all, select_first, visible_text, TransformError};
pub use transformer::ContentTransformer;

/// Why a document was copied through instead of rewritten
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    Decode(DecodeFailure),
    Transform(TransformError),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Decode(failure) => write!(f, "decode failed: {}", failure),
            FallbackReason::Transform(err) => write!(f, "transform failed: {}", err),
        }
    }
}

/// Result of processing one document
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentOutcome {
    /// Rewritten page markup
    Transformed(String),
    /// Source bytes should be copied unchanged
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedDocument {
    pub outcome: DocumentOutcome,
    /// Decoded source text, when decoding succeeded
    pub text: Option<String>,
}
