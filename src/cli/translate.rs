//! Translate tree documents into request URIs

use super::{CliError, json_to_tree};
use crate::{KeyDelimiter, ServiceContext, Translation, translate};

/// Key rendering selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStyle {
    #[default]
    Parens,
    Slash,
}

impl From<KeyStyle> for KeyDelimiter {
    fn from(style: KeyStyle) -> Self {
        match style {
            KeyStyle::Parens => KeyDelimiter::Parentheses,
            KeyStyle::Slash => KeyDelimiter::Slash,
        }
    }
}

/// Options for the translate command
#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    /// Tree document as JSON
    pub input: Option<String>,
    /// Service root the entity sets are resolved against
    pub base_uri: String,
    pub key_style: KeyStyle,
    /// Only check that the document converts to a tree
    pub check_only: bool,
}

/// Result of a translate operation
#[derive(Debug)]
pub enum TranslateResult {
    /// The document describes a valid tree
    TreeValid,
    /// URI and protocol version
    Success(Translation),
}

/// Execute a translate operation
pub fn execute_translate(options: &TranslateOptions) -> Result<TranslateResult, CliError> {
    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let document: serde_json::Value = serde_json::from_str(json_str)?;
    let tree = json_to_tree(&document)?;

    if options.check_only {
        return Ok(TranslateResult::TreeValid);
    }

    let context = ServiceContext::new(options.base_uri.as_str())
        .with_key_formatter(KeyDelimiter::from(options.key_style));
    let translation = translate(&context, &tree)?;
    Ok(TranslateResult::Success(translation))
}
