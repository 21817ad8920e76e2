//! Export Pipeline - Single Entry Point
//!
//! CRITICAL: prepare MUST call validate internally. No bypass.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::markdown::to_markdown;
use crate::message::{Embed, WebhookMessage};
use crate::resolver::{resolve_references, DocumentLookup};
use crate::validation::{validate_message, ValidationResult};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Message exceeds webhook size limits: {}", .0.errors.join("; "))]
    LimitsExceeded(ValidationResult),

    #[error("Nothing to export: message has no content and no embeds")]
    EmptyMessage,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A message to prepare for dispatch. Content and embed text may carry
/// rich HTML with embedded references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    pub message: WebhookMessage,
    /// Set when the content is already Markdown and only reference
    /// resolution should run (e.g. combat tracker lines).
    #[serde(default)]
    pub raw_markdown: bool,
}

/// A validated, dispatch-ready payload. Only `ExportPipeline::prepare`
/// constructs one, so validation cannot be skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparedMessage {
    pub message: WebhookMessage,
    pub validation: ValidationResult,
    pub prepared_at: DateTime<Utc>,
}

/// The export pipeline: resolve references, convert to Markdown,
/// validate. The single entry point for all outbound payloads.
pub struct ExportPipeline {
    lookup: Arc<dyn DocumentLookup>,
}

impl ExportPipeline {
    pub fn new(lookup: Arc<dyn DocumentLookup>) -> Self {
        Self { lookup }
    }

    /// Prepare a message for dispatch.
    ///
    /// References are resolved while the text is still HTML, then the
    /// content and embed descriptions are converted to Markdown, then
    /// the whole payload is validated. A failing validation is returned
    /// as `ExportError::LimitsExceeded` carrying the full report;
    /// advisory warnings ride along on the prepared message.
    pub async fn prepare(&self, request: &ExportRequest) -> Result<PreparedMessage, ExportError> {
        if request.message.is_empty() {
            return Err(ExportError::EmptyMessage);
        }

        let content = self.render(&request.message.content, request.raw_markdown).await;

        let mut embeds = Vec::with_capacity(request.message.embeds.len());
        for embed in &request.message.embeds {
            embeds.push(self.render_embed(embed, request.raw_markdown).await);
        }

        let message = WebhookMessage { content, embeds };

        let validation = validate_message(&message);
        if !validation.valid {
            return Err(ExportError::LimitsExceeded(validation));
        }
        for warning in &validation.warnings {
            tracing::warn!(%warning, "payload approaching size limit");
        }

        Ok(PreparedMessage {
            message,
            validation,
            prepared_at: Utc::now(),
        })
    }

    async fn render(&self, text: &str, raw_markdown: bool) -> String {
        let resolved = resolve_references(text, self.lookup.as_ref()).await;
        if raw_markdown {
            resolved
        } else {
            to_markdown(&resolved)
        }
    }

    async fn render_embed(&self, embed: &Embed, raw_markdown: bool) -> Embed {
        let mut out = embed.clone();
        if let Some(title) = &embed.title {
            // Titles render as a single line; only resolution applies.
            out.title = Some(resolve_references(title, self.lookup.as_ref()).await);
        }
        if let Some(description) = &embed.description {
            out.description = Some(self.render(description, raw_markdown).await);
        }
        if let Some(footer) = &mut out.footer {
            if let Some(text) = footer.text.take() {
                footer.text = Some(resolve_references(&text, self.lookup.as_ref()).await);
            }
        }
        if let Some(author) = &mut out.author {
            if let Some(name) = author.name.take() {
                author.name = Some(resolve_references(&name, self.lookup.as_ref()).await);
            }
        }
        out
    }
}
