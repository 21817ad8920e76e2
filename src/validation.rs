//! Payload Validation - Webhook Size Limits
//!
//! Every violation across the whole payload is reported; validation
//! never short-circuits on the first failure. `valid == false` tells
//! the caller to abstain from dispatch; warnings are advisory only.

use serde::{Deserialize, Serialize};

use crate::message::{Embed, WebhookMessage};

/// Fixed ceilings imposed by the webhook API on outbound messages.
#[derive(Debug, Clone, Copy)]
pub struct MessageLimits {
    pub content_max: usize,
    pub max_embeds: usize,
    pub total_embeds_size: usize,
    pub embed_title_max: usize,
    pub embed_description_max: usize,
    pub embed_footer_text_max: usize,
    pub embed_author_name_max: usize,
    pub embed_total_max: usize,
}

pub const LIMITS: MessageLimits = MessageLimits {
    content_max: 2000,
    max_embeds: 10,
    total_embeds_size: 6000,
    embed_title_max: 256,
    embed_description_max: 4096,
    embed_footer_text_max: 2048,
    embed_author_name_max: 256,
    embed_total_max: 6000,
};

/// Fraction of a ceiling past which an advisory warning is emitted.
const WARN_THRESHOLD: f64 = 0.9;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn ok() -> Self {
        Self {
            valid: true,
            errors: vec![],
            warnings: vec![],
        }
    }

    fn error(&mut self, message: String) {
        self.valid = false;
        self.errors.push(message);
    }
}

fn char_count(s: &str) -> usize {
    s.chars().count()
}

fn opt_char_count(s: Option<&str>) -> usize {
    s.map_or(0, char_count)
}

/// Check one embed's per-field and aggregate ceilings. `index` is
/// zero-based; messages report it one-based.
fn validate_embed(embed: &Embed, index: usize, result: &mut ValidationResult) {
    let n = index + 1;

    let title_len = opt_char_count(embed.title.as_deref());
    if title_len > LIMITS.embed_title_max {
        result.error(format!(
            "Embed {}: Title exceeds {} characters ({} chars)",
            n, LIMITS.embed_title_max, title_len
        ));
    }

    let description_len = opt_char_count(embed.description.as_deref());
    if description_len > LIMITS.embed_description_max {
        result.error(format!(
            "Embed {}: Description exceeds {} characters ({} chars)",
            n, LIMITS.embed_description_max, description_len
        ));
    }

    let footer_len = opt_char_count(embed.footer.as_ref().and_then(|f| f.text.as_deref()));
    if footer_len > LIMITS.embed_footer_text_max {
        result.error(format!(
            "Embed {}: Footer text exceeds {} characters ({} chars)",
            n, LIMITS.embed_footer_text_max, footer_len
        ));
    }

    let author_len = opt_char_count(embed.author.as_ref().and_then(|a| a.name.as_deref()));
    if author_len > LIMITS.embed_author_name_max {
        result.error(format!(
            "Embed {}: Author name exceeds {} characters ({} chars)",
            n, LIMITS.embed_author_name_max, author_len
        ));
    }

    let size = embed.char_count();
    if size > LIMITS.embed_total_max {
        result.error(format!(
            "Embed {}: Total size exceeds {} characters ({} chars)",
            n, LIMITS.embed_total_max, size
        ));
    }
}

/// Validate a message against every size ceiling.
///
/// Pure: never mutates the input, and identical inputs always produce
/// identical results.
pub fn validate_message(message: &WebhookMessage) -> ValidationResult {
    let mut result = ValidationResult::ok();

    let content_len = char_count(&message.content);
    if content_len > LIMITS.content_max {
        result.error(format!(
            "Message content exceeds {} characters ({} chars)",
            LIMITS.content_max, content_len
        ));
    }

    if message.embeds.len() > LIMITS.max_embeds {
        result.error(format!(
            "Too many embeds: {} (max {})",
            message.embeds.len(),
            LIMITS.max_embeds
        ));
    }

    let mut total_embed_size = 0;
    for (index, embed) in message.embeds.iter().enumerate() {
        validate_embed(embed, index, &mut result);
        total_embed_size += embed.char_count();
    }

    if total_embed_size > LIMITS.total_embeds_size {
        result.error(format!(
            "Total embeds size exceeds {} characters ({} chars)",
            LIMITS.total_embeds_size, total_embed_size
        ));
    }

    if content_len as f64 > LIMITS.content_max as f64 * WARN_THRESHOLD {
        result.warnings.push(format!(
            "Message content is approaching the limit ({}/{} chars)",
            content_len, LIMITS.content_max
        ));
    }

    if total_embed_size as f64 > LIMITS.total_embeds_size as f64 * WARN_THRESHOLD {
        result.warnings.push(format!(
            "Total embeds size is approaching the limit ({}/{} chars)",
            total_embed_size, LIMITS.total_embeds_size
        ));
    }

    result
}
