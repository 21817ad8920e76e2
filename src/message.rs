//! Outbound Message Model - Webhook Payload Schema

use serde::{Deserialize, Serialize};

/// A complete outbound webhook payload: plain-text body plus rich embeds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookMessage {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub embeds: Vec<Embed>,
}

impl WebhookMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            embeds: vec![],
        }
    }

    /// True when there is nothing worth dispatching.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.embeds.is_empty()
    }
}

/// A rich-content block attached to an outbound message.
///
/// Field names match the webhook wire JSON (`icon_url` etc.) so payloads
/// serialize directly into dispatchable form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbedImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbedAuthor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbedFooter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

fn opt_len(s: &Option<String>) -> usize {
    s.as_deref().map_or(0, |s| s.chars().count())
}

impl Embed {
    /// Aggregate character count across the size-limited text fields.
    ///
    /// Counts Unicode scalars, not bytes. URLs and image links do not
    /// count against embed size.
    pub fn char_count(&self) -> usize {
        opt_len(&self.title)
            + opt_len(&self.description)
            + self
                .footer
                .as_ref()
                .map_or(0, |f| opt_len(&f.text))
            + self
                .author
                .as_ref()
                .map_or(0, |a| opt_len(&a.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_count_absent_fields_are_zero() {
        let embed = Embed::default();
        assert_eq!(embed.char_count(), 0);
    }

    #[test]
    fn test_char_count_sums_limited_fields_only() {
        let embed = Embed {
            title: Some("abcd".into()),
            description: Some("efgh".into()),
            url: Some("https://example.invalid/very-long-url".into()),
            footer: Some(EmbedFooter {
                text: Some("ij".into()),
                icon_url: Some("https://example.invalid/icon.png".into()),
            }),
            author: Some(EmbedAuthor {
                name: Some("k".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(embed.char_count(), 4 + 4 + 2 + 1);
    }

    #[test]
    fn test_char_count_is_scalar_count() {
        let embed = Embed {
            title: Some("héllo".into()),
            ..Default::default()
        };
        assert_eq!(embed.char_count(), 5);
    }

    #[test]
    fn test_wire_json_omits_absent_fields() {
        let msg = WebhookMessage {
            content: "hi".into(),
            embeds: vec![Embed {
                title: Some("T".into()),
                ..Default::default()
            }],
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"content":"hi","embeds":[{"title":"T"}]}"#);
    }
}
