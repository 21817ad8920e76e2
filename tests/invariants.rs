//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees: resolution is
//! total, validation is exhaustive and pure, and the pipeline never
//! produces a dispatchable payload that fails validation.

use std::sync::Arc;

use gmrelay_core::{
    resolve_references, validate_message, DocumentKind, Embed, EmbedFooter, ExportError,
    ExportPipeline, ExportRequest, StaticLookup, WebhookMessage,
};

fn create_lookup() -> StaticLookup {
    StaticLookup::new()
        .with_document(DocumentKind::Actor, "actor1", "Bob")
        .with_document(DocumentKind::Item, "item1", "Flametongue")
        .with_document(DocumentKind::JournalEntry, "journal1", "Campaign Notes")
        .with_page("journal1", "page1", "Session 3")
        .with_compendium_entry("pf2e", "deities", "deity1", "Sarenrae")
}

fn create_pipeline() -> ExportPipeline {
    ExportPipeline::new(Arc::new(create_lookup()))
}

#[tokio::test]
async fn invariant_resolution_identity_without_references() {
    let lookup = create_lookup();
    let samples = [
        "",
        "plain text",
        "<p>markup without references</p>",
        "an email@address.test and @mention are not references",
    ];
    for text in samples {
        assert_eq!(resolve_references(text, &lookup).await, text);
    }
}

#[tokio::test]
async fn invariant_resolution_preserves_surrounding_text() {
    let lookup = create_lookup();
    let out = resolve_references("before @UUID[Actor.actor1] after", &lookup).await;
    assert_eq!(out, "before Bob after");
}

#[tokio::test]
async fn invariant_display_override_wins_over_lookup() {
    let lookup = create_lookup();
    // actor1 resolves to "Bob", but the override must win anyway.
    let out = resolve_references("@UUID[Actor.actor1]{The Gravedigger}", &lookup).await;
    assert_eq!(out, "The Gravedigger");
    // Override also wins when the lookup would fail.
    let out = resolve_references("@UUID[Actor.missing]{Mystery Man}", &lookup).await;
    assert_eq!(out, "Mystery Man");
}

#[tokio::test]
async fn invariant_resolution_never_fails() {
    let lookup = create_lookup();
    let hostile = [
        "@UUID[]{}",
        "@UUID[Actor]",
        "@UUID[Nonsense.id.with.many.parts]",
        "@UUID[Compendium.only]",
        "@Check[]",
        "@Check[|||]",
    ];
    for text in hostile {
        // Must return a string, placeholder or otherwise; no panics.
        let _ = resolve_references(text, &lookup).await;
    }

    let out = resolve_references("@UUID[Actor.missing]", &lookup).await;
    assert!(out.starts_with('[') && out.ends_with(']'));
}

#[tokio::test]
async fn invariant_check_precedence() {
    let lookup = create_lookup();
    assert_eq!(
        resolve_references("@Check[survival|dc:15|name:Track]", &lookup).await,
        "DC 15 Survival"
    );
    assert_eq!(
        resolve_references("@Check[survival|name:Track]", &lookup).await,
        "Track"
    );
    assert_eq!(
        resolve_references("@Check[survival]", &lookup).await,
        "Survival"
    );
}

#[tokio::test]
async fn invariant_journal_page_reference() {
    let lookup = create_lookup();
    let out = resolve_references(
        "@UUID[JournalEntry.journal1.JournalEntryPage.page1]",
        &lookup,
    )
    .await;
    assert_eq!(out, "Campaign Notes: Session 3");
}

#[tokio::test]
async fn invariant_compendium_reference() {
    let lookup = create_lookup();
    let out = resolve_references(
        "Worships @UUID[Compendium.pf2e.deities.Item.deity1].",
        &lookup,
    )
    .await;
    assert_eq!(out, "Worships Sarenrae.");
}

#[test]
fn invariant_content_at_exact_limit_valid() {
    let result = validate_message(&WebhookMessage::text("a".repeat(2000)));
    assert!(result.valid);

    let result = validate_message(&WebhookMessage::text("a".repeat(2001)));
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
}

#[test]
fn invariant_embed_count_limit() {
    let message = WebhookMessage {
        content: String::new(),
        embeds: vec![Embed::default(); 11],
    };
    let result = validate_message(&message);
    assert!(!result.valid);
    assert!(result.errors.iter().any(|e| e.contains("Too many embeds")));
}

#[test]
fn invariant_embed_errors_carry_index() {
    let message = WebhookMessage {
        content: String::new(),
        embeds: vec![
            Embed::default(),
            Embed::default(),
            Embed {
                title: Some("t".repeat(300)),
                ..Default::default()
            },
        ],
    };
    let result = validate_message(&message);
    assert!(!result.valid);
    assert!(result.errors[0].starts_with("Embed 3:"));
}

#[test]
fn invariant_all_violations_reported() {
    // Oversized title AND oversized aggregate on the same embed; both
    // must appear in the report.
    let message = WebhookMessage {
        content: String::new(),
        embeds: vec![Embed {
            title: Some("A".repeat(4000)),
            description: Some("B".repeat(3000)),
            ..Default::default()
        }],
    };
    let result = validate_message(&message);
    assert!(!result.valid);
    assert!(result
        .errors
        .iter()
        .any(|e| e.contains("Title exceeds 256 characters (4000 chars)")));
    assert!(result
        .errors
        .iter()
        .any(|e| e.contains("Total size exceeds 6000 characters (7000 chars)")));
}

#[test]
fn invariant_validation_deterministic() {
    let message = WebhookMessage {
        content: "c".repeat(1990),
        embeds: vec![Embed {
            footer: Some(EmbedFooter {
                text: Some("f".repeat(2100)),
                icon_url: None,
            }),
            ..Default::default()
        }],
    };
    let first = validate_message(&message);
    let second = validate_message(&message);
    assert_eq!(first.valid, second.valid);
    assert_eq!(first.errors, second.errors);
    assert_eq!(first.warnings, second.warnings);
}

#[tokio::test]
async fn invariant_prepare_always_validates() {
    // An oversized payload must be rejected by prepare; there is no
    // path to a PreparedMessage that skips validation.
    let pipeline = create_pipeline();
    let request = ExportRequest {
        message: WebhookMessage::text("x".repeat(3000)),
        raw_markdown: true,
    };
    let err = pipeline.prepare(&request).await.unwrap_err();
    match err {
        ExportError::LimitsExceeded(result) => {
            assert!(!result.valid);
            assert!(!result.errors.is_empty());
        }
        other => panic!("expected LimitsExceeded, got {other}"),
    }
}

#[tokio::test]
async fn invariant_prepare_end_to_end() {
    let pipeline = create_pipeline();
    let request = ExportRequest {
        message: WebhookMessage {
            content: "<h2>Treasury</h2><p>The <b>party</b> recovers @UUID[Item.item1].</p>"
                .to_string(),
            embeds: vec![Embed {
                title: Some("@UUID[Actor.actor1]{Bob the Gravedigger}".into()),
                description: Some(
                    "Roll @Check[perception|dc:20] to spot the <i>hidden</i> latch.".into(),
                ),
                ..Default::default()
            }],
        },
        raw_markdown: false,
    };

    let prepared = pipeline.prepare(&request).await.unwrap();
    assert_eq!(
        prepared.message.content,
        "## Treasury\nThe **party** recovers Flametongue."
    );
    let embed = &prepared.message.embeds[0];
    assert_eq!(embed.title.as_deref(), Some("Bob the Gravedigger"));
    assert_eq!(
        embed.description.as_deref(),
        Some("Roll DC 20 Perception to spot the *hidden* latch.")
    );
    assert!(prepared.validation.valid);
}

#[tokio::test]
async fn invariant_stale_content_link_text_preserved() {
    // Content-link anchors keep their visible text even when the target
    // document now has a different name.
    let lookup = create_lookup();
    let html = r#"<a class="content-link" data-uuid="Actor.actor1">Robert</a>"#;
    let out = resolve_references(html, &lookup).await;
    assert_eq!(out, "Robert");
}
