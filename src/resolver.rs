//! Reference Resolution - Labels for Embedded Directives
//!
//! Scans rich text for document references, check directives, and
//! content-link anchors, and substitutes each with a human-readable
//! label. Resolution never fails: unresolvable references degrade to
//! bracketed placeholders so one bad link cannot abort an export.

use std::collections::HashMap;
use std::sync::LazyLock;

use async_trait::async_trait;
use futures::future::join_all;
use regex::Regex;

use crate::references::{strip_html, CheckRef, DocumentKind, DocumentRef};

static UUID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@UUID\[([^\]]+)\](?:\{([^}]+)\})?").unwrap());

static CHECK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@Check\[([^\]]+)\]").unwrap());

/// All anchors; content-links are filtered out by attribute afterwards.
static A_TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a[^>]*>(.*?)</a>").unwrap());

static CONTENT_LINK_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"class="content-link""#).unwrap());

/// Lookup capability supplied by the host's in-memory document graph.
///
/// Every method returns `None` for "not found"; resolution treats that
/// as a per-reference degradation, never an error.
#[async_trait]
pub trait DocumentLookup: Send + Sync {
    /// Display name for a top-level document.
    async fn resolve(&self, kind: DocumentKind, id: &str) -> Option<String>;

    /// Display name for a compendium entry addressed by namespace + pack.
    async fn resolve_compendium(&self, namespace: &str, pack: &str, id: &str)
        -> Option<String>;

    /// Display name of a nested page. Hosts without nested documents can
    /// leave the default, which makes page references fall back to the
    /// parent document's name.
    async fn resolve_page(
        &self,
        _kind: DocumentKind,
        _id: &str,
        _page_id: &str,
    ) -> Option<String> {
        None
    }
}

/// HashMap-backed lookup for tests and the CLI bridge.
#[derive(Debug, Default)]
pub struct StaticLookup {
    documents: HashMap<(DocumentKind, String), String>,
    pages: HashMap<(String, String), String>,
    compendium: HashMap<(String, String, String), String>,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(
        mut self,
        kind: DocumentKind,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.documents.insert((kind, id.into()), name.into());
        self
    }

    pub fn with_page(
        mut self,
        id: impl Into<String>,
        page_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.pages.insert((id.into(), page_id.into()), name.into());
        self
    }

    pub fn with_compendium_entry(
        mut self,
        namespace: impl Into<String>,
        pack: impl Into<String>,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.compendium
            .insert((namespace.into(), pack.into(), id.into()), name.into());
        self
    }
}

#[async_trait]
impl DocumentLookup for StaticLookup {
    async fn resolve(&self, kind: DocumentKind, id: &str) -> Option<String> {
        self.documents.get(&(kind, id.to_string())).cloned()
    }

    async fn resolve_compendium(
        &self,
        namespace: &str,
        pack: &str,
        id: &str,
    ) -> Option<String> {
        self.compendium
            .get(&(namespace.to_string(), pack.to_string(), id.to_string()))
            .cloned()
    }

    async fn resolve_page(
        &self,
        _kind: DocumentKind,
        id: &str,
        page_id: &str,
    ) -> Option<String> {
        self.pages.get(&(id.to_string(), page_id.to_string())).cloned()
    }
}

/// Resolve a single parsed document reference to a display label.
async fn resolve_document(uuid: &str, lookup: &dyn DocumentLookup) -> String {
    let Some(parsed) = DocumentRef::parse(uuid) else {
        tracing::warn!(uuid, "could not parse document reference");
        return format!("[Unknown Reference: {}]", uuid);
    };

    match parsed {
        DocumentRef::Compendium { namespace, pack, id } => {
            match lookup.resolve_compendium(&namespace, &pack, &id).await {
                Some(name) => name,
                None => {
                    tracing::warn!(uuid, %pack, "compendium entry not found");
                    format!("[Compendium: {}]", pack)
                }
            }
        }
        DocumentRef::Unknown { kind } => {
            tracing::warn!(uuid, %kind, "unknown document kind");
            format!("[{}]", kind)
        }
        DocumentRef::World { kind, id, page_id } => {
            let Some(name) = lookup.resolve(kind, &id).await else {
                tracing::warn!(uuid, "document not found");
                return format!("[{}: {}]", kind.as_str(), id);
            };
            if let Some(page_id) = page_id {
                if let Some(page_name) = lookup.resolve_page(kind, &id, &page_id).await {
                    return format!("{}: {}", name, page_name);
                }
            }
            name
        }
    }
}

/// Replace every recognized embedded reference in `text` with a
/// human-readable label.
///
/// All three patterns scan the original text; the collected matches are
/// then applied as literal substring replacements, one occurrence per
/// match, so repeated references each get substituted and partially
/// overlapping syntax is never corrupted by re-scanning. Returns the
/// input unchanged when nothing matches.
pub async fn resolve_references(text: &str, lookup: &dyn DocumentLookup) -> String {
    let uuid_matches: Vec<(String, Option<String>, String)> = UUID_PATTERN
        .captures_iter(text)
        .map(|caps| {
            (
                caps[0].to_string(),
                caps.get(2).map(|m| m.as_str().to_string()),
                caps[1].to_string(),
            )
        })
        .collect();

    let check_matches: Vec<(String, String)> = CHECK_PATTERN
        .captures_iter(text)
        .map(|caps| (caps[0].to_string(), caps[1].to_string()))
        .collect();

    let link_matches: Vec<(String, String)> = A_TAG_PATTERN
        .captures_iter(text)
        .filter(|caps| CONTENT_LINK_CLASS.is_match(&caps[0]))
        .map(|caps| (caps[0].to_string(), caps[1].to_string()))
        .collect();

    if uuid_matches.is_empty() && check_matches.is_empty() && link_matches.is_empty() {
        return text.to_string();
    }

    // Lookups are independent; order of completion does not matter
    // because each substitution is keyed by its captured substring.
    let resolutions = join_all(uuid_matches.into_iter().map(
        |(full_match, display, uuid)| async move {
            let label = match display {
                // Display override short-circuits lookup entirely.
                Some(display) => display,
                None => resolve_document(&uuid, lookup).await,
            };
            (full_match, label)
        },
    ))
    .await;

    let mut resolved = text.to_string();
    for (full_match, label) in resolutions {
        resolved = resolved.replacen(&full_match, &label, 1);
    }
    for (full_match, params) in check_matches {
        let label = CheckRef::parse(&params).render(&params);
        resolved = resolved.replacen(&full_match, &label, 1);
    }
    for (full_match, inner) in link_matches {
        // data-uuid is deliberately ignored; the anchor's visible text
        // is the author-supplied label, even when stale.
        resolved = resolved.replacen(&full_match, &strip_html(&inner), 1);
    }

    resolved
}
