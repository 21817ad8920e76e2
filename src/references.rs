//! Reference Parsing - Embedded Directive Syntax
//!
//! Rich text from the tabletop host carries three kinds of embedded
//! references:
//! - `@UUID[Actor.abc123]` / `@UUID[...]{Display Text}` document links,
//!   including nested journal pages
//!   (`@UUID[JournalEntry.abc.JournalEntryPage.xyz]`) and compendium
//!   entries (`@UUID[Compendium.ns.pack.Item.entryId]`)
//! - `@Check[survival|dc:15|name:Track]` inline check directives
//! - `<a class="content-link" data-uuid="...">...</a>` anchors
//!
//! Parsing here is pure and total: malformed input yields `None` or a
//! bracketed placeholder, never an error.

use serde::{Deserialize, Serialize};

/// Top-level document collections a reference can point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Actor,
    Item,
    JournalEntry,
    Scene,
    RollTable,
    Macro,
}

impl DocumentKind {
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "Actor" => Some(Self::Actor),
            "Item" => Some(Self::Item),
            "JournalEntry" => Some(Self::JournalEntry),
            "Scene" => Some(Self::Scene),
            "RollTable" => Some(Self::RollTable),
            "Macro" => Some(Self::Macro),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Actor => "Actor",
            Self::Item => "Item",
            Self::JournalEntry => "JournalEntry",
            Self::Scene => "Scene",
            Self::RollTable => "RollTable",
            Self::Macro => "Macro",
        }
    }
}

/// A parsed `@UUID[...]` path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentRef {
    /// `Type.id`, optionally `Type.id.JournalEntryPage.pageId`.
    World {
        kind: DocumentKind,
        id: String,
        page_id: Option<String>,
    },
    /// `Compendium.namespace.pack.DocumentType.entryId`, or the legacy
    /// four-segment `Compendium.namespace.pack.entryId` form.
    Compendium {
        namespace: String,
        pack: String,
        id: String,
    },
    /// First segment named a collection this exporter does not know.
    /// Kept so resolution can render a `[<Kind>]` placeholder.
    Unknown { kind: String },
}

impl DocumentRef {
    /// Parse the path inside `@UUID[...]`. Returns `None` only when the
    /// path has too few segments to mean anything.
    pub fn parse(uuid: &str) -> Option<Self> {
        let parts: Vec<&str> = uuid.split('.').collect();

        if parts[0] == "Compendium" {
            // Compendium.ns.pack.Type.entryId, skipping the document type.
            if parts.len() >= 5 {
                return Some(Self::Compendium {
                    namespace: parts[1].to_string(),
                    pack: parts[2].to_string(),
                    id: parts[4].to_string(),
                });
            }
            if parts.len() >= 4 {
                return Some(Self::Compendium {
                    namespace: parts[1].to_string(),
                    pack: parts[2].to_string(),
                    id: parts[3].to_string(),
                });
            }
            return None;
        }

        if parts.len() < 2 {
            return None;
        }

        let Some(kind) = DocumentKind::from_segment(parts[0]) else {
            return Some(Self::Unknown {
                kind: parts[0].to_string(),
            });
        };

        let page_id = if parts.len() >= 4 && parts[2] == "JournalEntryPage" {
            Some(parts[3].to_string())
        } else {
            None
        };

        Some(Self::World {
            kind,
            id: parts[1].to_string(),
            page_id,
        })
    }
}

/// A parsed `@Check[...]` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRef {
    pub skill: String,
    pub dc: Option<String>,
    pub name: Option<String>,
}

impl CheckRef {
    /// Parse a pipe-delimited parameter list, e.g.
    /// `survival|dc:15|traits:secret|name:Track`. The first token is the
    /// skill slug; only `dc:` and `name:` parameters are recognized.
    pub fn parse(raw: &str) -> Self {
        let mut params = raw.split('|');
        let skill = params.next().unwrap_or("").to_string();

        let mut dc = None;
        let mut name = None;
        for param in params {
            if let Some(value) = param.strip_prefix("dc:") {
                dc = Some(value.to_string());
            } else if let Some(value) = param.strip_prefix("name:") {
                name = Some(value.to_string());
            }
        }

        Self { skill, dc, name }
    }

    /// Render for display. Precedence: `DC <dc> <Skill>`, then the
    /// explicit name, then the bare skill. An empty parameter list
    /// degrades to a placeholder.
    pub fn render(&self, raw: &str) -> String {
        match (&self.dc, self.skill.is_empty()) {
            (Some(dc), false) => format!("DC {} {}", dc, capitalize(&self.skill)),
            _ => {
                if let Some(name) = &self.name {
                    name.clone()
                } else if !self.skill.is_empty() {
                    capitalize(&self.skill)
                } else {
                    format!("[Check: {}]", raw)
                }
            }
        }
    }
}

/// Uppercase the first character, e.g. `survival` -> `Survival`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Drop every HTML tag and trim, keeping the visible text. Used to
/// recover the author-supplied display text of content-link anchors
/// (which may nest icon markup like `<i class="fa-solid ..."></i>`).
pub fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}
