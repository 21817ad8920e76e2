//! GMRelay Core - Tabletop-to-Discord Export Engine
//!
//! Host-independent core of a virtual-tabletop webhook exporter:
//! - resolve embedded document references (`@UUID[...]`, `@Check[...]`,
//!   content-link anchors) to readable labels
//! - convert rich HTML to Discord-flavoured Markdown
//! - validate outbound payloads against the webhook size limits
//!
//! Resolution never fails (bad references degrade to placeholders) and
//! validation reports every violation, so callers always get a complete,
//! actionable result. Webhook transport and host UI stay outside this
//! crate; the boundary is plain structured input and output.

pub mod markdown;
pub mod message;
pub mod pipeline;
pub mod references;
pub mod resolver;
pub mod validation;

pub use markdown::to_markdown;
pub use message::{Embed, EmbedAuthor, EmbedFooter, EmbedImage, WebhookMessage};
pub use pipeline::{ExportError, ExportPipeline, ExportRequest, PreparedMessage};
pub use references::{CheckRef, DocumentKind, DocumentRef};
pub use resolver::{resolve_references, DocumentLookup, StaticLookup};
pub use validation::{validate_message, MessageLimits, ValidationResult, LIMITS};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
