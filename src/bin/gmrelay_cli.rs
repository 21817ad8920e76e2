//! GMRelay CLI - Bridge interface for host front-ends
//!
//! Commands: resolve, markdown, validate, prepare
//! Outputs JSON to stdout
//! Returns non-zero on validation failure

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Deserialize;

use gmrelay_core::{
    resolve_references, to_markdown, validate_message, DocumentKind, ExportPipeline,
    ExportRequest, StaticLookup, WebhookMessage,
};

#[derive(Parser)]
#[command(name = "gmrelay-cli")]
#[command(version = gmrelay_core::ENGINE_VERSION)]
#[command(about = "GMRelay CLI - Tabletop-to-Discord Export Engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve embedded references in a block of text
    Resolve {
        /// The text to resolve
        #[arg(short, long)]
        text: String,

        /// JSON document table used as the lookup source
        #[arg(short, long, default_value = "{}")]
        documents: String,
    },

    /// Convert an HTML fragment to Markdown
    Markdown {
        /// The HTML fragment
        #[arg(long)]
        html: String,
    },

    /// Validate a webhook message against size limits
    Validate {
        /// JSON payload (WebhookMessage)
        #[arg(short, long)]
        payload: String,
    },

    /// Resolve, convert, and validate a message for dispatch
    Prepare {
        /// JSON payload (ExportRequest)
        #[arg(short, long)]
        payload: String,

        /// JSON document table used as the lookup source
        #[arg(short, long, default_value = "{}")]
        documents: String,
    },
}

/// JSON shape of the `--documents` table.
#[derive(Debug, Default, Deserialize)]
struct DocumentTable {
    #[serde(default)]
    documents: Vec<DocumentRow>,
    #[serde(default)]
    pages: Vec<PageRow>,
    #[serde(default)]
    compendium: Vec<CompendiumRow>,
}

#[derive(Debug, Deserialize)]
struct DocumentRow {
    kind: DocumentKind,
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct PageRow {
    id: String,
    page_id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct CompendiumRow {
    namespace: String,
    pack: String,
    id: String,
    name: String,
}

fn build_lookup(json: &str) -> Result<StaticLookup, serde_json::Error> {
    let table: DocumentTable = serde_json::from_str(json)?;
    let mut lookup = StaticLookup::new();
    for row in table.documents {
        lookup = lookup.with_document(row.kind, row.id, row.name);
    }
    for row in table.pages {
        lookup = lookup.with_page(row.id, row.page_id, row.name);
    }
    for row in table.compendium {
        lookup = lookup.with_compendium_entry(row.namespace, row.pack, row.id, row.name);
    }
    Ok(lookup)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve { text, documents } => {
            let lookup = match build_lookup(&documents) {
                Ok(l) => l,
                Err(e) => {
                    eprintln!(r#"{{"error": "Invalid document table: {}"}}"#, e);
                    return ExitCode::FAILURE;
                }
            };

            let resolved = resolve_references(&text, &lookup).await;
            println!(
                "{}",
                serde_json::json!({ "resolved": resolved })
            );
            ExitCode::SUCCESS
        }

        Commands::Markdown { html } => {
            println!(
                "{}",
                serde_json::json!({ "markdown": to_markdown(&html) })
            );
            ExitCode::SUCCESS
        }

        Commands::Validate { payload } => {
            let message: WebhookMessage = match serde_json::from_str(&payload) {
                Ok(m) => m,
                Err(e) => {
                    println!(r#"{{"valid": false, "error": "Invalid payload: {}"}}"#, e);
                    return ExitCode::FAILURE;
                }
            };

            let result = validate_message(&message);
            println!("{}", serde_json::to_string_pretty(&result).unwrap());
            if result.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2) // Validation failure
            }
        }

        Commands::Prepare { payload, documents } => {
            let request: ExportRequest = match serde_json::from_str(&payload) {
                Ok(r) => r,
                Err(e) => {
                    println!(r#"{{"success": false, "error": "Invalid payload: {}"}}"#, e);
                    return ExitCode::FAILURE;
                }
            };
            let lookup = match build_lookup(&documents) {
                Ok(l) => l,
                Err(e) => {
                    eprintln!(r#"{{"error": "Invalid document table: {}"}}"#, e);
                    return ExitCode::FAILURE;
                }
            };

            let pipeline = ExportPipeline::new(Arc::new(lookup));
            match pipeline.prepare(&request).await {
                Ok(prepared) => {
                    let output = serde_json::json!({
                        "success": true,
                        "prepared": prepared,
                    });
                    println!("{}", serde_json::to_string_pretty(&output).unwrap());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    let output = serde_json::json!({
                        "success": false,
                        "error": e.to_string(),
                    });
                    println!("{}", serde_json::to_string(&output).unwrap());
                    ExitCode::from(2) // Limits exceeded or empty message
                }
            }
        }
    }
}
