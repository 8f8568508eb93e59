// Configuration layer: everything that was a hard-coded constant in the
// first version of this tool is a flag here, with the old value as the
// default. The token stays optional at parse time so a missing token is
// reported as a normal run failure (exit 1) instead of a usage error.

use anyhow::{bail, Result};
use clap::Parser;

/// Uploads local artwork to Printful and creates a sync product for it.
#[derive(Parser, Debug, Clone)]
#[command(name = "printful-sync")]
#[command(about = "Creates a Printful sync product from a local image")]
pub struct Args {
    /// Printful API bearer token.
    #[arg(long, env = "PRINTFUL_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Base URL of the Printful API.
    #[arg(long, env = "PRINTFUL_BASE_URL", default_value = "https://api.printful.com")]
    pub base_url: String,

    /// Zero-based index of the catalog product to select.
    #[arg(long, default_value = "2")]
    pub product_index: usize,

    /// Catalog variant id placed in the sync product.
    #[arg(long, default_value = "19313")]
    pub variant_id: u64,

    /// External id assigned to the sync product.
    #[arg(long, default_value = "canvas-print-1")]
    pub external_id: String,

    /// External id assigned to the sync variant.
    #[arg(long, default_value = "canvas-print-1-24x24")]
    pub variant_external_id: String,

    /// Display name of the sync product.
    #[arg(long, default_value = "Canvas Print")]
    pub product_name: String,

    /// Retail price of the sync variant.
    #[arg(long, default_value = "29.99")]
    pub retail_price: String,

    /// Directory scanned for .png/.jpg artwork.
    #[arg(long, default_value = ".")]
    pub image_dir: String,

    /// Log the catalog product with this exact name, if present.
    /// Purely diagnostic; selection still uses --product-index.
    #[arg(long)]
    pub inspect: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}

impl Args {
    /// Returns the bearer token or fails before any network access.
    pub fn require_token(&self) -> Result<&str> {
        match self.api_token.as_deref() {
            Some(t) if !t.is_empty() => Ok(t),
            _ => bail!("PRINTFUL_API_TOKEN not set in environment"),
        }
    }
}
