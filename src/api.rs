// API client module: contains a small blocking HTTP client that talks to
// the Printful API. It is intentionally small and synchronous: one run
// of the tool is a handful of sequential requests.

use anyhow::{bail, Context, Result};
use reqwest::blocking::{multipart, Client};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::time::Duration;
use tracing::debug;

use crate::images::ImageFile;

/// Simple API client that holds a reqwest blocking client, the base URL
/// of the Printful API and the bearer token for authenticated calls.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
}

/// Catalog listing response. `data` must be an array of product
/// summaries; a body where it is missing or not an array fails to parse.
#[derive(Deserialize, Debug)]
pub struct CatalogResponse {
    pub data: Vec<CatalogProduct>,
}

/// One sellable item template from the catalog.
#[derive(Deserialize, Debug, Clone)]
pub struct CatalogProduct {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub variant_count: u32,
    #[serde(default)]
    pub variants: Vec<VariantSummary>,
}

/// Variant summary embedded in a catalog product.
#[derive(Deserialize, Debug, Clone)]
pub struct VariantSummary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub retail_price: Option<String>,
}

/// Per-product variant listing. `data` defaults to empty when absent so
/// "missing" and "empty" produce the same diagnostic downstream.
#[derive(Deserialize, Debug)]
pub struct VariantsResponse {
    #[serde(default)]
    pub data: Vec<CatalogVariant>,
}

/// A size/color instance of a catalog product.
#[derive(Deserialize, Debug, Clone)]
pub struct CatalogVariant {
    pub id: u64,
    #[serde(default)]
    pub product_id: u64,
    pub name: String,
    #[serde(default)]
    pub retail_price: Option<String>,
}

/// Store listing response (`GET /stores`).
#[derive(Deserialize, Debug)]
pub struct StoresResponse {
    #[serde(default)]
    pub result: Vec<Store>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Store {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

impl StoresResponse {
    /// The id of the first store, which the API requires to exist for
    /// the account even though this tool does not use it further.
    pub fn first_store_id(&self) -> Result<u64> {
        match self.result.first() {
            Some(store) => Ok(store.id),
            None => bail!("Failed to get store ID"),
        }
    }
}

/// File upload response (`POST /files`).
#[derive(Deserialize, Debug)]
pub struct UploadResponse {
    #[serde(default)]
    pub result: Option<UploadedFile>,
}

/// Reference to a file Printful now hosts.
#[derive(Deserialize, Debug, Clone)]
pub struct UploadedFile {
    pub id: u64,
    pub url: String,
}

impl UploadResponse {
    /// Unwraps the uploaded-file reference, failing when the body did
    /// not carry one (e.g. an error body that still parsed as JSON).
    pub fn into_file(self) -> Result<UploadedFile> {
        match self.result {
            Some(file) => Ok(file),
            None => bail!("Failed to get file ID from upload response"),
        }
    }
}

/// Body of `POST /sync/products`. Fields mirror the vendor expectations.
#[derive(Serialize, Debug)]
pub struct SyncProductRequest {
    pub sync_product: SyncProduct,
}

#[derive(Serialize, Debug)]
pub struct SyncProduct {
    pub external_id: String,
    pub name: String,
    pub variants: Vec<SyncVariant>,
}

#[derive(Serialize, Debug)]
pub struct SyncVariant {
    pub external_id: String,
    pub variant_id: u64,
    pub retail_price: String,
    pub files: Vec<SyncFile>,
}

#[derive(Serialize, Debug)]
pub struct SyncFile {
    #[serde(rename = "type")]
    pub file_type: String,
    pub url: String,
}

/// Parses the sync-product creation response. The body is returned as
/// raw JSON and never inspected for success: Printful's error bodies are
/// valid JSON too, so a rejected creation is reported verbatim to the
/// user rather than failing the run.
pub fn parse_sync_response(body: &str) -> Result<Value> {
    serde_json::from_str(body).context("Parsing sync product response json")
}

impl ApiClient {
    /// Create an ApiClient for the given base URL and bearer token.
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Builds the Authorization header map carried by every request.
    fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let val = format!("Bearer {}", self.token);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&val).context("Token is not a valid header value")?,
        );
        Ok(headers)
    }

    /// List catalog products (`GET /v2/catalog-products`).
    pub fn list_catalog_products(&self) -> Result<CatalogResponse> {
        let url = format!("{}/v2/catalog-products", &self.base_url);
        let res = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .context("Failed to send catalog request")?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            bail!("Failed to fetch products: {} - {}", status, txt);
        }
        let body = res.text().context("Reading catalog response body")?;
        debug!(%body, "catalog response");
        serde_json::from_str(&body).context("Parsing catalog response json")
    }

    /// List variants for one catalog product
    /// (`GET /v2/catalog-products/{id}/catalog-variants`).
    pub fn list_catalog_variants(&self, product_id: u64) -> Result<VariantsResponse> {
        let url = format!(
            "{}/v2/catalog-products/{}/catalog-variants",
            &self.base_url, product_id
        );
        let res = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .context("Failed to send variant request")?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            bail!("Failed to fetch variants: {} - {}", status, txt);
        }
        let body = res.text().context("Reading variant response body")?;
        debug!(%body, "variant response");
        serde_json::from_str(&body).context("Parsing variant response json")
    }

    /// List the account's stores (`GET /stores`). The endpoint is not
    /// status-checked: an error body simply carries no store and fails
    /// at `first_store_id`.
    pub fn list_stores(&self) -> Result<StoresResponse> {
        let url = format!("{}/stores", &self.base_url);
        let res = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .context("Failed to send store request")?;
        let body = res.text().context("Reading store response body")?;
        debug!(%body, "store response");
        serde_json::from_str(&body).context("Parsing store response json")
    }

    /// Upload one local image as multipart/form-data (`POST /files`).
    /// The part's MIME type follows the file extension.
    pub fn upload_file(&self, image: &ImageFile) -> Result<UploadedFile> {
        let url = format!("{}/files", &self.base_url);

        let file = File::open(&image.path).context("Failed to open image file")?;
        let part = multipart::Part::reader(file)
            .file_name(image.file_name.clone())
            .mime_str(image.mime_type())
            .context("Invalid MIME type for upload part")?;
        let form = multipart::Form::new().part("file", part);

        let res = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .multipart(form)
            .send()
            .context("Failed to send upload request")?;
        let body = res.text().context("Reading upload response body")?;
        debug!(%body, "upload response");
        let parsed: UploadResponse =
            serde_json::from_str(&body).context("Parsing upload response json")?;
        parsed.into_file()
    }

    /// Create a sync product (`POST /sync/products`). Returns the raw
    /// response body; see `parse_sync_response` for why it is not
    /// validated here.
    pub fn create_sync_product(&self, request: &SyncProductRequest) -> Result<Value> {
        let url = format!("{}/sync/products", &self.base_url);
        let res = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(request)
            .send()
            .context("Failed to send sync product request")?;
        let body = res.text().context("Reading sync product response body")?;
        debug!(%body, "sync product response");
        parse_sync_response(&body)
    }
}
