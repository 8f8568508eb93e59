// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to drive one sync run against the
// Printful API.
//
// Module responsibilities:
// - `cli`: Command-line and environment configuration (token, base URL,
//   and the selection parameters that used to be hard-coded constants).
// - `api`: Encapsulates HTTP interactions with the Printful API
//   (catalog, variants, stores, file upload, sync product creation).
// - `images`: Discovers a local artwork file and its MIME type.
// - `pipeline`: Composes the steps into one ordered, fallible run.
//
// Keeping this separation makes each step testable without touching the
// network or the process exit code.
pub mod api;
pub mod cli;
pub mod images;
pub mod pipeline;
