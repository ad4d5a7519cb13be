//! # biopubs
//!
//! Bioscience publication catalog and AI prompt proxy - Rust Microservice
//!
//! ## Modules
//!
//! - [`publications`] - Record derivation from a `title,link` export
//! - [`catalog`] - Search, year/topic filters and paging
//! - [`languages`] - Output languages offered to users
//! - [`prompts`] - System instruction templates
//! - [`gateway`] - OpenAI-compatible completion gateway client
//! - [`proxy`] - axum router for the prompt proxy and catalog
//! - [`config`] - Environment configuration
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use biopubs::{catalog, publications};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let source = publications::DataSource::parse("data/publications.csv")?;
//!     let pubs = publications::load_publications(&source, &reqwest::Client::new()).await;
//!     let page = catalog::page(&pubs, &Default::default(), 0, catalog::DEFAULT_PAGE_SIZE);
//!     println!("Showing {} of {} publications", page.items.len(), page.total);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod languages;
pub mod prompts;
pub mod proxy;
pub mod publications;

pub use error::{BiopubsError, Result};
