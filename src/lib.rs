/*!
 * # NPI Registry Client Library
 *
 * A Rust client for the public CMS NPI Registry API
 * (<https://npiregistry.cms.hhs.gov/api/>).
 *
 * ## Features
 *
 * - 🔍 **Search**: organizations by state, providers by specialty, or any registry filter
 * - 🆔 **Lookups**: single provider details by NPI
 * - 💾 **Export**: fixed-column CSV and JSON / JSON Lines
 * - 🏥 **Research**: category sweeps over organization names in a state
 * - 📊 **Charts**: PNG research summaries (`chart` feature)
 * - 🛡️ **Type Safe**: missing registry fields are explicit `Option`s
 *
 * ## Quick Start
 *
 * ```no_run
 * use npi_registry::prelude::*;
 *
 * # async fn run() -> Result<()> {
 * let client = NpiRegistryClient::new()?;
 *
 * // Organizations in New York
 * let orgs = client.search_ny_healthcare_organizations(10).await?;
 * for org in &orgs {
 *     println!("{} | {}", org.npi_str().unwrap_or("N/A"), org.display_name());
 * }
 *
 * // Providers by specialty
 * let cardiologists = client.search_by_specialty("Cardiology", "NY", 25).await?;
 *
 * // Export results
 * CsvExporter::new().export(&cardiologists, std::path::Path::new("cardiology.csv"))?;
 * # Ok(())
 * # }
 * ```
 *
 * ## Blocking Usage
 *
 * ```no_run
 * use npi_registry::blocking::NpiRegistryClient;
 *
 * # fn main() -> npi_registry::Result<()> {
 * let client = NpiRegistryClient::new()?;
 * let provider = client.get_provider_details("1234567893")?;
 * println!("{}", provider.display_name());
 * # Ok(())
 * # }
 * ```
 *
 * ## Custom Searches
 *
 * ```no_run
 * # use npi_registry::prelude::*;
 * # async fn run() -> Result<()> {
 * # let client = NpiRegistryClient::new()?;
 * let criteria = SearchCriteria::builder()
 *     .organization_name("Medical Center")
 *     .organizations_only()
 *     .city("Albany")
 *     .state("NY")
 *     .limit(200)
 *     .skip(200)
 *     .build();
 * let page = client.search_providers(&criteria).await?;
 * println!("{} total, {} returned", page.result_count, page.records.len());
 * # Ok(())
 * # }
 * ```
 *
 * ## Configuration
 *
 * ```no_run
 * # use npi_registry::prelude::*;
 * # fn main() -> Result<()> {
 * let config = ConfigBuilder::new()
 *     .timeout_seconds(Some(30))
 *     .progress_bar(false)
 *     .build();
 * npi_registry::config::set_global_config(config);
 *
 * // Or load defaults < config file < NPI_REGISTRY_* environment variables
 * let config = ClientConfig::load()?;
 * # Ok(())
 * # }
 * ```
 *
 * ## Limits
 *
 * The registry returns at most 1200 results per request. A `limit` of 0 or
 * above 1200 is rejected locally with a validation error. Page explicitly with
 * `skip` (at most 1000) to go further; the client never pages on its own.
 */

// Re-export error types from root
pub use error::{NpiRegistryError, Result};

// Public modules
pub mod data_types;
pub mod error;
pub mod query;
pub mod response;
pub mod mapping;
pub mod client;
pub mod blocking;
pub mod export;
pub mod research;
#[cfg(feature = "chart")]
pub mod chart;
pub mod config;

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```
/// use npi_registry::prelude::*;
/// ```
pub mod prelude {
    pub use crate::data_types::*;
    pub use crate::error::{NpiRegistryError, Result};
    pub use crate::query::{SearchCriteria, SearchCriteriaBuilder, MAX_LIMIT};
    pub use crate::client::{NpiRegistryClient, SearchResponse};
    pub use crate::export::{RecordExporter, CsvExporter, JsonExporter, ExportRow, ExportFormat};
    pub use crate::research::{Researcher, ResearchReport, ResearchCategory};
    pub use crate::config::{ClientConfig, ConfigBuilder};
}
