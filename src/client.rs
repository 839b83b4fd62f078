/*!
 * HTTP client for the NPI Registry API
 *
 * Each operation validates its input, issues exactly one GET against the
 * configured endpoint, and maps the JSON body into `ProviderRecord`s. There is
 * no retry: any failure is returned to the caller as-is.
 */

use std::time::Duration;

use tracing::{debug, info};

use crate::config::{global_config, ClientConfig};
use crate::data_types::{Npi, ProviderRecord};
use crate::mapping::map_results;
use crate::query::SearchCriteria;
use crate::response::ApiResponse;
use crate::{NpiRegistryError, Result};

/// State searched by `search_ny_healthcare_organizations`
pub const NEW_YORK: &str = "NY";

/// Outcome of a general search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    /// Count reported by the registry (falls back to the number of records)
    pub result_count: u64,
    /// Mapped records, never more than the requested limit
    pub records: Vec<ProviderRecord>,
}

impl SearchResponse {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Async client for the registry
#[derive(Debug, Clone)]
pub struct NpiRegistryClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl NpiRegistryClient {
    /// Create a client from the global configuration
    pub fn new() -> Result<Self> {
        Self::with_config(global_config())
    }

    /// Create a client with an explicit configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str());
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        let http = builder.build().map_err(|e| NpiRegistryError::Request {
            message: format!("Failed to create HTTP client: {}", e),
            url: None,
            status: None,
            suggestion: Some("Check your network configuration".to_string()),
        })?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run a search with arbitrary criteria
    pub async fn search_providers(&self, criteria: &SearchCriteria) -> Result<SearchResponse> {
        criteria.validate()?;

        let params = criteria.to_query_params(&self.config.api_version);
        debug!(url = %self.config.base_url, ?params, "sending registry request");

        let response = self.http
            .get(&self.config.base_url)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NpiRegistryError::http_status(status.as_u16(), response.url().as_str()));
        }

        let body = response.text().await?;
        let parsed: ApiResponse = serde_json::from_str(&body).map_err(|e| NpiRegistryError::Decode {
            message: format!("Unexpected registry response: {}", e),
        })?;

        if let Some(errors) = &parsed.errors {
            return Err(NpiRegistryError::from_api_errors(errors));
        }

        let result_count = parsed.result_count;
        let records = map_results(parsed.results, criteria.limit as usize);
        let result_count = result_count.unwrap_or(records.len() as u64);
        info!(result_count, returned = records.len(), "registry search complete");

        Ok(SearchResponse { result_count, records })
    }

    /// Run a search and return only the records
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<ProviderRecord>> {
        Ok(self.search_providers(criteria).await?.records)
    }

    /// Organizations (NPI-2) located in New York
    pub async fn search_ny_healthcare_organizations(
        &self,
        limit: u32,
    ) -> Result<Vec<ProviderRecord>> {
        self.search_organizations_in_state(NEW_YORK, limit).await
    }

    /// Organizations (NPI-2) located in a state
    pub async fn search_organizations_in_state(
        &self,
        state: &str,
        limit: u32,
    ) -> Result<Vec<ProviderRecord>> {
        self.search(&SearchCriteria::organizations_in(state, limit)).await
    }

    /// Providers whose taxonomy description matches `specialty` in a state
    pub async fn search_by_specialty(
        &self,
        specialty: &str,
        state: &str,
        limit: u32,
    ) -> Result<Vec<ProviderRecord>> {
        if specialty.trim().is_empty() {
            return Err(NpiRegistryError::Validation {
                message: "specialty cannot be empty".to_string(),
                field: Some("taxonomy_description".to_string()),
                value: Some(specialty.to_string()),
                suggestion: Some("Use a taxonomy description such as Cardiology".to_string()),
            });
        }
        self.search(&SearchCriteria::specialty_in(specialty, state, limit)).await
    }

    /// Look up a single provider by exact NPI
    pub async fn get_provider_details(&self, npi: &str) -> Result<ProviderRecord> {
        let npi = Npi::new(npi.trim())?;
        let records = self.search(&SearchCriteria::by_number(&npi)).await?;

        records.into_iter()
            .find(|record| record.npi.as_ref() == Some(&npi))
            .ok_or_else(|| NpiRegistryError::NotFound {
                npi: npi.to_string(),
            })
    }

    /// Cheap query used to confirm the registry is reachable
    ///
    /// Returns the reported result count for organizations named "Hospital".
    pub async fn check_connectivity(&self) -> Result<u64> {
        let criteria = SearchCriteria::builder()
            .organization_name("Hospital")
            .limit(1)
            .build();
        Ok(self.search_providers(&criteria).await?.result_count)
    }
}
