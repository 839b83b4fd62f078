/*!
 * Blocking facade over [`crate::client::NpiRegistryClient`].
 *
 * Owns a current-thread tokio runtime and blocks on each call. Do not use it
 * from inside an async context; use the async client there.
 */

use tokio::runtime::{Builder, Runtime};

use crate::client::{self, SearchResponse};
use crate::config::{global_config, ClientConfig};
use crate::data_types::ProviderRecord;
use crate::query::SearchCriteria;
use crate::Result;

/// Synchronous registry client
#[derive(Debug)]
pub struct NpiRegistryClient {
    inner: client::NpiRegistryClient,
    runtime: Runtime,
}

impl NpiRegistryClient {
    /// Create a client from the global configuration
    pub fn new() -> Result<Self> {
        Self::with_config(global_config())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let inner = client::NpiRegistryClient::with_config(config)?;
        Ok(Self { inner, runtime })
    }

    pub fn config(&self) -> &ClientConfig {
        self.inner.config()
    }

    pub fn search_providers(&self, criteria: &SearchCriteria) -> Result<SearchResponse> {
        self.runtime.block_on(self.inner.search_providers(criteria))
    }

    pub fn search(&self, criteria: &SearchCriteria) -> Result<Vec<ProviderRecord>> {
        self.runtime.block_on(self.inner.search(criteria))
    }

    pub fn search_ny_healthcare_organizations(&self, limit: u32) -> Result<Vec<ProviderRecord>> {
        self.runtime.block_on(self.inner.search_ny_healthcare_organizations(limit))
    }

    pub fn search_by_specialty(
        &self,
        specialty: &str,
        state: &str,
        limit: u32,
    ) -> Result<Vec<ProviderRecord>> {
        self.runtime.block_on(self.inner.search_by_specialty(specialty, state, limit))
    }

    pub fn get_provider_details(&self, npi: &str) -> Result<ProviderRecord> {
        self.runtime.block_on(self.inner.get_provider_details(npi))
    }
}
