/*!
 * Search criteria and query-parameter construction
 *
 * `SearchCriteria` holds every filter the registry accepts. It is validated
 * locally before a request is sent, so out-of-range limits and malformed
 * identifiers never reach the network.
 */

use serde::{Deserialize, Serialize};

use crate::data_types::{EnumerationType, Npi, StateCode};
use crate::{NpiRegistryError, Result};

/// Maximum number of results the registry returns per request
pub const MAX_LIMIT: u32 = 1200;

/// Maximum offset the registry accepts in `skip`
pub const MAX_SKIP: u32 = 1000;

/// Limit used when the caller does not choose one
pub const DEFAULT_LIMIT: u32 = 100;

/// Registry API version sent with every request
pub const DEFAULT_API_VERSION: &str = "2.1";

/// Filters for a registry search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub number: Option<String>,
    pub enumeration_type: Option<EnumerationType>,
    pub taxonomy_description: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub organization_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub limit: u32,
    pub skip: Option<u32>,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            number: None,
            enumeration_type: None,
            taxonomy_description: None,
            first_name: None,
            last_name: None,
            organization_name: None,
            city: None,
            state: None,
            postal_code: None,
            limit: DEFAULT_LIMIT,
            skip: None,
        }
    }
}

impl SearchCriteria {
    /// Start building criteria
    pub fn builder() -> SearchCriteriaBuilder {
        SearchCriteriaBuilder::new()
    }

    /// Organizations in a state
    pub fn organizations_in(state: &str, limit: u32) -> Self {
        Self::builder()
            .enumeration_type(EnumerationType::Organization)
            .state(state)
            .limit(limit)
            .build()
    }

    /// Providers with a taxonomy description in a state
    pub fn specialty_in(specialty: &str, state: &str, limit: u32) -> Self {
        Self::builder()
            .taxonomy_description(specialty)
            .state(state)
            .limit(limit)
            .build()
    }

    /// Exact lookup by NPI
    pub fn by_number(npi: &Npi) -> Self {
        Self::builder()
            .number(npi.as_str())
            .limit(1)
            .build()
    }

    fn has_filter(&self) -> bool {
        [
            &self.number,
            &self.taxonomy_description,
            &self.first_name,
            &self.last_name,
            &self.organization_name,
            &self.city,
            &self.state,
            &self.postal_code,
        ]
        .iter()
        .any(|f| f.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false))
            || self.enumeration_type.is_some()
    }

    /// Check the criteria without touching the network
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(NpiRegistryError::invalid_limit(self.limit, MAX_LIMIT));
        }

        if let Some(skip) = self.skip {
            if skip > MAX_SKIP {
                return Err(NpiRegistryError::invalid_skip(skip, MAX_SKIP));
            }
        }

        if let Some(state) = &self.state {
            StateCode::new(state)?;
        }

        if let Some(number) = &self.number {
            Npi::new(number.trim())?;
        }

        if !self.has_filter() {
            return Err(NpiRegistryError::Validation {
                message: "at least one search filter is required".to_string(),
                field: None,
                value: None,
                suggestion: Some("Add a state, name, specialty, or NPI number".to_string()),
            });
        }

        Ok(())
    }

    /// Encode as registry query parameters, `version` first
    ///
    /// Empty string filters are omitted. The state is uppercased.
    pub fn to_query_params(&self, api_version: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![("version", api_version.to_string())];

        let mut push = |key: &'static str, value: &Option<String>| {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                params.push((key, v.to_string()));
            }
        };

        push("number", &self.number);
        push("taxonomy_description", &self.taxonomy_description);
        push("first_name", &self.first_name);
        push("last_name", &self.last_name);
        push("organization_name", &self.organization_name);
        push("city", &self.city);
        push("state", &self.state.as_ref().map(|s| s.trim().to_ascii_uppercase()));
        push("postal_code", &self.postal_code);

        if let Some(enumeration_type) = self.enumeration_type {
            params.push(("enumeration_type", enumeration_type.to_code().to_string()));
        }
        params.push(("limit", self.limit.to_string()));
        if let Some(skip) = self.skip {
            params.push(("skip", skip.to_string()));
        }

        params
    }
}

/// Builder for `SearchCriteria`
#[derive(Debug, Clone, Default)]
pub struct SearchCriteriaBuilder {
    criteria: SearchCriteria,
}

impl SearchCriteriaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number(mut self, number: impl Into<String>) -> Self {
        self.criteria.number = Some(number.into());
        self
    }

    pub fn enumeration_type(mut self, enumeration_type: EnumerationType) -> Self {
        self.criteria.enumeration_type = Some(enumeration_type);
        self
    }

    pub fn organizations_only(self) -> Self {
        self.enumeration_type(EnumerationType::Organization)
    }

    pub fn taxonomy_description(mut self, specialty: impl Into<String>) -> Self {
        self.criteria.taxonomy_description = Some(specialty.into());
        self
    }

    pub fn first_name(mut self, name: impl Into<String>) -> Self {
        self.criteria.first_name = Some(name.into());
        self
    }

    pub fn last_name(mut self, name: impl Into<String>) -> Self {
        self.criteria.last_name = Some(name.into());
        self
    }

    pub fn organization_name(mut self, name: impl Into<String>) -> Self {
        self.criteria.organization_name = Some(name.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.criteria.city = Some(city.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.criteria.state = Some(state.into());
        self
    }

    pub fn postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.criteria.postal_code = Some(postal_code.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.criteria.limit = limit;
        self
    }

    pub fn skip(mut self, skip: u32) -> Self {
        self.criteria.skip = Some(skip);
        self
    }

    pub fn build(self) -> SearchCriteria {
        self.criteria
    }
}
