/*!
 * Data type definitions for NPI Registry records
 *
 * Type-safe representations of the provider data returned by the registry API.
 * Fields the registry may omit are `Option`s so that schema drift upstream shows
 * up as `None` instead of a silently empty string.
 */

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

use crate::NpiRegistryError;

/// NPI (National Provider Identifier) - 10 digit unique identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Npi(String);

impl Npi {
    /// Create a new NPI, validating format
    pub fn new(npi: impl Into<String>) -> Result<Self, NpiRegistryError> {
        let npi = npi.into();
        if npi.len() != 10 || !npi.chars().all(|c| c.is_ascii_digit()) {
            return Err(NpiRegistryError::invalid_npi(&npi));
        }
        Ok(Npi(npi))
    }

    /// Get the NPI as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Npi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Npi {
    type Err = NpiRegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Npi::new(s)
    }
}

/// Enumeration type (NPI-1 = Individual, NPI-2 = Organization)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnumerationType {
    Individual,
    Organization,
}

impl EnumerationType {
    /// Parse the registry's enumeration type code
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "NPI-1" | "1" => Some(EnumerationType::Individual),
            "NPI-2" | "2" => Some(EnumerationType::Organization),
            _ => None,
        }
    }

    /// Code used in the `enumeration_type` query parameter
    pub fn to_code(&self) -> &'static str {
        match self {
            EnumerationType::Individual => "NPI-1",
            EnumerationType::Organization => "NPI-2",
        }
    }
}

impl std::fmt::Display for EnumerationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnumerationType::Individual => write!(f, "Individual"),
            EnumerationType::Organization => write!(f, "Organization"),
        }
    }
}

/// Two-letter state abbreviation, normalized to uppercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateCode(String);

impl StateCode {
    pub fn new(code: &str) -> Result<Self, NpiRegistryError> {
        let trimmed = code.trim();
        if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(NpiRegistryError::invalid_state(code));
        }
        Ok(StateCode(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StateCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Address information (practice location or mailing)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Address {
    /// `LOCATION` or `MAILING`
    pub purpose: Option<String>,
    pub address_1: Option<String>,
    pub address_2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub telephone: Option<String>,
    pub country_code: Option<String>,
}

impl Address {
    /// Whether this is the practice location address
    pub fn is_location(&self) -> bool {
        self.purpose.as_deref()
            .map(|p| p.eq_ignore_ascii_case("LOCATION"))
            .unwrap_or(false)
    }

    /// Whether the address is in the given state (case-insensitive)
    pub fn in_state(&self, state: &str) -> bool {
        self.state.as_deref()
            .map(|s| s.eq_ignore_ascii_case(state))
            .unwrap_or(false)
    }

    /// Format as a single line address
    pub fn format_single_line(&self) -> String {
        [&self.address_1, &self.city, &self.state, &self.postal_code]
            .into_iter()
            .flatten()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Taxonomy (specialty) entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Taxonomy {
    pub code: Option<String>,
    pub desc: Option<String>,
    pub primary: bool,
    pub state: Option<String>,
    pub license: Option<String>,
}

/// Flattened provider record
///
/// One record per element of the registry's `results` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProviderRecord {
    pub npi: Option<Npi>,
    pub enumeration_type: Option<EnumerationType>,

    // Names
    pub organization_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub credential: Option<String>,

    pub addresses: Vec<Address>,
    pub taxonomies: Vec<Taxonomy>,

    // Dates and status
    pub enumeration_date: Option<NaiveDate>,
    pub last_updated: Option<NaiveDate>,
    pub status: Option<String>,
}

impl ProviderRecord {
    /// Organization name, or "first last" for individuals
    pub fn display_name(&self) -> String {
        if let Some(org) = self.organization_name.as_deref().filter(|s| !s.is_empty()) {
            return org.to_string();
        }

        [&self.first_name, &self.last_name]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The practice location address if present, else the first address
    pub fn primary_address(&self) -> Option<&Address> {
        self.addresses.iter()
            .find(|a| a.is_location())
            .or_else(|| self.addresses.first())
    }

    /// The taxonomy flagged primary if present, else the first one
    pub fn primary_taxonomy(&self) -> Option<&Taxonomy> {
        self.taxonomies.iter()
            .find(|t| t.primary)
            .or_else(|| self.taxonomies.first())
    }

    /// Whether any address is in the given state
    pub fn has_address_in(&self, state: &str) -> bool {
        self.addresses.iter().any(|a| a.in_state(state))
    }

    pub fn is_organization(&self) -> bool {
        self.enumeration_type == Some(EnumerationType::Organization)
    }

    /// NPI as a string slice, if known
    pub fn npi_str(&self) -> Option<&str> {
        self.npi.as_ref().map(Npi::as_str)
    }
}
