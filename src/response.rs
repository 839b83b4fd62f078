/*!
 * Raw response shapes of the NPI Registry API (version 2.1)
 *
 * These mirror the JSON as the registry sends it. Everything is optional or
 * defaulted; `mapping` turns them into `ProviderRecord`s.
 */

use serde::{Deserialize, Deserializer};

/// Top-level response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub result_count: Option<u64>,
    #[serde(default)]
    pub results: Vec<ApiResult>,
    /// Present instead of `results` when the registry rejects the query
    #[serde(default, rename = "Errors")]
    pub errors: Option<Vec<ApiErrorDetail>>,
}

/// A single entry of the registry's `Errors` array
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub field: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiResult {
    /// Sent as a string in 2.1, as an integer by older versions
    #[serde(default, deserialize_with = "lenient_string")]
    pub number: Option<String>,
    #[serde(default)]
    pub enumeration_type: Option<String>,
    #[serde(default)]
    pub basic: Option<ApiBasic>,
    #[serde(default)]
    pub addresses: Vec<ApiAddress>,
    #[serde(default)]
    pub taxonomies: Vec<ApiTaxonomy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiBasic {
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub credential: Option<String>,
    #[serde(default)]
    pub enumeration_date: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiAddress {
    #[serde(default)]
    pub address_purpose: Option<String>,
    #[serde(default)]
    pub address_1: Option<String>,
    #[serde(default)]
    pub address_2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub telephone_number: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiTaxonomy {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub primary: Option<bool>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
}

/// Accept a string, a number, or null for string-ish fields
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}
