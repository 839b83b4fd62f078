/*!
 * Shared fixtures for the mock-registry integration tests.
 */

#![allow(dead_code)]

use npi_registry::config::{ClientConfig, ConfigBuilder};
use serde_json::{json, Value};

pub const TEST_USER_AGENT: &str = "npi-registry-tests";

/// Config pointing at a mock server's `/api/` endpoint
pub fn config_for(server_uri: &str) -> ClientConfig {
    ConfigBuilder::new()
        .base_url(format!("{}/api/", server_uri))
        .user_agent(TEST_USER_AGENT)
        .timeout_seconds(Some(5))
        .progress_bar(false)
        .build()
}

/// A registry organization result located in `state`
pub fn organization(npi: &str, name: &str, city: &str, state: &str) -> Value {
    json!({
        "number": npi,
        "enumeration_type": "NPI-2",
        "basic": {
            "organization_name": name,
            "enumeration_date": "2007-03-12",
            "last_updated": "2023-01-30",
            "status": "A"
        },
        "addresses": [
            {
                "address_purpose": "LOCATION",
                "address_1": "100 MAIN ST",
                "city": city,
                "state": state,
                "postal_code": "100010000",
                "telephone_number": "212-555-0100",
                "country_code": "US"
            },
            {
                "address_purpose": "MAILING",
                "address_1": "PO BOX 9",
                "city": city,
                "state": state,
                "postal_code": "100010009"
            }
        ],
        "taxonomies": [
            {"code": "282N00000X", "desc": "General Acute Care Hospital", "primary": true, "state": state, "license": "LIC-1"}
        ]
    })
}

/// A registry body with the given results
pub fn results_body(results: Vec<Value>) -> Value {
    json!({
        "result_count": results.len(),
        "results": results
    })
}

pub fn empty_body() -> Value {
    json!({"result_count": 0, "results": []})
}

pub fn errors_body(description: &str, field: &str) -> Value {
    json!({
        "Errors": [
            {"description": description, "field": field, "number": "07"}
        ]
    })
}
