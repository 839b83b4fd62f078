/*!
 * Projection of raw registry results into `ProviderRecord`s.
 *
 * Mapping never fails: a field that is missing or unparseable becomes `None`
 * so one odd record cannot sink a whole batch.
 */

use chrono::NaiveDate;
use tracing::debug;

use crate::data_types::{Address, EnumerationType, Npi, ProviderRecord, Taxonomy};
use crate::response::{ApiAddress, ApiResult, ApiTaxonomy};

/// Date formats the registry has used for `enumeration_date`/`last_updated`
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Map every result, keeping at most `limit` records in response order
pub fn map_results(results: Vec<ApiResult>, limit: usize) -> Vec<ProviderRecord> {
    results.into_iter()
        .take(limit)
        .map(map_result)
        .collect()
}

/// Map a single raw result
pub fn map_result(result: ApiResult) -> ProviderRecord {
    let npi = result.number.as_deref().and_then(|raw| match Npi::new(raw.trim()) {
        Ok(npi) => Some(npi),
        Err(_) => {
            debug!(number = raw, "registry returned a malformed NPI");
            None
        }
    });

    let enumeration_type = result.enumeration_type.as_deref().and_then(EnumerationType::from_code);
    let basic = result.basic.unwrap_or_default();

    ProviderRecord {
        npi,
        enumeration_type,
        organization_name: non_empty(basic.organization_name),
        first_name: non_empty(basic.first_name),
        last_name: non_empty(basic.last_name),
        credential: non_empty(basic.credential),
        addresses: result.addresses.into_iter().map(map_address).collect(),
        taxonomies: result.taxonomies.into_iter().map(map_taxonomy).collect(),
        enumeration_date: basic.enumeration_date.as_deref().and_then(parse_date),
        last_updated: basic.last_updated.as_deref().and_then(parse_date),
        status: non_empty(basic.status),
    }
}

fn map_address(address: ApiAddress) -> Address {
    Address {
        purpose: non_empty(address.address_purpose),
        address_1: non_empty(address.address_1),
        address_2: non_empty(address.address_2),
        city: non_empty(address.city),
        state: non_empty(address.state),
        postal_code: non_empty(address.postal_code),
        telephone: non_empty(address.telephone_number),
        country_code: non_empty(address.country_code),
    }
}

fn map_taxonomy(taxonomy: ApiTaxonomy) -> Taxonomy {
    Taxonomy {
        code: non_empty(taxonomy.code),
        desc: non_empty(taxonomy.desc),
        primary: taxonomy.primary.unwrap_or(false),
        state: non_empty(taxonomy.state),
        license: non_empty(taxonomy.license),
    }
}

/// Trim, and treat blank strings as absent
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = DATE_FORMATS.iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok());
    if parsed.is_none() {
        debug!(value = raw, "unparseable registry date");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ApiResponse;

    const SAMPLE: &str = r#"{
        "result_count": 2,
        "results": [
            {
                "number": "1234567893",
                "enumeration_type": "NPI-2",
                "basic": {
                    "organization_name": "MOUNT SINAI HOSPITAL",
                    "enumeration_date": "2006-05-23",
                    "last_updated": "2021-07-19",
                    "status": "A"
                },
                "addresses": [
                    {
                        "address_purpose": "MAILING", "address_1": "PO BOX 1",
                        "city": "NEW YORK", "state": "NY", "postal_code": "100290001"
                    },
                    {
                        "address_purpose": "LOCATION", "address_1": "1 GUSTAVE L LEVY PL",
                        "city": "NEW YORK", "state": "NY", "postal_code": "100296574",
                        "telephone_number": "212-241-6500"
                    }
                ],
                "taxonomies": [
                    {
                        "code": "282N00000X", "desc": "General Acute Care Hospital",
                        "primary": true, "state": "NY", "license": "7002053H"
                    }
                ]
            },
            {
                "number": "not-an-npi",
                "basic": {"first_name": "JANE", "last_name": "DOE", "enumeration_date": "someday"}
            }
        ]
    }"#;

    fn sample() -> Vec<ApiResult> {
        serde_json::from_str::<ApiResponse>(SAMPLE).unwrap().results
    }

    #[test]
    fn test_maps_full_record() {
        let records = map_results(sample(), 10);
        assert_eq!(records.len(), 2);

        let hospital = &records[0];
        assert_eq!(hospital.npi_str(), Some("1234567893"));
        assert!(hospital.is_organization());
        assert_eq!(hospital.display_name(), "MOUNT SINAI HOSPITAL");
        assert_eq!(hospital.enumeration_date, NaiveDate::from_ymd_opt(2006, 5, 23));
        assert_eq!(hospital.status.as_deref(), Some("A"));

        let location = hospital.primary_address().unwrap();
        assert_eq!(location.address_1.as_deref(), Some("1 GUSTAVE L LEVY PL"));
        assert_eq!(location.telephone.as_deref(), Some("212-241-6500"));

        let taxonomy = hospital.primary_taxonomy().unwrap();
        assert_eq!(taxonomy.code.as_deref(), Some("282N00000X"));
        assert!(taxonomy.primary);
    }

    #[test]
    fn test_missing_fields_degrade_to_none() {
        let records = map_results(sample(), 10);
        let person = &records[1];
        assert_eq!(person.npi, None);
        assert_eq!(person.enumeration_type, None);
        assert_eq!(person.enumeration_date, None);
        assert_eq!(person.organization_name, None);
        assert!(person.addresses.is_empty());
        assert_eq!(person.display_name(), "JANE DOE");
    }

    #[test]
    fn test_limit_truncates_in_order() {
        let records = map_results(sample(), 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].npi_str(), Some("1234567893"));
    }

    #[test]
    fn test_blank_strings_are_none() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some(" NY ".to_string())).as_deref(), Some("NY"));
        assert_eq!(parse_date("07/19/2021"), NaiveDate::from_ymd_opt(2021, 7, 19));
        assert_eq!(parse_date(""), None);
    }
}
