/*!
 * Integration tests for the async client against a wiremock registry.
 */

mod common;

use npi_registry::prelude::*;
use npi_registry::research::ResearchCategory;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;

async fn client_for(server: &MockServer) -> NpiRegistryClient {
    NpiRegistryClient::with_config(config_for(&server.uri())).expect("client build")
}

// =============================================================================
// Search operations
// =============================================================================

#[tokio::test]
async fn ny_organizations_sends_state_and_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("version", "2.1"))
        .and(query_param("state", "NY"))
        .and(query_param("enumeration_type", "NPI-2"))
        .and(query_param("limit", "10"))
        .and(query_param_is_missing("taxonomy_description"))
        .and(header("user-agent", TEST_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(results_body(vec![
            organization("1234567893", "MOUNT SINAI HOSPITAL", "NEW YORK", "NY"),
            organization("1922003444", "BELLEVUE HOSPITAL CENTER", "NEW YORK", "NY"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let orgs = client.search_ny_healthcare_organizations(10).await.expect("search should succeed");

    assert_eq!(orgs.len(), 2);
    assert_eq!(orgs[0].npi_str(), Some("1234567893"));
    assert_eq!(orgs[0].display_name(), "MOUNT SINAI HOSPITAL");
    assert!(orgs.iter().all(|o| o.is_organization()));
    assert_eq!(
        orgs[1].primary_address().and_then(|a| a.telephone.as_deref()),
        Some("212-555-0100")
    );
}

#[tokio::test]
async fn connectivity_check_reports_registry_count() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("version", "2.1"))
        .and(query_param("organization_name", "Hospital"))
        .and(query_param("limit", "1"))
        .and(query_param_is_missing("state"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result_count": 4821,
            "results": [organization("1234567893", "MOUNT SINAI HOSPITAL", "NEW YORK", "NY")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let total = client.check_connectivity().await.expect("registry reachable");
    assert_eq!(total, 4821);
}

#[tokio::test]
async fn connectivity_check_surfaces_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    match client.check_connectivity().await {
        Err(NpiRegistryError::Request { status, .. }) => assert_eq!(status, Some(503)),
        other => panic!("expected a request error, got {other:?}"),
    }
}

#[tokio::test]
async fn results_never_exceed_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results_body(vec![
            organization("1234567893", "A", "NEW YORK", "NY"),
            organization("1922003444", "B", "NEW YORK", "NY"),
            organization("1003000126", "C", "NEW YORK", "NY"),
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let orgs = client.search_ny_healthcare_organizations(2).await.unwrap();
    assert_eq!(orgs.len(), 2);
    assert_eq!(orgs[1].display_name(), "B");
}

#[tokio::test]
async fn specialty_search_with_no_matches_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("taxonomy_description", "Underwater Basket Weaving"))
        .and(query_param("state", "NY"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let records = client.search_by_specialty("Underwater Basket Weaving", "NY", 5).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn search_providers_reports_count_and_skip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("organization_name", "Clinic"))
        .and(query_param("city", "Albany"))
        .and(query_param("skip", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result_count": 1,
            "results": [organization("1234567893", "ALBANY CLINIC", "ALBANY", "NY")]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let criteria = SearchCriteria::builder()
        .organization_name("Clinic")
        .city("Albany")
        .limit(50)
        .skip(200)
        .build();
    let response = client.search_providers(&criteria).await.unwrap();
    assert_eq!(response.result_count, 1);
    assert_eq!(response.records[0].display_name(), "ALBANY CLINIC");
}

#[tokio::test]
async fn identical_searches_return_identical_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results_body(vec![
            organization("1234567893", "MOUNT SINAI HOSPITAL", "NEW YORK", "NY"),
        ])))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let first = client.search_by_specialty("Hospital", "NY", 5).await.unwrap();
    let second = client.search_by_specialty("Hospital", "NY", 5).await.unwrap();
    assert_eq!(first, second);
}

// =============================================================================
// Provider lookups
// =============================================================================

#[tokio::test]
async fn provider_details_returns_matching_npi() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("number", "1234567890"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results_body(vec![
            organization("1234567890", "EXAMPLE HEALTH", "BUFFALO", "NY"),
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let provider = client.get_provider_details("1234567890").await.unwrap();
    assert_eq!(provider.npi_str(), Some("1234567890"));
}

#[tokio::test]
async fn provider_details_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("number", "1234567890"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("number", "1111111111"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results_body(vec![
            organization("2222222222", "SOMEONE ELSE", "BUFFALO", "NY"),
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    match client.get_provider_details("1234567890").await {
        Err(NpiRegistryError::NotFound { npi }) => assert_eq!(npi, "1234567890"),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(client.get_provider_details("1111111111").await.unwrap_err().is_not_found());
}

// =============================================================================
// Error handling
// =============================================================================

#[tokio::test]
async fn invalid_limit_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_body()))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert!(client.search_ny_healthcare_organizations(0).await.unwrap_err().is_validation());
    assert!(client.search_by_specialty("Hospital", "NY", 1201).await.unwrap_err().is_validation());

    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}

#[tokio::test]
async fn upstream_errors_are_validation_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(errors_body(
            "Field state requires additional search criteria",
            "state",
        )))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    match client.search_ny_healthcare_organizations(10).await {
        Err(NpiRegistryError::Validation { message, field, .. }) => {
            assert!(message.contains("additional search criteria"));
            assert_eq!(field.as_deref(), Some("state"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_is_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    match client.search_by_specialty("Hospital", "NY", 5).await {
        Err(NpiRegistryError::Request { status, .. }) => assert_eq!(status, Some(500)),
        other => panic!("expected request error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    match client.search_ny_healthcare_organizations(10).await {
        Err(NpiRegistryError::Decode { .. }) => {}
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_fields_do_not_fail_batch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result_count": 2,
            "results": [
                {"number": 1234567893},
                organization("1922003444", "BELLEVUE HOSPITAL CENTER", "NEW YORK", "NY")
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let records = client.search_ny_healthcare_organizations(10).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].npi_str(), Some("1234567893"));
    assert_eq!(records[0].organization_name, None);
    assert!(records[0].addresses.is_empty());
}

// =============================================================================
// Export and research
// =============================================================================

#[tokio::test]
async fn csv_export_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results_body(vec![
            organization("1234567893", "MOUNT SINAI HOSPITAL", "NEW YORK", "NY"),
            organization("1922003444", "BELLEVUE HOSPITAL CENTER", "NEW YORK", "NY"),
            organization("1003000126", "LENOX HILL HOSPITAL", "NEW YORK", "NY"),
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let records = client.search_ny_healthcare_organizations(100).await.unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ny_orgs.csv");
    CsvExporter::new().export(&records, &path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, ExportRow::HEADERS);

    let rows: Vec<ExportRow> = reader.deserialize().collect::<std::result::Result<_, csv::Error>>().unwrap();
    assert_eq!(rows.len(), records.len());
    let npis: Vec<_> = rows.iter().map(|r| r.npi.clone().unwrap()).collect();
    assert_eq!(npis, ["1234567893", "1922003444", "1003000126"]);
    assert_eq!(rows[0], ExportRow::from(&records[0]));
}

#[tokio::test]
async fn research_keeps_in_state_results_and_skips_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("organization_name", "Hospital"))
        .and(query_param("enumeration_type", "NPI-2"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results_body(vec![
            organization("1234567893", "MOUNT SINAI HOSPITAL", "NEW YORK", "NY"),
            organization("1922003444", "HACKENSACK HOSPITAL", "HACKENSACK", "NJ"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("organization_name", "Clinic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results_body(vec![
            organization("1003000126", "ALBANY CLINIC", "ALBANY", "NY"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("organization_name", "Health Center"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let researcher = Researcher::new(&client).show_progress(false);
    let categories = vec![
        ResearchCategory::new("Hospitals", &["Hospital"]),
        ResearchCategory::new("Clinics", &["Clinic", "Health Center"]),
    ];
    let report = researcher.research_categories(&categories).await.unwrap();

    assert_eq!(report.total(), 2);
    assert_eq!(report.rows[0].organization_name.as_deref(), Some("MOUNT SINAI HOSPITAL"));
    assert_eq!(report.rows[0].search_term, "Hospital");
    assert_eq!(report.rows[1].category, "Clinics");
    assert_eq!(
        report.category_counts,
        vec![("Hospitals".to_string(), 1), ("Clinics".to_string(), 1)]
    );
    assert_eq!(report.failed_terms, vec!["Health Center".to_string()]);
}

#[tokio::test]
async fn major_organizations_filter_by_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("organization_name", "Montefiore"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results_body(vec![
            organization("1234567893", "MONTEFIORE MEDICAL CENTER", "BRONX", "NY"),
            organization("1922003444", "MONTEFIORE FLORIDA", "MIAMI", "FL"),
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let researcher = Researcher::new(&client).state("ny").unwrap();
    let found = researcher
        .search_major_organizations(&["Montefiore".to_string()])
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].company_name.as_deref(), Some("MONTEFIORE MEDICAL CENTER"));
    assert_eq!(found[0].city.as_deref(), Some("BRONX"));
}

#[tokio::test]
async fn research_rejects_bad_limit_up_front() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;
    let researcher = Researcher::new(&client).per_term_limit(0);
    let err = researcher
        .research_categories(&npi_registry::research::default_categories())
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
