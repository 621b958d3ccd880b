//! Integration tests for `StoreClient` using wiremock HTTP mocks.

use jobflow_core::{CanonicalJob, JobId, JobSource};
use jobflow_store::{StoreClient, StoreError, UpsertOutcome};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER: &str = "6f1c2a34-8d0e-4a57-9b1e-2f3c4d5e6f70";

fn test_client(base_url: &str) -> StoreClient {
    StoreClient::new(base_url, "service-key", 30).expect("client construction should not fail")
}

fn job(native_id: &str) -> CanonicalJob {
    CanonicalJob {
        external_id: format!("linkedin_{native_id}"),
        source: JobSource::Linkedin,
        title: "X".to_string(),
        company: "Acme".to_string(),
        location: "Remote".to_string(),
        description: String::new(),
        url: format!("https://www.linkedin.com/jobs/view/{native_id}"),
        salary: None,
        search_title: "Data Engineer".to_string(),
    }
}

/// The row the store echoes back for a fresh insert.
fn stored(native_id: &str) -> serde_json::Value {
    json!({ "id": 1, "external_id": format!("linkedin_{native_id}") })
}

fn user_id() -> Uuid {
    Uuid::parse_str(USER).expect("fixture uuid")
}

// -----------------------------------------------------------------------
// upsert
// -----------------------------------------------------------------------

#[tokio::test]
async fn upsert_sends_credentials_and_conflict_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/jobs"))
        .and(query_param("on_conflict", "external_id"))
        .and(header("apikey", "service-key"))
        .and(header("authorization", "Bearer service-key"))
        .and(header("prefer", "resolution=ignore-duplicates,return=representation"))
        .and(body_partial_json(json!({
            "external_id": "linkedin_A1",
            "source": "linkedin",
            "search_title": "Data Engineer"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([stored("A1")])))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_client(&server.uri()).upsert_job(&job("A1")).await;
    assert_eq!(outcome, UpsertOutcome::Inserted);
}

#[tokio::test]
async fn second_upsert_of_same_id_reports_zero_inserted() {
    let server = MockServer::start().await;

    // With ignore-duplicates the store answers 201 both times; only the
    // first echo carries the row.
    Mock::given(method("POST"))
        .and(path("/rest/v1/jobs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([stored("A1")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/jobs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let batch = vec![job("A1")];

    let first = client.upsert_jobs(&batch).await;
    let second = client.upsert_jobs(&batch).await;

    assert_eq!(first.inserted, 1);
    assert_eq!(first.already_present, 0);
    assert_eq!(second.inserted, 0);
    assert_eq!(second.already_present, 1);
    assert!(second.failed.is_empty());
}

#[tokio::test]
async fn unique_violation_counts_as_already_present() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/jobs"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_client(&server.uri()).upsert_job(&job("A1")).await;
    assert_eq!(outcome, UpsertOutcome::AlreadyPresent);
}

#[tokio::test]
async fn failing_row_does_not_abort_batch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/jobs"))
        .and(body_partial_json(json!({ "external_id": "linkedin_bad" })))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid input syntax"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/jobs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([stored("A1")])))
        .mount(&server)
        .await;

    let report = test_client(&server.uri())
        .upsert_jobs(&[job("A1"), job("bad"), job("A2")])
        .await;

    assert_eq!(report.inserted, 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].external_id, "linkedin_bad");
    assert!(report.failed[0].reason.contains("400"));
}

// -----------------------------------------------------------------------
// reads
// -----------------------------------------------------------------------

#[tokio::test]
async fn search_titles_are_trimmed_and_deduplicated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/job_titles"))
        .and(query_param("select", "title"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "title": "Data Engineer" },
            { "title": " Data Engineer " },
            { "title": "" },
            { "title": null },
            { "title": "Nurse" }
        ])))
        .mount(&server)
        .await;

    let titles = test_client(&server.uri())
        .fetch_search_titles(None)
        .await
        .expect("titles should parse");

    assert_eq!(
        titles.into_iter().collect::<Vec<_>>(),
        vec!["Data Engineer".to_string(), "Nurse".to_string()]
    );
}

#[tokio::test]
async fn search_titles_can_be_scoped_to_one_user() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/job_titles"))
        .and(query_param("user_id", format!("eq.{USER}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "title": "Welder" }])))
        .expect(1)
        .mount(&server)
        .await;

    let titles = test_client(&server.uri())
        .fetch_search_titles(Some(user_id()))
        .await
        .expect("titles should parse");
    assert!(titles.contains("Welder"));
}

#[tokio::test]
async fn subscribers_are_filtered_to_subscribed_profiles() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("is_subscribed", "eq.true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": USER, "email": "a@example.com", "unsubscribe_token": "tok-a" },
            {
                "id": "11111111-2222-3333-4444-555555555555",
                "email": "b@example.com",
                "unsubscribe_token": "tok-b",
                "is_subscribed": false
            }
        ])))
        .mount(&server)
        .await;

    let subscribers = test_client(&server.uri())
        .fetch_subscribers()
        .await
        .expect("profiles should parse");

    assert_eq!(subscribers.len(), 1);
    assert_eq!(subscribers[0].email, "a@example.com");
    assert_eq!(subscribers[0].id, user_id());
}

#[tokio::test]
async fn sent_job_ids_accept_text_and_integer_ids() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/email_logs"))
        .and(query_param("user_id", format!("eq.{USER}")))
        .and(query_param("select", "job_id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "job_id": "J1" },
            { "job_id": 42 }
        ])))
        .mount(&server)
        .await;

    let sent = test_client(&server.uri())
        .fetch_sent_job_ids(user_id())
        .await
        .expect("logs should parse");

    assert!(sent.contains(&JobId::new("J1")));
    assert!(sent.contains(&JobId::new("42")));
}

#[tokio::test]
async fn recent_jobs_query_uses_in_filter_order_and_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/jobs"))
        .and(query_param("search_title", r#"in.("Data Engineer","Nurse")"#))
        .and(query_param("order", "scraped_at.desc"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "J3",
                "external_id": "linkedin_A3",
                "source": "linkedin",
                "title": "Data Engineer",
                "company": null,
                "location": "Remote",
                "url": "https://www.linkedin.com/jobs/view/A3",
                "salary": null,
                "search_title": "Data Engineer",
                "scraped_at": "2026-10-18T07:00:00Z"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let jobs = test_client(&server.uri())
        .fetch_recent_matching_jobs(["Data Engineer", "Nurse"], 20)
        .await
        .expect("jobs should parse");

    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id, JobId::new("J3"));
    assert!(jobs[0].company.is_none());
    assert!(jobs[0].scraped_at.is_some());
}

#[tokio::test]
async fn recent_jobs_with_no_titles_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let jobs = test_client(&server.uri())
        .fetch_recent_matching_jobs(Vec::<String>::new(), 20)
        .await
        .expect("empty titles is not an error");
    assert!(jobs.is_empty());
}

#[tokio::test]
async fn read_error_status_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_subscribers()
        .await
        .expect_err("401 should be an error");

    assert!(matches!(err, StoreError::Api { status: 401, .. }));
}

// -----------------------------------------------------------------------
// delivery receipts
// -----------------------------------------------------------------------

#[tokio::test]
async fn record_delivery_posts_email_log() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/email_logs"))
        .and(body_json(json!({ "user_id": USER, "job_id": "J3" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server.uri())
        .record_delivery(user_id(), &JobId::new("J3"))
        .await;
}

#[tokio::test]
async fn record_delivery_failure_is_swallowed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/email_logs"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    // Must return normally.
    test_client(&server.uri())
        .record_delivery(user_id(), &JobId::new("J3"))
        .await;
}
