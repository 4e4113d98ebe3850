//! Resource operations end to end: paths, envelopes, pagination.

mod common;

use anyhow::Result;
use futures::TryStreamExt;
use serde_json::json;
use servicetrade::{Error, Job, Resource};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use common::*;

#[tokio::test]
async fn test_job_list_defaults_to_scheduled() -> Result<()> {
    let server = setup_mock_server().await;
    let client = token_client(&server, "tok");

    Mock::given(method("GET"))
        .and(path("/api/job"))
        .and(query_param("status", "scheduled"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "100"))
        .respond_with(success_response(json!({
            "data": {
                "totalPages": 1,
                "page": 1,
                "jobs": [
                    {"id": 1, "name": "Test Job 1", "status": "scheduled"},
                    {"id": 2, "name": "Test Job 2", "status": "scheduled"}
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client.jobs().list(json!({}), 1, 100).await?;
    assert_eq!(page.len(), 2);
    assert_eq!(page.total_count, 2);
    assert!(!page.has_more());
    assert!(page.iter().all(Job::is_scheduled));
    assert_eq!(page.first().and_then(|j| j.name.as_deref()), Some("Test Job 1"));
    Ok(())
}

#[tokio::test]
async fn test_job_list_keeps_explicit_status() -> Result<()> {
    let server = setup_mock_server().await;
    let client = token_client(&server, "tok");

    Mock::given(method("GET"))
        .and(path("/api/job"))
        .and(query_param("status", "completed"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "25"))
        .respond_with(success_response(json!({
            "data": {"total": 60, "page": 2, "per_page": 25, "jobs": [{"id": 26, "status": "completed"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client.jobs().list(json!({"status": "completed"}), 2, 25).await?;
    assert_eq!(page.total_count, 60);
    assert!(page.has_more());
    assert!(page.items[0].is_completed());
    Ok(())
}

#[tokio::test]
async fn test_all_walks_every_page() -> Result<()> {
    let server = setup_mock_server().await;
    let client = token_client(&server, "tok");

    Mock::given(method("GET"))
        .and(path("/api/location"))
        .and(query_param("page", "1"))
        .respond_with(success_response(json!({
            "data": {"total": 3, "page": 1, "per_page": 2, "locations": [{"id": 1}, {"id": 2}]}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/location"))
        .and(query_param("page", "2"))
        .respond_with(success_response(json!({
            "data": {"total": 3, "page": 2, "per_page": 2, "locations": [{"id": 3}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let locations: Vec<_> = client
        .locations()
        .all(json!({"status": "active"}), 2)
        .try_collect()
        .await?;
    let ids: Vec<_> = locations.iter().filter_map(|l| l.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    Ok(())
}

#[tokio::test]
async fn test_all_stops_on_error() -> Result<()> {
    let server = setup_mock_server().await;
    let client = token_client(&server, "tok");

    Mock::given(method("GET"))
        .and(path("/api/company"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&server)
        .await;

    let result: Result<Vec<_>, Error> = client.companies().all(json!({}), 50).try_collect().await;
    assert!(matches!(result, Err(Error::Api { status: 500, .. })));
    Ok(())
}

#[tokio::test]
async fn test_list_accepts_bare_data_array() -> Result<()> {
    let server = setup_mock_server().await;
    let client = token_client(&server, "tok");

    Mock::given(method("GET"))
        .and(path("/api/contact"))
        .respond_with(success_response(json!({
            "data": [{"id": 14, "firstName": "John", "lastName": "Doe", "email": "john@example.com"}]
        })))
        .mount(&server)
        .await;

    let page = client.contacts().list(json!({}), 1, 100).await?;
    let contact = page.first().expect("one contact");
    assert_eq!(contact.full_name(), "John Doe");
    assert!(contact.has_email());
    Ok(())
}

#[tokio::test]
async fn test_find_keeps_unknown_fields() -> Result<()> {
    let server = setup_mock_server().await;
    let client = token_client(&server, "tok");

    Mock::given(method("GET"))
        .and(path("/api/job/123"))
        .respond_with(success_response(json!({
            "data": {
                "id": 123,
                "name": "Test Job",
                "customName": "Custom Name",
                "number": 4411,
                "fooBarBaz": "kept"
            }
        })))
        .mount(&server)
        .await;

    let job = client.jobs().find(123).await?;
    assert_eq!(job.id, Some(123));
    assert_eq!(job.custom_name.as_deref(), Some("Custom Name"));
    assert_eq!(job.number.as_deref(), Some("4411"));
    assert_eq!(job.attributes().get("fooBarBaz"), Some(&json!("kept")));
    Ok(())
}

#[tokio::test]
async fn test_find_missing_record() -> Result<()> {
    let server = setup_mock_server().await;
    let client = token_client(&server, "tok");

    Mock::given(method("GET"))
        .and(path("/api/region/999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.regions().find(999).await.unwrap_err();
    assert!(err.is_not_found());
    Ok(())
}

#[tokio::test]
async fn test_create_update_delete() -> Result<()> {
    let server = setup_mock_server().await;
    let client = token_client(&server, "tok");

    Mock::given(method("POST"))
        .and(path("/api/company"))
        .and(body_json(json!({"name": "Acme Fire"})))
        .respond_with(success_response(json!({"data": {"id": 40, "name": "Acme Fire", "status": "active"}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/company/40"))
        .and(body_json(json!({"status": "inactive"})))
        .respond_with(success_response(json!({"data": {"id": 40, "name": "Acme Fire", "status": "inactive"}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/company/40"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let companies = client.companies();
    let created = companies.create(json!({"name": "Acme Fire"})).await?;
    assert!(created.is_active());

    let updated = companies.update(40, json!({"status": "inactive"})).await?;
    assert!(updated.is_inactive());

    companies.delete(40).await?;
    Ok(())
}

#[tokio::test]
async fn test_job_add_task_responses() -> Result<()> {
    let server = setup_mock_server().await;
    let client = token_client(&server, "tok");

    let responses = json!([{"taskId": 1, "response": "pass"}]);
    Mock::given(method("POST"))
        .and(path("/api/job/12/taskresponses"))
        .and(body_json(json!({"task_responses": responses.clone()})))
        .respond_with(success_response(json!({"data": {"saved": 1}})))
        .expect(1)
        .mount(&server)
        .await;

    let saved = client.jobs().add_task_responses(12, responses).await?;
    assert_eq!(saved, json!({"saved": 1}));
    Ok(())
}

#[tokio::test]
async fn test_location_merge_assets_and_comments() -> Result<()> {
    let server = setup_mock_server().await;
    let client = token_client(&server, "tok");

    Mock::given(method("POST"))
        .and(path("/api/location/10/merge"))
        .and(body_json(json!({"replacement_id": 20})))
        .respond_with(success_response(json!({"data": {"id": 20, "name": "Survivor"}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/location/20/asset"))
        .respond_with(success_response(json!({"data": {"assets": [{"id": 1}, {"id": 2}]}})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/location/20/comment"))
        .respond_with(success_response(json!({"data": [{"id": 5, "content": "Gate code 1234"}]})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/location/20/comment"))
        .and(body_json(json!({"content": "Dog on site"})))
        .respond_with(success_response(json!({"data": {"id": 6, "content": "Dog on site"}})))
        .expect(1)
        .mount(&server)
        .await;

    let locations = client.locations();
    let merged = locations.merge(10, 20).await?;
    assert_eq!(merged.id, Some(20));

    let assets = locations.assets(20).await?;
    assert_eq!(assets.len(), 2);

    let comments = locations.comments(20).await?;
    assert_eq!(comments[0]["content"], "Gate code 1234");

    let comment = locations.create_comment(20, json!({"content": "Dog on site"})).await?;
    assert_eq!(comment["id"], 6);
    Ok(())
}

#[tokio::test]
async fn test_region_find_and_clear_cache() -> Result<()> {
    let server = setup_mock_server().await;
    let client = token_client(&server, "tok");

    Mock::given(method("GET"))
        .and(path("/api/region/7"))
        .respond_with(success_response(json!({
            "data": {
                "id": 7,
                "name": "Triangle",
                "color": "#ff9000",
                "points": [[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/region/7/cache"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let regions = client.regions();
    let region = regions.find(7).await?;
    assert!(region.contains_point(5.0, 5.0));
    assert_eq!(region.center_point(), Some((5.0, 5.0)));

    regions.clear_cache(7).await?;
    Ok(())
}

#[tokio::test]
async fn test_appointments_use_session_auth() -> Result<()> {
    let server = setup_mock_server().await;
    let client = session_client(&server);

    auth_mock()
        .respond_with(session_response("sess"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/appointment"))
        .and(wiremock::matchers::header("X-Session-Id", "sess"))
        .respond_with(success_response(json!({
            "data": {"appointments": [{"id": 1, "windowStart": 1000, "windowEnd": 4600, "released": "true"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client.appointments().list(json!({}), 1, 100).await?;
    let appointment = page.first().expect("one appointment");
    assert_eq!(appointment.duration_secs(), Some(3600));
    assert_eq!(appointment.released, Some(true));
    Ok(())
}
