//! HTTP contract tests for `ApiClient` against a mock membership server

#![allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]

mod common;

use chrono::NaiveDate;
use common::{init_test_logging, member_json};
use gymdesk_client::{ApiClient, Authenticator, MemberMutation, MemberQuery, Session};
use gymdesk_core::{
    Credentials, Error, MemberFilter, MemberId, MemberStatus, MemberUpdate, PlanType,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{
    bearer_token, body_json, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(server.uri()).unwrap()
}

fn update_for_anna() -> MemberUpdate {
    MemberUpdate {
        name: "Anna Lee".to_string(),
        phone: "555-0101".to_string(),
        email: String::new(),
        plan_type: PlanType::Quarterly,
        start_date: date(2024, 1, 1),
        end_date: date(2024, 3, 31),
    }
}

#[tokio::test]
async fn test_list_without_filters_sends_no_query_params() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/members"))
        .and(query_param_is_missing("search"))
        .and(query_param_is_missing("status"))
        .and(query_param_is_missing("plan_type"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            member_json(1, "Anna", "Active"),
            member_json(2, "Bob", "Expired"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let members = client_for(&server)
        .list_members(&MemberFilter::new())
        .await
        .unwrap();

    let names: Vec<_> = members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Anna", "Bob"]);
    assert_eq!(members[0].member_id, MemberId::new("1"));
    assert_eq!(members[0].start_date, date(2024, 1, 1));
    assert_eq!(members[1].status, MemberStatus::Expired);
}

#[tokio::test]
async fn test_list_sends_only_the_filters_that_are_set() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/members"))
        .and(query_param("search", "ann"))
        .and(query_param("status", "Active"))
        .and(query_param_is_missing("plan_type"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([member_json(1, "Anna", "Active")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let filter = MemberFilter::new()
        .with_search("ann")
        .with_status(MemberStatus::Active);
    let members = client_for(&server).list_members(&filter).await.unwrap();

    assert_eq!(members.len(), 1);
}

#[tokio::test]
async fn test_blank_search_is_not_sent() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/members"))
        .and(query_param_is_missing("search"))
        .and(query_param("plan_type", "Yearly"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let filter = MemberFilter::new()
        .with_search("   ")
        .with_plan_type(PlanType::Yearly);
    let members = client_for(&server).list_members(&filter).await.unwrap();

    assert!(members.is_empty());
}

#[tokio::test]
async fn test_search_is_sent_exactly_as_typed() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/members"))
        .and(query_param("search", " Ann "))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let filter = MemberFilter::new().with_search(" Ann ");
    client_for(&server).list_members(&filter).await.unwrap();
}

#[tokio::test]
async fn test_session_token_is_sent_as_bearer() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/members"))
        .and(bearer_token("tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).with_session(Session::new("tok-123").unwrap());
    client.list_members(&MemberFilter::new()).await.unwrap();
}

#[tokio::test]
async fn test_list_rejects_non_array_body() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "members": [] })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_members(&MemberFilter::new())
        .await
        .unwrap_err();

    assert!(err.is_malformed(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_list_rejects_unknown_status() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/members"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([member_json(1, "Anna", "Paused")])),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_members(&MemberFilter::new())
        .await
        .unwrap_err();

    assert!(err.is_malformed());
}

#[tokio::test]
async fn test_list_server_error_is_fetch_failure() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/members"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_members(&MemberFilter::new())
        .await
        .unwrap_err();

    assert!(err.is_fetch_failure());
    match err {
        Error::Status { status, endpoint } => {
            assert_eq!(status, 500);
            assert_eq!(endpoint, "/members");
        }
        other => panic!("Expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_fetch_failure() {
    init_test_logging();
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let err = ApiClient::new(format!("http://{addr}"))
        .unwrap()
        .list_members(&MemberFilter::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http { .. }), "unexpected error: {err}");
}

#[tokio::test]
async fn test_details_decodes_histories() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/members/7/details"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "member": member_json(7, "Anna", "Active"),
            "membershipHistory": [{
                "plan_type": "Monthly",
                "start_date": "2023-01-01T00:00:00.000Z",
                "end_date": "2023-02-01T00:00:00.000Z",
                "status": "Expired"
            }],
            "attendanceHistory": [
                { "check_time": "2024-01-05T08:30:00.000Z" },
                { "check_time": "2024-01-03T18:00:00.000Z" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let details = client_for(&server)
        .member_details(&MemberId::new("7"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(details.member.unwrap().name, "Anna");
    assert_eq!(details.membership_history.len(), 1);
    assert_eq!(details.membership_history[0].status, MemberStatus::Expired);
    assert_eq!(details.attendance_history.len(), 2);
}

#[tokio::test]
async fn test_details_missing_member_is_none() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/members/8/details"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "member": null })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/members/9/details"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.member_details(&MemberId::new("8")).await.unwrap().is_none());
    assert!(client.member_details(&MemberId::new("9")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_details_rejects_non_object_body() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/members/7/details"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .member_details(&MemberId::new("7"))
        .await
        .unwrap_err();

    assert!(err.is_malformed());
}

#[tokio::test]
async fn test_update_sends_every_editable_field() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/members/update/7"))
        .and(body_json(json!({
            "name": "Anna Lee",
            "phone": "555-0101",
            "email": "",
            "plan_type": "Quarterly",
            "start_date": "2024-01-01",
            "end_date": "2024-03-31"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .update_member(&MemberId::new("7"), &update_for_anna())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_with_inverted_dates_sends_nothing() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut update = update_for_anna();
    update.end_date = date(2023, 12, 31);

    let err = client_for(&server)
        .update_member(&MemberId::new("7"), &update)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation { .. }));
}

#[tokio::test]
async fn test_update_rejection_is_reported() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/members/update/7"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .update_member(&MemberId::new("7"), &update_for_anna())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Status { status: 400, .. }));
}

#[tokio::test]
async fn test_delete_hits_member_path() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/members/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .delete_member(&MemberId::new("7"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_renew_sends_new_end_date() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/members/7/renew"))
        .and(body_json(json!({ "new_end_date": "2025-06-30" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "renewed" })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .renew_member(&MemberId::new("7"), date(2025, 6, 30))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_login_returns_session() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "username": "admin", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "tok-abc" })))
        .expect(1)
        .mount(&server)
        .await;

    let session = client_for(&server)
        .login(&Credentials::new("admin", "hunter2"))
        .await
        .unwrap();

    assert_eq!(session.token(), "tok-abc");
}

#[tokio::test]
async fn test_login_rejected_is_authentication_error() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "bad" })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .login(&Credentials::new("admin", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Authentication(_)));
}

#[tokio::test]
async fn test_login_without_token_is_malformed() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "" })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .login(&Credentials::new("admin", "hunter2"))
        .await
        .unwrap_err();

    assert!(err.is_malformed());
}
