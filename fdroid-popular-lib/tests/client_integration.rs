//! Integration tests for the hosting API client using wiremock

use core::time::Duration;
use fdroid_popular_lib::popular::{Client, Credentials, FetchOutcome, Service, StarFetcher};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(10);

fn anonymous_client() -> Client {
    Client::new(&Credentials::default(), TIMEOUT).expect("client should build")
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_github_stars_found() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/repos/org/app",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"full_name": "org/app", "stargazers_count": 42})),
    )
    .await;

    let outcome = anonymous_client()
        .fetch_stars(Service::GitHub, &format!("{}/repos/org/app", server.uri()))
        .await;

    assert!(matches!(outcome, FetchOutcome::Found(42)), "unexpected outcome: {outcome:?}");
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_gitlab_stars_found() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/api/v4/projects/group%2Fapp",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"star_count": 7})),
    )
    .await;

    let outcome = anonymous_client()
        .fetch_stars(Service::GitLab, &format!("{}/api/v4/projects/group%2Fapp", server.uri()))
        .await;

    assert!(matches!(outcome, FetchOutcome::Found(7)), "unexpected outcome: {outcome:?}");
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_star_field_is_service_specific() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/repos/org/app",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"star_count": 7})),
    )
    .await;

    let outcome = anonymous_client()
        .fetch_stars(Service::GitHub, &format!("{}/repos/org/app", server.uri()))
        .await;

    assert!(matches!(outcome, FetchOutcome::Skipped(_)), "unexpected outcome: {outcome:?}");
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_too_many_requests_is_rate_limited() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/repos/org/app",
        ResponseTemplate::new(429).set_body_json(serde_json::json!({"stargazers_count": 42})),
    )
    .await;

    let outcome = anonymous_client()
        .fetch_stars(Service::GitHub, &format!("{}/repos/org/app", server.uri()))
        .await;

    assert!(matches!(outcome, FetchOutcome::RateLimited(Service::GitHub)), "unexpected outcome: {outcome:?}");
    assert!(outcome.is_fatal());
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_forbidden_is_rate_limited() {
    let server = MockServer::start().await;
    mount(&server, "/api/v4/projects/1", ResponseTemplate::new(403).set_body_string("quota exceeded")).await;

    let outcome = anonymous_client()
        .fetch_stars(Service::GitLab, &format!("{}/api/v4/projects/1", server.uri()))
        .await;

    assert!(matches!(outcome, FetchOutcome::RateLimited(Service::GitLab)), "unexpected outcome: {outcome:?}");
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_not_found_is_skipped() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/repos/org/gone",
        ResponseTemplate::new(404).set_body_json(serde_json::json!({"message": "Not Found"})),
    )
    .await;

    let outcome = anonymous_client()
        .fetch_stars(Service::GitHub, &format!("{}/repos/org/gone", server.uri()))
        .await;

    match outcome {
        FetchOutcome::Skipped(reason) => assert!(reason.contains("404"), "reason should mention the status: {reason}"),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_server_error_is_skipped() {
    let server = MockServer::start().await;
    mount(&server, "/repos/org/app", ResponseTemplate::new(500)).await;

    let outcome = anonymous_client()
        .fetch_stars(Service::GitHub, &format!("{}/repos/org/app", server.uri()))
        .await;

    assert!(matches!(outcome, FetchOutcome::Skipped(_)), "unexpected outcome: {outcome:?}");
    assert!(!outcome.is_fatal());
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_missing_star_field_is_skipped() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/repos/org/app",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"full_name": "org/app"})),
    )
    .await;

    let outcome = anonymous_client()
        .fetch_stars(Service::GitHub, &format!("{}/repos/org/app", server.uri()))
        .await;

    assert!(matches!(outcome, FetchOutcome::Skipped(_)), "unexpected outcome: {outcome:?}");
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_malformed_body_is_skipped() {
    let server = MockServer::start().await;
    mount(&server, "/repos/org/app", ResponseTemplate::new(200).set_body_string("<html>oops</html>")).await;

    let outcome = anonymous_client()
        .fetch_stars(Service::GitHub, &format!("{}/repos/org/app", server.uri()))
        .await;

    assert!(matches!(outcome, FetchOutcome::Skipped(_)), "unexpected outcome: {outcome:?}");
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_connection_failure_is_failed() {
    // nothing listens on port 1
    let outcome = anonymous_client()
        .fetch_stars(Service::GitHub, "http://127.0.0.1:1/repos/org/app")
        .await;

    assert!(matches!(outcome, FetchOutcome::Failed(_)), "unexpected outcome: {outcome:?}");
    assert!(outcome.is_fatal());
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_credentials_sent_per_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/org/app"))
        .and(header("authorization", "Bearer gh-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"stargazers_count": 1})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/1"))
        .and(header("authorization", "Bearer gl-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"star_count": 2})))
        .mount(&server)
        .await;

    let credentials = Credentials {
        github: Some("gh-secret".to_string()),
        gitlab: Some("gl-secret".to_string()),
    };
    let client = Client::new(&credentials, TIMEOUT).expect("client should build");

    let github = client.fetch_stars(Service::GitHub, &format!("{}/repos/org/app", server.uri())).await;
    let gitlab = client.fetch_stars(Service::GitLab, &format!("{}/api/v4/projects/1", server.uri())).await;

    assert!(matches!(github, FetchOutcome::Found(1)), "unexpected outcome: {github:?}");
    assert!(matches!(gitlab, FetchOutcome::Found(2)), "unexpected outcome: {gitlab:?}");
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_no_credentials_sends_no_authorization() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/repos/org/app",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"stargazers_count": 3})),
    )
    .await;

    let credentials = Credentials {
        github: None,
        gitlab: Some("gl-secret".to_string()),
    };
    let client = Client::new(&credentials, TIMEOUT).expect("client should build");
    let _ = client.fetch_stars(Service::GitHub, &format!("{}/repos/org/app", server.uri())).await;

    let requests = server.received_requests().await.expect("request recording is enabled");
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}
