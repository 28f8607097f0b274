//! Integration tests for IntranetSession using wiremock
//!
//! These tests validate login, page download and booking detection against
//! a mock intranet.

mod common;

use chrono::NaiveDate;
use common::*;
use padel_booker::models::BookingLink;
use padel_booker::session::detect::{ResponseClassifier, LOGIN_MARKERS};
use padel_booker::session::{BookingSession, IntranetSession};
use wiremock::matchers::{body_string_contains, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session_for(server: &MockServer) -> IntranetSession {
    IntranetSession::from_config(&test_config(&server.uri(), 1)).unwrap()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 25).unwrap()
}

fn action_link(server: &MockServer, court: u32) -> BookingLink {
    BookingLink::new(format!(
        "{}{ACTION_PATH}?p_pista={court}&p_res_horaini=20:00:00",
        server.uri()
    ))
}

/// Login posts the form fields with a browser user agent
#[tokio::test]
async fn test_login_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .and(header_exists("user-agent"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("id=c"))
        .and(body_string_contains("p_usuario=12345678Z"))
        .and(body_string_contains("p_clave=s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_OK_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    assert!(session_for(&server).authenticate(&test_credentials()).await);
}

/// A 200 without any post-login marker is still a failed login
#[tokio::test]
async fn test_login_without_markers_fails() {
    let server = MockServer::start().await;
    mount_login(&server, 200, LOGIN_FAILED_PAGE).await;

    assert!(!session_for(&server).authenticate(&test_credentials()).await);
}

/// Markers on an error page do not count
#[tokio::test]
async fn test_login_server_error_fails() {
    let server = MockServer::start().await;
    mount_login(&server, 500, LOGIN_OK_PAGE).await;

    assert!(!session_for(&server).authenticate(&test_credentials()).await);
}

/// An unreachable intranet is a failed login, not a panic
#[tokio::test]
async fn test_login_network_error_fails() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let session = IntranetSession::from_config(&test_config(&uri, 1)).unwrap();
    assert!(!session.authenticate(&test_credentials()).await);
}

/// Cookies set at login are sent with later requests
#[tokio::test]
async fn test_session_cookie_is_carried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "UPV_SESSION=abc123; Path=/")
                .set_body_string(LOGIN_OK_PAGE),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(BOOKING_PAGE_PATH))
        .and(header("cookie", "UPV_SESSION=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(booking_page(&[1], "20:00")))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server);
    assert!(session.authenticate(&test_credentials()).await);

    let page = session.fetch_booking_page(date()).await.unwrap();
    assert!(page.is_some());
}

/// The booking page is requested by facility and date and decoded as Latin-9
#[tokio::test]
async fn test_fetch_booking_page_latin9() {
    let server = MockServer::start().await;
    let (bytes, _, _) = encoding_rs::ISO_8859_15.encode("<p>Reservas de pádel</p>");

    Mock::given(method("GET"))
        .and(path(BOOKING_PAGE_PATH))
        .and(query_param("p_res_tipo", "PDEL"))
        .and(query_param("p_fecha", "2026-10-25"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.into_owned()))
        .expect(1)
        .mount(&server)
        .await;

    let page = session_for(&server).fetch_booking_page(date()).await.unwrap();
    assert_eq!(page.as_deref(), Some("<p>Reservas de pádel</p>"));
}

/// A non-200 page is reported as absent rather than as an error
#[tokio::test]
async fn test_fetch_booking_page_non_200() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(BOOKING_PAGE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let page = session_for(&server).fetch_booking_page(date()).await.unwrap();
    assert!(page.is_none());
}

/// A confirmation phrase means the court is ours
#[tokio::test]
async fn test_booking_confirmed_by_phrase() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ACTION_PATH))
        .and(query_param("p_pista", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BOOKED_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    assert!(session_for(&server).attempt_booking(&action_link(&server, 1)).await);
}

/// Latin-9 confirmation pages are matched after decoding
#[tokio::test]
async fn test_booking_confirmed_latin9_phrase() {
    let server = MockServer::start().await;
    let (bytes, _, _) = encoding_rs::ISO_8859_15.encode("<p>Operación completada con éxito</p>");

    Mock::given(method("GET"))
        .and(path(ACTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.into_owned()))
        .mount(&server)
        .await;

    assert!(session_for(&server).attempt_booking(&action_link(&server, 2)).await);
}

/// Being redirected away from the action counts as success
#[tokio::test]
async fn test_booking_confirmed_by_redirect() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ACTION_PATH))
        .respond_with(ResponseTemplate::new(302).insert_header("location", MY_BOOKINGS_PATH))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(MY_BOOKINGS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>Mis datos</body></html>"))
        .expect(1)
        .mount(&server)
        .await;

    assert!(session_for(&server).attempt_booking(&action_link(&server, 3)).await);
}

/// Staying on the action without a confirmation is a rejection
#[tokio::test]
async fn test_booking_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ACTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(TAKEN_PAGE))
        .mount(&server)
        .await;

    assert!(!session_for(&server).attempt_booking(&action_link(&server, 1)).await);
}

/// Server errors on the action are a rejection whatever the body says
#[tokio::test]
async fn test_booking_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ACTION_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string(BOOKED_PAGE))
        .mount(&server)
        .await;

    assert!(!session_for(&server).attempt_booking(&action_link(&server, 1)).await);
}

/// A custom signal set changes what counts as a confirmation
#[tokio::test]
async fn test_custom_classifier() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ACTION_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<p>Pista reservada hasta las 21:00</p>"),
        )
        .expect(2)
        .mount(&server)
        .await;

    let link = action_link(&server, 5);
    assert!(!session_for(&server).attempt_booking(&link).await);

    let classifier =
        ResponseClassifier::new(LOGIN_MARKERS, &["pista reservada"], "solicita_reservar");
    let session = session_for(&server).with_classifier(classifier);
    assert!(session.attempt_booking(&link).await);
}
