//! Behavioural tests for origin checks on the order gateway upgrade.

#[allow(dead_code)]
#[path = "support/memory.rs"]
mod memory;

use actix_http::Request;
use actix_web::http::header::HeaderValue;
use actix_web::{
    App,
    body::BoxBody,
    dev::{Service, ServiceResponse},
    http::{StatusCode, header},
    test::{self, TestRequest},
    web,
};
use pizzeria::inbound::ws;
use pizzeria::inbound::ws::state::WsState;
use rstest::{fixture, rstest};

// Example Sec-WebSocket-Key from RFC 6455 section 1.3.
const RFC6455_SAMPLE_KEY: &str = "dGhlIHNhbXBsZSBub25jZQ==";

#[fixture]
fn restricted() -> WsState {
    memory::memory_states(&["http://localhost:3000", "https://pizzeria.example"]).1
}

#[fixture]
fn open() -> WsState {
    memory::memory_states(&[]).1
}

async fn init_app(
    state: WsState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(ws::ws_entry),
    )
    .await
}

fn handshake_request() -> TestRequest {
    TestRequest::get()
        .uri("/ws")
        .insert_header((header::UPGRADE, "websocket"))
        .insert_header((header::CONNECTION, "Upgrade"))
        .insert_header((header::SEC_WEBSOCKET_VERSION, "13"))
        .insert_header((header::SEC_WEBSOCKET_KEY, RFC6455_SAMPLE_KEY))
}

/// Origin header shapes the gateway refuses.
#[derive(Debug, Clone, Copy)]
enum OriginHeaderCase {
    Missing,
    Unlisted,
    /// RFC 6455 allows a single Origin.
    Multiple,
    /// Invalid UTF-8.
    Malformed,
    NotAUrl,
}

fn handshake_request_for_origin_case(origin_case: OriginHeaderCase) -> Request {
    match origin_case {
        OriginHeaderCase::Missing => handshake_request().to_request(),
        OriginHeaderCase::Unlisted => handshake_request()
            .append_header((header::ORIGIN, "https://evil.example"))
            .to_request(),
        OriginHeaderCase::Multiple => handshake_request()
            .append_header((header::ORIGIN, "https://pizzeria.example"))
            .append_header((header::ORIGIN, "https://evil.example"))
            .to_request(),
        OriginHeaderCase::Malformed => {
            let invalid = HeaderValue::from_bytes(&[0x80]).expect("opaque Origin header value");
            handshake_request()
                .insert_header((header::ORIGIN, invalid))
                .to_request()
        }
        OriginHeaderCase::NotAUrl => handshake_request()
            .insert_header((header::ORIGIN, "pizzeria"))
            .to_request(),
    }
}

#[rstest]
#[case("http://localhost:3000")]
#[case("https://pizzeria.example")]
fn upgrades_when_origin_allowed(restricted: WsState, #[case] origin: &str) {
    actix_rt::System::new().block_on(async move {
        let app = init_app(restricted).await;

        let req = handshake_request()
            .insert_header((header::ORIGIN, origin))
            .to_request();
        let response = test::call_service(&app, req).await;
        assert_eq!(
            response.status(),
            StatusCode::SWITCHING_PROTOCOLS,
            "origin {origin}"
        );
    });
}

#[rstest]
#[case(OriginHeaderCase::Missing, StatusCode::FORBIDDEN)]
#[case(OriginHeaderCase::Unlisted, StatusCode::FORBIDDEN)]
#[case(OriginHeaderCase::Multiple, StatusCode::BAD_REQUEST)]
#[case(OriginHeaderCase::Malformed, StatusCode::BAD_REQUEST)]
#[case(OriginHeaderCase::NotAUrl, StatusCode::BAD_REQUEST)]
fn rejects_disallowed_origin_headers(
    restricted: WsState,
    #[case] origin_case: OriginHeaderCase,
    #[case] expected: StatusCode,
) {
    actix_rt::System::new().block_on(async move {
        let app = init_app(restricted).await;

        let req = handshake_request_for_origin_case(origin_case);
        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), expected, "{origin_case:?}");
    });
}

#[rstest]
#[case(None)]
#[case(Some("https://anywhere.example"))]
fn empty_allow_list_accepts_any_origin(open: WsState, #[case] origin: Option<&str>) {
    actix_rt::System::new().block_on(async move {
        let app = init_app(open).await;

        let mut req = handshake_request();
        if let Some(origin) = origin {
            req = req.insert_header((header::ORIGIN, origin));
        }
        let response = test::call_service(&app, req.to_request()).await;
        assert_eq!(response.status(), StatusCode::SWITCHING_PROTOCOLS);
    });
}
