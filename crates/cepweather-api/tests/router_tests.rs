//! Router tests: handlers driven with `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use cepweather_api::{router, AppState, MessageBody};
use cepweather_weather::{
    CancellationToken, Location, LocationProvider, TemperatureProvider, Temperatures,
    WeatherError, WeatherService,
};
use parking_lot::Mutex;
use tower::ServiceExt;

#[derive(Clone, Copy)]
enum Reply {
    Ok,
    NotFound,
    Broken,
    Hang,
}

struct StubLocations {
    reply: Reply,
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl LocationProvider for StubLocations {
    async fn lookup(&self, cep: &str, token: &CancellationToken) -> Result<Location, WeatherError> {
        self.calls.lock().push(cep.to_string());
        match self.reply {
            Reply::Ok => Ok(Location::new("São Paulo", "SP")),
            Reply::NotFound => Err(WeatherError::NotFound),
            Reply::Broken => Err(WeatherError::Parse("viacep: expected value".into())),
            Reply::Hang => {
                token.cancelled().await;
                Err(WeatherError::Cancelled)
            }
        }
    }
}

struct StubTemperatures(f64);

#[async_trait]
impl TemperatureProvider for StubTemperatures {
    async fn current_celsius(
        &self,
        _location: &Location,
        _token: &CancellationToken,
    ) -> Result<f64, WeatherError> {
        Ok(self.0)
    }
}

fn app_with(reply: Reply, deadline: Duration) -> (Router, Arc<StubLocations>) {
    let locations = Arc::new(StubLocations {
        reply,
        calls: Mutex::new(Vec::new()),
    });
    let service = WeatherService::new(locations.clone(), Arc::new(StubTemperatures(28.5)));
    let state = AppState::new(service, deadline, CancellationToken::new());
    (router(state), locations)
}

fn app(reply: Reply) -> (Router, Arc<StubLocations>) {
    app_with(reply, Duration::from_secs(10))
}

async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, String, Option<String>) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap(), content_type)
}

fn message(body: &str) -> String {
    serde_json::from_str::<MessageBody>(body).unwrap().message
}

#[tokio::test]
async fn test_weather_success() {
    let (app, locations) = app(Reply::Ok);

    let (status, body, content_type) = send(app, Method::GET, "/weather/12345678").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let temps: Temperatures = serde_json::from_str(&body).unwrap();
    assert_eq!(
        temps,
        Temperatures {
            celsius: 28.5,
            fahrenheit: 83.3,
            kelvin: 301.5
        }
    );
    assert_eq!(*locations.calls.lock(), vec!["12345678".to_string()]);
}

#[tokio::test]
async fn test_invalid_cep_is_422_without_lookup() {
    let (app, locations) = app(Reply::Ok);

    let (status, body, _) = send(app, Method::GET, "/weather/INVALID1").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(message(&body), "invalid zipcode");
    assert!(locations.calls.lock().is_empty());
}

#[tokio::test]
async fn test_not_found_is_404() {
    let (app, _) = app(Reply::NotFound);

    let (status, body, _) = send(app, Method::GET, "/weather/12345678").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(message(&body), "can not find zipcode");
}

#[tokio::test]
async fn test_internal_error_hides_detail() {
    let (app, _) = app(Reply::Broken);

    let (status, body, _) = send(app, Method::GET, "/weather/12345678").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, r#"{"message":"internal server error"}"#);
}

#[tokio::test]
async fn test_deadline_is_500() {
    let (app, _) = app_with(Reply::Hang, Duration::from_millis(50));

    let (status, body, _) = send(app, Method::GET, "/weather/12345678").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(message(&body), "internal server error");
}

#[tokio::test]
async fn test_method_not_allowed() {
    let (app, locations) = app(Reply::Ok);

    let (status, body, _) = send(app, Method::POST, "/weather/12345678").await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(message(&body), "method not allowed");
    assert!(locations.calls.lock().is_empty());
}

#[tokio::test]
async fn test_missing_cep_is_404() {
    let (app, _) = app(Reply::Ok);

    let (status, body, _) = send(app, Method::GET, "/weather/").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(message(&body), "not found");
}

#[tokio::test]
async fn test_healthz() {
    let (app, locations) = app(Reply::Broken);

    let (status, body, _) = send(app, Method::GET, "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    assert!(locations.calls.lock().is_empty());
}
