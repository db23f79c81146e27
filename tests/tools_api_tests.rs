//! Integration tests for the tool endpoints against mocked upstream APIs.

use actix_web::{http::StatusCode, test};
use aqi_advisor::{
    AdvisoryConfig, AppMetrics, AppState, ResilientClientConfig, ServerConfig, ToolBox, ToolName,
    ToolsConfig, create_app,
};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn tools_config(server: &MockServer, aqi_api_key: Option<&str>) -> ToolsConfig {
    ToolsConfig {
        geocode_api_url: format!("{}/v1/search", server.uri()),
        weather_api_url: format!("{}/v1/forecast", server.uri()),
        air_pollution_api_url: format!("{}/data/2.5/air_pollution", server.uri()),
        aqi_api_key: aqi_api_key.map(str::to_string),
    }
}

async fn state_with(
    server: &MockServer,
    aqi_api_key: Option<&str>,
    enabled: &[ToolName],
    client_config: ResilientClientConfig,
) -> AppState {
    let tools = ToolBox::from_config(
        enabled,
        &tools_config(server, aqi_api_key),
        client_config,
        &AdvisoryConfig::mock(),
        None,
    )
    .await
    .expect("Failed to build tools");

    AppState {
        tools,
        server: ServerConfig {
            tools: enabled.to_vec(),
            ..ServerConfig::default()
        },
        metrics: AppMetrics::new().expect("Failed to create metrics"),
    }
}

async fn state(server: &MockServer, aqi_api_key: Option<&str>) -> AppState {
    state_with(
        server,
        aqi_api_key,
        &ToolName::ALL,
        ResilientClientConfig::default(),
    )
    .await
}

async fn mount_paris(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"name": "Paris", "latitude": 48.8566, "longitude": 2.3522, "country": "France"}]
        })))
        .mount(server)
        .await;
}

fn text_of(body: &Value) -> &str {
    body["content"][0]["text"].as_str().unwrap_or_default()
}

#[actix_web::test]
async fn test_paris_weather() {
    let upstream = MockServer::start().await;
    mount_paris(&upstream).await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current_weather": {"temperature": 18.5, "windspeed": 10.2}
        })))
        .mount(&upstream)
        .await;

    let app = test::init_service(create_app(state(&upstream, None).await)).await;
    let req = test::TestRequest::post()
        .uri("/api/tools/get_weather")
        .set_json(json!({"location": "Paris"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["tool"], "get_weather");
    assert_eq!(body["is_error"], false);
    assert_eq!(body["content"][0]["type"], "text");

    let text = text_of(&body);
    assert!(text.contains("Paris, France"));
    assert!(text.contains("48.8566, 2.3522"));
    assert!(text.contains("18.5°C"));
    assert!(text.contains("10.2 km/h"));
}

#[actix_web::test]
async fn test_paris_aqi() {
    let upstream = MockServer::start().await;
    mount_paris(&upstream).await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/air_pollution"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": [{
                "main": {"aqi": 3},
                "components": {
                    "co": 230.31, "no": 0.1, "no2": 13.2, "o3": 71.5,
                    "so2": 1.9, "pm2_5": 8.4, "pm10": 11.0, "nh3": 0.8
                }
            }]
        })))
        .mount(&upstream)
        .await;

    let app = test::init_service(create_app(state(&upstream, Some("test-key")).await)).await;
    let req = test::TestRequest::post()
        .uri("/api/tools/get_aqi")
        .set_json(json!({"location": "Paris"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let text = text_of(&body);
    assert!(text.contains("- AQI Level: 3 (Moderate)"));
    for value in ["230.31", "0.1", "13.2", "71.5", "1.9", "8.4", "11.0", "0.8"] {
        assert!(text.contains(value), "missing {value}");
    }
}

#[actix_web::test]
async fn test_unknown_location_stops_both_tools() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"generationtime_ms": 0.3})))
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/air_pollution"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let app = test::init_service(create_app(state(&upstream, Some("k")).await)).await;

    for tool in ["get_weather", "get_aqi"] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/tools/{tool}"))
            .set_json(json!({"location": "Xyzzyville"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["is_error"], true);
        assert_eq!(text_of(&body), "Location 'Xyzzyville' not found.");
        assert_eq!(body["error"]["kind"], "resolution");
    }
}

#[actix_web::test]
async fn test_missing_api_key_makes_no_request() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let app = test::init_service(create_app(state(&upstream, None).await)).await;
    let req = test::TestRequest::post()
        .uri("/api/tools/get_aqi")
        .set_json(json!({"location": "Paris"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["is_error"], true);
    assert_eq!(body["error"]["kind"], "configuration");
    assert!(text_of(&body).contains("AQI_API_KEY"));
}

#[actix_web::test]
async fn test_missing_current_weather() {
    let upstream = MockServer::start().await;
    mount_paris(&upstream).await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hourly": {}})))
        .mount(&upstream)
        .await;

    let app = test::init_service(create_app(state(&upstream, None).await)).await;
    let req = test::TestRequest::post()
        .uri("/api/tools/get_weather")
        .set_json(json!({"location": "Paris"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        text_of(&body),
        "Weather data not available for 'Paris, France'."
    );
    assert_eq!(body["error"]["location"], "Paris, France");
}

#[actix_web::test]
async fn test_upstream_timeout_is_reported() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": []}))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&upstream)
        .await;

    let client_config = ResilientClientConfig {
        request_timeout_seconds: 1,
        ..ResilientClientConfig::default()
    };
    let state = state_with(&upstream, None, &ToolName::ALL, client_config).await;
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::post()
        .uri("/api/tools/get_weather")
        .set_json(json!({"location": "Paris"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["is_error"], true);
    assert_eq!(body["error"]["kind"], "timeout");
}

#[actix_web::test]
async fn test_upstream_status_carries_body() {
    let upstream = MockServer::start().await;
    mount_paris(&upstream).await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Parameter 'latitude' is invalid"))
        .mount(&upstream)
        .await;

    let app = test::init_service(create_app(state(&upstream, None).await)).await;
    let req = test::TestRequest::post()
        .uri("/api/tools/get_weather")
        .set_json(json!({"location": "Paris"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["error"]["kind"], "upstream_status");
    assert_eq!(body["error"]["status"], 400);
    assert_eq!(
        text_of(&body),
        "Weather API returned an error: 400 Parameter 'latitude' is invalid"
    );
}

#[actix_web::test]
async fn test_safety_guidelines_with_mock_model() {
    let upstream = MockServer::start().await;
    let app = test::init_service(create_app(state(&upstream, None).await)).await;

    let req = test::TestRequest::post()
        .uri("/api/tools/safety_guidelines")
        .set_json(json!({
            "weather_report": "- Location: Paris, France\n- Temperature: 18.5°C",
            "aqi_report": "- Location: Paris, France\n- AQI Level: 1 (Good)"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["is_error"], false);
    let text = text_of(&body);
    assert!(!text.trim().is_empty());
    assert!(text.contains("(Good)"));
}

#[actix_web::test]
async fn test_rejected_calls() {
    let upstream = MockServer::start().await;
    let state = state_with(
        &upstream,
        None,
        &[ToolName::GetWeather],
        ResilientClientConfig::default(),
    )
    .await;
    let app = test::init_service(create_app(state)).await;

    // Disabled on this server
    let req = test::TestRequest::post()
        .uri("/api/tools/get_aqi")
        .set_json(json!({"location": "Paris"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    // Not a tool at all
    let req = test::TestRequest::post()
        .uri("/api/tools/get_forecast")
        .set_json(json!({"location": "Paris"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/tools/get_weather")
        .set_json(json!({"location": "   "}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/tools/get_weather")
        .set_json(json!({"city": "Paris"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_tool_discovery() {
    let upstream = MockServer::start().await;
    let state = state_with(
        &upstream,
        None,
        &[ToolName::GetAqi, ToolName::SafetyGuidelines],
        ResilientClientConfig::default(),
    )
    .await;
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get().uri("/api/tools").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let names: Vec<&str> = body["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["get_aqi", "safety_guidelines"]);
    assert_eq!(body["tools"][1]["parameters"][0]["name"], "weather_report");
    assert_eq!(body["tools"][1]["parameters"][1]["name"], "aqi_report");
}

#[actix_web::test]
async fn test_health_reports_tools_and_model() {
    let upstream = MockServer::start().await;
    let app = test::init_service(create_app(state(&upstream, None).await)).await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["tools"], json!(["get_weather", "get_aqi", "safety_guidelines"]));
    assert_eq!(body["model"], "ready");
}

#[actix_web::test]
async fn test_version_endpoint() {
    let upstream = MockServer::start().await;
    let app = test::init_service(create_app(state(&upstream, None).await)).await;

    let req = test::TestRequest::get().uri("/api/version").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["commit"].is_string());
    assert!(body["build_time"].is_string());
}

#[actix_web::test]
async fn test_metrics_count_tool_calls() {
    let upstream = MockServer::start().await;
    let app = test::init_service(create_app(state(&upstream, None).await)).await;

    let req = test::TestRequest::post()
        .uri("/api/tools/get_aqi")
        .set_json(json!({"location": "Paris"}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/api/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.contains("tool_invocations_total{outcome=\"error\",tool=\"get_aqi\"} 1"));
    assert!(text.contains("route=\"/api/tools/get_aqi\""));
}

#[actix_web::test]
async fn test_metrics_can_be_disabled() {
    let upstream = MockServer::start().await;
    let mut state = state(&upstream, None).await;
    state.server.metrics_enabled = false;
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get().uri("/api/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn test_openapi_lists_tool_routes() {
    let upstream = MockServer::start().await;
    let app = test::init_service(create_app(state(&upstream, None).await)).await;

    let req = test::TestRequest::get().uri("/api/spec/v2").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["info"]["title"], "AQI Advisor Tools");
    for route in [
        "/api/tools",
        "/api/tools/get_weather",
        "/api/tools/get_aqi",
        "/api/tools/safety_guidelines",
        "/api/health",
    ] {
        assert!(body["paths"][route].is_object(), "missing {route}");
    }
}

#[actix_web::test]
async fn test_request_id_header() {
    let upstream = MockServer::start().await;
    let app = test::init_service(create_app(state(&upstream, None).await)).await;

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("X-Request-ID", "abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "abc-123");
}
