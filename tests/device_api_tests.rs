// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Device lifecycle and query endpoint tests.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_ingest_then_query_device() {
    let (app, _state) = common::create_test_app();

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/ubicacion",
            &json!({"lat": 4.61, "lon": -74.08, "accuracy": 8.2, "deviceId": "d1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["mensaje"], "Ubicación recibida correctamente");
    assert_eq!(body["ubicacion"]["lat"], json!(4.61));
    assert_eq!(body["dispositivo"]["id"], "d1");
    assert_eq!(body["dispositivo"]["nombre"], "Dispositivo d1");

    let response = app
        .oneshot(common::get_request("/api/dispositivos/d1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let device = common::body_json(response).await;
    assert_eq!(device["id"], "d1");
    assert_eq!(device["activo"], true);
    assert_eq!(device["ultimaUbicacion"]["lat"], json!(4.61));
    assert_eq!(device["ultimaUbicacion"]["lon"], json!(-74.08));
    assert_eq!(device["userAgent"], "okhttp/4.9.0");
}

#[tokio::test]
async fn test_second_ingest_replaces_location_without_new_device() {
    let (app, state) = common::create_test_app();

    for (lat, lon) in [(4.61, -74.08), (4.70, -74.10)] {
        let response = app
            .clone()
            .oneshot(common::json_request(
                "POST",
                "/api/ubicacion",
                &json!({"lat": lat, "lon": lon, "deviceId": "d1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(state.registry.total(), 1);

    let response = app
        .oneshot(common::get_request("/api/dispositivos/d1"))
        .await
        .unwrap();
    let device = common::body_json(response).await;
    assert_eq!(device["ultimaUbicacion"]["lat"], json!(4.70));
}

#[tokio::test]
async fn test_rename_round_trip() {
    let (app, _state) = common::create_test_app();

    app.clone()
        .oneshot(common::json_request(
            "POST",
            "/api/ubicacion",
            &json!({"lat": 1.0, "lon": 2.0, "deviceId": "d1"}),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(common::json_request(
            "PUT",
            "/api/dispositivos/d1",
            &json!({"nombre": "X"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = common::body_json(response).await;
    assert_eq!(updated["nombre"], "X");
    // Partial update: active flag untouched
    assert_eq!(updated["activo"], true);

    let response = app
        .oneshot(common::get_request("/api/dispositivos/d1"))
        .await
        .unwrap();
    let device = common::body_json(response).await;
    assert_eq!(device["nombre"], "X");
}

#[tokio::test]
async fn test_unknown_device_is_404() {
    let (app, _state) = common::create_test_app();

    let response = app
        .clone()
        .oneshot(common::get_request("/api/dispositivos/fantasma"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = common::body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("fantasma"));

    let response = app
        .oneshot(common::json_request(
            "PUT",
            "/api/dispositivos/fantasma",
            &json!({"activo": false}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_device_id_uses_caller_address() {
    let (app, _state) = common::create_test_app();

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/ubicacion",
            &json!({"lat": 1.0, "lon": 2.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(common::get_request("/api/dispositivos"))
        .await
        .unwrap();
    let body = common::body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["dispositivos"][0]["id"], common::TEST_PEER_IP);
}

#[tokio::test]
async fn test_device_listing_in_creation_order_with_rotating_colors() {
    let (app, _state) = common::create_test_app();

    for id in ["uno", "dos", "tres"] {
        app.clone()
            .oneshot(common::json_request(
                "POST",
                "/api/ubicacion",
                &json!({"lat": 1.0, "lon": 2.0, "deviceId": id}),
            ))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(common::get_request("/api/dispositivos"))
        .await
        .unwrap();
    let body = common::body_json(response).await;
    assert_eq!(body["total"], 3);

    let devices = body["dispositivos"].as_array().unwrap();
    let ids: Vec<&str> = devices.iter().map(|d| d["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["uno", "dos", "tres"]);

    // Distinct palette colors for a small fleet
    let colors: std::collections::HashSet<&str> = devices
        .iter()
        .map(|d| d["color"].as_str().unwrap())
        .collect();
    assert_eq!(colors.len(), 3);
}

#[tokio::test]
async fn test_active_locations_listing_filters_inactive_devices() {
    let (app, state) = common::create_test_app();

    for id in ["activo-1", "apagado"] {
        app.clone()
            .oneshot(common::json_request(
                "POST",
                "/api/ubicacion",
                &json!({"lat": 1.0, "lon": 2.0, "deviceId": id}),
            ))
            .await
            .unwrap();
    }
    // A device that never reported a location stays out of the listing
    state.registry.get_or_create("mudo", "ua");

    app.clone()
        .oneshot(common::json_request(
            "PUT",
            "/api/dispositivos/apagado",
            &json!({"activo": false}),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(common::get_request("/api/ubicaciones"))
        .await
        .unwrap();
    let body = common::body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["ubicaciones"][0]["deviceId"], "activo-1");
    assert_eq!(body["ubicaciones"][0]["nombre"], "Dispositivo activo-1");
    assert!(body["ubicaciones"][0]["ubicacion"]["lat"].is_number());

    // Deactivation hides, it does not delete
    let response = app
        .oneshot(common::get_request("/api/dispositivos"))
        .await
        .unwrap();
    let body = common::body_json(response).await;
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn test_ultima_ubicacion_endpoint() {
    let (app, _state) = common::create_test_app();

    let response = app
        .clone()
        .oneshot(common::get_request("/api/ubicacion/ultima"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = common::body_json(response).await;
    assert_eq!(body["mensaje"], "No hay ubicaciones disponibles");

    for (id, lat) in [("d1", 4.61), ("d2", 4.62)] {
        app.clone()
            .oneshot(common::json_request(
                "POST",
                "/api/ubicacion",
                &json!({"lat": lat, "lon": -74.08, "deviceId": id}),
            ))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(common::get_request("/api/ubicacion/ultima"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    // Most recent ingest across all devices
    assert_eq!(body["lat"], json!(4.62));
    assert_eq!(body["deviceId"], "d2");
}

#[tokio::test]
async fn test_stats_endpoint() {
    let (app, _state) = common::create_test_app();

    app.clone()
        .oneshot(common::json_request(
            "POST",
            "/api/ubicacion",
            &json!({"lat": 1.0, "lon": 2.0, "deviceId": "d1", "timestamp": "2026-08-01T10:00:00Z"}),
        ))
        .await
        .unwrap();
    app.clone()
        .oneshot(common::json_request(
            "PUT",
            "/api/dispositivos/d1",
            &json!({"activo": false}),
        ))
        .await
        .unwrap();

    let response = app.oneshot(common::get_request("/api/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;

    assert_eq!(body["clientesConectados"], 0);
    assert_eq!(body["dispositivos"]["total"], 1);
    assert_eq!(body["dispositivos"]["activos"], 0);
    assert_eq!(body["ultimaUbicacion"]["deviceId"], "d1");
    assert_eq!(body["ultimaUbicacion"]["timestamp"], "2026-08-01T10:00:00Z");
    assert_eq!(body["servidor"]["puerto"], 3000);
    assert!(body["servidor"]["iniciado"].is_string());
}

#[tokio::test]
async fn test_unmatched_route_is_json_404() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(common::get_request("/api/no/existe"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "Endpoint no encontrado");
}

#[tokio::test]
async fn test_health_check() {
    let (app, _state) = common::create_test_app();

    let response = app.oneshot(common::get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["status"], "ok");
}
