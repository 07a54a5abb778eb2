// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON API routes: location ingest and device queries.

use crate::error::{AppError, Result};
use crate::models::{Device, DeviceSummary, DeviceUpdate, Location, LocationReport};
use crate::AppState;
use axum::{
    extract::{ConnectInfo, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/ubicacion", post(post_ubicacion))
        .route("/api/ubicacion/ultima", get(get_ultima_ubicacion))
        .route("/api/ubicaciones", get(get_ubicaciones))
        .route("/api/dispositivos", get(get_dispositivos))
        .route(
            "/api/dispositivos/{deviceId}",
            get(get_dispositivo).put(put_dispositivo),
        )
        .route("/api/stats", get(get_stats))
}

// ─── Ingest ──────────────────────────────────────────────────

/// Echo returned to the reporting client.
#[derive(Serialize)]
pub struct UbicacionResponse {
    pub mensaje: String,
    pub ubicacion: Location,
    pub dispositivo: DeviceSummary,
}

/// Receive a location report from a device.
///
/// The peer address stands in for the device identity when the body
/// carries no `deviceId`.
async fn post_ubicacion(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(report): Json<LocationReport>,
) -> Result<Json<UbicacionResponse>> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("No especificado");

    let accepted = state
        .ingest
        .ingest(report, &addr.ip().to_string(), user_agent)?;

    Ok(Json(UbicacionResponse {
        mensaje: "Ubicación recibida correctamente".to_string(),
        ubicacion: accepted.location,
        dispositivo: accepted.device,
    }))
}

/// Most recently ingested location across all devices.
async fn get_ultima_ubicacion(State(state): State<Arc<AppState>>) -> Response {
    match state.registry.last_ingested() {
        Some(ubicacion) => Json(ubicacion).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "mensaje": "No hay ubicaciones disponibles" })),
        )
            .into_response(),
    }
}

// ─── Devices ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct DispositivosResponse {
    pub dispositivos: Vec<Device>,
    pub total: usize,
}

/// All known devices, in creation order.
async fn get_dispositivos(State(state): State<Arc<AppState>>) -> Json<DispositivosResponse> {
    let dispositivos = state.registry.list();
    let total = dispositivos.len();
    Json(DispositivosResponse {
        dispositivos,
        total,
    })
}

async fn get_dispositivo(
    State(state): State<Arc<AppState>>,
    Path(device_id): Path<String>,
) -> Result<Json<Device>> {
    state
        .registry
        .get(&device_id)
        .map(Json)
        .ok_or(AppError::NotFound(device_id))
}

/// Rename or (de)activate a device. Announces the change to viewers.
async fn put_dispositivo(
    State(state): State<Arc<AppState>>,
    Path(device_id): Path<String>,
    Json(update): Json<DeviceUpdate>,
) -> Result<Json<Device>> {
    let device = state.registry.update(&device_id, update)?;
    tracing::info!(device_id = %device.id, nombre = %device.display_name, active = device.active, "Device updated");
    state.hub.broadcast_device_list();
    Ok(Json(device))
}

// ─── Active locations ────────────────────────────────────────

#[derive(Serialize)]
pub struct UbicacionActiva {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    pub nombre: String,
    pub color: String,
    pub ubicacion: Location,
}

#[derive(Serialize)]
pub struct UbicacionesResponse {
    pub ubicaciones: Vec<UbicacionActiva>,
    pub total: usize,
}

/// Current locations of active devices, for rendering map markers.
async fn get_ubicaciones(State(state): State<Arc<AppState>>) -> Json<UbicacionesResponse> {
    let ubicaciones: Vec<UbicacionActiva> = state
        .registry
        .list()
        .into_iter()
        .filter(|d| d.active)
        .filter_map(|d| {
            d.last_location.map(|ubicacion| UbicacionActiva {
                device_id: d.id,
                nombre: d.display_name,
                color: d.color,
                ubicacion,
            })
        })
        .collect();
    let total = ubicaciones.len();
    Json(UbicacionesResponse { ubicaciones, total })
}

// ─── Stats ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StatsResponse {
    #[serde(rename = "clientesConectados")]
    pub connected_viewers: usize,
    pub dispositivos: DeviceCounts,
    #[serde(rename = "ultimaUbicacion")]
    pub last_location: Option<LastIngestSummary>,
    pub servidor: ServerInfo,
}

#[derive(Serialize)]
pub struct DeviceCounts {
    pub total: usize,
    pub activos: usize,
}

#[derive(Serialize)]
pub struct LastIngestSummary {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    pub timestamp: Value,
    pub recibido: String,
}

#[derive(Serialize)]
pub struct ServerInfo {
    pub puerto: u16,
    pub iniciado: String,
}

/// Operational counters for dashboards.
async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        connected_viewers: state.hub.viewer_count().await,
        dispositivos: DeviceCounts {
            total: state.registry.total(),
            activos: state.registry.active_count(),
        },
        last_location: state.registry.last_ingested().map(|u| LastIngestSummary {
            device_id: u.device_id,
            timestamp: u.timestamp,
            recibido: u.received_at,
        }),
        servidor: ServerInfo {
            puerto: state.config.port,
            iniciado: state.started_at.clone(),
        },
    })
}
