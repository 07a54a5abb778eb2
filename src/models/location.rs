// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! GPS fix model and the raw ingest report.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single accepted GPS fix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    /// Degrees, within [-90, 90]
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Degrees, within [-180, 180]
    #[serde(rename = "lon")]
    pub longitude: f64,
    /// Positional error estimate in meters, 0 when the client sent none
    pub accuracy: f64,
    /// Fix time as the client declared it, passed through verbatim
    pub timestamp: Value,
    /// When the server received the report (RFC3339)
    #[serde(rename = "recibido")]
    pub received_at: String,
    /// Owning device
    #[serde(rename = "deviceId")]
    pub device_id: String,
    /// Battery percentage, when the client reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery: Option<i64>,
    /// Speed in m/s
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Heading in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearing: Option<f64>,
    /// Altitude in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

/// Raw body of `POST /api/ubicacion`, before validation.
///
/// Fields are kept as raw JSON values so that defaulting of malformed
/// optional fields is an explicit parse-or-default step in the ingest
/// handler rather than a serde-level rejection or coercion.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LocationReport {
    #[serde(default)]
    pub lat: Option<Value>,
    #[serde(default)]
    pub lon: Option<Value>,
    #[serde(default)]
    pub accuracy: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default, rename = "deviceId")]
    pub device_id: Option<String>,
    #[serde(default)]
    pub battery: Option<Value>,
    #[serde(default)]
    pub speed: Option<Value>,
    #[serde(default)]
    pub bearing: Option<Value>,
    #[serde(default)]
    pub altitude: Option<Value>,
}
