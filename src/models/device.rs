// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Tracked device model for the registry and API.
//!
//! Wire field names are the Spanish ones the mobile app and map frontend
//! already speak; the Rust side keeps conventional naming via serde renames.

use crate::models::Location;
use serde::{Deserialize, Serialize};

/// A distinct reporting source, identified by a stable id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Client-assigned identity (or the caller's address when none was sent)
    pub id: String,
    /// Human-readable label, editable via the API
    #[serde(rename = "nombre")]
    pub display_name: String,
    /// Marker color, assigned once at creation from the palette
    pub color: String,
    /// Reporting client's agent string, captured at first sighting
    #[serde(rename = "userAgent")]
    pub user_agent: String,
    /// When the device was first seen (RFC3339)
    #[serde(rename = "creadoEn")]
    pub created_at: String,
    /// Inactive devices are hidden from the active-locations listing only
    #[serde(rename = "activo")]
    pub active: bool,
    /// Most recent accepted location, if any
    #[serde(rename = "ultimaUbicacion")]
    pub last_location: Option<Location>,
    /// Timestamp of the most recent ingest (RFC3339)
    #[serde(rename = "ultimaActividad")]
    pub last_activity_at: String,
    /// Creation sequence number; drives palette assignment and listing order
    #[serde(skip)]
    pub(crate) seq: usize,
}

/// Compact device identity echoed alongside location events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSummary {
    pub id: String,
    #[serde(rename = "nombre")]
    pub display_name: String,
    pub color: String,
}

impl DeviceSummary {
    pub fn of(device: &Device) -> Self {
        Self {
            id: device.id.clone(),
            display_name: device.display_name.clone(),
            color: device.color.clone(),
        }
    }
}

/// Partial update accepted by `PUT /api/dispositivos/{deviceId}`.
#[derive(Debug, Default, Deserialize)]
pub struct DeviceUpdate {
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub activo: Option<bool>,
}
