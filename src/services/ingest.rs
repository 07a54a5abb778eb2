// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Location ingest: validation, defaulting, registry update, broadcast.

use crate::models::{DeviceSummary, Location, LocationReport, LocationUpdate};
use crate::services::registry::RegistryError;
use crate::services::{BroadcastHub, DeviceRegistry};
use crate::time_utils::now_rfc3339;
use serde_json::Value;
use std::sync::Arc;

/// A report accepted into the registry, echoed back to the reporting client.
#[derive(Debug, Clone)]
pub struct IngestAccepted {
    pub location: Location,
    pub device: DeviceSummary,
    /// True when this ingest created the device
    pub created: bool,
}

/// Validates incoming reports and records them.
#[derive(Clone)]
pub struct IngestService {
    registry: Arc<DeviceRegistry>,
    hub: BroadcastHub,
}

impl IngestService {
    pub fn new(registry: Arc<DeviceRegistry>, hub: BroadcastHub) -> Self {
        Self { registry, hub }
    }

    /// Validate and record one location report.
    ///
    /// Validation happens before any mutation; a rejected report leaves the
    /// registry untouched and emits no broadcast. `fallback_device_id` is
    /// the caller's transport source address, used when the report carries
    /// no `deviceId`.
    pub fn ingest(
        &self,
        report: LocationReport,
        fallback_device_id: &str,
        user_agent: &str,
    ) -> Result<IngestAccepted, IngestError> {
        let latitude = numeric(&report.lat).ok_or(ValidationError::InvalidType)?;
        let longitude = numeric(&report.lon).ok_or(ValidationError::InvalidType)?;
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::OutOfRange("Latitud", -90.0, 90.0).into());
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::OutOfRange("Longitud", -180.0, 180.0).into());
        }

        let device_id = report
            .device_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| fallback_device_id.to_string());

        let received_at = now_rfc3339();
        let location = Location {
            latitude,
            longitude,
            // Missing, non-numeric or negative accuracy defaults to 0
            accuracy: numeric(&report.accuracy)
                .filter(|a| *a >= 0.0)
                .unwrap_or(0.0),
            timestamp: report
                .timestamp
                .clone()
                .unwrap_or_else(|| Value::String(received_at.clone())),
            received_at,
            device_id: device_id.clone(),
            battery: report.battery.as_ref().and_then(Value::as_i64),
            speed: numeric(&report.speed),
            bearing: numeric(&report.bearing),
            altitude: numeric(&report.altitude),
        };

        let (_, created) = self.registry.get_or_create(&device_id, user_agent);
        let device = self.registry.record_location(&device_id, location.clone())?;
        let summary = DeviceSummary::of(&device);

        tracing::info!(
            device_id = %device_id,
            lat = latitude,
            lon = longitude,
            accuracy = location.accuracy,
            created,
            "Location accepted"
        );

        if created {
            self.hub.broadcast_device_list();
        }
        self.hub.broadcast_location(LocationUpdate {
            device_id,
            ubicacion: location.clone(),
            dispositivo: summary.clone(),
        });

        Ok(IngestAccepted {
            location,
            device: summary,
            created,
        })
    }
}

fn numeric(value: &Option<Value>) -> Option<f64> {
    value.as_ref().and_then(Value::as_f64)
}

/// Report rejections, detected before any mutation.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Latitud y longitud deben ser números")]
    InvalidType,

    #[error("{0} debe estar entre {1} y {2}")]
    OutOfRange(&'static str, f64, f64),
}

/// Errors from the ingest path.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
