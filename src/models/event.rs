// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Push-channel message envelopes.

use crate::models::{Device, DeviceSummary, Location};
use serde::Serialize;

/// JSON envelope pushed to viewer channels: `{tipo, datos}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "tipo", content = "datos", rename_all = "snake_case")]
pub enum Envelope {
    /// Full device snapshot, sent on join and on any membership or
    /// name/active change.
    Dispositivos(Vec<Device>),
    /// Single-device delta, sent on every accepted ingest.
    UbicacionDispositivo(LocationUpdate),
}

/// Payload of a `ubicacion_dispositivo` event.
#[derive(Debug, Clone, Serialize)]
pub struct LocationUpdate {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    pub ubicacion: Location,
    pub dispositivo: DeviceSummary,
}
