// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory device registry: last-known position and display attributes
//! per device.

use crate::models::{Device, DeviceUpdate, Location};
use crate::time_utils::now_rfc3339;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// Marker colors, rotated by creation order.
const PALETTE: [&str; 8] = [
    "#FF5733", "#33A1FF", "#33FF57", "#FF33F5", "#FFD133", "#33FFF5", "#B533FF", "#FF8C33",
];

/// Registry of known devices keyed by id.
///
/// Devices live for the process lifetime; there is no eviction. Per-device
/// mutations go through the map's shard locks, so readers always observe a
/// complete record.
#[derive(Default)]
pub struct DeviceRegistry {
    devices: DashMap<String, Device>,
    created: AtomicUsize,
    /// Most recently ingested location across all devices.
    last_ingest: RwLock<Option<Location>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the device for `id`, creating it on first sighting.
    ///
    /// The boolean is true when this call created the device; the caller
    /// uses it to announce the membership change.
    pub fn get_or_create(&self, id: &str, user_agent: &str) -> (Device, bool) {
        let mut created = false;
        let entry = self.devices.entry(id.to_string()).or_insert_with(|| {
            created = true;
            let seq = self.created.fetch_add(1, Ordering::SeqCst);
            let now = now_rfc3339();
            Device {
                id: id.to_string(),
                display_name: default_display_name(id),
                color: PALETTE[seq % PALETTE.len()].to_string(),
                user_agent: user_agent.to_string(),
                created_at: now.clone(),
                active: true,
                last_location: None,
                last_activity_at: now,
                seq,
            }
        });
        let device = entry.value().clone();
        drop(entry);
        if created {
            tracing::info!(device_id = %id, color = %device.color, "Device registered");
        }
        (device, created)
    }

    /// Record a new location for an existing device, replacing the previous
    /// one. Callers must have created the device first.
    pub fn record_location(&self, id: &str, location: Location) -> Result<Device, RegistryError> {
        let device = {
            let mut entry = self
                .devices
                .get_mut(id)
                .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
            entry.last_location = Some(location.clone());
            entry.last_activity_at = location.received_at.clone();
            entry.value().clone()
        };
        if let Ok(mut slot) = self.last_ingest.write() {
            *slot = Some(location);
        }
        Ok(device)
    }

    pub fn get(&self, id: &str) -> Option<Device> {
        self.devices.get(id).map(|entry| entry.value().clone())
    }

    /// All devices, in creation order.
    pub fn list(&self) -> Vec<Device> {
        let mut devices: Vec<Device> = self.devices.iter().map(|e| e.value().clone()).collect();
        devices.sort_by_key(|d| d.seq);
        devices
    }

    /// Apply a partial update; only supplied fields change.
    pub fn update(&self, id: &str, update: DeviceUpdate) -> Result<Device, RegistryError> {
        let mut entry = self
            .devices
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        if let Some(nombre) = update.nombre {
            entry.display_name = nombre;
        }
        if let Some(activo) = update.activo {
            entry.active = activo;
        }
        Ok(entry.value().clone())
    }

    /// Most recently ingested location across all devices.
    pub fn last_ingested(&self) -> Option<Location> {
        self.last_ingest.read().ok().and_then(|slot| slot.clone())
    }

    pub fn total(&self) -> usize {
        self.devices.len()
    }

    pub fn active_count(&self) -> usize {
        self.devices.iter().filter(|e| e.value().active).count()
    }
}

/// Default label derived from the device id.
fn default_display_name(id: &str) -> String {
    let short: String = id.chars().take(8).collect();
    format!("Dispositivo {short}")
}

/// Errors from registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Dispositivo no encontrado: {0}")]
    NotFound(String),
}
