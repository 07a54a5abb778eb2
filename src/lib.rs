// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Rastreo-Server: real-time GPS tracking backend
//!
//! This crate provides the backend API for ingesting location reports from
//! mobile devices and fanning updates out to connected map viewers over
//! WebSocket.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::{BroadcastHub, DeviceRegistry, IngestService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub registry: Arc<DeviceRegistry>,
    pub hub: BroadcastHub,
    pub ingest: IngestService,
    /// Server start time (RFC3339), reported by `/api/stats`.
    pub started_at: String,
}
