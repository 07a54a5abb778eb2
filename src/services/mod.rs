// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod hub;
pub mod ingest;
pub mod registry;

pub use hub::{BroadcastHub, ViewerId, ViewerSender};
pub use ingest::{IngestAccepted, IngestService};
pub use registry::DeviceRegistry;
