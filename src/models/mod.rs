// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod device;
pub mod event;
pub mod location;

pub use device::{Device, DeviceSummary, DeviceUpdate};
pub use event::{Envelope, LocationUpdate};
pub use location::{Location, LocationReport};
