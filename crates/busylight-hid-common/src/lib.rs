//! Common HID plumbing for the Busylight driver.
//!
//! The driver core never talks to `hidapi` directly; it goes through the
//! [`HidPort`]/[`HidTransport`] seam defined here so every piece of
//! lifecycle logic — reconnect, keep-alive, failure degradation — runs
//! identically against real hardware and against the in-memory [`mock`]
//! implementations in tests.

pub mod device_info;
pub mod hidapi_backend;
pub mod mock;
pub mod transport;

pub use device_info::HidDeviceInfo;
pub use hidapi_backend::HidapiPort;
pub use transport::{HidPort, HidTransport};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HidCommonError {
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    #[error("failed to open device: {0}")]
    OpenError(String),

    #[error("failed to write to device: {0}")]
    WriteError(String),

    #[error("device disconnected")]
    Disconnected,

    #[error("HID API error: {0}")]
    HidApi(String),
}

pub type HidCommonResult<T> = Result<T, HidCommonError>;
