//! Connection state and the events the driver reports to its owner.

use busylight_hid_common::HidDeviceInfo;

/// Where the driver's connection state machine currently is.
///
/// `Erroring` is the transient stop between a failed write and the
/// scheduled reconnect; externally it is always followed by
/// `Connecting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Erroring,
}

/// Recoverable faults the driver reports or logs.
///
/// None of these are fatal: the first three feed the reconnect loop and
/// `AnimationMisuse` is rejected at the call boundary with no state
/// change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriverFault {
    #[error("no supported device attached")]
    DeviceNotFound,

    #[error("failed to open device: {0}")]
    HandleOpenFailure(String),

    #[error("device write failed: {0}")]
    WriteFailure(String),

    #[error("pulse requires at least two colors, got {0}")]
    AnimationMisuse(usize),
}

/// Connection transitions, delivered on the driver's event channel.
///
/// The enum-tagged replacement for an event-emitter object: exactly one
/// concrete device type exists per process, so there is nothing to
/// dispatch dynamically.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionEvent {
    /// A supported device was matched and opened.
    Connected(HidDeviceInfo),
    /// The device went away (unplug, failed enumeration, or `close`).
    /// Emitted once per outage, not once per retry.
    Disconnected,
    /// Informational; always followed by recovery attempts.
    Error(DriverFault),
}
