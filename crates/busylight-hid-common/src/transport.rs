//! Transport traits the driver core is written against.
//!
//! These are synchronous by design: the driver owns a single worker
//! thread and a HID write is a fast local syscall, so there is nothing to
//! await. `Send` bounds let the driver move the opened transport onto its
//! worker.

use crate::{HidCommonResult, HidDeviceInfo};

/// An open, exclusively-owned handle to one physical device.
pub trait HidTransport: Send {
    /// Write one raw output report. Returns the byte count accepted.
    ///
    /// A failure here is the driver's disconnect signal; implementations
    /// must not retry internally.
    fn write_report(&mut self, data: &[u8]) -> HidCommonResult<usize>;

    /// Identity of the device this transport is attached to.
    fn info(&self) -> &HidDeviceInfo;
}

/// Enumeration and opening of HID devices.
pub trait HidPort: Send {
    /// Re-scan the bus so [`enumerate`](Self::enumerate) reflects
    /// current attachment state.
    fn refresh(&mut self) -> HidCommonResult<()>;

    /// Snapshot of currently attached devices.
    fn enumerate(&self) -> Vec<HidDeviceInfo>;

    /// Open the device at `path` for exclusive output.
    fn open(&self, path: &str) -> HidCommonResult<Box<dyn HidTransport>>;
}
