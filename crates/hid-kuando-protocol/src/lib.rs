//! Kuando Busylight USB HID protocol: report layout, checksums, and the
//! supported-device table.
//!
//! Two report formats exist in the field. The original Busylight
//! (Microchip vendor ID) takes a bare 9-byte report. The Busylight UC
//! family (Plenom vendor ID) takes the same header and RGB slots padded
//! out to 65 bytes with a fixed footer and a 16-bit additive checksum in
//! the last two bytes — a report with a bad checksum is silently ignored
//! by the firmware, which is why this crate recomputes it on every
//! encode rather than trusting callers to remember.
//!
//! Everything here is a pure transform over fixed offsets: no I/O, no
//! allocation, no failure modes.

pub mod ids;
pub mod output;
pub mod types;

pub use ids::{SUPPORTED_DEVICES, match_device};
pub use output::{OutputReport, checksum, verify_checksum};
pub use types::{DeviceDescriptor, ProtocolVariant};

/// Legacy report length in bytes (report ID included).
pub const REPORT_LEN_LEGACY: usize = 9;

/// Extended (Busylight UC) report length in bytes.
pub const REPORT_LEN_EXTENDED: usize = 65;

/// Byte offsets of the RGB slots, identical in both variants.
pub const OFFSET_RED: usize = 3;
pub const OFFSET_GREEN: usize = 4;
pub const OFFSET_BLUE: usize = 5;

/// Extended variant: checksum covers bytes `0..CHECKSUM_SPAN`.
pub const CHECKSUM_SPAN: usize = 63;

/// Extended variant: high/low checksum byte offsets.
pub const OFFSET_CHECKSUM_HI: usize = 63;
pub const OFFSET_CHECKSUM_LO: usize = 64;
