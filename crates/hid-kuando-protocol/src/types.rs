//! Protocol variant and device descriptor types.

use serde::{Deserialize, Serialize};

use crate::{REPORT_LEN_EXTENDED, REPORT_LEN_LEGACY};

/// Which report format a device speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolVariant {
    /// 9-byte report, no checksum.
    Legacy,
    /// 65-byte padded report with trailing 16-bit checksum.
    Extended,
}

impl ProtocolVariant {
    /// Wire length of a report for this variant.
    pub const fn report_len(self) -> usize {
        match self {
            ProtocolVariant::Legacy => REPORT_LEN_LEGACY,
            ProtocolVariant::Extended => REPORT_LEN_EXTENDED,
        }
    }
}

/// One row of the static supported-device table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceDescriptor {
    pub vendor_id: u16,
    pub product_id: u16,
    pub variant: ProtocolVariant,
    pub name: &'static str,
}

impl DeviceDescriptor {
    pub fn matches(&self, vendor_id: u16, product_id: u16) -> bool {
        self.vendor_id == vendor_id && self.product_id == product_id
    }
}
