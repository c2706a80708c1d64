//! USB vendor/product IDs for supported Busylight hardware.

use crate::types::{DeviceDescriptor, ProtocolVariant};

/// Plenom A/S (Busylight UC family, extended protocol).
pub const VENDOR_PLENOM: u16 = 0x27bb;

/// Microchip Technology (original Busylight, legacy protocol).
pub const VENDOR_MICROCHIP: u16 = 0x04d8;

/// Every device this crate knows how to drive, in match priority order.
pub const SUPPORTED_DEVICES: &[DeviceDescriptor] = &[
    DeviceDescriptor {
        vendor_id: VENDOR_PLENOM,
        product_id: 0x3bca,
        variant: ProtocolVariant::Extended,
        name: "Busylight UC Alpha",
    },
    DeviceDescriptor {
        vendor_id: VENDOR_PLENOM,
        product_id: 0x3bcb,
        variant: ProtocolVariant::Extended,
        name: "Busylight UC Omega",
    },
    DeviceDescriptor {
        vendor_id: VENDOR_PLENOM,
        product_id: 0x3bcd,
        variant: ProtocolVariant::Extended,
        name: "Busylight UC Kuando Box",
    },
    DeviceDescriptor {
        vendor_id: VENDOR_MICROCHIP,
        product_id: 0xf848,
        variant: ProtocolVariant::Legacy,
        name: "Busylight",
    },
];

/// Look up a descriptor by vendor and product ID.
pub fn match_device(vendor_id: u16, product_id: u16) -> Option<&'static DeviceDescriptor> {
    SUPPORTED_DEVICES
        .iter()
        .find(|d| d.matches(vendor_id, product_id))
}
