//! Identity of an enumerated HID device.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HidDeviceInfo {
    #[serde(rename = "vendorId")]
    pub vendor_id: u16,
    #[serde(rename = "productId")]
    pub product_id: u16,
    pub product: Option<String>,
    pub serial_number: Option<String>,
    pub path: String,
}

impl HidDeviceInfo {
    pub fn new(vendor_id: u16, product_id: u16, path: impl Into<String>) -> Self {
        Self {
            vendor_id,
            product_id,
            product: None,
            serial_number: None,
            path: path.into(),
        }
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial_number = Some(serial.into());
        self
    }

    pub fn matches(&self, vendor_id: u16, product_id: u16) -> bool {
        self.vendor_id == vendor_id && self.product_id == product_id
    }

    pub fn display_name(&self) -> String {
        self.product
            .clone()
            .unwrap_or_else(|| format!("{:04x}:{:04x}", self.vendor_id, self.product_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching() {
        let info = HidDeviceInfo::new(0x27bb, 0x3bca, "/dev/hidraw0");
        assert!(info.matches(0x27bb, 0x3bca));
        assert!(!info.matches(0x27bb, 0x9999));
    }

    #[test]
    fn test_display_name() {
        let info = HidDeviceInfo::new(0x27bb, 0x3bca, "/dev/hidraw0")
            .with_product("Busylight UC Alpha");
        assert_eq!(info.display_name(), "Busylight UC Alpha");

        let info = HidDeviceInfo::new(0x27bb, 0x3bca, "/dev/hidraw0");
        assert_eq!(info.display_name(), "27bb:3bca");
    }

    #[test]
    fn test_serde_field_names() {
        let info = HidDeviceInfo::new(0x27bb, 0x3bca, "/dev/hidraw0");
        let json = serde_json::to_string(&info).expect("serialize");
        assert!(json.contains("\"vendorId\""));
        assert!(json.contains("\"productId\""));
    }
}
