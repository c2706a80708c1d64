//! Production transport backed by `hidapi`.

use std::ffi::CString;

use tracing::debug;

use crate::transport::{HidPort, HidTransport};
use crate::{HidCommonError, HidCommonResult, HidDeviceInfo};

/// [`HidPort`] over the process-wide hidapi context.
pub struct HidapiPort {
    api: hidapi::HidApi,
}

impl HidapiPort {
    /// Initialize the OS HID layer.
    pub fn new() -> HidCommonResult<Self> {
        let api = hidapi::HidApi::new().map_err(|e| HidCommonError::HidApi(e.to_string()))?;
        Ok(Self { api })
    }
}

impl HidPort for HidapiPort {
    fn refresh(&mut self) -> HidCommonResult<()> {
        self.api
            .refresh_devices()
            .map_err(|e| HidCommonError::HidApi(e.to_string()))
    }

    fn enumerate(&self) -> Vec<HidDeviceInfo> {
        self.api
            .device_list()
            .map(|dev| {
                let mut info = HidDeviceInfo::new(
                    dev.vendor_id(),
                    dev.product_id(),
                    dev.path().to_string_lossy().into_owned(),
                );
                if let Some(product) = dev.product_string() {
                    info = info.with_product(product);
                }
                if let Some(serial) = dev.serial_number() {
                    info = info.with_serial(serial);
                }
                info
            })
            .collect()
    }

    fn open(&self, path: &str) -> HidCommonResult<Box<dyn HidTransport>> {
        let c_path = CString::new(path)
            .map_err(|nul| HidCommonError::OpenError(format!("path contains NUL: {nul}")))?;
        let device = self
            .api
            .open_path(&c_path)
            .map_err(|e| HidCommonError::OpenError(e.to_string()))?;

        let info = self
            .enumerate()
            .into_iter()
            .find(|i| i.path == path)
            .unwrap_or_else(|| HidDeviceInfo::new(0, 0, path));

        debug!(path, vendor_id = info.vendor_id, product_id = info.product_id, "opened HID device");
        Ok(Box::new(HidapiTransport { device, info }))
    }
}

struct HidapiTransport {
    device: hidapi::HidDevice,
    info: HidDeviceInfo,
}

impl HidTransport for HidapiTransport {
    fn write_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
        self.device
            .write(data)
            .map_err(|e| HidCommonError::WriteError(e.to_string()))
    }

    fn info(&self) -> &HidDeviceInfo {
        &self.info
    }
}
