//! In-memory port/transport for hardware-free tests.
//!
//! A [`MockHidPort`] is cheap to clone; tests keep one clone and hand the
//! other to the driver, then plug and unplug [`MockDevice`]s while the
//! driver runs to exercise the full reconnect lifecycle.

use std::sync::{Arc, Mutex};

use crate::transport::{HidPort, HidTransport};
use crate::{HidCommonError, HidCommonResult, HidDeviceInfo};

#[derive(Debug)]
struct DeviceState {
    info: HidDeviceInfo,
    plugged: bool,
    writes: Vec<Vec<u8>>,
}

/// Test handle to one simulated device.
#[derive(Clone)]
pub struct MockDevice {
    state: Arc<Mutex<DeviceState>>,
}

impl MockDevice {
    pub fn info(&self) -> HidDeviceInfo {
        self.lock().info.clone()
    }

    /// Everything written to this device so far, oldest first.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.lock().writes.clone()
    }

    pub fn write_count(&self) -> usize {
        self.lock().writes.len()
    }

    pub fn last_write(&self) -> Option<Vec<u8>> {
        self.lock().writes.last().cloned()
    }

    /// Simulate yanking the cable: enumeration stops listing the device
    /// and in-flight transports start failing with `Disconnected`.
    pub fn unplug(&self) {
        self.lock().plugged = false;
    }

    pub fn replug(&self) {
        self.lock().plugged = true;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// [`HidPort`] over a mutable in-memory device list.
#[derive(Clone, Default)]
pub struct MockHidPort {
    devices: Arc<Mutex<Vec<MockDevice>>>,
}

impl MockHidPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a simulated device; returns the test handle for it.
    pub fn plug(&self, info: HidDeviceInfo) -> MockDevice {
        let device = MockDevice {
            state: Arc::new(Mutex::new(DeviceState {
                info,
                plugged: true,
                writes: Vec::new(),
            })),
        };
        self.devices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(device.clone());
        device
    }
}

impl HidPort for MockHidPort {
    fn refresh(&mut self) -> HidCommonResult<()> {
        Ok(())
    }

    fn enumerate(&self) -> Vec<HidDeviceInfo> {
        self.devices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|d| d.lock().plugged)
            .map(|d| d.info())
            .collect()
    }

    fn open(&self, path: &str) -> HidCommonResult<Box<dyn HidTransport>> {
        let devices = self.devices.lock().unwrap_or_else(|e| e.into_inner());
        for device in devices.iter() {
            let state = device.lock();
            if state.plugged && state.info.path == path {
                return Ok(Box::new(MockTransport {
                    state: Arc::clone(&device.state),
                    info: state.info.clone(),
                }));
            }
        }
        Err(HidCommonError::DeviceNotFound(path.to_string()))
    }
}

struct MockTransport {
    state: Arc<Mutex<DeviceState>>,
    info: HidDeviceInfo,
}

impl HidTransport for MockTransport {
    fn write_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if !state.plugged {
            return Err(HidCommonError::Disconnected);
        }
        state.writes.push(data.to_vec());
        Ok(data.len())
    }

    fn info(&self) -> &HidDeviceInfo {
        &self.info
    }
}
