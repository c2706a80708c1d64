//! Kuando Busylight device driver.
//!
//! Owns the physical connection to exactly one Busylight, encodes
//! commands into the device's report format, keeps the link alive, and
//! drives multi-second pulse animations — all without ever blocking the
//! caller or crashing the host process when the cable is yanked.
//!
//! All device state lives on a single worker thread. The public
//! [`Busylight`] handle posts commands onto a queue and reads connection
//! transitions back as [`ConnectionEvent`]s, so there is exactly one
//! writer to the HID handle and at most one live animation at any time.
//!
//! ```no_run
//! use busylight_curves::Color;
//! use busylight_driver::{Busylight, DriverConfig};
//! use busylight_hid_common::HidapiPort;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), busylight_hid_common::HidCommonError> {
//! let port = HidapiPort::new()?;
//! let mut light = Busylight::open(Box::new(port), DriverConfig::default());
//!
//! light.light(Color::new(0, 255, 0));
//! light.pulse(&[Color::new(255, 0, 0), Color::OFF], Duration::from_secs(2));
//! light.close();
//! # Ok(())
//! # }
//! ```

mod config;
mod driver;
mod events;
mod pulse;
mod worker;

pub use config::DriverConfig;
pub use driver::Busylight;
pub use events::{ConnectionEvent, ConnectionState, DriverFault};
