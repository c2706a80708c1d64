//! Public driver handle.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use busylight_curves::Color;
use busylight_hid_common::{HidDeviceInfo, HidPort};
use crossbeam::channel::{Receiver, Sender, unbounded};
use tracing::warn;

use crate::config::DriverConfig;
use crate::events::{ConnectionEvent, ConnectionState};
use crate::worker::{Command, Shared, Worker};

/// Handle to one Busylight.
///
/// All commands are fire-and-forget: they post onto the worker queue and
/// return immediately. While no device is attached they update the
/// pending output state and nothing else — a caller can set a color with
/// the light unplugged and it will appear when the device is plugged in.
///
/// There is no global instance; construct one and pass it (or clones of
/// its [`events`](Busylight::events) receiver) to whatever needs it.
pub struct Busylight {
    commands: Sender<Command>,
    events: Receiver<ConnectionEvent>,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl Busylight {
    /// Spawn the driver worker over `port` and attempt an initial
    /// connect immediately.
    pub fn open(port: Box<dyn HidPort>, config: DriverConfig) -> Self {
        let config = config.normalized();
        let (command_tx, command_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();
        let shared = Arc::new(Shared::new());

        let worker = Worker::new(port, config, command_rx, event_tx, Arc::clone(&shared));
        let handle = std::thread::Builder::new()
            .name("busylight-driver".into())
            .spawn(move || worker.run())
            .ok();

        if handle.is_none() {
            warn!("could not spawn driver worker thread");
        }

        Self {
            commands: command_tx,
            events: event_rx,
            shared,
            worker: handle,
        }
    }

    /// Request a connection attempt right away, skipping any pending
    /// reconnect backoff. No-op while already connected.
    ///
    /// [`open`](Busylight::open) invokes this automatically; callers
    /// only need it to shortcut the backoff after attaching a device.
    pub fn connect(&self) {
        self.post(Command::Connect);
    }

    /// Show a solid color, superseding any running animation.
    pub fn light(&self, color: Color) {
        self.post(Command::Light(color));
    }

    /// Pulse between `colors[0]` (high) and `colors[1]` (low) with one
    /// full triangle cycle lasting `rate`.
    ///
    /// Fewer than two colors is animation misuse: logged and ignored,
    /// the current output is left untouched.
    pub fn pulse(&self, colors: &[Color], rate: Duration) {
        self.post(Command::Pulse {
            colors: colors.to_vec(),
            rate,
        });
    }

    /// Turn the light off, superseding any running animation.
    pub fn off(&self) {
        self.post(Command::Off);
    }

    /// Stop the worker and release the device. Idempotent.
    pub fn close(&mut self) {
        // A send error just means the worker already exited.
        let _closed = self.commands.send(Command::Close);
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                warn!("driver worker panicked during shutdown");
            }
        }
    }

    /// Identity of the currently connected device, if any.
    pub fn device_info(&self) -> Option<HidDeviceInfo> {
        self.shared.info.lock().clone()
    }

    /// Snapshot of the connection state machine.
    pub fn state(&self) -> ConnectionState {
        *self.shared.state.lock()
    }

    /// Stream of connection transitions. Receivers are cheap to clone;
    /// each event is delivered to one receiver (the channel is a queue,
    /// not a broadcast), so keep a single consumer per driver.
    pub fn events(&self) -> Receiver<ConnectionEvent> {
        self.events.clone()
    }

    fn post(&self, command: Command) {
        if self.commands.send(command).is_err() {
            warn!("driver worker is gone; command dropped");
        }
    }
}

impl Drop for Busylight {
    fn drop(&mut self) {
        self.close();
    }
}
