//! The driver worker: single thread owning all device state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use busylight_curves::{Color, GammaLut};
use busylight_hid_common::{HidDeviceInfo, HidPort, HidTransport};
use crossbeam::channel::{Receiver, RecvTimeoutError, Sender};
use hid_kuando_protocol::{OutputReport, ProtocolVariant, match_device};
use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::config::DriverConfig;
use crate::events::{ConnectionEvent, ConnectionState, DriverFault};
use crate::pulse::PulseAnimation;

/// Commands posted from the public handle onto the worker queue.
#[derive(Debug)]
pub(crate) enum Command {
    Connect,
    Light(Color),
    Pulse { colors: Vec<Color>, rate: Duration },
    Off,
    Close,
}

/// State the handle may read without a round-trip to the worker.
pub(crate) struct Shared {
    pub info: Mutex<Option<HidDeviceInfo>>,
    pub state: Mutex<ConnectionState>,
}

impl Shared {
    pub fn new() -> Self {
        Self {
            info: Mutex::new(None),
            state: Mutex::new(ConnectionState::Disconnected),
        }
    }
}

/// Idle wait when no timer is armed (nothing due, nothing to retry).
const IDLE_WAIT: Duration = Duration::from_millis(500);

pub(crate) struct Worker {
    port: Box<dyn HidPort>,
    config: DriverConfig,
    lut: GammaLut,
    commands: Receiver<Command>,
    events: Sender<ConnectionEvent>,
    shared: Arc<Shared>,

    transport: Option<Box<dyn HidTransport>>,
    report: OutputReport,
    animation: Option<PulseAnimation>,
    keepalive_at: Option<Instant>,
    reconnect_at: Option<Instant>,
    // Disconnected is announced once per outage, not once per retry.
    outage_announced: bool,
}

impl Worker {
    pub fn new(
        port: Box<dyn HidPort>,
        config: DriverConfig,
        commands: Receiver<Command>,
        events: Sender<ConnectionEvent>,
        shared: Arc<Shared>,
    ) -> Self {
        let lut = GammaLut::with_exponent(config.gamma_exponent);
        Self {
            port,
            config,
            lut,
            commands,
            events,
            shared,
            transport: None,
            report: OutputReport::new(ProtocolVariant::Extended),
            animation: None,
            keepalive_at: None,
            reconnect_at: None,
            outage_announced: false,
        }
    }

    pub fn run(mut self) {
        self.try_connect();

        loop {
            let timeout = self.next_timeout(Instant::now());
            match self.commands.recv_timeout(timeout) {
                Ok(Command::Close) => break,
                Ok(command) => self.handle(command),
                Err(RecvTimeoutError::Timeout) => {}
                // Handle dropped without close(); same shutdown path.
                Err(RecvTimeoutError::Disconnected) => break,
            }
            self.fire_due_timers(Instant::now());
        }

        self.shutdown();
    }

    /// How long the loop may sleep before something needs attention.
    fn next_timeout(&self, now: Instant) -> Duration {
        let mut timeout = IDLE_WAIT;

        if let Some(anim) = &self.animation {
            if let Some(due) = anim.stepper.time_until_due(now) {
                timeout = timeout.min(due);
            }
        }
        if let Some(at) = self.keepalive_at {
            timeout = timeout.min(at.saturating_duration_since(now));
        }
        if let Some(at) = self.reconnect_at {
            timeout = timeout.min(at.saturating_duration_since(now));
        }

        timeout
    }

    fn fire_due_timers(&mut self, now: Instant) {
        if let Some(at) = self.reconnect_at {
            if now >= at && self.transport.is_none() {
                self.reconnect_at = None;
                self.try_connect();
            }
        }

        // At most one animation step per wakeup; the stepper re-anchors
        // if the loop ever falls behind.
        let step_color = self
            .animation
            .as_mut()
            .and_then(|anim| anim.stepper.poll(now).map(|step| anim.color_at(step)));
        if let Some(color) = step_color {
            self.write_pulse_color(color);
        }

        if let Some(at) = self.keepalive_at {
            if now >= at && self.transport.is_some() {
                trace!("keep-alive: re-sending current buffer");
                self.send();
            }
        }
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Connect => {
                // No-op while connected; otherwise skip any pending
                // backoff and attempt right away.
                if self.transport.is_none() {
                    self.reconnect_at = None;
                    self.try_connect();
                }
            }
            Command::Light(color) => {
                self.animation = None;
                self.report.set_color(color, &self.lut);
                self.send();
            }
            Command::Off => {
                self.animation = None;
                self.report.set_color(Color::OFF, &self.lut);
                self.send();
            }
            Command::Pulse { colors, rate } => {
                self.animation = None;
                if colors.len() < 2 {
                    let fault = DriverFault::AnimationMisuse(colors.len());
                    warn!(%fault, "rejecting pulse command");
                    return;
                }
                match PulseAnimation::new(colors[0], colors[1], rate, self.config.tick) {
                    Ok(anim) => {
                        debug!(?rate, tick = ?self.config.tick, "starting pulse animation");
                        self.animation = Some(anim);
                    }
                    Err(e) => warn!(error = %e, "could not start pulse animation"),
                }
            }
            // Close never reaches here; the run loop breaks on it.
            Command::Close => {}
        }
    }

    /// Enumerate, match against the supported-device table, open.
    ///
    /// Failure is never fatal: the driver stays in `Connecting` and
    /// retries after the configured backoff, forever.
    fn try_connect(&mut self) {
        self.set_state(ConnectionState::Connecting);

        if let Err(e) = self.port.refresh() {
            warn!(error = %e, "HID enumeration refresh failed");
            self.fail_connect(DriverFault::DeviceNotFound);
            return;
        }

        let matched = self.port.enumerate().into_iter().find_map(|info| {
            match_device(info.vendor_id, info.product_id).map(|desc| (info, desc))
        });

        let Some((info, descriptor)) = matched else {
            debug!("no supported device in enumeration");
            self.fail_connect(DriverFault::DeviceNotFound);
            return;
        };

        match self.port.open(&info.path) {
            Ok(transport) => {
                // Switch the buffer to the device's protocol variant but
                // keep the RGB slots, so a replug restores the last
                // requested color.
                if self.report.variant() != descriptor.variant {
                    let (r, g, b) = self.report.rgb();
                    self.report = OutputReport::new(descriptor.variant);
                    self.report.set_raw_rgb(r, g, b);
                }

                info!(
                    device = %info.display_name(),
                    vendor_id = info.vendor_id,
                    product_id = info.product_id,
                    variant = ?descriptor.variant,
                    "connected to Busylight"
                );

                self.transport = Some(transport);
                *self.shared.info.lock() = Some(info.clone());
                self.set_state(ConnectionState::Connected);
                self.outage_announced = false;
                self.reconnect_at = None;
                self.emit(ConnectionEvent::Connected(info));

                // Push the current state to the hardware immediately.
                self.send();
            }
            Err(e) => {
                warn!(path = %info.path, error = %e, "matched device but open failed");
                self.fail_connect(DriverFault::HandleOpenFailure(e.to_string()));
            }
        }
    }

    fn fail_connect(&mut self, fault: DriverFault) {
        trace!(%fault, "connect attempt failed");
        self.announce_outage();
        self.reconnect_at = Some(Instant::now() + self.config.reconnect_backoff);
    }

    /// Write the current buffer; on failure degrade to reconnecting.
    fn send(&mut self) {
        let Some(transport) = self.transport.as_mut() else {
            // Disconnected commands are no-ops; the buffer already holds
            // the color for when the device comes back.
            return;
        };

        let bytes = self.report.encode();
        match transport.write_report(bytes) {
            Ok(written) => {
                trace!(written, "report written");
                self.keepalive_at = Some(Instant::now() + self.config.keepalive);
            }
            Err(e) => {
                warn!(error = %e, "write failed; connection presumed stale");
                self.set_state(ConnectionState::Erroring);
                self.transport = None;
                self.keepalive_at = None;
                *self.shared.info.lock() = None;
                self.emit(ConnectionEvent::Error(DriverFault::WriteFailure(
                    e.to_string(),
                )));
                self.set_state(ConnectionState::Connecting);
                self.announce_outage();
                // The first retry is immediate (the device may have been
                // swapped, not removed); only subsequent attempts wait
                // out the backoff.
                self.reconnect_at = Some(Instant::now());
            }
        }
    }

    /// Gamma-correct and write one animation frame.
    ///
    /// Dim floor: a non-black frame that corrects to black would make
    /// the pulse visibly blink off at its low end, so substitute the
    /// smallest non-zero wire value instead.
    fn write_pulse_color(&mut self, color: Color) {
        let corrected = self.lut.correct_color(color);
        if corrected.is_off() && !color.is_off() {
            self.report.set_raw_rgb(0, 0, 1);
        } else {
            self.report.set_raw_rgb(corrected.r, corrected.g, corrected.b);
        }
        self.send();
    }

    fn announce_outage(&mut self) {
        if !self.outage_announced {
            self.outage_announced = true;
            self.emit(ConnectionEvent::Disconnected);
        }
    }

    fn set_state(&self, state: ConnectionState) {
        *self.shared.state.lock() = state;
    }

    fn emit(&self, event: ConnectionEvent) {
        // The handle may have dropped its receiver; events are advisory.
        if self.events.send(event).is_err() {
            trace!("event receiver gone");
        }
    }

    fn shutdown(&mut self) {
        self.animation = None;
        let was_connected = self.transport.take().is_some();
        *self.shared.info.lock() = None;
        self.set_state(ConnectionState::Disconnected);
        if was_connected {
            self.emit(ConnectionEvent::Disconnected);
        }
        debug!("driver worker stopped");
    }
}
