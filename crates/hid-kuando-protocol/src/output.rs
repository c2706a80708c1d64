//! Output report buffer: the single mutable byte image of device state.

use busylight_curves::{Color, GammaLut};

use crate::types::ProtocolVariant;
use crate::{
    CHECKSUM_SPAN, OFFSET_BLUE, OFFSET_CHECKSUM_HI, OFFSET_CHECKSUM_LO, OFFSET_GREEN, OFFSET_RED,
    REPORT_LEN_EXTENDED,
};

/// Additive checksum over the covered span of an extended report.
///
/// 63 bytes of at most 255 each tops out at 16065, so `u16` never wraps.
pub fn checksum(covered: &[u8]) -> u16 {
    covered.iter().map(|&b| u16::from(b)).sum()
}

/// Check the trailing checksum bytes of a full extended report.
///
/// Reports that are not exactly 65 bytes fail verification.
pub fn verify_checksum(report: &[u8]) -> bool {
    if report.len() != REPORT_LEN_EXTENDED {
        return false;
    }
    let sum = checksum(&report[..CHECKSUM_SPAN]);
    report[OFFSET_CHECKSUM_HI] == ((sum >> 8) & 0xff) as u8
        && report[OFFSET_CHECKSUM_LO] == (sum % 256) as u8
}

/// The device's current output state as raw report bytes.
///
/// Exactly one of these lives per driver instance. Color commands mutate
/// it in place; the keep-alive path re-encodes it unchanged. The backing
/// array is sized for the larger variant and [`encode`](Self::encode)
/// returns the slice that actually goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputReport {
    buf: [u8; REPORT_LEN_EXTENDED],
    variant: ProtocolVariant,
}

impl OutputReport {
    /// Fresh report with the variant's fixed header and footer, RGB dark.
    pub fn new(variant: ProtocolVariant) -> Self {
        let mut buf = [0u8; REPORT_LEN_EXTENDED];
        match variant {
            ProtocolVariant::Legacy => {
                // Byte 0 is the report ID; byte 8 terminates the legacy
                // command frame.
                buf[8] = 128;
            }
            ProtocolVariant::Extended => {
                // Command byte, then the fixed 0xff footer the firmware
                // expects just ahead of the checksum.
                buf[1] = 16;
                buf[59] = 0xff;
                buf[60] = 0xff;
                buf[61] = 0xff;
                buf[62] = 0xff;
            }
        }
        Self { buf, variant }
    }

    /// Gamma-correct `color` and write it into the RGB slots.
    ///
    /// This is the one place correction happens on the way to the wire;
    /// callers hand in linear (pre-gamma) values.
    pub fn set_color(&mut self, color: Color, lut: &GammaLut) {
        let corrected = lut.correct_color(color);
        self.set_raw_rgb(corrected.r, corrected.g, corrected.b);
    }

    /// Write already-corrected channel bytes directly.
    ///
    /// Escape hatch for the driver's pulse dim floor, which substitutes
    /// an explicit minimal wire value when correction rounds a non-black
    /// color down to black.
    pub fn set_raw_rgb(&mut self, r: u8, g: u8, b: u8) {
        self.buf[OFFSET_RED] = r;
        self.buf[OFFSET_GREEN] = g;
        self.buf[OFFSET_BLUE] = b;
    }

    /// Current wire bytes in the RGB slots.
    pub fn rgb(&self) -> (u8, u8, u8) {
        (
            self.buf[OFFSET_RED],
            self.buf[OFFSET_GREEN],
            self.buf[OFFSET_BLUE],
        )
    }

    /// Finalize and return the exact bytes to write to the device.
    ///
    /// For the extended variant this recomputes the checksum over bytes
    /// `0..63` and stores it at offsets 63/64; encoding the same state
    /// twice yields identical bytes. Never fails.
    pub fn encode(&mut self) -> &[u8] {
        if self.variant == ProtocolVariant::Extended {
            let sum = checksum(&self.buf[..CHECKSUM_SPAN]);
            self.buf[OFFSET_CHECKSUM_HI] = ((sum >> 8) & 0xff) as u8;
            self.buf[OFFSET_CHECKSUM_LO] = (sum % 256) as u8;
        }
        &self.buf[..self.variant.report_len()]
    }

    pub fn variant(&self) -> ProtocolVariant {
        self.variant
    }
}
