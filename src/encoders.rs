//! Protocol-specific frame builders: each protocol's `code`/`repeat`
//! emits a sequence of `(on, duration)` pulses through [`carrier`],
//! carrying one overtime accumulator across the whole frame so the frame
//! as a whole stays phase-accurate even though every pulse is quantized
//! to a whole number of samples.
//!
//! Timings are the same 10µs-unit values the protocol tables in
//! `protocol_tables.rs` parse back out of; see that module's doc comment
//! for the source this crate's protocol constants are grounded on.

use crate::synth::{carrier, Diagnostics, SynthConfig, MULTIPLIER};

/// Everything `code`/`repeat` need to know about the sound card side of
/// the output stream.
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    pub period: i64,
    pub sample: i64,
}

impl Timing {
    pub fn new(carrier_freq_hz: f64, sample_rate_hz: f64) -> Self {
        Timing {
            period: (1_000_000.0 * MULTIPLIER as f64 / carrier_freq_hz) as i64,
            sample: (1_000_000.0 * MULTIPLIER as f64 / sample_rate_hz) as i64,
        }
    }
}

struct Frame<'a> {
    config: &'a SynthConfig,
    timing: Timing,
    overtime: i64,
    diagnostics: Diagnostics,
    buffer: Vec<i16>,
}

impl<'a> Frame<'a> {
    fn new(config: &'a SynthConfig, timing: Timing) -> Self {
        Frame { config, timing, overtime: 0, diagnostics: Diagnostics::default(), buffer: Vec::new() }
    }

    fn pulse(&mut self, on: bool, duration_10us: i32) {
        self.overtime = carrier(
            self.config,
            on,
            duration_10us as f64,
            self.overtime,
            self.timing.period,
            self.timing.sample,
            &mut self.buffer,
            &mut self.diagnostics,
        );
    }

    fn bits(&mut self, value: u32, bit_count: u32, zero: [(bool, i32); 2], one: [(bool, i32); 2]) {
        for i in (0..bit_count).rev() {
            let bit = (value >> i) & 1;
            let frame = if bit == 1 { one } else { zero };
            for (on, duration) in frame {
                self.pulse(on, duration);
            }
        }
    }
}

/// Result of encoding a frame: the stereo PCM buffer plus the diagnostic
/// timing accumulator observed while synthesizing it.
pub struct Transmission {
    pub samples: Vec<i16>,
    pub diagnostics: Diagnostics,
}

fn nec_like(
    device: i32,
    subdevice: i32,
    function: i32,
    subfunction: i32,
    lead: i32,
    config: &SynthConfig,
    timing: Timing,
) -> Transmission {
    let mut frame = Frame::new(config, timing);
    frame.pulse(true, lead);
    frame.pulse(false, 200);

    let sub = if subdevice >= 0 { subdevice } else { !device & 0xFF };
    let subfunc = if subfunction >= 0 { subfunction } else { !function & 0xFF };

    let zero = [(true, 25), (false, 25)];
    let one = [(true, 25), (false, 75)];
    frame.bits(device as u32 & 0xFF, 8, zero, one);
    frame.bits(sub as u32 & 0xFF, 8, zero, one);
    frame.bits(function as u32 & 0xFF, 8, zero, one);
    frame.bits(subfunc as u32 & 0xFF, 8, zero, one);
    frame.pulse(true, 25);

    Transmission { samples: frame.buffer, diagnostics: frame.diagnostics }
}

pub fn nec_code(device: i32, subdevice: i32, function: i32, subfunction: i32, config: &SynthConfig, timing: Timing) -> Transmission {
    nec_like(device, subdevice, function, subfunction, 400, config, timing)
}

pub fn nec2_code(device: i32, subdevice: i32, function: i32, subfunction: i32, config: &SynthConfig, timing: Timing) -> Transmission {
    nec_like(device, subdevice, function, subfunction, 200, config, timing)
}

/// NEC's dedicated repeat frame: lead, a shorter separator, and the
/// trailer only — no payload bits. Built as its own encoder rather than
/// routed through `nec_code`, unlike the call site this project's
/// transmit tool is grounded on, which wires `nec2_repeat` through the
/// ordinary 2-subprotocol code path by mistake (see DESIGN.md).
fn nec_repeat_like(lead: i32, config: &SynthConfig, timing: Timing) -> Transmission {
    let mut frame = Frame::new(config, timing);
    frame.pulse(true, lead);
    frame.pulse(false, 100);
    frame.pulse(true, 25);
    Transmission { samples: frame.buffer, diagnostics: frame.diagnostics }
}

pub fn nec_repeat(config: &SynthConfig, timing: Timing) -> Transmission {
    nec_repeat_like(400, config, timing)
}

pub fn nec2_repeat(config: &SynthConfig, timing: Timing) -> Transmission {
    nec_repeat_like(200, config, timing)
}

/// Sharp transmits the same address/function twice: once plain with a
/// `1,0` trailer, then with `function` complemented and a `0,1` trailer,
/// separated by a long gap — the receiver uses whichever frame arrives
/// to recover the function, and the trailer tells it which one it got.
pub fn sharp_code(device: i32, function: i32, config: &SynthConfig, timing: Timing) -> Transmission {
    let mut frame = Frame::new(config, timing);
    let zero = [(true, 13), (false, 33)];
    let one = [(true, 13), (false, 78)];

    sharp_frame(&mut frame, device, function, zero, one, true);
    frame.pulse(false, 40000);
    sharp_frame(&mut frame, device, !function & 0xFF, zero, one, false);
    frame.pulse(false, 40000);

    Transmission { samples: frame.buffer, diagnostics: frame.diagnostics }
}

/// One 14-bit Sharp frame (5-bit address, 8-bit function) followed by its
/// fixed trailer: `1,0,mark` for a fresh frame, `0,1,mark` for the
/// complemented repeat.
fn sharp_frame(
    frame: &mut Frame<'_>,
    device: i32,
    function: i32,
    zero: [(bool, i32); 2],
    one: [(bool, i32); 2],
    fresh: bool,
) {
    frame.bits(device as u32 & 0x1F, 5, zero, one);
    frame.bits(function as u32 & 0xFF, 8, zero, one);
    let (first, second) = if fresh { (one, zero) } else { (zero, one) };
    for (on, duration) in first {
        frame.pulse(on, duration);
    }
    for (on, duration) in second {
        frame.pulse(on, duration);
    }
    frame.pulse(true, 13);
}

fn sony(device: i32, subdevice: i32, function: i32, bit_count: u32, config: &SynthConfig, timing: Timing) -> Transmission {
    let mut frame = Frame::new(config, timing);
    frame.pulse(true, 100);
    frame.pulse(false, 25);

    let zero = [(false, 26), (true, 26)];
    let one = [(false, 26), (true, 53)];
    frame.bits(function as u32 & 0x7F, 7, zero, one);
    frame.bits(device as u32 & 0x1F, 5, zero, one);
    if bit_count >= 20 {
        frame.bits(subdevice as u32 & 0xFF, 8, zero, one);
    }
    Transmission { samples: frame.buffer, diagnostics: frame.diagnostics }
}

pub fn sony12_code(device: i32, function: i32, config: &SynthConfig, timing: Timing) -> Transmission {
    sony(device, -1, function, 12, config, timing)
}

pub fn sony20_code(device: i32, subdevice: i32, function: i32, config: &SynthConfig, timing: Timing) -> Transmission {
    sony(device, subdevice, function, 20, config, timing)
}

/// RC5 carries its toggle bit as explicit transmit-session state, owned
/// by the caller — not a file-scope global, per this project's design
/// notes on the matter.
pub fn rc5_code(device: i32, function: i32, toggle: bool, config: &SynthConfig, timing: Timing) -> Transmission {
    let mut frame = Frame::new(config, timing);
    // Biphase: a 0 bit is mark-then-space, a 1 bit is space-then-mark.
    let zero = [(true, 40), (false, 40)];
    let one = [(false, 40), (true, 40)];
    // Two leading 1 start bits, then the toggle, then device/function.
    frame.bits(0b11, 2, zero, one);
    frame.bits(toggle as u32, 1, zero, one);
    frame.bits(device as u32 & 0x1F, 5, zero, one);
    frame.bits(function as u32 & 0x3F, 6, zero, one);
    Transmission { samples: frame.buffer, diagnostics: frame.diagnostics }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nec_code_produces_non_empty_stereo_samples() {
        let config = SynthConfig::default();
        let timing = Timing::new(38_000.0, 44_100.0);
        let tx = nec_code(0x04, -1, 0x08, -1, &config, timing);
        assert!(!tx.samples.is_empty());
        assert_eq!(tx.samples.len() % 2, 0, "stereo buffer must hold whole frames");
    }

    #[test]
    fn nec_repeat_is_shorter_than_a_full_frame() {
        let config = SynthConfig::default();
        let timing = Timing::new(38_000.0, 44_100.0);
        let full = nec_code(0x04, -1, 0x08, -1, &config, timing);
        let repeat = nec_repeat(&config, timing);
        assert!(repeat.samples.len() < full.samples.len());
    }

    #[test]
    fn rc5_toggle_changes_output() {
        let config = SynthConfig::default();
        let timing = Timing::new(36_000.0, 44_100.0);
        let off = rc5_code(0x05, 0x36, false, &config, timing);
        let on = rc5_code(0x05, 0x36, true, &config, timing);
        assert_ne!(off.samples, on.samples);
    }
}
