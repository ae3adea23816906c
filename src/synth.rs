//! Carrier waveform synthesis: turns `(on, duration)` pulses into stereo
//! PCM, carrying a signed overtime accumulator across calls so a long
//! sequence of short pulses stays phase-accurate instead of drifting.
//!
//! There is no larger original synthesizer on hand than the plain
//! `carrier()` loop this module is grounded on; the duty-cycle boundary,
//! startup pulse and overtime bookkeeping below are built directly from
//! the timing rules this crate's synthesis spec describes, in the same
//! sample-by-sample style as that loop.

use serde::{Deserialize, Serialize};

/// Global synthesis parameters, collected here instead of living as
/// module statics so a transmit session can vary them per call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SynthConfig {
    /// Percentage of each carrier period spent in the "high" half, 1-99.
    pub duty_percent: u32,
    /// Multiplies every requested duration before synthesis (global
    /// speed-up/slow-down knob).
    pub time_factor: f64,
    /// Extra multiplier applied only to `on` (mark) pulses.
    pub on_factor: f64,
    /// Extra multiplier applied only to `off` (space) pulses.
    pub off_factor: f64,
    /// Length in micro-time units of a full-amplitude pulse emitted at
    /// the very start of an `on` pulse, regardless of carrier phase —
    /// helps slow LEDs latch on. Zero disables it.
    pub startup_us: i32,
    /// When true, an `on` pulse is extended to the next carrier-low
    /// boundary rather than cut off mid-high-half.
    pub ensure_length: bool,
    /// When true, `overtime` is fed back from the target that balances
    /// on/off pulses to the same nominal duration, not the on/off-scaled
    /// one — keeps a repeating mark/space pattern's average period exact
    /// even if on_factor != off_factor.
    pub value_time_balancing: bool,
    /// Idle-level DC bias emitted on both channels while `on` is false.
    pub hold: i16,
    /// Full-scale amplitude used for the carrier's high half.
    pub amplitude: i16,
}

impl Default for SynthConfig {
    fn default() -> Self {
        SynthConfig {
            duty_percent: 50,
            time_factor: 1.0,
            on_factor: 1.0,
            off_factor: 1.0,
            startup_us: 0,
            ensure_length: false,
            value_time_balancing: false,
            hold: 0,
            amplitude: i16::MAX,
        }
    }
}

/// Multiplier turning microseconds into the 1/10-µs integer time base the
/// protocol tables use.
pub const MULTIPLIER: i64 = 100;

/// Diagnostic bookkeeping a transmit session accumulates across a whole
/// frame: the largest timing overshoot/undershoot observed, useful to log
/// once a frame completes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Diagnostics {
    pub min_overtime: i64,
    pub max_overtime: i64,
}

impl Diagnostics {
    pub fn record(&mut self, overtime: i64) {
        if overtime < self.min_overtime {
            self.min_overtime = overtime;
        }
        if overtime > self.max_overtime {
            self.max_overtime = overtime;
        }
    }
}

/// Synthesizes one `(on, duration_us)` pulse into `buffer` as interleaved
/// stereo `i16` samples, at carrier `period` and sample interval `sample`
/// (both in the same micro-time unit as `duration_us`, scaled by
/// [`MULTIPLIER`]). Returns the new `overtime` to pass into the next call.
#[allow(clippy::too_many_arguments)]
pub fn carrier(
    config: &SynthConfig,
    on: bool,
    duration_us: f64,
    overtime: i64,
    period: i64,
    sample: i64,
    buffer: &mut Vec<i16>,
    diagnostics: &mut Diagnostics,
) -> i64 {
    let factor = if on { config.on_factor } else { config.off_factor };
    let target =
        (duration_us * config.time_factor * factor * MULTIPLIER as f64) as i64 - sample / 2;
    let equal_target = (duration_us * config.time_factor * MULTIPLIER as f64) as i64 - sample / 2;

    let boundary = (period * config.duty_percent as i64 / 100).clamp(sample, period - sample);

    let mut t: i64 = 0;

    if on && config.startup_us > 0 {
        let startup_samples = (config.startup_us as i64 * MULTIPLIER / sample).max(1);
        for _ in 0..startup_samples {
            push_stereo(buffer, config.amplitude, config.amplitude);
            t += sample;
        }
    }

    loop {
        if !on {
            push_stereo(buffer, config.hold, config.hold);
        } else {
            let phase = t.rem_euclid(period);
            let high = phase < boundary;
            let level = if high { config.amplitude } else { -config.amplitude };
            push_stereo(buffer, level, level);
        }
        t += sample;

        if t >= target - overtime {
            if on && config.ensure_length {
                let phase = t.rem_euclid(period);
                if phase >= boundary {
                    continue;
                }
            }
            break;
        }
    }

    let reference = if config.value_time_balancing { equal_target } else { target };
    let new_overtime = t - reference;
    diagnostics.record(new_overtime);
    new_overtime
}

fn push_stereo(buffer: &mut Vec<i16>, left: i16, right: i16) {
    buffer.push(left);
    buffer.push(right);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn an_off_pulse_emits_the_idle_level_on_both_channels() {
        let config = SynthConfig { hold: 5, ..SynthConfig::default() };
        let mut buffer = Vec::new();
        let mut diagnostics = Diagnostics::default();
        carrier(&config, false, 100.0, 0, 2600, 226, &mut buffer, &mut diagnostics);
        assert!(!buffer.is_empty());
        assert!(buffer.chunks(2).all(|pair| pair == [5, 5]));
    }

    #[test]
    fn an_on_pulse_alternates_between_high_and_low_halves() {
        let config = SynthConfig::default();
        let mut buffer = Vec::new();
        let mut diagnostics = Diagnostics::default();
        carrier(&config, true, 1000.0, 0, 2600, 226, &mut buffer, &mut diagnostics);
        let highs = buffer.iter().filter(|&&v| v == config.amplitude).count();
        let lows = buffer.iter().filter(|&&v| v == -config.amplitude).count();
        assert!(highs > 0 && lows > 0, "expected both carrier halves to appear");
    }

    #[test]
    fn overtime_is_fed_back_and_shrinks_the_next_pulses_sample_count() {
        let config = SynthConfig::default();
        let mut diagnostics = Diagnostics::default();
        let mut buffer = Vec::new();
        let overtime = carrier(&config, true, 500.0, 0, 2600, 226, &mut buffer, &mut diagnostics);
        let mut buffer2 = Vec::new();
        let _ = carrier(&config, true, 500.0, overtime, 2600, 226, &mut buffer2, &mut diagnostics);
        // Not asserting exact sample counts (duty/period interplay makes
        // that brittle); just confirm the accumulator actually moved.
        assert_ne!(overtime, 0);
    }
}
