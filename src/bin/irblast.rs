//! Transmit CLI: synthesize and play (or save) one infrared frame for a
//! given protocol/device/function, with an optional repeat train.

use std::path::PathBuf;
use std::thread::sleep;
use std::time::Duration;

use clap::Parser;
use irsound::au::AuSink;
use irsound::device::CpalSink;
use irsound::encoders::{self, Timing, Transmission};
use irsound::key::ProtocolId;
use irsound::synth::SynthConfig;
use tracing::info;

/// Transmit an infrared remote control signal through a sound card.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Output AU file to write instead of playing live.
    #[arg(short = 'd', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Sound card sample rate, Hz.
    #[arg(short = 'r', long, default_value_t = 44_100)]
    rate: u32,

    /// Carrier frequency, Hz.
    #[arg(short = 'f', long, default_value_t = 38_000.0)]
    frequency: f64,

    /// Idle-level DC bias held between transmissions.
    #[arg(short = 'n', long, default_value_t = 0)]
    hold: i16,

    /// Silence (in milliseconds) inserted between repeated transmissions.
    #[arg(short = 's', long, default_value_t = 40)]
    silence_ms: u64,

    /// Protocol to transmit.
    protocol: ProtocolId,

    /// Device code (accepts `0x..` hex).
    #[arg(value_parser = parse_number)]
    device: i32,

    /// Subdevice code, or -1 if the protocol has none.
    #[arg(value_parser = parse_number)]
    subdevice: i32,

    /// Function code (accepts `0x..` hex).
    #[arg(value_parser = parse_number)]
    function: i32,

    /// Number of times to repeat the transmission.
    #[arg(default_value_t = 1)]
    times: u32,
}

fn parse_number(s: &str) -> Result<i32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        i32::from_str_radix(hex, 16).map_err(|e| e.to_string())
    } else {
        s.parse::<i32>().map_err(|e| e.to_string())
    }
}

fn encode(args: &Args, config: &SynthConfig, timing: Timing, repeat_index: u32) -> Transmission {
    let Args { protocol, device, subdevice, function, .. } = *args;
    match protocol {
        ProtocolId::Nec if repeat_index > 0 => encoders::nec_repeat(config, timing),
        ProtocolId::Nec => encoders::nec_code(device, subdevice, function, -1, config, timing),
        ProtocolId::Nec2 if repeat_index > 0 => encoders::nec2_repeat(config, timing),
        ProtocolId::Nec2 => encoders::nec2_code(device, subdevice, function, -1, config, timing),
        ProtocolId::NecRepeat => encoders::nec_repeat(config, timing),
        ProtocolId::Nec2Repeat => encoders::nec2_repeat(config, timing),
        ProtocolId::Sharp => encoders::sharp_code(device, function, config, timing),
        ProtocolId::Sony12 => encoders::sony12_code(device, function, config, timing),
        ProtocolId::Sony20 => encoders::sony20_code(device, subdevice, function, config, timing),
        ProtocolId::Rc5 => encoders::rc5_code(device, function, repeat_index % 2 == 1, config, timing),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .init();

    let args = Args::parse();
    let config = SynthConfig { hold: args.hold, ..SynthConfig::default() };
    let timing = Timing::new(args.frequency, args.rate as f64);

    info!(
        protocol = %args.protocol,
        device = args.device,
        function = args.function,
        times = args.times,
        "irblast transmitting"
    );

    let mut sink = match &args.output {
        Some(path) => Some(AuSink::create(path, args.rate, 2)?),
        None => None,
    };
    let mut device = if sink.is_none() { Some(CpalSink::open(args.rate)?) } else { None };

    for repeat_index in 0..args.times {
        let transmission = encode(&args, &config, timing, repeat_index);
        tracing::debug!(
            samples = transmission.samples.len(),
            max_overtime = transmission.diagnostics.max_overtime,
            min_overtime = transmission.diagnostics.min_overtime,
            "frame synthesized"
        );
        match (&mut sink, &mut device) {
            (Some(sink), _) => {
                for sample in &transmission.samples {
                    sink.write_sample(*sample as i32)?;
                }
            }
            (None, Some(device)) => {
                for pair in transmission.samples.chunks(2) {
                    device.write_frame(pair[0], pair[1])?;
                }
            }
            (None, None) => unreachable!("exactly one of sink/device is always set"),
        }
        if repeat_index + 1 < args.times {
            sleep(Duration::from_millis(args.silence_ms));
        }
    }

    if let Some(sink) = sink {
        sink.finish()?;
    }

    Ok(())
}
