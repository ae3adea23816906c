//! Receive CLI: decode IR keypresses from a capture file, an ascii
//! sample dump, or a live sound card, printing each decoded key (or its
//! layout name, if a layout is supplied) as it arrives.

use std::path::PathBuf;

use clap::Parser;
use irsound::au::{AsciiSource, AuSink, AuSource};
use irsound::device::CpalSource;
use irsound::filters::{Filter, Scale};
use irsound::layout::Layout;
use irsound::pipeline::{Pipeline, Source};
use irsound::runner::Runner;
use irsound::status::Status;
use tracing::info;

/// Decode infrared remote control signals captured through a sound card.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Treat `input` as a decimal-ascii sample dump instead of an AU file
    /// or live device.
    #[arg(short = 'f', long)]
    ascii: bool,

    /// Log every raw sample read to this AU file as it streams by.
    #[arg(short = 'l', long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Print the VU-meter scale tap to the console instead of decoding.
    #[arg(short = 'd', long)]
    debug_scale: bool,

    /// Layout file to translate decoded keys into button names.
    #[arg(long, value_name = "FILE")]
    layout: Option<PathBuf>,

    /// Input file, or `-` / omitted for the default sound card.
    input: Option<PathBuf>,

    /// Amplify factor applied to every raw sample before filtering.
    #[arg(default_value_t = 1)]
    amplify_factor: i32,
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

    let layout = match &args.layout {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Some(Layout::parse(&text).map_err(|e| anyhow::anyhow!("{path:?}: {e}"))?)
        }
        None => None,
    };

    let mut log_sink = match &args.log {
        Some(path) => Some(AuSink::create(path, 44_100, 1)?),
        None => None,
    };

    info!(
        ascii = args.ascii,
        amplify_factor = args.amplify_factor,
        "remote starting"
    );

    let mut pipeline = Pipeline::new();
    let mut runner = Runner::new();
    let mut scale = Scale::new();

    let mut feed_sample = |raw: i32| -> anyhow::Result<()> {
        let value = raw * args.amplify_factor;
        if let Some(sink) = log_sink.as_mut() {
            sink.write_sample(value)?;
        }
        if args.debug_scale {
            let mut status = Status::reset();
            scale.step(value, &mut status);
            return Ok(());
        }
        for run in pipeline.push(value) {
            if let Some(key) = runner.feed(run) {
                match &layout {
                    Some(layout) => match layout.name_for(&key, true) {
                        Some(name) => println!("{name}"),
                        None => println!("{key} (unbound)"),
                    },
                    None => println!("{key}"),
                }
            }
        }
        Ok(())
    };

    match args.input.as_deref() {
        Some(path) if path != std::path::Path::new("-") => {
            if args.ascii {
                let file = std::fs::File::open(path)?;
                let mut source = AsciiSource::new(file);
                while let Some(sample) = Source::next_sample(&mut source) {
                    feed_sample(sample)?;
                }
            } else {
                let mut source = AuSource::open(path)?;
                while let Some(sample) = Source::next_sample(&mut source) {
                    feed_sample(sample)?;
                }
            }
        }
        _ => {
            let mut source = CpalSource::open(44_100)?;
            while let Some(sample) = source.next_sample() {
                feed_sample(sample)?;
            }
        }
    }

    for run in pipeline.end() {
        if let Some(key) = runner.feed(run) {
            println!("{key}");
        }
    }
    if let Some(sink) = log_sink {
        sink.finish()?;
    }

    Ok(())
}
