//! Interactive layout editor: point it at a layout file and (optionally)
//! a sound card, press a remote button, and the name under the cursor
//! gets bound to whatever key was just decoded. `-s`/`-t` print a
//! summary and exit without reading any keys.

use std::path::PathBuf;

use clap::Parser;
use irsound::au::{AsciiSource, AuSource};
use irsound::device::CpalSource;
use irsound::layout::{Entry, Layout};
use irsound::mailbox::Mailbox;
use irsound::pipeline::{Pipeline, Source};
use irsound::runner::Runner;
use tracing::info;

/// Edit a remote control layout file, binding button names to decoded keys.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Print the layout's button names and exit without reading keys.
    #[arg(short = 's', long)]
    show: bool,

    /// When showing, omit each button's bound code.
    #[arg(short = 'c', long)]
    compact: bool,

    /// When showing, print the full protocol/device/function breakdown.
    #[arg(short = 'k', long)]
    full_codes: bool,

    /// Print a CSV summary and exit without reading keys.
    #[arg(short = 't', long)]
    csv: bool,

    /// Log every raw sample read to this AU file.
    #[arg(short = 'l', long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Treat the sound card argument as an ascii sample dump.
    #[arg(short = 'f', long)]
    ascii: bool,

    /// Read keys from the sound card and print each decoded key without
    /// touching the layout file.
    #[arg(short = 'r', long)]
    read_keys: bool,

    /// Layout file to edit.
    layout: PathBuf,

    /// Sound card capture file, or the default device if omitted.
    soundcard: Option<PathBuf>,
}

fn print_show(layout: &Layout, args: &Args) {
    for entry in &layout.entries {
        if let Entry::Named { name, key } = entry {
            match (args.compact, key) {
                (true, _) => println!("{name}"),
                (false, Some(key)) if args.full_codes => {
                    println!(
                        "{name}: protocol={} device={} subdevice={} function={} subfunction={}",
                        key.protocol, key.device, key.subdevice, key.function, key.subfunction
                    );
                }
                (false, Some(key)) => println!("{name}: {key}"),
                (false, None) => println!("{name}: (unbound)"),
            }
        }
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
    let text = std::fs::read_to_string(&args.layout)?;
    let mut layout = Layout::parse(&text).map_err(|e| anyhow::anyhow!("{:?}: {e}", args.layout))?;

    if args.show {
        print_show(&layout, &args);
        return Ok(());
    }
    if args.csv {
        print!("{}", layout.to_csv());
        return Ok(());
    }

    let names: Vec<String> = layout
        .entries
        .iter()
        .filter_map(|e| match e {
            Entry::Named { name, .. } => Some(name.clone()),
            _ => None,
        })
        .collect();
    if names.is_empty() {
        anyhow::bail!("layout has no named buttons to bind");
    }

    let (mailbox, _handle) = Mailbox::spawn(std::io::stdin());
    let mut pipeline = Pipeline::new();
    let mut runner = Runner::new();
    let mut cursor = 0usize;

    info!(buttons = names.len(), "layout editor ready; press a remote button for each name");

    let mut handle_key = |key: irsound::Key| -> anyhow::Result<bool> {
        if args.read_keys {
            println!("{key}");
            return Ok(false);
        }
        let name = &names[cursor];
        layout.set(name, key);
        println!("{name} <- {key}");
        cursor += 1;
        if cursor >= names.len() {
            std::fs::write(&args.layout, layout.write())?;
            return Ok(true);
        }
        println!("next: {}", names[cursor]);
        Ok(false)
    };

    let mut feed = |raw: i32, pipeline: &mut Pipeline, runner: &mut Runner| -> anyhow::Result<bool> {
        for run in pipeline.push(raw) {
            if let Some(key) = runner.feed(run) {
                if handle_key(key)? {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    };

    match args.soundcard.as_deref() {
        Some(path) => {
            if args.ascii {
                let file = std::fs::File::open(path)?;
                let mut source = AsciiSource::new(file);
                while let Some(sample) = Source::next_sample(&mut source) {
                    if feed(sample, &mut pipeline, &mut runner)? {
                        break;
                    }
                    if mailbox.take() == Some(b'q') {
                        break;
                    }
                }
            } else {
                let mut source = AuSource::open(path)?;
                while let Some(sample) = Source::next_sample(&mut source) {
                    if feed(sample, &mut pipeline, &mut runner)? {
                        break;
                    }
                    if mailbox.take() == Some(b'q') {
                        break;
                    }
                }
            }
        }
        None => {
            let mut source = CpalSource::open(44_100)?;
            while let Some(sample) = source.next_sample() {
                if feed(sample, &mut pipeline, &mut runner)? {
                    break;
                }
                if mailbox.take() == Some(b'q') {
                    break;
                }
            }
        }
    }

    Ok(())
}
