//! Sound card capture and playback. This is the one external collaborator
//! this crate does not attempt to model faithfully: the contract is
//! "read 16-bit mono PCM frames" / "write 16-bit stereo PCM frames at a
//! requested rate", and `cpal` is the concrete binding. None of this
//! module is unit-tested — it touches real hardware.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream};

use crate::error::IrError;

/// A live capture stream handing mono 16-bit samples to the receive
/// pipeline through a bounded channel fed by the audio callback thread.
pub struct CpalSource {
    _stream: Stream,
    samples: Receiver<i16>,
}

impl CpalSource {
    pub fn open(requested_rate: u32) -> Result<Self, IrError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| IrError::DeviceOpen("no default input device".into()))?;
        let config = device
            .default_input_config()
            .map_err(|e| IrError::DeviceOpen(e.to_string()))?;
        let sample_format = config.sample_format();
        let mut stream_config: cpal::StreamConfig = config.into();
        stream_config.channels = 1;
        if requested_rate > 0 {
            stream_config.sample_rate = cpal::SampleRate(requested_rate);
        }

        let (tx, rx): (SyncSender<i16>, Receiver<i16>) = sync_channel(4096);
        let err_fn = |err| tracing::warn!(%err, "capture stream error");

        let stream = match sample_format {
            SampleFormat::I16 => device.build_input_stream(
                &stream_config,
                move |data: &[i16], _| {
                    for &sample in data {
                        let _ = tx.try_send(sample);
                    }
                },
                err_fn,
                None,
            ),
            SampleFormat::F32 => device.build_input_stream(
                &stream_config,
                move |data: &[f32], _| {
                    for &sample in data {
                        let _ = tx.try_send((sample * i16::MAX as f32) as i16);
                    }
                },
                err_fn,
                None,
            ),
            other => return Err(IrError::DeviceOpen(format!("unsupported sample format {other:?}"))),
        }
        .map_err(|e| IrError::DeviceOpen(e.to_string()))?;

        stream.play().map_err(|e| IrError::DeviceOpen(e.to_string()))?;
        Ok(CpalSource { _stream: stream, samples: rx })
    }

    pub fn next_sample(&mut self) -> Option<i32> {
        self.samples.recv().ok().map(|s| s as i32)
    }
}

/// A live playback stream fed by a channel; `write_frame` blocks only on
/// the channel being full, not on the device itself.
pub struct CpalSink {
    _stream: Stream,
    tx: SyncSender<(i16, i16)>,
}

impl CpalSink {
    pub fn open(requested_rate: u32) -> Result<Self, IrError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| IrError::DeviceOpen("no default output device".into()))?;
        let config = device
            .default_output_config()
            .map_err(|e| IrError::DeviceOpen(e.to_string()))?;
        let sample_format = config.sample_format();
        let mut stream_config: cpal::StreamConfig = config.into();
        stream_config.channels = 2;
        if requested_rate > 0 {
            stream_config.sample_rate = cpal::SampleRate(requested_rate);
        }

        let (tx, rx): (SyncSender<(i16, i16)>, Receiver<(i16, i16)>) = sync_channel(4096);
        let err_fn = |err| tracing::warn!(%err, "playback stream error");

        let stream = match sample_format {
            SampleFormat::I16 => device.build_output_stream(
                &stream_config,
                move |data: &mut [i16], _| fill_output(data, &rx),
                err_fn,
                None,
            ),
            SampleFormat::F32 => {
                device.build_output_stream(
                    &stream_config,
                    move |data: &mut [f32], _| {
                        let mut i16_buf = vec![0i16; data.len()];
                        fill_output(&mut i16_buf, &rx);
                        for (o, i) in data.iter_mut().zip(i16_buf.iter()) {
                            *o = *i as f32 / i16::MAX as f32;
                        }
                    },
                    err_fn,
                    None,
                )
            }
            other => return Err(IrError::DeviceOpen(format!("unsupported sample format {other:?}"))),
        }
        .map_err(|e| IrError::DeviceOpen(e.to_string()))?;

        stream.play().map_err(|e| IrError::DeviceOpen(e.to_string()))?;
        Ok(CpalSink { _stream: stream, tx })
    }

    pub fn write_frame(&mut self, left: i16, right: i16) -> std::io::Result<()> {
        self.tx
            .send((left, right))
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::BrokenPipe, "playback stream closed"))
    }
}

fn fill_output(data: &mut [i16], rx: &Receiver<(i16, i16)>) {
    for frame in data.chunks_mut(2) {
        match rx.try_recv() {
            Ok((l, r)) => {
                frame[0] = l;
                if frame.len() > 1 {
                    frame[1] = r;
                }
            }
            Err(_) => frame.fill(0),
        }
    }
}
