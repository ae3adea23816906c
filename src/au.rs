//! Sun/NeXT `.au` file I/O: the fixed 24-byte big-endian header this
//! project's capture and log files both use, plus a plain decimal-ascii
//! fallback for the `-f` text mode of the receive CLI.
//!
//! ```text
//! offset  size  field
//! 0       4     magic, 0x2e736e64 (".snd")
//! 4       4     data offset (always 24 here: no annotation block)
//! 8       4     data size in bytes, or 0xffffffff while still streaming
//! 12      4     encoding, 3 = 16-bit linear PCM
//! 16      4     sample rate, Hz
//! 20      4     channel count
//! 24      ..    signed 16-bit big-endian samples, interleaved
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::IrError;

pub const AU_MAGIC: u32 = 0x2e73_6e64;
pub const AU_HEADER_LEN: u64 = 24;
pub const AU_ENCODING_PCM16: u32 = 3;
const AU_UNKNOWN_SIZE: u32 = 0xffff_ffff;

#[derive(Debug, Clone, Copy)]
pub struct AuHeader {
    pub data_size: Option<u32>,
    pub encoding: u32,
    pub rate: u32,
    pub channels: u32,
}

fn path_str(path: &Path) -> String {
    path.display().to_string()
}

/// Read and validate a 24-byte AU header, positioning the reader right
/// after it.
pub fn read_header<R: Read>(path: &Path, mut reader: R) -> Result<AuHeader, IrError> {
    let mut buf = [0u8; 24];
    reader
        .read_exact(&mut buf)
        .map_err(|_| IrError::NotAnAuFile(path_str(path)))?;
    let magic = u32::from_be_bytes(buf[0..4].try_into().unwrap());
    if magic != AU_MAGIC {
        return Err(IrError::NotAnAuFile(path_str(path)));
    }
    let data_size_raw = u32::from_be_bytes(buf[8..12].try_into().unwrap());
    let encoding = u32::from_be_bytes(buf[12..16].try_into().unwrap());
    let rate = u32::from_be_bytes(buf[16..20].try_into().unwrap());
    let channels = u32::from_be_bytes(buf[20..24].try_into().unwrap());
    if encoding != AU_ENCODING_PCM16 {
        return Err(IrError::UnsupportedEncoding(path_str(path), encoding));
    }
    let data_size = if data_size_raw == AU_UNKNOWN_SIZE { None } else { Some(data_size_raw) };
    Ok(AuHeader { data_size, encoding, rate, channels })
}

fn write_header<W: Write>(mut writer: W, rate: u32, channels: u32) -> io::Result<()> {
    writer.write_all(&AU_MAGIC.to_be_bytes())?;
    writer.write_all(&(AU_HEADER_LEN as u32).to_be_bytes())?;
    writer.write_all(&AU_UNKNOWN_SIZE.to_be_bytes())?;
    writer.write_all(&AU_ENCODING_PCM16.to_be_bytes())?;
    writer.write_all(&rate.to_be_bytes())?;
    writer.write_all(&channels.to_be_bytes())
}

/// Reads signed 16-bit big-endian samples from an AU file, one channel
/// frame (all channels of one sample period) flattened into successive
/// `i32` values. Mirrors the `read` filter's "sets ended at EOF" contract.
pub struct AuSource {
    reader: BufReader<File>,
    pub header: AuHeader,
}

impl AuSource {
    pub fn open(path: &Path) -> Result<Self, IrError> {
        let file = File::open(path).map_err(|_| IrError::NotAnAuFile(path_str(path)))?;
        let mut reader = BufReader::new(file);
        let header = read_header(path, &mut reader)?;
        Ok(AuSource { reader, header })
    }

    /// Returns `None` at end of file.
    pub fn next_sample(&mut self) -> Option<i32> {
        let mut buf = [0u8; 2];
        match self.reader.read_exact(&mut buf) {
            Ok(()) => Some(i16::from_be_bytes(buf) as i32),
            Err(_) => None,
        }
    }
}

/// Writes signed 16-bit big-endian samples to an AU file, back-patching
/// the data-size field on `finish`.
pub struct AuSink {
    writer: BufWriter<File>,
    bytes_written: u32,
}

impl AuSink {
    pub fn create(path: &Path, rate: u32, channels: u32) -> io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        write_header(&mut writer, rate, channels)?;
        Ok(AuSink { writer, bytes_written: 0 })
    }

    pub fn write_sample(&mut self, value: i32) -> io::Result<()> {
        let clamped = value.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        self.writer.write_all(&clamped.to_be_bytes())?;
        self.bytes_written += 2;
        Ok(())
    }

    /// Back-patch the data-size header field and flush to disk.
    pub fn finish(mut self) -> io::Result<()> {
        self.writer.flush()?;
        let mut file = self.writer.into_inner().map_err(|e| e.into_error())?;
        file.seek(SeekFrom::Start(8))?;
        file.write_all(&self.bytes_written.to_be_bytes())?;
        Ok(())
    }
}

/// Plain decimal-ascii source, one signed integer per line — the `-f`
/// text alternative to an AU capture file.
pub struct AsciiSource<R: Read> {
    lines: io::Lines<io::BufReader<R>>,
}

impl<R: Read> AsciiSource<R> {
    pub fn new(reader: R) -> Self {
        AsciiSource { lines: io::BufReader::new(reader).lines() }
    }

    pub fn next_sample(&mut self) -> Option<i32> {
        loop {
            match self.lines.next()? {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    return trimmed.parse::<i32>().ok();
                }
                Err(_) => return None,
            }
        }
    }
}
