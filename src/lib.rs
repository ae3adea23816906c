//! Decode and transmit infrared remote control signals through an
//! ordinary sound card.
//!
//! The receive side turns a mic-in PCM stream into a run-length encoded
//! signal ([`filters`], [`pipeline`]), feeds it through a table-driven
//! multi-protocol parser ([`protocol`], [`protocol_tables`], [`runner`])
//! and recovers a [`key::Key`]. The transmit side goes the other way:
//! a `Key` becomes a pulse sequence ([`encoders`]) rendered to stereo
//! PCM by a carrier-waveform synthesizer ([`synth`]). [`au`] reads and
//! writes the sound file format used for offline testing and logging,
//! [`layout`] maps human names to keys, and [`mailbox`] and [`device`]
//! are the two ambient pieces the binaries in `src/bin` wire together.

pub mod au;
pub mod decode;
pub mod device;
pub mod encoders;
pub mod error;
pub mod filters;
pub mod key;
pub mod layout;
pub mod mailbox;
pub mod pipeline;
pub mod protocol;
pub mod protocol_tables;
pub mod runner;
pub mod status;
pub mod synth;

pub use error::IrError;
pub use key::{Key, ProtocolId};
pub use pipeline::Pipeline;
pub use runner::Runner;
