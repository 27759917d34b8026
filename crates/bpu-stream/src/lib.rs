//! Binary instruction-stream format and emission for BPU programs
//!
//! Defines the `BPUI` headered stream consumed by the hardware-loading
//! tooling, the emitter that writes it, the reader that validates and
//! decodes it back, and the mapping report written alongside.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod emit;
pub mod error;
pub mod format;
pub mod report;

pub use emit::{Emitter, StreamReader};
pub use error::{Result, StreamError};
pub use format::{StreamHeader, BPUI_MAGIC, STREAM_VERSION};
pub use report::{CoreUsage, MappingReport};
