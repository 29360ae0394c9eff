//! Error types for image conversion and printer operations.
//!
//! The graphic field codec itself never fails; these errors come from the
//! collaborators around it: image decoding, edits, configuration and the
//! network connection to the printer.

use thiserror::Error;

/// Main error type for zplgfa operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading a file or talking to the printer.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The image could not be opened or decoded.
    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error("Can't resolve printer address {0}")]
    InvalidAddress(String),

    /// Invalid configuration parameter provided.
    ///
    /// Raised for unknown graphic types, missing printer address and
    /// out of range values on the command line.
    #[error("Invalid configuration parameter: {0}")]
    InvalidConfig(String),

    #[error("Unknown image edit: {0}")]
    UnknownEdit(String),

    #[error("Received invalid response from printer: {0}")]
    InvalidResponse(String),

    #[error("Status request return no response")]
    ReadStatusTimeout,

    /// Hardware-level printer error.
    ///
    /// Wraps faults reported by the printer in its host status, such as
    /// paper out or an open print head.
    #[error(transparent)]
    PrinterError(PrinterError),
}

/// Hardware-specific errors reported by the printer.
///
/// These are read from the flags of the `~HS` host status response and
/// usually need someone to walk over to the printer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrinterError {
    #[error("Paper out")]
    PaperOut,

    #[error("Printer is paused")]
    Paused,

    #[error("Print head is open")]
    HeadOpen,

    #[error("Ribbon out")]
    RibbonOut,

    #[error("Receive buffer is full")]
    BufferFull,

    #[error("RAM is corrupt, configuration lost")]
    CorruptRam,

    #[error("Print head is under temperature")]
    UnderTemperature,

    #[error("Print head is over temperature")]
    OverTemperature,
}
