//! ZPL Graphic Field Converter
//!
//! This crate converts raster images into ZPL `^GF` (Graphic Field) commands
//! for Zebra thermal label printers, and ships a small TCP client to send the
//! result to a printer.
//!
//! # Example
//!
//! ```rust,no_run
//! use zplgfa::{convert_to_zpl, flatten, GraphicType};
//!
//! let img = image::open("logo.png").unwrap();
//! let flat = flatten(&img);
//! let zpl = convert_to_zpl(&flat, GraphicType::CompressedAscii);
//! assert!(!zpl.is_empty());
//! ```

mod compress;
mod edit;
mod error;
mod flatten;
mod graphic;
mod monochrome;
mod printer;
mod status;
mod zpl;

pub use crate::{
    compress::{compress_ascii, repeat_code, BLANK_ROW, FILLED_ROW, REPEAT_ROW},
    edit::{apply_edits, resize, Edit},
    error::{Error, PrinterError},
    flatten::{flatten, flatten_into, flatten_pixel, OpaqueRaster, PixelReadable, PixelWritable},
    graphic::{convert_to_graphic_field, GraphicField, GraphicType},
    monochrome::{hex_encode, is_dark, luminance, pack, row_width},
    printer::{Config, Printer},
    status::Status,
    zpl::{convert_to_zpl, wrap},
};

/// Type alias for 1-bit bitmap data fed into a Graphic Field.
///
/// Each inner `Vec<u8>` represents a single row of pixels, with 8 pixels
/// packed into each byte, most significant bit first. A set bit is a dark
/// dot. Every row of a matrix has the same length, `row_width(width)`.
pub type Matrix = Vec<Vec<u8>>;

/// Raw TCP port Zebra printers listen on for ZPL jobs.
pub const DEFAULT_PORT: u16 = 9100;
