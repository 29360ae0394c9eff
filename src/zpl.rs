//! Minimal ZPL program around a Graphic Field.

use crate::{
    graphic::{convert_to_graphic_field, GraphicField, GraphicType},
    PixelReadable,
};

const START: &[u8] = b"^XA,^FS\n^FO0,0\n";
const END: &[u8] = b"^FS,^XZ\n";

/// Wrap a Graphic Field with start and end codes at the label origin.
///
/// Returns an empty buffer when the field has no row width, a zero-width
/// `^GF` would be rejected by the printer.
pub fn wrap(field: &GraphicField) -> Vec<u8> {
    if field.row_width() == 0 {
        return Vec::new();
    }

    let body = field.to_bytes();
    let mut buf = Vec::with_capacity(START.len() + body.len() + END.len());
    buf.extend_from_slice(START);
    buf.extend_from_slice(&body);
    buf.extend_from_slice(END);
    buf
}

/// Convert an image into a printable ZPL program.
///
/// Images narrower than 8 pixels can't be encoded and yield an empty
/// buffer, callers have to check for it. Text types produce ASCII, the
/// binary type raw bytes inside the field.
pub fn convert_to_zpl<I: PixelReadable + ?Sized>(source: &I, graphic_type: GraphicType) -> Vec<u8> {
    let (width, _) = source.size();
    if width / 8 == 0 {
        return Vec::new();
    }
    wrap(&convert_to_graphic_field(source, graphic_type))
}
