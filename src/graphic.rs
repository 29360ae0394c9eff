//! `^GF` Graphic Field assembly.
//!
//! ```text
//! ^GF<type>,<data length>,<total bytes>,<row width>,
//! <data>
//! ```
//!
//! `total bytes` is always the uncompressed size, `row width * height`,
//! while `data length` counts what is actually emitted.

use std::{fmt, str::FromStr};

use crate::{
    compress::{compress_ascii, REPEAT_ROW},
    monochrome::{hex_encode, pack, row_width},
    Error, PixelReadable,
};

/// Encoding of the Graphic Field data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphicType {
    /// Plain hex digits, one line per row.
    Ascii,
    /// Raw row bytes.
    Binary,
    /// Run-length compressed hex with row deduplication.
    #[default]
    CompressedAscii,
}

impl GraphicType {
    /// Format letter of the `^GF` command.
    pub fn type_tag(self) -> char {
        match self {
            Self::Ascii | Self::CompressedAscii => 'A',
            Self::Binary => 'B',
        }
    }
}

impl FromStr for GraphicType {
    type Err = Error;

    /// Accepts `ASCII`, `Binary` and `CompressedASCII` in any case, with or
    /// without dashes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        match name.as_str() {
            "ascii" => Ok(Self::Ascii),
            "binary" => Ok(Self::Binary),
            "compressedascii" => Ok(Self::CompressedAscii),
            _ => Err(Error::InvalidConfig(format!("unknown graphic type {:?}", s))),
        }
    }
}

impl fmt::Display for GraphicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ascii => "ASCII",
            Self::Binary => "Binary",
            Self::CompressedAscii => "CompressedASCII",
        };
        f.write_str(name)
    }
}

/// A complete `^GF` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicField {
    graphic_type: GraphicType,
    total_bytes: usize,
    row_width: usize,
    data: Vec<u8>,
}

impl GraphicField {
    /// Build a Graphic Field from packed rows.
    ///
    /// Every row must be `row_width` bytes long, as produced by [`pack`].
    pub fn from_rows(rows: &[Vec<u8>], row_width: usize, graphic_type: GraphicType) -> Self {
        let data = match graphic_type {
            GraphicType::Ascii => {
                let mut data = String::with_capacity(rows.len() * (row_width * 2 + 1));
                for row in rows {
                    data.push_str(&hex_encode(row));
                    data.push('\n');
                }
                data.into_bytes()
            }
            GraphicType::CompressedAscii => {
                let mut data = String::new();
                let mut last_line: Option<String> = None;
                for row in rows {
                    let line = compress_ascii(&hex_encode(row));
                    if last_line.as_deref() == Some(line.as_str()) {
                        data.push(REPEAT_ROW);
                    } else {
                        data.push_str(&line);
                    }
                    last_line = Some(line);
                }
                data.into_bytes()
            }
            GraphicType::Binary => rows.concat(),
        };

        GraphicField {
            graphic_type,
            total_bytes: row_width * rows.len(),
            row_width,
            data,
        }
    }

    pub fn graphic_type(&self) -> GraphicType {
        self.graphic_type
    }

    /// Length of the emitted data: characters for text types, bytes for
    /// binary.
    pub fn data_length(&self) -> usize {
        self.data.len()
    }

    /// Uncompressed size of the bitmap in bytes.
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn row_width(&self) -> usize {
        self.row_width
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Serialize the command. Binary fields are not valid UTF-8.
    pub fn to_bytes(&self) -> Vec<u8> {
        let header = format!(
            "^GF{},{},{},{},\n",
            self.graphic_type.type_tag(),
            self.data_length(),
            self.total_bytes,
            self.row_width
        );

        let mut buf = Vec::with_capacity(header.len() + self.data.len());
        buf.extend_from_slice(header.as_bytes());
        buf.extend_from_slice(&self.data);
        buf
    }
}

/// Convert an image to a Graphic Field.
///
/// The image should be flattened first, transparent pixels are otherwise
/// thresholded on their premultiplied color.
pub fn convert_to_graphic_field<I: PixelReadable + ?Sized>(
    source: &I,
    graphic_type: GraphicType,
) -> GraphicField {
    let (width, _) = source.size();
    GraphicField::from_rows(&pack(source), row_width(width), graphic_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rows() -> Vec<Vec<u8>> {
        vec![
            vec![0x00, 0x00],
            vec![0x01, 0xC0],
            vec![0x01, 0xC0],
            vec![0xFF, 0xFF],
            vec![0xFF, 0xFF],
        ]
    }

    fn text(field: &GraphicField) -> String {
        String::from_utf8(field.to_bytes()).unwrap()
    }

    #[test]
    fn ascii_field() {
        let field = GraphicField::from_rows(&rows(), 2, GraphicType::Ascii);
        assert_eq!(
            text(&field),
            "^GFA,25,10,2,\n0000\n01C0\n01C0\nFFFF\nFFFF\n"
        );
    }

    #[test]
    fn compressed_field_dedups_rows() {
        let field = GraphicField::from_rows(&rows(), 2, GraphicType::CompressedAscii);
        assert_eq!(field.data(), b",01C0:!:");
        assert_eq!(field.data_length(), 8);
        assert_eq!(field.total_bytes(), 10);
        assert_eq!(text(&field), "^GFA,8,10,2,\n,01C0:!:");
    }

    #[test]
    fn dedup_follows_previous_row_only() {
        let rows = vec![vec![0x12], vec![0x00], vec![0x12], vec![0x12], vec![0x12]];
        let field = GraphicField::from_rows(&rows, 1, GraphicType::CompressedAscii);
        assert_eq!(field.data(), b"12,12::");
    }

    #[test]
    fn binary_field() {
        let field = GraphicField::from_rows(&rows(), 2, GraphicType::Binary);
        assert_eq!(field.graphic_type().type_tag(), 'B');
        assert_eq!(field.data(), &[0x00, 0x00, 0x01, 0xC0, 0x01, 0xC0, 0xFF, 0xFF, 0xFF, 0xFF]);

        let mut expected = b"^GFB,10,10,2,\n".to_vec();
        expected.extend_from_slice(field.data());
        assert_eq!(field.to_bytes(), expected);
    }

    #[test]
    fn empty_rows() {
        for graphic_type in [GraphicType::Ascii, GraphicType::Binary, GraphicType::CompressedAscii] {
            let field = GraphicField::from_rows(&[], 3, graphic_type);
            assert_eq!(field.data_length(), 0);
            assert_eq!(field.total_bytes(), 0);
            assert_eq!(field.row_width(), 3);
        }
    }

    #[test]
    fn graphic_type_names() {
        assert_eq!("ASCII".parse::<GraphicType>().unwrap(), GraphicType::Ascii);
        assert_eq!("binary".parse::<GraphicType>().unwrap(), GraphicType::Binary);
        assert_eq!(
            "CompressedASCII".parse::<GraphicType>().unwrap(),
            GraphicType::CompressedAscii
        );
        assert_eq!(
            "compressed-ascii".parse::<GraphicType>().unwrap(),
            GraphicType::CompressedAscii
        );
        assert!("zlib".parse::<GraphicType>().is_err());
        assert_eq!(GraphicType::default(), GraphicType::CompressedAscii);
        assert_eq!(GraphicType::CompressedAscii.to_string(), "CompressedASCII");
    }
}
