//! Host status (`~HS`) parsing.
//!
//! The printer answers `~HS` with three lines, each framed by STX/ETX:
//!
//! ```text
//! <STX>aaa,b,c,dddd,eee,f,g,h,iii,j,k,l<ETX><CR><LF>
//! <STX>mmm,n,o,p,q,r,s,t,uuuuuuuu,v,www<ETX><CR><LF>
//! <STX>xxxx,y<ETX><CR><LF>
//! ```

use crate::{Error, PrinterError};

const STX: char = '\u{2}';
const ETX: char = '\u{3}';

///
/// Status received from the printer encoded to Rust friendly type.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    paper_out: bool,
    paused: bool,
    label_length: u32,
    formats_in_buffer: u32,
    buffer_full: bool,
    diagnostic_mode: bool,
    partial_format: bool,
    corrupt_ram: bool,
    under_temperature: bool,
    over_temperature: bool,
    head_open: bool,
    ribbon_out: bool,
    thermal_transfer: bool,
    print_mode: u8,
    label_waiting: bool,
    labels_remaining: u32,
    graphics_stored: u32,
}

fn fields(line: &str, expected: usize) -> Result<Vec<&str>, Error> {
    let line = line.trim().trim_start_matches(STX).trim_end_matches(ETX);
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();

    if fields.len() < expected {
        return Err(Error::InvalidResponse(format!(
            "expected {} status fields, got {:?}",
            expected, line
        )));
    }
    Ok(fields)
}

fn number<T: std::str::FromStr>(field: &str) -> Result<T, Error> {
    field
        .parse()
        .map_err(|_| Error::InvalidResponse(format!("invalid status field {:?}", field)))
}

fn flag(field: &str) -> Result<bool, Error> {
    Ok(number::<u8>(field)? == 1)
}

impl Status {
    /// Parse the three `~HS` lines.
    pub fn from_response(response: &str) -> Result<Self, Error> {
        let mut lines = response.lines().filter(|line| !line.trim().is_empty());
        let mut next = |expected| match lines.next() {
            Some(line) => fields(line, expected),
            None => Err(Error::InvalidResponse(
                "host status is shorter than three lines".to_string(),
            )),
        };

        let first = next(12)?;
        let second = next(11)?;
        // The third line only carries the password and RAM size.
        next(2)?;

        Ok(Status {
            paper_out: flag(first[1])?,
            paused: flag(first[2])?,
            label_length: number(first[3])?,
            formats_in_buffer: number(first[4])?,
            buffer_full: flag(first[5])?,
            diagnostic_mode: flag(first[6])?,
            partial_format: flag(first[7])?,
            corrupt_ram: flag(first[9])?,
            under_temperature: flag(first[10])?,
            over_temperature: flag(first[11])?,
            head_open: flag(second[2])?,
            ribbon_out: flag(second[3])?,
            thermal_transfer: flag(second[4])?,
            print_mode: number(second[5])?,
            label_waiting: flag(second[7])?,
            labels_remaining: number(second[8])?,
            graphics_stored: number(second[10])?,
        })
    }

    /// Faults currently reported by the printer.
    pub fn errors(&self) -> Vec<PrinterError> {
        [
            (self.paper_out, PrinterError::PaperOut),
            (self.paused, PrinterError::Paused),
            (self.head_open, PrinterError::HeadOpen),
            (self.ribbon_out, PrinterError::RibbonOut),
            (self.buffer_full, PrinterError::BufferFull),
            (self.corrupt_ram, PrinterError::CorruptRam),
            (self.under_temperature, PrinterError::UnderTemperature),
            (self.over_temperature, PrinterError::OverTemperature),
        ]
        .iter()
        .filter(|(active, _)| *active)
        .map(|(_, err)| *err)
        .collect()
    }

    /// Fail with the first reported fault, if any.
    pub fn check(&self) -> Result<(), Error> {
        match self.errors().first() {
            Some(err) => Err(Error::PrinterError(*err)),
            None => Ok(()),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.errors().is_empty()
    }

    /// Label length in dots.
    pub fn label_length(&self) -> u32 {
        self.label_length
    }

    pub fn formats_in_buffer(&self) -> u32 {
        self.formats_in_buffer
    }

    pub fn labels_remaining(&self) -> u32 {
        self.labels_remaining
    }

    pub fn graphics_stored(&self) -> u32 {
        self.graphics_stored
    }

    pub fn thermal_transfer(&self) -> bool {
        self.thermal_transfer
    }

    /// Print mode code: 0 rewind, 1 peel-off, 2 tear-off, 3 cutter, 4 applicator.
    pub fn print_mode(&self) -> u8 {
        self.print_mode
    }

    pub fn label_waiting(&self) -> bool {
        self.label_waiting
    }

    /// A format was only partially received.
    pub fn partial_format(&self) -> bool {
        self.partial_format
    }

    pub fn diagnostic_mode(&self) -> bool {
        self.diagnostic_mode
    }
}
