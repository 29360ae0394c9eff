//! ZPL ASCII run-length compression.
//!
//! A run of more than four identical hex digits is replaced by a repeat
//! code: an optional multiplier letter for multiples of 20 (`g`..`z` for
//! 20..400), an optional letter for the remainder (`G`..`Y` for 1..19), then
//! the digit itself.
//!
//! ```text
//! FFFFFFFF000000  ->  N F L 0  ->  "NFL0"
//!                     8 x F 6 x 0
//! ```

/// Whole row of `0` digits, no dark dots.
pub const BLANK_ROW: char = ',';

/// Whole row of `F` digits, every dot dark.
pub const FILLED_ROW: char = '!';

/// Row is identical to the previous one.
pub const REPEAT_ROW: char = ':';

/// Largest count a single repeat code can express: `z` (400) plus `Y` (19).
const MAX_REPEAT: usize = 419;

/// Runs up to this length are cheaper as literals.
const LITERAL_RUN: usize = 4;

const HIGH_CHAR: &[u8; 21] = b" ghijklmnopqrstuvwxyz";
const LOW_CHAR: &[u8; 20] = b" GHIJKLMNOPQRSTUVWXY";

fn push_segment(output: &mut String, c: char, count: usize) {
    let high = count / 20;
    let low = count % 20;

    if high > 0 {
        output.push(HIGH_CHAR[high] as char);
    }
    if low > 0 {
        output.push(LOW_CHAR[low] as char);
    }
    output.push(c);
}

fn push_repeat_code(output: &mut String, c: char, count: usize) {
    if count == 0 {
        return;
    }

    // The remainder goes first, followed by full 419 segments.
    let full = (count - 1) / MAX_REPEAT;
    push_segment(output, c, count - full * MAX_REPEAT);
    for _ in 0..full {
        push_segment(output, c, MAX_REPEAT);
    }
}

/// Repeat code for `count` copies of `c`, chained when `count` exceeds 419.
pub fn repeat_code(c: char, count: usize) -> String {
    let mut output = String::new();
    push_repeat_code(&mut output, c, count);
    output
}

/// Compress one hex row of a Graphic Field.
///
/// A row made of a single repeated `0` or `F` collapses to [`BLANK_ROW`] or
/// [`FILLED_ROW`]. An empty row compresses to an empty string.
pub fn compress_ascii(input: &str) -> String {
    let mut chars = input.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return String::new(),
    };
    if chars.all(|c| c == first) {
        match first {
            '0' => return BLANK_ROW.to_string(),
            'F' => return FILLED_ROW.to_string(),
            _ => {}
        }
    }

    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        let mut count = 1;
        while chars.next_if_eq(&c).is_some() {
            count += 1;
        }

        if count > LITERAL_RUN {
            push_repeat_code(&mut output, c, count);
        } else {
            output.extend(std::iter::repeat(c).take(count));
        }
    }

    output
}
