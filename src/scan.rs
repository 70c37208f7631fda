//! Fast decimal scanner
//!
//! Converts an ASCII numeral of the form `-?[0-9]*(\.[0-9]*)?` into an `f32`
//! straight from the input bytes. There is no exponent, `+`, `nan` or `inf`
//! support and no whitespace trimming. Input outside that grammar is not
//! rejected; the scanner stops at the first byte it does not understand and
//! returns whatever it has accumulated so far.

/// Scan a numeral at the start of `input`.
///
/// Returns the value and the number of bytes consumed. Digits are
/// accumulated one at a time (`value * 10 + digit`), the fraction is divided
/// by a growing power of ten, and the sign is applied last. This is an
/// approximation, not a correctly-rounded parse.
#[inline]
pub fn scan_f32(input: &[u8]) -> (f32, usize) {
    let mut pos = 0;

    let negative = input.first() == Some(&b'-');
    if negative {
        pos += 1;
    }

    let mut value = 0.0f64;
    while let Some(&b) = input.get(pos) {
        if !b.is_ascii_digit() {
            break;
        }
        value = value * 10.0 + f64::from(b - b'0');
        pos += 1;
    }

    if input.get(pos) == Some(&b'.') {
        pos += 1;
        let mut fraction = 0.0f64;
        let mut divisor = 1.0f64;
        while let Some(&b) = input.get(pos) {
            if !b.is_ascii_digit() {
                break;
            }
            fraction = fraction * 10.0 + f64::from(b - b'0');
            divisor *= 10.0;
            pos += 1;
        }
        value += fraction / divisor;
    }

    if negative {
        value = -value;
    }

    (value as f32, pos)
}
