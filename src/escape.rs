//! Escape-sequence decoding for command-line text.
//!
//! Shells hand us the argument verbatim, so `bf_gen 'Hi\n'` arrives as the
//! four characters `H`, `i`, `\`, `n`. [`decode_escapes`] turns such text into
//! the string the user meant, recognising a fixed set of escapes:
//!
//! | Escape        | Result                          |
//! |---------------|---------------------------------|
//! | `\\` `\'` `\"`| the character itself            |
//! | `\a` `\b` `\f` `\n` `\r` `\t` `\v` | the usual control characters |
//! | `\o` `\oo` `\ooo` | octal code point (up to 3 digits) |
//! | `\xHH`        | code point from 2 hex digits    |
//! | `\uHHHH`      | code point from 4 hex digits    |
//! | `\UHHHHHHHH`  | code point from 8 hex digits    |
//! | `\` + newline | nothing (line continuation)     |
//!
//! Any other escape (for example `\q`) is kept as written, backslash
//! included. Nothing here evaluates code.

use std::iter::{Enumerate, Peekable};
use std::str::Chars;

/// Errors raised by [`decode_escapes`]. Positions are character indices of
/// the offending backslash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EscapeError {
    /// The input ends with a single backslash.
    #[error("trailing backslash at position {pos}")]
    TrailingBackslash { pos: usize },

    /// A `\x`, `\u` or `\U` escape had too few hex digits.
    #[error("truncated \\{kind} escape at position {pos}")]
    Truncated { kind: char, pos: usize },

    /// The escape named a value that is not a Unicode scalar value.
    #[error("invalid code point U+{value:X} in escape at position {pos}")]
    InvalidCodePoint { value: u32, pos: usize },

    /// `\N{NAME}` escapes need a Unicode name table and are not supported.
    #[error("named escapes (\\N{{...}}) are not supported (position {pos})")]
    UnsupportedNamed { pos: usize },
}

type CharCursor<'a> = Peekable<Enumerate<Chars<'a>>>;

/// Decode backslash escapes in `raw`.
pub fn decode_escapes(raw: &str) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars: CharCursor<'_> = raw.chars().enumerate().peekable();

    while let Some((pos, ch)) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        let Some((_, esc)) = chars.next() else {
            return Err(EscapeError::TrailingBackslash { pos });
        };

        match esc {
            '\n' => {}
            '\\' | '\'' | '"' => out.push(esc),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0B}'),
            '0'..='7' => {
                let value = read_octal(esc, &mut chars);
                out.push(to_char(value, pos)?);
            }
            'x' => out.push(to_char(read_hex(&mut chars, 2, esc, pos)?, pos)?),
            'u' => out.push(to_char(read_hex(&mut chars, 4, esc, pos)?, pos)?),
            'U' => out.push(to_char(read_hex(&mut chars, 8, esc, pos)?, pos)?),
            'N' => return Err(EscapeError::UnsupportedNamed { pos }),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    Ok(out)
}

/// Read up to two more octal digits following `first`.
fn read_octal(first: char, chars: &mut CharCursor<'_>) -> u32 {
    let mut value = first.to_digit(8).unwrap_or(0);
    for _ in 0..2 {
        match chars.peek().and_then(|&(_, d)| d.to_digit(8)) {
            Some(digit) => {
                value = value * 8 + digit;
                chars.next();
            }
            None => break,
        }
    }
    value
}

/// Read exactly `count` hex digits.
fn read_hex(
    chars: &mut CharCursor<'_>,
    count: usize,
    kind: char,
    pos: usize,
) -> Result<u32, EscapeError> {
    let mut value: u32 = 0;
    for _ in 0..count {
        let digit = chars
            .peek()
            .and_then(|&(_, d)| d.to_digit(16))
            .ok_or(EscapeError::Truncated { kind, pos })?;
        chars.next();
        value = value
            .checked_mul(16)
            .and_then(|v| v.checked_add(digit))
            .ok_or(EscapeError::InvalidCodePoint { value, pos })?;
    }
    Ok(value)
}

fn to_char(value: u32, pos: usize) -> Result<char, EscapeError> {
    char::from_u32(value).ok_or(EscapeError::InvalidCodePoint { value, pos })
}
