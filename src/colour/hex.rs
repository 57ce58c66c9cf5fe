//! Hex colour text parsing and formatting.

use bevy::color::LinearRgba;
use thiserror::Error;

/// Errors produced when hex text cannot be read as a colour.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HexParseError {
    #[error("Hex colour is empty")]
    Empty,

    #[error("Hex colour must start with '#', got {text:?}")]
    MissingMarker { text: String },

    #[error("Hex colour must have 3, 4, 6 or 8 digits, got {len}")]
    BadLength { len: usize },

    #[error("Invalid hex digit {found:?}")]
    BadDigit { found: char },
}

/// Format a colour as `#RRGGBB`, upper-case. Alpha is not written.
pub fn format_hex(colour: LinearRgba) -> String {
    format!(
        "#{:02X}{:02X}{:02X}",
        to_byte(colour.red),
        to_byte(colour.green),
        to_byte(colour.blue)
    )
}

/// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`.
pub fn parse_hex(text: &str) -> Result<LinearRgba, HexParseError> {
    if text.is_empty() {
        return Err(HexParseError::Empty);
    }

    let digits = text
        .strip_prefix('#')
        .ok_or_else(|| HexParseError::MissingMarker {
            text: text.to_string(),
        })?;

    let nibbles = digits
        .chars()
        .map(|c| {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or(HexParseError::BadDigit { found: c })
        })
        .collect::<Result<Vec<u8>, _>>()?;

    let channels: Vec<u8> = match nibbles.len() {
        3 | 4 => nibbles.iter().map(|n| n * 17).collect(),
        6 | 8 => nibbles.chunks(2).map(|p| p[0] * 16 + p[1]).collect(),
        len => return Err(HexParseError::BadLength { len }),
    };

    let alpha = channels.get(3).copied().unwrap_or(u8::MAX);
    Ok(LinearRgba::new(
        from_byte(channels[0]),
        from_byte(channels[1]),
        from_byte(channels[2]),
        from_byte(alpha),
    ))
}

/// Parse hex text, retrying with a leading `#` when the text is a bare run
/// of 6 or 8 hex digits.
///
/// On success returns the colour and, if a marker had to be inserted, the
/// corrected text.
pub fn parse_hex_lenient(text: &str) -> Result<(LinearRgba, Option<String>), HexParseError> {
    match parse_hex(text) {
        Ok(colour) => Ok((colour, None)),
        Err(err) => {
            let bare = !text.starts_with('#')
                && matches!(text.len(), 6 | 8)
                && text.chars().all(|c| c.is_ascii_hexdigit());
            if !bare {
                return Err(err);
            }

            let corrected = format!("#{text}");
            let colour = parse_hex(&corrected)?;
            Ok((colour, Some(corrected)))
        }
    }
}

fn to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn from_byte(byte: u8) -> f32 {
    byte as f32 / 255.0
}
