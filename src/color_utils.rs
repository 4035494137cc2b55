//! Color utility functions shared across the application.
//!
//! Label colors are written in the configuration as `#RRGGBB` strings and kept
//! as RGB byte triples everywhere else.

use crate::config::ConfigError;

/// Parse a `#RRGGBB` color string into an RGB triple.
///
/// The leading `#` is required; hex digits may be upper or lower case.
pub fn parse_hex_color(value: &str) -> Result<[u8; 3], ConfigError> {
    let invalid = || ConfigError::InvalidColor(value.to_string());

    let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16);
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Ok(r), Ok(g), Ok(b)) => Ok([r, g, b]),
        _ => Err(invalid()),
    }
}

/// Format an RGB triple as an upper-case `#RRGGBB` string.
pub fn to_hex_color(color: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", color[0], color[1], color[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FF0000").unwrap(), [255, 0, 0]);
        assert_eq!(parse_hex_color("#00ff7f").unwrap(), [0, 255, 127]);
        assert_eq!(parse_hex_color(" #AAAAAA ").unwrap(), [170, 170, 170]);
    }

    #[test]
    fn test_parse_hex_color_rejects_malformed() {
        for bad in ["FF0000", "#FFF", "#GG0000", "#FF00000", "", "#"] {
            assert!(
                matches!(parse_hex_color(bad), Err(ConfigError::InvalidColor(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_hex_roundtrip() {
        let color = [18, 52, 86];
        assert_eq!(parse_hex_color(&to_hex_color(color)).unwrap(), color);
        assert_eq!(to_hex_color([170, 170, 170]), "#AAAAAA");
    }
}
