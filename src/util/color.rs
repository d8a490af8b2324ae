// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! CSS color string parsing for export options.

use anyhow::{bail, Result};

/// Parse a CSS color into RGBA bytes.
///
/// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa` and the keywords `white`,
/// `black` and `transparent`.
pub fn parse_css_color(input: &str) -> Result<[u8; 4]> {
    let value = input.trim();
    match value.to_ascii_lowercase().as_str() {
        "white" => return Ok([255, 255, 255, 255]),
        "black" => return Ok([0, 0, 0, 255]),
        "transparent" => return Ok([0, 0, 0, 0]),
        _ => {}
    }

    let Some(hex) = value.strip_prefix('#') else {
        bail!("unsupported color '{}'", input);
    };
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("invalid hex color '{}'", input);
    }

    let channel = |s: &str| u8::from_str_radix(s, 16);
    let rgba = match hex.len() {
        3 => {
            let mut out = [255u8; 4];
            for (i, c) in hex.chars().enumerate() {
                let nibble = c.to_digit(16).unwrap_or(0) as u8;
                out[i] = nibble * 17;
            }
            out
        }
        6 | 8 => {
            let mut out = [255u8; 4];
            for i in 0..hex.len() / 2 {
                out[i] = channel(&hex[i * 2..i * 2 + 2])?;
            }
            out
        }
        _ => bail!("invalid hex color length in '{}'", input),
    };
    Ok(rgba)
}
