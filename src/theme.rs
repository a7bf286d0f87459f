// ── Editor appearance ─────────────────────────────────────────────────────────
//
// Font and background colour of the text surface.  Pure Rust; the shell turns
// these into HFONT / HBRUSH handles.
//
// Colour conventions:
//   • `Rgb` is stored as separate channels.
//   • `Rgb::to_colorref` / `Rgb::from_colorref` convert to and from the Win32
//     COLORREF layout (0x00BBGGRR).

use std::fmt;

/// Smallest point size reachable with Zoom Out.
pub(crate) const MIN_POINT_SIZE: u32 = 6;
/// Largest point size reachable with Zoom In.
pub(crate) const MAX_POINT_SIZE: u32 = 72;

// ── Colour ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Rgb {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

impl Rgb {
    pub(crate) const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Default background of the text surface (`#C0C0C0`).
    pub(crate) const LIGHT_GRAY: Self = Self::new(0xC0, 0xC0, 0xC0);

    /// Win32 COLORREF: red in the low byte.
    pub(crate) fn to_colorref(self) -> u32 {
        u32::from(self.r) | (u32::from(self.g) << 8) | (u32::from(self.b) << 16)
    }

    pub(crate) fn from_colorref(value: u32) -> Self {
        Self::new(
            (value & 0xFF) as u8,
            ((value >> 8) & 0xFF) as u8,
            ((value >> 16) & 0xFF) as u8,
        )
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::LIGHT_GRAY
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

// ── Font ──────────────────────────────────────────────────────────────────────

/// Description of the font used by the text surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FontSpec {
    pub(crate) family: String,
    pub(crate) point_size: u32,
    pub(crate) bold: bool,
    pub(crate) italic: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "Verdana".to_owned(),
            point_size: 12,
            bold: false,
            italic: false,
        }
    }
}

impl FontSpec {
    /// One point larger, up to `MAX_POINT_SIZE`.
    pub(crate) fn zoomed_in(&self) -> Self {
        Self {
            point_size: (self.point_size + 1).min(MAX_POINT_SIZE),
            ..self.clone()
        }
    }

    /// One point smaller, down to `MIN_POINT_SIZE`.
    pub(crate) fn zoomed_out(&self) -> Self {
        Self {
            point_size: self.point_size.saturating_sub(1).max(MIN_POINT_SIZE),
            ..self.clone()
        }
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} pt", self.family, self.point_size)?;
        if self.bold {
            f.write_str(", bold")?;
        }
        if self.italic {
            f.write_str(", italic")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorref_layout_is_bgr() {
        let c = Rgb::new(0x12, 0x34, 0x56);
        assert_eq!(c.to_colorref(), 0x0056_3412);
        assert_eq!(Rgb::from_colorref(0x0056_3412), c);
    }

    #[test]
    fn default_background_is_light_gray() {
        assert_eq!(Rgb::default().to_string(), "#C0C0C0");
    }

    #[test]
    fn default_font_is_verdana_12() {
        let f = FontSpec::default();
        assert_eq!(f.to_string(), "Verdana 12 pt");
    }

    #[test]
    fn zoom_is_clamped() {
        let mut f = FontSpec { point_size: MAX_POINT_SIZE, ..FontSpec::default() };
        assert_eq!(f.zoomed_in().point_size, MAX_POINT_SIZE);
        f.point_size = MIN_POINT_SIZE;
        assert_eq!(f.zoomed_out().point_size, MIN_POINT_SIZE);
        f.point_size = 12;
        assert_eq!(f.zoomed_in().point_size, 13);
        assert_eq!(f.zoomed_out().point_size, 11);
    }

    #[test]
    fn display_lists_style_flags() {
        let f = FontSpec {
            family: "Consolas".to_owned(),
            point_size: 10,
            bold: true,
            italic: true,
        };
        assert_eq!(f.to_string(), "Consolas 10 pt, bold, italic");
    }
}
