/// Packed 32-bit color: alpha in the most significant byte, then red, green, blue.
pub type Argb = u32;

/// Color every node carries before the first palette pass: opaque black.
pub const DEFAULT_COLOR: Argb = 0xFF00_0000;

/// Foreground/background pair assigned to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPair {
    pub fg: Argb,
    pub bg: Argb,
}

impl Default for ColorPair {
    fn default() -> Self {
        Self {
            fg: DEFAULT_COLOR,
            bg: DEFAULT_COLOR,
        }
    }
}

/// Hue (degrees), chroma and lightness in `[0, 1]`.
///
/// Chroma is applied as HSL saturation, the same simplified projection the
/// upstream brainwave pipeline uses, so colors agree across both sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hcl {
    pub hue: f64,
    pub chroma: f64,
    pub lightness: f64,
}

impl Hcl {
    pub fn new(hue: f64, chroma: f64, lightness: f64) -> Self {
        Self {
            hue,
            chroma,
            lightness,
        }
    }

    pub fn with_lightness(self, lightness: f64) -> Self {
        Self { lightness, ..self }
    }

    /// Convert to an opaque packed color.
    pub fn to_argb(&self) -> Argb {
        self.to_argb_with_alpha(0xFF)
    }

    pub fn to_argb_with_alpha(&self, alpha: u8) -> Argb {
        let s = self.chroma.clamp(0.0, 1.0);
        let l = self.lightness.clamp(0.0, 1.0);
        let h = self.hue.rem_euclid(360.0) / 360.0;

        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;
            (
                hue_to_channel(p, q, h + 1.0 / 3.0),
                hue_to_channel(p, q, h),
                hue_to_channel(p, q, h - 1.0 / 3.0),
            )
        };

        pack_argb(alpha, to_byte(r), to_byte(g), to_byte(b))
    }

    /// Recover hue, saturation and lightness from a packed color; alpha is dropped.
    pub fn from_argb(argb: Argb) -> Self {
        let (_, r, g, b) = unpack_argb(argb);
        let r = r as f64 / 255.0;
        let g = g as f64 / 255.0;
        let b = b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let lightness = (max + min) / 2.0;
        let delta = max - min;
        if delta == 0.0 {
            return Self::new(0.0, 0.0, lightness);
        }

        let chroma = if lightness > 0.5 {
            delta / (2.0 - max - min)
        } else {
            delta / (max + min)
        };
        let sector = if max == r {
            ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };

        Self::new(sector * 60.0, chroma, lightness)
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_byte(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> Argb {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

pub fn unpack_argb(argb: Argb) -> (u8, u8, u8, u8) {
    (
        (argb >> 24) as u8,
        (argb >> 16) as u8,
        (argb >> 8) as u8,
        argb as u8,
    )
}

/// Raise lightness by `boost`, clamped to full white, keeping hue and alpha.
pub fn brighten(argb: Argb, boost: f64) -> Argb {
    let (alpha, ..) = unpack_argb(argb);
    let hcl = Hcl::from_argb(argb);
    let lightness = (hcl.lightness + boost.max(0.0)).min(1.0);
    hcl.with_lightness(lightness).to_argb_with_alpha(alpha)
}

/// Render as `#rrggbb`, dropping alpha.
pub fn argb_to_hex(argb: Argb) -> String {
    format!("#{:06x}", argb & 0x00FF_FFFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_hues_convert_exactly() {
        assert_eq!(Hcl::new(0.0, 1.0, 0.5).to_argb(), 0xFFFF_0000);
        assert_eq!(Hcl::new(120.0, 1.0, 0.5).to_argb(), 0xFF00_FF00);
        assert_eq!(Hcl::new(240.0, 1.0, 0.5).to_argb(), 0xFF00_00FF);
        assert_eq!(Hcl::new(360.0, 1.0, 0.5).to_argb(), 0xFFFF_0000);
    }

    #[test]
    fn zero_chroma_is_grey() {
        assert_eq!(Hcl::new(200.0, 0.0, 0.5).to_argb(), 0xFF80_8080);
        assert_eq!(Hcl::new(10.0, 0.7, 0.0).to_argb(), DEFAULT_COLOR);
    }

    #[test]
    fn from_argb_recovers_hue_and_lightness() {
        let hcl = Hcl::from_argb(Hcl::new(200.0, 0.6, 0.4).to_argb());
        assert!((hcl.hue - 200.0).abs() < 1.0);
        assert!((hcl.chroma - 0.6).abs() < 0.01);
        assert!((hcl.lightness - 0.4).abs() < 0.01);
    }

    #[test]
    fn brighten_raises_lightness_and_keeps_alpha() {
        let base = Hcl::new(30.0, 0.6, 0.5).to_argb_with_alpha(0x80);
        let lifted = brighten(base, 0.15);
        assert_eq!(lifted >> 24, 0x80);
        assert!(Hcl::from_argb(lifted).lightness > Hcl::from_argb(base).lightness);
        assert_eq!(brighten(0xFFFF_FFFF, 0.15), 0xFFFF_FFFF);
    }

    #[test]
    fn hex_drops_alpha() {
        assert_eq!(argb_to_hex(0xFF12_34AB), "#1234ab");
        assert_eq!(argb_to_hex(0x0000_0001), "#000001");
    }
}
