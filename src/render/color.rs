use serde::{Deserialize, Serialize};

fn opaque() -> u8 {
    255
}

/// 8-bit RGBA colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0, 255);
    pub const GREEN: Color = Color::new(0, 255, 0, 255);
    pub const BLUE: Color = Color::new(0, 0, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Every channel shifted right by one; alpha kept.
    #[inline]
    pub const fn halved(self) -> Self {
        Self::new(self.r >> 1, self.g >> 1, self.b >> 1, self.a)
    }

    /// Colour channels multiplied by `k`, clamped to `[0, 255]`.
    #[inline]
    pub fn scaled(self, k: f64) -> Self {
        let k = if k.is_finite() { k.max(0.0) } else { 0.0 };
        let mul = |v: u8| -> u8 { (v as f64 * k).clamp(0.0, 255.0) as u8 };
        Self::new(mul(self.r), mul(self.g), mul(self.b), self.a)
    }

    /// Compares colour channels only.
    #[inline]
    pub const fn same_rgb(self, other: Color) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }

    /// Linear blend toward `other`; `t = 0` keeps `self`, `t = 255` gives `other`.
    #[inline]
    pub fn mix(self, other: Color, t: u8) -> Self {
        let ta = t as u16;
        let na = 255u16 - ta;
        let m = |x: u8, y: u8| -> u8 { ((x as u16 * na + y as u16 * ta) / 255) as u8 };
        Self::new(m(self.r, other.r), m(self.g, other.g), m(self.b, other.b), m(self.a, other.a))
    }

    /// Saturating per-channel add.
    #[inline]
    pub fn additive(self, other: Color) -> Self {
        Self::new(
            self.r.saturating_add(other.r),
            self.g.saturating_add(other.g),
            self.b.saturating_add(other.b),
            self.a.saturating_add(other.a),
        )
    }

    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Color {
    fn from(c: [u8; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halving_darkens_each_channel() {
        assert_eq!(Color::new(200, 101, 3, 77).halved(), Color::new(100, 50, 1, 77));
    }

    #[test]
    fn scaling_never_goes_negative() {
        let c = Color::rgb(100, 200, 50);
        assert_eq!(c.scaled(-3.0), Color::rgb(0, 0, 0));
        assert_eq!(c.scaled(f64::NAN), Color::rgb(0, 0, 0));
        assert_eq!(c.scaled(0.5), Color::rgb(50, 100, 25));
        assert_eq!(c.scaled(4.0), Color::rgb(255, 255, 200));
    }

    #[test]
    fn mix_endpoints() {
        assert_eq!(Color::BLACK.mix(Color::WHITE, 0), Color::BLACK);
        assert_eq!(Color::BLACK.mix(Color::WHITE, 255), Color::WHITE);
    }

    #[test]
    fn missing_alpha_defaults_to_opaque() {
        let c: Color = serde_json::from_str(r#"{"r":1,"g":2,"b":3}"#).unwrap();
        assert_eq!(c, Color::rgb(1, 2, 3));
    }
}
