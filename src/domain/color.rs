//! Color model: sRGB, HSL and CIE L*a*b*.
//!
//! Conversions follow d3-color so that palettes computed here match the
//! browser renderer pixel for pixel: Lab uses the D50 reference white with
//! Bradford-adapted sRGB primaries, HSL uses the CSS formulation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

const XN: f64 = 0.96422;
const YN: f64 = 1.0;
const ZN: f64 = 0.82521;
const T0: f64 = 4.0 / 29.0;
const T1: f64 = 6.0 / 29.0;
const T2: f64 = 3.0 * T1 * T1;
const T3: f64 = T1 * T1 * T1;

/// Threshold below which a fill counts as dark (W3C AERT perceived brightness).
pub const DARK_BRIGHTNESS_THRESHOLD: f64 = 125.0;

/// RGB color with unclamped channels in the nominal range [0, 255].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// HSL color: h in degrees, s and l in [0.0, 1.0].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// CIE L*a*b* color: lightness, red/green axis, yellow/blue axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 255.0,
        g: 255.0,
        b: 255.0,
    };

    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Perceived brightness, `r*.299 + g*.587 + b*.114`.
    pub fn brightness(&self) -> f64 {
        self.r * 0.299 + self.g * 0.587 + self.b * 0.114
    }

    /// Channels rounded and clamped to bytes; NaN becomes 0.
    pub fn to_bytes(&self) -> [u8; 3] {
        fn channel(v: f64) -> u8 {
            if v.is_nan() {
                0
            } else {
                v.round().clamp(0.0, 255.0) as u8
            }
        }
        [channel(self.r), channel(self.g), channel(self.b)]
    }

    /// Format as `#rrggbb`, clamping and rounding each channel.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_bytes();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    pub fn to_lab(&self) -> Lab {
        let r = rgb_to_linear(self.r);
        let g = rgb_to_linear(self.g);
        let b = rgb_to_linear(self.b);
        let y = xyz_to_lab((0.2225045 * r + 0.7168786 * g + 0.0606169 * b) / YN);
        let (x, z) = if r == g && g == b {
            (y, y)
        } else {
            (
                xyz_to_lab((0.4360747 * r + 0.3850649 * g + 0.1430804 * b) / XN),
                xyz_to_lab((0.0139322 * r + 0.0971045 * g + 0.7141733 * b) / ZN),
            )
        };
        Lab {
            l: 116.0 * y - 16.0,
            a: 500.0 * (x - y),
            b: 200.0 * (y - z),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = DomainError;

    /// Parse `#rgb` or `#rrggbb` (the leading `#` is optional).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || DomainError::InvalidColor(s.to_string());
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let digits: Vec<u8> = match hex.len() {
            3 => hex
                .chars()
                .map(|c| u8::from_str_radix(&format!("{c}{c}"), 16))
                .collect::<Result<_, _>>()
                .map_err(|_| invalid())?,
            6 => (0..3)
                .map(|i| u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16))
                .collect::<Result<_, _>>()
                .map_err(|_| invalid())?,
            _ => return Err(invalid()),
        };
        Ok(Rgb::new(
            f64::from(digits[0]),
            f64::from(digits[1]),
            f64::from(digits[2]),
        ))
    }
}

impl Hsl {
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    pub fn to_rgb(&self) -> Rgb {
        let h = self.h % 360.0 + if self.h < 0.0 { 360.0 } else { 0.0 };
        let s = if h.is_nan() || self.s.is_nan() { 0.0 } else { self.s };
        let l = self.l;
        let m2 = l + if l < 0.5 { l } else { 1.0 - l } * s;
        let m1 = 2.0 * l - m2;
        Rgb {
            r: hsl_channel(if h >= 240.0 { h - 240.0 } else { h + 120.0 }, m1, m2),
            g: hsl_channel(h, m1, m2),
            b: hsl_channel(if h < 120.0 { h + 240.0 } else { h - 120.0 }, m1, m2),
        }
    }

    pub fn to_lab(&self) -> Lab {
        self.to_rgb().to_lab()
    }
}

impl Lab {
    pub const WHITE: Lab = Lab {
        l: 100.0,
        a: 0.0,
        b: 0.0,
    };

    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    pub fn to_rgb(&self) -> Rgb {
        let y = (self.l + 16.0) / 116.0;
        let x = if self.a.is_nan() { y } else { y + self.a / 500.0 };
        let z = if self.b.is_nan() { y } else { y - self.b / 200.0 };
        let x = XN * lab_to_xyz(x);
        let y = YN * lab_to_xyz(y);
        let z = ZN * lab_to_xyz(z);
        Rgb {
            r: linear_to_rgb(3.1338561 * x - 1.6168667 * y - 0.4906146 * z),
            g: linear_to_rgb(-0.9787684 * x + 1.9161415 * y + 0.0334540 * z),
            b: linear_to_rgb(0.0719453 * x - 0.2289914 * y + 1.4052427 * z),
        }
    }

    pub fn to_hex(&self) -> String {
        self.to_rgb().to_hex()
    }

    pub fn brightness(&self) -> f64 {
        self.to_rgb().brightness()
    }

    /// Copy with lightness replaced by `f(l)`.
    pub fn map_lightness(self, f: impl FnOnce(f64) -> f64) -> Self {
        Self {
            l: f(self.l),
            ..self
        }
    }

    /// Element-wise mean. `None` for an empty slice.
    pub fn mean(colors: &[Lab]) -> Option<Lab> {
        if colors.is_empty() {
            return None;
        }
        let n = colors.len() as f64;
        let (l, a, b) = colors
            .iter()
            .fold((0.0, 0.0, 0.0), |(l, a, b), c| (l + c.l, a + c.a, b + c.b));
        Some(Lab::new(l / n, a / n, b / n))
    }
}

impl From<Rgb> for Lab {
    fn from(rgb: Rgb) -> Self {
        rgb.to_lab()
    }
}

impl From<Hsl> for Lab {
    fn from(hsl: Hsl) -> Self {
        hsl.to_lab()
    }
}

impl fmt::Display for Lab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lab({:.2} {:.2} {:.2})", self.l, self.a, self.b)
    }
}

fn hsl_channel(h: f64, m1: f64, m2: f64) -> f64 {
    let v = if h < 60.0 {
        m1 + (m2 - m1) * h / 60.0
    } else if h < 180.0 {
        m2
    } else if h < 240.0 {
        m1 + (m2 - m1) * (240.0 - h) / 60.0
    } else {
        m1
    };
    v * 255.0
}

fn rgb_to_linear(x: f64) -> f64 {
    let x = x / 255.0;
    if x <= 0.04045 {
        x / 12.92
    } else {
        ((x + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_rgb(x: f64) -> f64 {
    255.0
        * if x <= 0.0031308 {
            12.92 * x
        } else {
            1.055 * x.powf(1.0 / 2.4) - 0.055
        }
}

fn xyz_to_lab(t: f64) -> f64 {
    if t > T3 {
        t.cbrt()
    } else {
        t / T2 + T0
    }
}

fn lab_to_xyz(t: f64) -> f64 {
    if t > T1 {
        t * t * t
    } else {
        T2 * (t - T0)
    }
}
