//! Color-space swatches for eyeballing the palette machinery.
//!
//! Each plane samples two coordinates over `-100..100` with a fixed step and
//! pins the third. Rows run along `y`, columns along `x`, so `cells[0][0]` is
//! the `(-100, -100)` corner.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::color::{Hsl, Lab, Rgb};
use crate::domain::entities::normalize_token;
use crate::domain::error::{DomainError, DomainResult};

/// Grid step used by the diagnostic page.
pub const DEFAULT_SWATCH_STEP: u32 = 2;
const GRID_MIN: i32 = -100;
const GRID_MAX: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwatchPlane {
    /// `lab((x+100)/2, y, 50)`
    LabLightnessA,
    /// `lab((x+100)/2, 50, y)`
    LabLightnessB,
    /// `lab(50, x, y)`
    LabAB,
    /// `hsl((x+100)/200*360, (y+100)/200, .5)`
    HueSaturation,
    /// `hsl((x+100)/200*360, .5, (y+100)/200)`
    HueLightness,
    /// `hsl(0, (x+100)/200, (y+100)/200)`
    SaturationLightness,
}

impl SwatchPlane {
    pub const ALL: [SwatchPlane; 6] = [
        SwatchPlane::LabLightnessA,
        SwatchPlane::LabLightnessB,
        SwatchPlane::LabAB,
        SwatchPlane::HueSaturation,
        SwatchPlane::HueLightness,
        SwatchPlane::SaturationLightness,
    ];

    /// Color at grid coordinate `(x, y)`, both in `[-100, 100)`.
    pub fn sample(&self, x: f64, y: f64) -> Rgb {
        let unit = |v: f64| (v + 100.0) / 200.0;
        match self {
            SwatchPlane::LabLightnessA => Lab::new((x + 100.0) / 2.0, y, 50.0).to_rgb(),
            SwatchPlane::LabLightnessB => Lab::new((x + 100.0) / 2.0, 50.0, y).to_rgb(),
            SwatchPlane::LabAB => Lab::new(50.0, x, y).to_rgb(),
            SwatchPlane::HueSaturation => Hsl::new(unit(x) * 360.0, unit(y), 0.5).to_rgb(),
            SwatchPlane::HueLightness => Hsl::new(unit(x) * 360.0, 0.5, unit(y)).to_rgb(),
            SwatchPlane::SaturationLightness => Hsl::new(0.0, unit(x), unit(y)).to_rgb(),
        }
    }

    pub fn is_lab(&self) -> bool {
        matches!(
            self,
            SwatchPlane::LabLightnessA | SwatchPlane::LabLightnessB | SwatchPlane::LabAB
        )
    }
}

impl FromStr for SwatchPlane {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "lab-lightness-a" | "la" => Ok(SwatchPlane::LabLightnessA),
            "lab-lightness-b" | "lb" => Ok(SwatchPlane::LabLightnessB),
            "lab-a-b" | "lab-ab" | "ab" => Ok(SwatchPlane::LabAB),
            "hue-saturation" | "hs" => Ok(SwatchPlane::HueSaturation),
            "hue-lightness" | "hl" => Ok(SwatchPlane::HueLightness),
            "saturation-lightness" | "sl" => Ok(SwatchPlane::SaturationLightness),
            _ => Err(DomainError::UnknownOption {
                kind: "swatch plane",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SwatchPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SwatchPlane::LabLightnessA => "lab-lightness-a",
            SwatchPlane::LabLightnessB => "lab-lightness-b",
            SwatchPlane::LabAB => "lab-a-b",
            SwatchPlane::HueSaturation => "hue-saturation",
            SwatchPlane::HueLightness => "hue-lightness",
            SwatchPlane::SaturationLightness => "saturation-lightness",
        };
        write!(f, "{s}")
    }
}

/// One sampled plane.
#[derive(Debug, Clone, PartialEq)]
pub struct SwatchGrid {
    pub plane: SwatchPlane,
    pub step: u32,
    /// Sample coordinates shared by both axes, ascending from -100.
    pub axis: Vec<i32>,
    pub cells: Vec<Vec<Rgb>>,
}

impl SwatchGrid {
    #[instrument(level = "debug")]
    pub fn sample(plane: SwatchPlane, step: u32) -> DomainResult<Self> {
        let axis = swatch_axis(step)?;
        let cells = axis
            .iter()
            .map(|&y| {
                axis.iter()
                    .map(|&x| plane.sample(f64::from(x), f64::from(y)))
                    .collect()
            })
            .collect();
        Ok(Self {
            plane,
            step,
            axis,
            cells,
        })
    }

    /// Cells per side.
    pub fn size(&self) -> usize {
        self.axis.len()
    }

    pub fn hex_rows(&self) -> Vec<Vec<String>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(Rgb::to_hex).collect())
            .collect()
    }
}

/// Coordinates `-100, -100 + step, ...` strictly below 100.
pub fn swatch_axis(step: u32) -> DomainResult<Vec<i32>> {
    let step = i32::try_from(step)
        .ok()
        .filter(|s| (1..=GRID_MAX - GRID_MIN).contains(s))
        .ok_or_else(|| DomainError::UnknownOption {
            kind: "swatch step",
            value: step.to_string(),
        })?;
    Ok((GRID_MIN..GRID_MAX).step_by(step as usize).collect())
}

/// Sample every plane, Lab planes first.
pub fn sample_all(step: u32) -> DomainResult<Vec<SwatchGrid>> {
    let grids = SwatchPlane::ALL
        .iter()
        .map(|&plane| SwatchGrid::sample(plane, step))
        .collect::<DomainResult<Vec<_>>>()?;
    debug!(planes = grids.len(), step, "sampled swatches");
    Ok(grids)
}
