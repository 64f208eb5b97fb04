//! Per-axis smoothing of tracked 3D landmark sets, one independent filter per
//! coordinate of every point.

use crate::error::{FilterError, Result};
use crate::filters::{Filter, OneEuroFilter};
use crate::registry::{AnyFilter, FilterConfig};
use itertools::izip;
use serde::{Deserialize, Serialize};

/// Landmarks per tracked hand.
pub const HAND_LANDMARK_COUNT: usize = 21;

const HAND_FREQ: f64 = 30.0;
const HAND_MINCUTOFF: f64 = 2.0;
const HAND_BETA: f64 = 100.0;
const HAND_DCUTOFF: f64 = 1.0;

/// One-Euro tuning for hand landmarks in normalized image coordinates.
pub const HAND_ONE_EURO: FilterConfig = FilterConfig::OneEuro {
    freq: HAND_FREQ,
    mincutoff: HAND_MINCUTOFF,
    beta: HAND_BETA,
    dcutoff: HAND_DCUTOFF,
};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Point3 { x, y, z }
    }
}

#[derive(Debug, Clone)]
pub struct LandmarkSmoother {
    filters: Vec<[AnyFilter; 3]>,
}

impl LandmarkSmoother {
    pub fn new(config: &FilterConfig, count: usize) -> Result<Self> {
        let filters = (0..count)
            .map(|_| Ok([config.build()?, config.build()?, config.build()?]))
            .collect::<Result<Vec<_>>>()?;
        Ok(LandmarkSmoother { filters })
    }

    /// [`HAND_LANDMARK_COUNT`] points with the [`HAND_ONE_EURO`] tuning.
    pub fn hand_default() -> Self {
        let one_euro = || AnyFilter::OneEuro(OneEuroFilter::new(HAND_FREQ, HAND_MINCUTOFF, HAND_BETA, HAND_DCUTOFF));
        LandmarkSmoother {
            filters: (0..HAND_LANDMARK_COUNT)
                .map(|_| [one_euro(), one_euro(), one_euro()])
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Smooth one frame of landmarks. The frame must have exactly one point per
    /// tracked landmark.
    pub fn smooth(&mut self, points: &[Point3], timestamp: Option<f64>) -> Result<Vec<Point3>> {
        if points.len() != self.filters.len() {
            return Err(FilterError::DimensionMismatch {
                context: "landmark count".to_string(),
                expected: self.filters.len(),
                actual: points.len(),
            });
        }
        let smoothed = izip!(self.filters.iter_mut(), points)
            .map(|([fx, fy, fz], p)| {
                Point3::new(
                    fx.filter(p.x, timestamp),
                    fy.filter(p.y, timestamp),
                    fz.filter(p.z, timestamp),
                )
            })
            .collect();
        Ok(smoothed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

/// Independent landmark smoothers for the left and the right hand.
#[derive(Debug, Clone)]
pub struct HandSmoother {
    left: LandmarkSmoother,
    right: LandmarkSmoother,
}

impl HandSmoother {
    pub fn new(config: &FilterConfig) -> Result<Self> {
        Ok(HandSmoother {
            left: LandmarkSmoother::new(config, HAND_LANDMARK_COUNT)?,
            right: LandmarkSmoother::new(config, HAND_LANDMARK_COUNT)?,
        })
    }

    pub fn smooth(
        &mut self,
        hand: Handedness,
        points: &[Point3],
        timestamp: Option<f64>,
    ) -> Result<Vec<Point3>> {
        match hand {
            Handedness::Left => self.left.smooth(points, timestamp),
            Handedness::Right => self.right.smooth(points, timestamp),
        }
    }
}

impl Default for HandSmoother {
    fn default() -> Self {
        HandSmoother {
            left: LandmarkSmoother::hand_default(),
            right: LandmarkSmoother::hand_default(),
        }
    }
}
