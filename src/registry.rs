//! Filter kinds, their tuning descriptors and a serde-friendly configuration
//! that builds any of them.

use crate::error::Result;
use crate::filters::{
    Aggregator, DESPFilter, DoubleExponentialFilter, Filter, MovingWindowFilter, OneEuroFilter,
    SingleExponentialFilter, Variant,
};
use crate::state_estimator::ConstantValueKalmanFilter;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WINDOW_SIZE: usize = 14;
pub const DEFAULT_SINGLE_ALPHA: f64 = 0.11;
pub const DEFAULT_DOUBLE_ALPHA: f64 = 0.11;
pub const DEFAULT_DOUBLE_GAMMA: f64 = 0.11;
pub const DEFAULT_DESP_ALPHA: f64 = 0.06;
pub const DEFAULT_DESP_TAU: f64 = 1.0;
pub const DEFAULT_KALMAN_P: f64 = 1.0;
pub const DEFAULT_KALMAN_Q: f64 = 0.3;
pub const DEFAULT_KALMAN_R: f64 = 18.06;
pub const DEFAULT_FREQ: f64 = 25.0;
pub const DEFAULT_MINCUTOFF: f64 = 1.0;
pub const DEFAULT_BETA: f64 = 0.007;
pub const DEFAULT_DCUTOFF: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    MovingWindow,
    SingleExponential,
    DoubleExponential,
    Desp,
    ConstantValueKalman,
    OneEuro,
}

/// One tunable parameter, for building tuning UIs. No runtime effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub min: Option<f64>,
    /// `None` when unbounded.
    pub max: Option<f64>,
    pub default: f64,
    pub step: Option<f64>,
    pub optional: bool,
    /// Step on a logarithmic scale.
    pub log_step: bool,
}

impl ParameterDescriptor {
    const fn new(name: &'static str, description: &'static str, default: f64) -> Self {
        ParameterDescriptor {
            name,
            description,
            min: None,
            max: None,
            default,
            step: None,
            optional: false,
            log_step: false,
        }
    }

    const fn range(self, min: f64, max: Option<f64>) -> Self {
        ParameterDescriptor {
            min: Some(min),
            max,
            ..self
        }
    }

    const fn step(self, step: f64) -> Self {
        ParameterDescriptor {
            step: Some(step),
            ..self
        }
    }

    const fn optional(self) -> Self {
        ParameterDescriptor {
            optional: true,
            ..self
        }
    }

    const fn log_step(self) -> Self {
        ParameterDescriptor {
            log_step: true,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterDescriptor {
    pub kind: FilterKind,
    pub description: &'static str,
    pub parameters: &'static [ParameterDescriptor],
}

static MOVING_WINDOW: FilterDescriptor = FilterDescriptor {
    kind: FilterKind::MovingWindow,
    description: "Moving average",
    parameters: &[ParameterDescriptor::new("window_size", "Window size", DEFAULT_WINDOW_SIZE as f64)
        .range(1.0, None)],
};

static SINGLE_EXPONENTIAL: FilterDescriptor = FilterDescriptor {
    kind: FilterKind::SingleExponential,
    description: "Single exponential",
    parameters: &[ParameterDescriptor::new("alpha", "Alpha", DEFAULT_SINGLE_ALPHA)
        .range(0.0, Some(1.0))
        .step(0.01)],
};

static DOUBLE_EXPONENTIAL: FilterDescriptor = FilterDescriptor {
    kind: FilterKind::DoubleExponential,
    description: "Double exponential",
    parameters: &[
        ParameterDescriptor::new("alpha", "Alpha", DEFAULT_DOUBLE_ALPHA)
            .range(0.0, Some(1.0))
            .step(0.01),
        ParameterDescriptor::new("gamma", "Gamma", DEFAULT_DOUBLE_GAMMA)
            .range(0.0, Some(1.0))
            .step(0.01),
    ],
};

static DESP: FilterDescriptor = FilterDescriptor {
    kind: FilterKind::Desp,
    description: "Double exponential smoothing prediction",
    parameters: &[
        ParameterDescriptor::new("alpha", "Alpha", DEFAULT_DESP_ALPHA)
            .range(0.0, Some(1.0))
            .step(0.01),
        ParameterDescriptor::new("tau", "Tau", DEFAULT_DESP_TAU)
            .range(1.0, None)
            .optional(),
    ],
};

static CONSTANT_VALUE_KALMAN: FilterDescriptor = FilterDescriptor {
    kind: FilterKind::ConstantValueKalman,
    description: "Kalman filter",
    parameters: &[
        ParameterDescriptor::new("p", "Initial covariance estimate", DEFAULT_KALMAN_P).optional(),
        ParameterDescriptor::new("q", "Process error covariance", DEFAULT_KALMAN_Q).step(0.01),
        ParameterDescriptor::new("r", "Measurement error covariance", DEFAULT_KALMAN_R).step(0.1),
    ],
};

static ONE_EURO: FilterDescriptor = FilterDescriptor {
    kind: FilterKind::OneEuro,
    description: "1€ Filter",
    parameters: &[
        ParameterDescriptor::new("freq", "Frequency", DEFAULT_FREQ)
            .range(1.0, None)
            .optional(),
        ParameterDescriptor::new("mincutoff", "fcmin", DEFAULT_MINCUTOFF)
            .range(0.0, Some(10.0))
            .step(0.01)
            .log_step(),
        ParameterDescriptor::new("beta", "beta", DEFAULT_BETA)
            .range(0.0, Some(1.0))
            .step(0.001),
        ParameterDescriptor::new("dcutoff", "Cutoff for derivative", DEFAULT_DCUTOFF)
            .range(0.0, Some(10.0))
            .step(0.01),
    ],
};

impl FilterKind {
    pub const ALL: [FilterKind; 6] = [
        FilterKind::MovingWindow,
        FilterKind::SingleExponential,
        FilterKind::DoubleExponential,
        FilterKind::Desp,
        FilterKind::ConstantValueKalman,
        FilterKind::OneEuro,
    ];

    pub fn descriptor(self) -> &'static FilterDescriptor {
        match self {
            FilterKind::MovingWindow => &MOVING_WINDOW,
            FilterKind::SingleExponential => &SINGLE_EXPONENTIAL,
            FilterKind::DoubleExponential => &DOUBLE_EXPONENTIAL,
            FilterKind::Desp => &DESP,
            FilterKind::ConstantValueKalman => &CONSTANT_VALUE_KALMAN,
            FilterKind::OneEuro => &ONE_EURO,
        }
    }
}

fn default_desp_tau() -> f64 {
    DEFAULT_DESP_TAU
}

fn default_kalman_p() -> f64 {
    DEFAULT_KALMAN_P
}

fn default_freq() -> f64 {
    DEFAULT_FREQ
}

/// Parameters for one filter instance, tagged by kind:
///
/// ```json
/// {"kind": "one_euro", "freq": 30, "mincutoff": 2, "beta": 100, "dcutoff": 1}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterConfig {
    MovingWindow {
        window_size: usize,
        #[serde(default)]
        aggregator: Aggregator,
    },
    SingleExponential {
        alpha: f64,
        #[serde(default)]
        variant: Variant,
    },
    DoubleExponential {
        alpha: f64,
        gamma: f64,
    },
    Desp {
        alpha: f64,
        #[serde(default = "default_desp_tau")]
        tau: f64,
    },
    ConstantValueKalman {
        #[serde(default = "default_kalman_p")]
        p: f64,
        q: f64,
        r: f64,
    },
    OneEuro {
        #[serde(default = "default_freq")]
        freq: f64,
        mincutoff: f64,
        beta: f64,
        dcutoff: f64,
    },
}

impl FilterConfig {
    /// Every parameter at its descriptor default.
    pub fn default_for(kind: FilterKind) -> Self {
        match kind {
            FilterKind::MovingWindow => FilterConfig::MovingWindow {
                window_size: DEFAULT_WINDOW_SIZE,
                aggregator: Aggregator::default(),
            },
            FilterKind::SingleExponential => FilterConfig::SingleExponential {
                alpha: DEFAULT_SINGLE_ALPHA,
                variant: Variant::default(),
            },
            FilterKind::DoubleExponential => FilterConfig::DoubleExponential {
                alpha: DEFAULT_DOUBLE_ALPHA,
                gamma: DEFAULT_DOUBLE_GAMMA,
            },
            FilterKind::Desp => FilterConfig::Desp {
                alpha: DEFAULT_DESP_ALPHA,
                tau: DEFAULT_DESP_TAU,
            },
            FilterKind::ConstantValueKalman => FilterConfig::ConstantValueKalman {
                p: DEFAULT_KALMAN_P,
                q: DEFAULT_KALMAN_Q,
                r: DEFAULT_KALMAN_R,
            },
            FilterKind::OneEuro => FilterConfig::OneEuro {
                freq: DEFAULT_FREQ,
                mincutoff: DEFAULT_MINCUTOFF,
                beta: DEFAULT_BETA,
                dcutoff: DEFAULT_DCUTOFF,
            },
        }
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            FilterConfig::MovingWindow { .. } => FilterKind::MovingWindow,
            FilterConfig::SingleExponential { .. } => FilterKind::SingleExponential,
            FilterConfig::DoubleExponential { .. } => FilterKind::DoubleExponential,
            FilterConfig::Desp { .. } => FilterKind::Desp,
            FilterConfig::ConstantValueKalman { .. } => FilterKind::ConstantValueKalman,
            FilterConfig::OneEuro { .. } => FilterKind::OneEuro,
        }
    }

    /// Fresh filter instance. Only structural values are validated.
    pub fn build(&self) -> Result<AnyFilter> {
        tracing::debug!(config = ?self, "building filter");
        let filter = match *self {
            FilterConfig::MovingWindow {
                window_size,
                aggregator,
            } => AnyFilter::MovingWindow(
                MovingWindowFilter::new(window_size)?.with_aggregator(aggregator),
            ),
            FilterConfig::SingleExponential { alpha, variant } => {
                AnyFilter::SingleExponential(SingleExponentialFilter::new(alpha, variant))
            }
            FilterConfig::DoubleExponential { alpha, gamma } => {
                AnyFilter::DoubleExponential(DoubleExponentialFilter::new(alpha, gamma))
            }
            FilterConfig::Desp { alpha, tau } => AnyFilter::Desp(DESPFilter::new(alpha, tau)),
            FilterConfig::ConstantValueKalman { p, q, r } => {
                AnyFilter::ConstantValueKalman(ConstantValueKalmanFilter::new(p, q, r))
            }
            FilterConfig::OneEuro {
                freq,
                mincutoff,
                beta,
                dcutoff,
            } => AnyFilter::OneEuro(OneEuroFilter::new(freq, mincutoff, beta, dcutoff)),
        };
        Ok(filter)
    }
}

/// Any of the scalar filters behind one type.
#[derive(Debug, Clone)]
pub enum AnyFilter {
    MovingWindow(MovingWindowFilter),
    SingleExponential(SingleExponentialFilter),
    DoubleExponential(DoubleExponentialFilter),
    Desp(DESPFilter),
    ConstantValueKalman(ConstantValueKalmanFilter),
    OneEuro(OneEuroFilter),
}

impl AnyFilter {
    pub fn kind(&self) -> FilterKind {
        match self {
            AnyFilter::MovingWindow(_) => FilterKind::MovingWindow,
            AnyFilter::SingleExponential(_) => FilterKind::SingleExponential,
            AnyFilter::DoubleExponential(_) => FilterKind::DoubleExponential,
            AnyFilter::Desp(_) => FilterKind::Desp,
            AnyFilter::ConstantValueKalman(_) => FilterKind::ConstantValueKalman,
            AnyFilter::OneEuro(_) => FilterKind::OneEuro,
        }
    }
}

impl Filter for AnyFilter {
    fn filter(&mut self, x: f64, timestamp: Option<f64>) -> f64 {
        match self {
            AnyFilter::MovingWindow(f) => f.filter(x, timestamp),
            AnyFilter::SingleExponential(f) => f.filter(x, timestamp),
            AnyFilter::DoubleExponential(f) => f.filter(x, timestamp),
            AnyFilter::Desp(f) => f.filter(x, timestamp),
            AnyFilter::ConstantValueKalman(f) => f.filter(x, timestamp),
            AnyFilter::OneEuro(f) => f.filter(x, timestamp),
        }
    }
}
