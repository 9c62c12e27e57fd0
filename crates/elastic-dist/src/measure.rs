//! Measure identifiers and the closed set of parameterised measures.

use std::fmt;
use std::str::FromStr;

use crate::error::DistError;
use crate::kernels::{Dtw, ElasticDistance, Erp, Lcss, Msm, Twe, WarpingPathResults, Wdtw};
use crate::series::TimeSeriesView;
use crate::window::Window;

/// The six elastic measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Measure {
    Dtw,
    Wdtw,
    Erp,
    Lcss,
    Msm,
    Twe,
}

impl Measure {
    /// Every measure, in canonical order.
    pub const ALL: [Self; 6] = [Self::Dtw, Self::Wdtw, Self::Erp, Self::Lcss, Self::Msm, Self::Twe];

    /// Return true if the measure has a warping window parameter.
    #[must_use]
    pub fn is_windowed(self) -> bool {
        matches!(self, Self::Dtw | Self::Erp | Self::Lcss)
    }

    /// Lowercase name used on the command line and in result files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Dtw => "dtw",
            Self::Wdtw => "wdtw",
            Self::Erp => "erp",
            Self::Lcss => "lcss",
            Self::Msm => "msm",
            Self::Twe => "twe",
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Measure {
    type Err = DistError;

    /// Parse a measure name, case-insensitively.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DistError::UnknownMeasure`] | `s` names none of the six measures |
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.name() == lower)
            .ok_or_else(|| DistError::UnknownMeasure { name: s.to_owned() })
    }
}

/// One concrete parameter tuple of one measure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Params {
    Dtw(Dtw),
    Wdtw(Wdtw),
    Erp(Erp),
    Lcss(Lcss),
    Msm(Msm),
    Twe(Twe),
}

impl Params {
    /// Return which measure these parameters belong to.
    #[must_use]
    pub fn measure(&self) -> Measure {
        match self {
            Self::Dtw(_) => Measure::Dtw,
            Self::Wdtw(_) => Measure::Wdtw,
            Self::Erp(_) => Measure::Erp,
            Self::Lcss(_) => Measure::Lcss,
            Self::Msm(_) => Measure::Msm,
            Self::Twe(_) => Measure::Twe,
        }
    }

    /// Return the window, or `None` for measures without one.
    #[must_use]
    pub fn window(&self) -> Option<Window> {
        match self {
            Self::Dtw(d) => Some(d.window()),
            Self::Erp(e) => Some(e.window()),
            Self::Lcss(l) => Some(l.window()),
            Self::Wdtw(_) | Self::Msm(_) | Self::Twe(_) => None,
        }
    }

    /// Return the window used for envelopes: the measure's window, or unconstrained.
    #[must_use]
    pub fn effective_window(&self) -> Window {
        self.window().unwrap_or(Window::UNCONSTRAINED)
    }

    /// Return a copy with the window replaced. Non-windowed measures are returned unchanged.
    #[must_use]
    pub fn with_window(&self, window: Window) -> Self {
        match *self {
            Self::Dtw(_) => Self::Dtw(Dtw::new(window)),
            Self::Erp(e) => Self::Erp(Erp::new(window, e.g())),
            Self::Lcss(l) => Self::Lcss(Lcss::new(window, l.epsilon())),
            other => other,
        }
    }

    /// Return true if `other` differs from `self` at most in its window.
    ///
    /// Such parameters form a chain along which nearest-neighbour results can be
    /// propagated from wider to narrower windows.
    #[must_use]
    pub fn same_chain(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Dtw(_), Self::Dtw(_)) => true,
            (Self::Erp(a), Self::Erp(b)) => a.g() == b.g(),
            (Self::Lcss(a), Self::Lcss(b)) => a.epsilon() == b.epsilon(),
            (Self::Wdtw(a), Self::Wdtw(b)) => a == b,
            (Self::Msm(a), Self::Msm(b)) => a == b,
            (Self::Twe(a), Self::Twe(b)) => a == b,
            _ => false,
        }
    }

    fn kernel(&self) -> &dyn ElasticDistance {
        match self {
            Self::Dtw(d) => d,
            Self::Wdtw(w) => w,
            Self::Erp(e) => e,
            Self::Lcss(l) => l,
            Self::Msm(m) => m,
            Self::Twe(t) => t,
        }
    }
}

impl ElasticDistance for Params {
    fn distance(&self, a: TimeSeriesView<'_>, b: TimeSeriesView<'_>) -> f64 {
        self.kernel().distance(a, b)
    }

    fn distance_with_cutoff(&self, a: TimeSeriesView<'_>, b: TimeSeriesView<'_>, cutoff: f64) -> f64 {
        self.kernel().distance_with_cutoff(a, b, cutoff)
    }

    fn distance_extended(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
        cutoff: f64,
    ) -> WarpingPathResults {
        self.kernel().distance_extended(a, b, cutoff)
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dtw(d) => write!(f, "dtw(w={})", d.window()),
            Self::Wdtw(w) => write!(f, "wdtw(g={})", w.g()),
            Self::Erp(e) => write!(f, "erp(w={}, g={})", e.window(), e.g()),
            Self::Lcss(l) => write!(f, "lcss(w={}, epsilon={})", l.window(), l.epsilon()),
            Self::Msm(m) => write!(f, "msm(c={})", m.cost()),
            Self::Twe(t) => write!(f, "twe(nu={}, lambda={})", t.nu(), t.lambda()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_measure_case_insensitive() {
        assert_eq!("DTW".parse::<Measure>().unwrap(), Measure::Dtw);
        assert_eq!("twe".parse::<Measure>().unwrap(), Measure::Twe);
        assert!(matches!(
            "euclid".parse::<Measure>(),
            Err(DistError::UnknownMeasure { name }) if name == "euclid"
        ));
    }

    #[test]
    fn chains_ignore_window_only() {
        let a = Params::Erp(Erp::new(Window::new(3), 0.5));
        let b = Params::Erp(Erp::new(Window::new(1), 0.5));
        let c = Params::Erp(Erp::new(Window::new(3), 0.7));
        assert!(a.same_chain(&b));
        assert!(!a.same_chain(&c));
        assert!(!a.same_chain(&Params::Dtw(Dtw::new(Window::new(3)))));
        assert!(Params::Msm(Msm::new(1.0)).same_chain(&Params::Msm(Msm::new(1.0))));
        assert!(!Params::Msm(Msm::new(1.0)).same_chain(&Params::Msm(Msm::new(2.0))));
    }

    #[test]
    fn with_window_replaces_only_window() {
        let p = Params::Lcss(Lcss::new(Window::new(4), 0.2)).with_window(Window::new(2));
        assert_eq!(p, Params::Lcss(Lcss::new(Window::new(2), 0.2)));
        let t = Params::Twe(Twe::new(0.1, 0.2));
        assert_eq!(t.with_window(Window::new(0)), t);
        assert_eq!(t.window(), None);
        assert_eq!(t.effective_window(), Window::UNCONSTRAINED);
    }

    #[test]
    fn display_names() {
        assert_eq!(Params::Dtw(Dtw::new(Window::new(5))).to_string(), "dtw(w=5)");
        assert_eq!(Params::Msm(Msm::new(0.5)).to_string(), "msm(c=0.5)");
        assert_eq!(Measure::Lcss.to_string(), "lcss");
    }
}
