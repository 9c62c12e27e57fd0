//! Elastic distances for nearest-neighbour time series classification.
//!
//! Pure math library, zero I/O. Provides DTW, WDTW, ERP, LCSS, MSM and TWE with
//! classic, early abandoning and pruning, and window-validity-reporting kernels,
//! corner and envelope lower bounds, per-sequence statistics with memoised
//! envelopes, and instrumentation counters.

mod bounds;
mod cache;
mod counters;
mod envelope;
mod error;
mod kernels;
mod measure;
mod preprocess;
mod series;
mod window;

pub use bounds::{BOUND_TOLERANCE, EnvelopeScan, corner_bound, deflate, envelope_bound, full_envelope_bound};
pub use cache::{SequenceStatsCache, SeriesStats};
pub use counters::Counters;
pub use envelope::Envelope;
pub use error::{DistError, PreprocessError};
pub use kernels::{Dtw, ElasticDistance, Erp, Lcss, Msm, Twe, WarpingPathResults, Wdtw};
pub use measure::{Measure, Params};
pub use preprocess::{mean_std, z_normalize, z_normalize_sequence};
pub use series::{Sequence, TimeSeries, TimeSeriesView};
pub use window::Window;
