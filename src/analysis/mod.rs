//! Link security analysis.
//!
//! - **secrecy**: secret key fraction and maximum secure distance of a link.
//! - **statistics**: confidence intervals for measured QBER samples.
//! - **scenario**: studies over an explicit list of setups and emission rates.

pub mod scenario;
pub mod secrecy;
pub mod statistics;

pub use scenario::{Scenario, ScenarioOutcome, Setup, Study, StudyConfig};
pub use secrecy::{
    LinkAnalysis, SecretRateCurve, SecurityThreshold, analyze, max_secure_distance, secret_rate,
    secret_rate_curve,
};
pub use statistics::{
    ConfidenceInterval, ControlSetting, ControlVariable, CriticalValue, GroupSummary,
    MeasurementGroup, SampleSummary, summarize, summarize_groups, summarize_with,
};
