//! Confidence intervals for measured QBER samples.
//!
//! All intervals are two-sided at [`CONFIDENCE_LEVEL`]. The critical value
//! comes either from the exact Student-t quantile with n - 1 degrees of
//! freedom or from the fixed normal approximation 1.645.

use crate::core::errors::ConfigurationError;
use crate::core::utils::student_t_quantile;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Two-sided confidence level used for every interval.
pub const CONFIDENCE_LEVEL: f64 = 0.90;

/// Two-sided 90% quantile of the standard normal distribution.
pub const NORMAL_CRITICAL_VALUE: f64 = 1.645;

/// Source of the critical value scaling the standard error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriticalValue {
    /// Student-t quantile at n - 1 degrees of freedom.
    #[default]
    StudentT,
    /// Fixed [`NORMAL_CRITICAL_VALUE`], regardless of sample size.
    NormalApprox,
}

impl CriticalValue {
    /// Critical value for a sample of `count` observations.
    ///
    /// Counts below 2 are evaluated as 2 (one degree of freedom).
    pub fn value(&self, count: usize) -> f64 {
        match self {
            CriticalValue::StudentT => {
                let upper_tail = (1.0 - CONFIDENCE_LEVEL) / 2.0;
                let dof = count.max(2) - 1;
                student_t_quantile(1.0 - upper_tail, dof as f64)
            }
            CriticalValue::NormalApprox => NORMAL_CRITICAL_VALUE,
        }
    }
}

/// Symmetric interval `[mean - half_width, mean + half_width]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub mean: f64,
    pub half_width: f64,
}

impl ConfidenceInterval {
    pub fn lower(&self) -> f64 {
        self.mean - self.half_width
    }

    pub fn upper(&self) -> f64 {
        self.mean + self.half_width
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.lower()..=self.upper()).contains(&value)
    }
}

impl fmt::Display for ConfidenceInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} ± {:.4}", self.mean, self.half_width)
    }
}

/// Summary statistics of one measurement sample.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (Bessel corrected).
    pub std_dev: f64,
    pub critical_value: f64,
    pub interval: ConfidenceInterval,
}

/// Summarizes a sample with the Student-t critical value.
pub fn summarize(sample: &[f64]) -> Result<SampleSummary, ConfigurationError> {
    summarize_with(sample, CriticalValue::StudentT)
}

/// Summarizes a sample with an explicit critical value source.
pub fn summarize_with(
    sample: &[f64],
    critical: CriticalValue,
) -> Result<SampleSummary, ConfigurationError> {
    let count = sample.len();
    if count < 2 {
        return Err(ConfigurationError::DegenerateSample(count));
    }
    if let Some((index, &value)) = sample.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ConfigurationError::NonFiniteSample { index, value });
    }

    let view = ArrayView1::from(sample);
    let mean = view.mean().ok_or(ConfigurationError::DegenerateSample(count))?;
    let std_dev = view.std(1.0);

    let critical_value = critical.value(count);
    let half_width = critical_value * std_dev / (count as f64).sqrt();

    tracing::debug!(count, mean, std_dev, half_width, ?critical, "sample summarized");

    Ok(SampleSummary {
        count,
        mean,
        std_dev,
        critical_value,
        interval: ConfidenceInterval { mean, half_width },
    })
}

/// Experimental knob that distinguishes measurement groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlVariable {
    /// Laser diode drive current.
    DiodeCurrent,
    /// Optical pulse length.
    PulseLength,
}

impl ControlVariable {
    pub fn unit(&self) -> &'static str {
        match self {
            ControlVariable::DiodeCurrent => "mA",
            ControlVariable::PulseLength => "μs",
        }
    }
}

impl fmt::Display for ControlVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlVariable::DiodeCurrent => write!(f, "diode current"),
            ControlVariable::PulseLength => write!(f, "pulse length"),
        }
    }
}

/// One setting of a control variable, e.g. 40 mA.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlSetting {
    pub variable: ControlVariable,
    pub value: f64,
}

impl fmt::Display for ControlSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.variable, self.value, self.variable.unit())
    }
}

/// QBER percentages measured under one control setting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeasurementGroup {
    pub setting: ControlSetting,
    pub sample: Vec<f64>,
}

impl MeasurementGroup {
    pub fn new(variable: ControlVariable, value: f64, sample: Vec<f64>) -> Self {
        Self {
            setting: ControlSetting { variable, value },
            sample,
        }
    }
}

/// Summary of one [`MeasurementGroup`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub setting: ControlSetting,
    pub summary: SampleSummary,
}

/// Summarizes each group independently; variance is never pooled.
///
/// Output order matches input order. Fails on the first degenerate group.
pub fn summarize_groups(
    groups: &[MeasurementGroup],
    critical: CriticalValue,
) -> Result<Vec<GroupSummary>, ConfigurationError> {
    groups
        .iter()
        .map(|group| {
            let summary = summarize_with(&group.sample, critical).inspect_err(|err| {
                tracing::warn!(setting = %group.setting, %err, "cannot summarize group");
            })?;
            Ok(GroupSummary {
                setting: group.setting,
                summary,
            })
        })
        .collect()
}
