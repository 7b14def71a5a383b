//! Data models for hit error statistics

use std::fmt;

use serde::{Deserialize, Serialize};

/// Timing accuracy of a play.
///
/// Averages are `None` when the list they are computed from is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HitErrorStats {
    /// Mean of the early (negative) hit errors in milliseconds
    pub negative_average: Option<f64>,
    /// Mean of the late (zero or positive) hit errors in milliseconds
    pub positive_average: Option<f64>,
    /// Mean of all hit errors
    pub mean: Option<f64>,
    /// Standard deviation of all hit errors times ten
    pub unstable_rate: Option<f64>,
    pub negative_count: usize,
    pub positive_count: usize,
    pub total_count: usize,
}

impl HitErrorStats {
    /// Compute statistics from hit errors in milliseconds
    pub fn from_errors(errors: &[f64]) -> Self {
        let negative: Vec<f64> = errors.iter().copied().filter(|e| *e < 0.0).collect();
        let positive: Vec<f64> = errors.iter().copied().filter(|e| *e >= 0.0).collect();

        let mean = mean(errors);
        let unstable_rate = mean.map(|mean| {
            let variance =
                errors.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / errors.len() as f64;
            variance.sqrt() * 10.0
        });

        Self {
            negative_average: self::mean(&negative),
            positive_average: self::mean(&positive),
            mean,
            unstable_rate,
            negative_count: negative.len(),
            positive_count: positive.len(),
            total_count: errors.len(),
        }
    }

    /// True when no object was hit
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Format an optional statistic, printing `undefined` for missing values
pub fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "undefined".to_string(),
    }
}

/// `12.34 ms`, or `undefined` without a unit
fn format_ms(value: Option<f64>) -> String {
    match value {
        Some(_) => format!("{} ms", format_stat(value)),
        None => format_stat(value),
    }
}

fn hit_count(count: usize) -> String {
    if count == 1 {
        "1 hit".to_string()
    } else {
        format!("{} hits", count)
    }
}

impl fmt::Display for HitErrorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Early hit error avg: {} ({})",
            format_ms(self.negative_average),
            hit_count(self.negative_count)
        )?;
        writeln!(
            f,
            "Late hit error avg:  {} ({})",
            format_ms(self.positive_average),
            hit_count(self.positive_count)
        )?;
        write!(f, "Unstable rate:       {}", format_stat(self.unstable_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_errors_are_undefined() {
        let stats = HitErrorStats::from_errors(&[]);
        assert!(stats.is_empty());
        assert_eq!(stats.negative_average, None);
        assert_eq!(stats.positive_average, None);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.unstable_rate, None);
    }

    #[test]
    fn test_single_error() {
        let stats = HitErrorStats::from_errors(&[-12.0]);
        assert_eq!(stats.negative_average, Some(-12.0));
        assert_eq!(stats.positive_average, None);
        assert_eq!(stats.unstable_rate, Some(0.0));
        assert_eq!(stats.negative_count, 1);
        assert_eq!(stats.positive_count, 0);
    }

    #[test]
    fn test_mixed_errors() {
        // mean 0, variance (100 + 100 + 0 + 0) / 4 = 50
        let stats = HitErrorStats::from_errors(&[-10.0, 10.0, 0.0, 0.0]);
        assert_eq!(stats.negative_average, Some(-10.0));
        assert_eq!(stats.positive_average, Some(10.0 / 3.0));
        assert_eq!(stats.mean, Some(0.0));
        let ur = stats.unstable_rate.unwrap();
        assert!((ur - 50f64.sqrt() * 10.0).abs() < 1e-9);
        assert_eq!(stats.total_count, 4);
    }

    #[test]
    fn test_display_undefined() {
        let text = HitErrorStats::from_errors(&[5.0]).to_string();
        assert!(text.contains("Early hit error avg: undefined (0 hits)"));
        assert!(text.contains("Late hit error avg:  5.00 ms (1 hit)"));
        assert!(text.contains("Unstable rate:       0.00"));
    }

    #[test]
    fn test_display_plural_hits() {
        let text = HitErrorStats::from_errors(&[-4.0, -6.0, 2.0]).to_string();
        assert!(text.contains("Early hit error avg: -5.00 ms (2 hits)"));
        assert!(text.contains("Late hit error avg:  2.00 ms (1 hit)"));
    }
}
