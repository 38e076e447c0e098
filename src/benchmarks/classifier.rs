//! Benchmark classifier: metric value → percentile + qualitative label.

use serde::{Deserialize, Serialize};

use super::Benchmark;

/// Whether a larger metric value is good (conversion rates) or bad (costs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricDirection {
    HigherIsBetter,
    LowerIsBetter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BenchmarkLabel {
    Poor,
    BelowAverage,
    Average,
    AboveAverage,
    Excellent,
}

impl BenchmarkLabel {
    pub fn display_name(&self) -> &str {
        match self {
            BenchmarkLabel::Poor => "poor",
            BenchmarkLabel::BelowAverage => "below average",
            BenchmarkLabel::Average => "average",
            BenchmarkLabel::AboveAverage => "above average",
            BenchmarkLabel::Excellent => "excellent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Bounded to [0, 100]; monotone in the directed ratio
    pub percentile: f64,
    pub label: BenchmarkLabel,
}

/// Classify a metric against a benchmark range.
///
/// The ratio is value/avg for higher-is-better metrics and avg/value for
/// lower-is-better ones, so parity with the benchmark average is always
/// ratio 1.0 regardless of direction. Percentile is `clamp(ratio * 50,
/// 0, 100)`. A value that cannot form a meaningful ratio (non-finite, or
/// non-positive where a positive quantity is required) classifies as poor
/// at percentile 0 rather than producing NaN.
pub fn classify_against_benchmark(
    value: f64,
    benchmark: &Benchmark,
    direction: MetricDirection,
) -> Classification {
    let ratio = directed_ratio(value, benchmark.avg, direction);
    match ratio {
        Some(ratio) => Classification {
            percentile: (ratio * 50.0).clamp(0.0, 100.0),
            label: label_for_ratio(ratio),
        },
        None => Classification {
            percentile: 0.0,
            label: BenchmarkLabel::Poor,
        },
    }
}

fn directed_ratio(value: f64, avg: f64, direction: MetricDirection) -> Option<f64> {
    if !value.is_finite() || !avg.is_finite() || avg <= 0.0 {
        return None;
    }
    match direction {
        MetricDirection::HigherIsBetter => {
            if value < 0.0 {
                None
            } else {
                Some(value / avg)
            }
        }
        MetricDirection::LowerIsBetter => {
            if value <= 0.0 {
                None
            } else {
                Some(avg / value)
            }
        }
    }
}

// Thresholds are symmetric around parity (ratio 1.0) so cost and
// conversion metrics land on the same label once the direction inversion
// is applied.
fn label_for_ratio(ratio: f64) -> BenchmarkLabel {
    if ratio < 0.8 {
        BenchmarkLabel::Poor
    } else if ratio < 0.95 {
        BenchmarkLabel::BelowAverage
    } else if ratio < 1.05 {
        BenchmarkLabel::Average
    } else if ratio < 1.3 {
        BenchmarkLabel::AboveAverage
    } else {
        BenchmarkLabel::Excellent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bench(avg: f64) -> Benchmark {
        Benchmark::new(avg * 0.5, avg, avg * 2.0)
    }

    #[test]
    fn parity_with_average_is_average() {
        let c = classify_against_benchmark(0.25, &bench(0.25), MetricDirection::HigherIsBetter);
        assert_eq!(c.label, BenchmarkLabel::Average);
        assert_eq!(c.percentile, 50.0);
    }

    #[test]
    fn label_thresholds_follow_the_ratio_bands() {
        let b = bench(1.0);
        let d = MetricDirection::HigherIsBetter;
        assert_eq!(classify_against_benchmark(0.5, &b, d).label, BenchmarkLabel::Poor);
        assert_eq!(
            classify_against_benchmark(0.85, &b, d).label,
            BenchmarkLabel::BelowAverage
        );
        assert_eq!(
            classify_against_benchmark(1.0, &b, d).label,
            BenchmarkLabel::Average
        );
        assert_eq!(
            classify_against_benchmark(1.1, &b, d).label,
            BenchmarkLabel::AboveAverage
        );
        assert_eq!(
            classify_against_benchmark(1.5, &b, d).label,
            BenchmarkLabel::Excellent
        );
    }

    #[test]
    fn cost_side_and_rate_side_agree_after_inversion() {
        // CAC at half the benchmark average is as good as a conversion
        // rate at double the benchmark average
        let cost = classify_against_benchmark(750.0, &bench(1500.0), MetricDirection::LowerIsBetter);
        let rate = classify_against_benchmark(0.06, &bench(0.03), MetricDirection::HigherIsBetter);
        assert_eq!(cost.label, rate.label);
        assert_eq!(cost.percentile, rate.percentile);
    }

    #[test]
    fn percentile_is_monotone_and_bounded() {
        let b = bench(0.03);
        let d = MetricDirection::HigherIsBetter;
        let mut last = -1.0;
        for value in [0.0, 0.01, 0.03, 0.06, 0.12, 100.0] {
            let c = classify_against_benchmark(value, &b, d);
            assert!(c.percentile >= last);
            assert!((0.0..=100.0).contains(&c.percentile));
            last = c.percentile;
        }
    }

    #[test]
    fn degenerate_values_classify_as_poor_not_nan() {
        let b = bench(1500.0);
        let c = classify_against_benchmark(0.0, &b, MetricDirection::LowerIsBetter);
        assert_eq!(c.label, BenchmarkLabel::Poor);
        assert_eq!(c.percentile, 0.0);
        let c = classify_against_benchmark(f64::NAN, &b, MetricDirection::HigherIsBetter);
        assert_eq!(c.percentile, 0.0);
    }
}
