//! Numerically stable running mean and variance.

use chrono::{DateTime, Utc};

use crate::storage::{DomainStats, QueryRecord};

/// Online accumulator for count, mean, variance and the observation window.
///
/// Uses Welford's update so the mean and variance stay accurate over long
/// histories where the naive sum-of-squares formula would lose precision.
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    /// Sum of squared deviations from the current mean
    m2: f64,
    first: Option<DateTime<Utc>>,
    last: Option<DateTime<Utc>>,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one observation.
    pub fn push(&mut self, latency_micros: u64, observed_at: DateTime<Utc>) {
        self.count += 1;
        let x = latency_micros as f64;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);

        self.first = Some(self.first.map_or(observed_at, |f| f.min(observed_at)));
        self.last = Some(self.last.map_or(observed_at, |l| l.max(observed_at)));
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Arithmetic mean, `0.0` before the first observation.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn sample_variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            // m2 can drift a hair below zero on identical samples
            (self.m2 / (self.count - 1) as f64).max(0.0)
        }
    }

    pub fn sample_stddev(&self) -> f64 {
        self.sample_variance().sqrt()
    }

    /// Snapshot as a statistics row, or `None` before the first observation.
    pub fn to_domain_stats(&self, domain: &str) -> Option<DomainStats> {
        let (first, last) = (self.first?, self.last?);
        Some(DomainStats {
            domain: domain.to_string(),
            count: self.count,
            mean_latency_micros: self.mean,
            stddev_latency_micros: self.sample_stddev(),
            first_observed_at: first,
            last_observed_at: last,
        })
    }
}

impl<'a> Extend<&'a QueryRecord> for RunningStats {
    fn extend<I: IntoIterator<Item = &'a QueryRecord>>(&mut self, records: I) {
        for record in records {
            self.push(record.latency_micros, record.observed_at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    fn naive_sample_stddev(values: &[f64]) -> f64 {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1.0)).sqrt()
    }

    #[test]
    fn test_empty_has_no_stats() {
        let stats = RunningStats::new();
        assert_eq!(stats.count(), 0);
        assert_eq!(stats.sample_stddev(), 0.0);
        assert!(stats.to_domain_stats("example.com").is_none());
    }

    #[test]
    fn test_single_sample_has_zero_stddev() {
        let mut stats = RunningStats::new();
        stats.push(1000, at(5));
        assert_eq!(stats.count(), 1);
        assert_eq!(stats.mean(), 1000.0);
        assert_eq!(stats.sample_stddev(), 0.0);
    }

    #[test]
    fn test_sample_stddev_uses_bessel_correction() {
        let mut stats = RunningStats::new();
        for (i, v) in [100u64, 200, 300].iter().enumerate() {
            stats.push(*v, at(i as i64));
        }
        assert_eq!(stats.count(), 3);
        assert!((stats.mean() - 200.0).abs() < 1e-9);
        assert!((stats.sample_stddev() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_matches_two_pass_definition() {
        let values: Vec<u64> = (0..500).map(|i| (i * 7919 % 1013) as u64 + 20_000).collect();
        let mut stats = RunningStats::new();
        for (i, v) in values.iter().enumerate() {
            stats.push(*v, at(i as i64));
        }

        let as_f64: Vec<f64> = values.iter().map(|v| *v as f64).collect();
        let expected_mean = as_f64.iter().sum::<f64>() / as_f64.len() as f64;
        assert!((stats.mean() - expected_mean).abs() < 1e-6);
        assert!((stats.sample_stddev() - naive_sample_stddev(&as_f64)).abs() < 1e-6);
    }

    #[test]
    fn test_large_offset_stays_accurate() {
        // Values near 1e9 with a spread of a few units: sum-of-squares would cancel badly
        let mut stats = RunningStats::new();
        for (i, v) in [1_000_000_004u64, 1_000_000_007, 1_000_000_013, 1_000_000_016]
            .iter()
            .enumerate()
        {
            stats.push(*v, at(i as i64));
        }
        // Deviations are -6, -3, 3, 6 around 1_000_000_010: ss = 90, variance = 30
        assert!((stats.mean() - 1_000_000_010.0).abs() < 1e-6);
        assert!((stats.sample_variance() - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_identical_samples_have_zero_stddev() {
        let mut stats = RunningStats::new();
        for i in 0..10 {
            stats.push(4242, at(i));
        }
        assert_eq!(stats.sample_stddev(), 0.0);
    }

    #[test]
    fn test_observation_window_ignores_insertion_order() {
        let mut stats = RunningStats::new();
        stats.push(1, at(3_000));
        stats.push(1, at(1_000));
        stats.push(1, at(2_000));

        let row = stats.to_domain_stats("example.com").unwrap();
        assert_eq!(row.first_observed_at, at(1_000));
        assert_eq!(row.last_observed_at, at(3_000));
    }
}
