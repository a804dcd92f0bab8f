//! Dataset-wide summary statistics

/// Sample mean and Bessel-corrected standard deviation of a series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl SampleStats {
    /// Compute statistics over `values`
    ///
    /// Returns `None` with fewer than two values, where the sample standard
    /// deviation is undefined.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
        I::IntoIter: Clone,
    {
        let values = values.into_iter();
        let count = values.clone().count();
        if count < 2 {
            return None;
        }

        // Two-pass variance for stability
        let mean = values.clone().sum::<f64>() / count as f64;
        let variance = values.map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;

        Some(Self {
            mean,
            std_dev: variance.sqrt(),
        })
    }

    /// Whether `value` lies more than `std_devs` deviations from the mean
    pub fn is_outlier(&self, value: f64, std_devs: f64) -> bool {
        (value - self.mean).abs() > std_devs * self.std_dev
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_two_values() {
        assert!(SampleStats::from_values(Vec::<f64>::new()).is_none());
        assert!(SampleStats::from_values(vec![5.0]).is_none());
    }

    #[test]
    fn test_bessel_corrected() {
        // Deviations from 5: -3, -1, 1, 3 -> sum of squares 20, / 3
        let stats = SampleStats::from_values(vec![2.0, 4.0, 6.0, 8.0]).unwrap();

        assert!((stats.mean - 5.0).abs() < 1e-12);
        assert!((stats.std_dev.powi(2) - 20.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_series_has_no_outliers() {
        let stats = SampleStats::from_values(vec![500.0; 8]).unwrap();

        assert_eq!(stats.std_dev, 0.0);
        assert!(!stats.is_outlier(500.0, 2.0));
    }

    #[test]
    fn test_outlier_bound_is_strict() {
        let stats = SampleStats {
            mean: 10.0,
            std_dev: 1.0,
        };

        assert!(!stats.is_outlier(12.0, 2.0));
        assert!(stats.is_outlier(12.5, 2.0));
        assert!(stats.is_outlier(7.5, 2.0));
    }
}
