use super::{validate_matrix, ModelError};

/// Per-feature standardization to zero mean and unit variance.
///
/// Uses the population standard deviation. Constant features keep a scale
/// of 1 so they pass through centred instead of dividing by zero.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(x: &[Vec<f64>]) -> Result<Self, ModelError> {
        let n_features = validate_matrix(x)?;
        let n = x.len() as f64;

        let mut mean = vec![0.0; n_features];
        for row in x {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut scale = vec![0.0; n_features];
        for row in x {
            for ((s, v), m) in scale.iter_mut().zip(row).zip(&mean) {
                *s += (v - m).powi(2);
            }
        }
        for s in &mut scale {
            let std = (*s / n).sqrt();
            *s = if std > f64::EPSILON { std } else { 1.0 };
        }

        Ok(Self { mean, scale })
    }

    pub fn transform_one(&self, x: &[f64]) -> Result<Vec<f64>, ModelError> {
        if x.len() != self.mean.len() {
            return Err(ModelError::FeatureMismatch {
                expected: self.mean.len(),
                got: x.len(),
            });
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite);
        }

        Ok(x.iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .map(|((v, m), s)| (v - m) / s)
            .collect())
    }

    pub fn transform(&self, x: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ModelError> {
        x.iter().map(|row| self.transform_one(row)).collect()
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_mean_and_scale() {
        let x = vec![vec![1.0, 10.0], vec![3.0, 10.0]];
        let scaler = StandardScaler::fit(&x).unwrap();
        assert_eq!(scaler.mean(), &[2.0, 10.0]);
        // population std of [1, 3] is 1; constant column keeps scale 1
        assert_eq!(scaler.scale(), &[1.0, 1.0]);
    }

    #[test]
    fn test_transform_standardizes() {
        let x: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64 * 3.0 + 7.0]).collect();
        let scaler = StandardScaler::fit(&x).unwrap();
        let scaled = scaler.transform(&x).unwrap();

        let n = scaled.len() as f64;
        let mean: f64 = scaled.iter().map(|r| r[0]).sum::<f64>() / n;
        let var: f64 = scaled.iter().map(|r| (r[0] - mean).powi(2)).sum::<f64>() / n;
        assert!(mean.abs() < 1e-12);
        assert!((var - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_transform_wrong_width() {
        let scaler = StandardScaler::fit(&[vec![1.0, 2.0]]).unwrap();
        assert_eq!(
            scaler.transform_one(&[1.0]),
            Err(ModelError::FeatureMismatch {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn test_fit_rejects_empty_and_non_finite() {
        assert_eq!(StandardScaler::fit(&[]), Err(ModelError::EmptyInput));
        assert_eq!(
            StandardScaler::fit(&[vec![f64::INFINITY]]),
            Err(ModelError::NonFinite)
        );
    }
}
