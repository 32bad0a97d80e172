use serde::{Deserialize, Serialize};

/// z-score of the two-sided 95% normal interval
pub const Z_95: f64 = 1.96;

/// The mean of a vector of f64
pub fn mean(xs: &[f64]) -> f64 {
    let n: f64 = xs.len() as f64;
    xs.iter().fold(0.0, |acc, x| x + acc) / n
}

/// The variance of a vector of f64
///
/// Uses `n` in the denominator, as does `numpy.var`.
pub fn var(xs: &[f64]) -> f64 {
    let n: f64 = xs.len() as f64;
    let m = mean(xs);
    let v = xs.iter().fold(0.0, |acc, x| (x - m).mul_add(x - m, acc));
    v / n
}

/// The standard deviation of a vector of f64
pub fn std(xs: &[f64]) -> f64 {
    let v: f64 = var(xs);
    v.sqrt()
}

/// Normal-approximation confidence interval for a mean
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ConfidenceInterval {
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    pub fn contains(&self, x: f64) -> bool {
        self.lower <= x && x <= self.upper
    }

    pub fn half_width(&self) -> f64 {
        (self.upper - self.lower) / 2.0
    }
}

/// `mean ± 1.96 * std / sqrt(n)`
///
/// Returns `None` if `xs` is empty.
pub fn ci95(xs: &[f64]) -> Option<ConfidenceInterval> {
    if xs.is_empty() {
        return None;
    }
    let m = mean(xs);
    let stderr = std(xs) / (xs.len() as f64).sqrt();
    Some(ConfidenceInterval {
        mean: m,
        lower: Z_95.mul_add(-stderr, m),
        upper: Z_95.mul_add(stderr, m),
    })
}

/// Tolerance threshold `n / ln(n)`: the number of exceptions a rule over `n`
/// items can bear and still be productive.
///
/// Undefined (`None`) for `n < 2`.
pub fn tolerance(n: usize) -> Option<f64> {
    if n < 2 {
        None
    } else {
        let n = n as f64;
        Some(n / n.ln())
    }
}

#[cfg(test)]
mod tests {
    extern crate approx;
    use super::*;
    use approx::*;

    // mean
    // ----
    #[test]
    fn mean_1() {
        let xs: Vec<f64> = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(mean(&xs), 2.0, epsilon = 10E-10);
    }

    #[test]
    fn mean_2() {
        let xs: Vec<f64> = vec![1.0 / 3.0, 2.0 / 3.0, 5.0 / 8.0, 11.0 / 12.0];
        let expected = 0.635_416_666_666_666_6;
        assert_relative_eq!(mean(&xs), expected, epsilon = 10E-8);
    }

    // var
    // ---
    #[test]
    fn var_1() {
        let xs: Vec<f64> = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(var(&xs), 2.0, epsilon = 10E-10);
    }

    #[test]
    fn std_of_constant_is_zero() {
        let xs: Vec<f64> = vec![3.0; 10];
        assert_relative_eq!(std(&xs), 0.0, epsilon = 10E-12);
    }

    // ci95
    // ----
    #[test]
    fn ci95_brackets_mean() {
        let xs: Vec<f64> = vec![1.0, 2.0, 3.0, 4.0];
        let ci = ci95(&xs).unwrap();
        let stderr = 1.25_f64.sqrt() / 2.0;
        assert_relative_eq!(ci.mean, 2.5, epsilon = 10E-10);
        assert_relative_eq!(ci.lower, 2.5 - 1.96 * stderr, epsilon = 10E-10);
        assert_relative_eq!(ci.upper, 2.5 + 1.96 * stderr, epsilon = 10E-10);
        assert!(ci.contains(2.5));
    }

    #[test]
    fn ci95_of_single_value_collapses() {
        let ci = ci95(&[7.0]).unwrap();
        assert_relative_eq!(ci.lower, 7.0);
        assert_relative_eq!(ci.upper, 7.0);
        assert_relative_eq!(ci.half_width(), 0.0);
    }

    #[test]
    fn ci95_of_nothing_is_none() {
        assert!(ci95(&[]).is_none());
    }

    #[test]
    fn tolerance_values() {
        assert!(tolerance(1).is_none());
        assert_relative_eq!(
            tolerance(100).unwrap(),
            100.0 / 100_f64.ln(),
            epsilon = 10E-12
        );
    }
}
