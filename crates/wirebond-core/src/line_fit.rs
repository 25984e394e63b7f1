//! Ordinary least-squares line fitting.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Line `y = slope * x + intercept` in image coordinates (`x` = column, `y` = row).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LineFit {
    #[inline]
    pub fn y_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Unit direction pointing towards increasing `x`.
    pub fn direction(&self) -> Vector2<f64> {
        normalize_or_keep(Vector2::new(1.0, self.slope))
    }
}

/// Fit `y = a x + b` by ordinary least squares.
///
/// Returns `None` for fewer than two points or when every `x` is identical.
pub fn fit_line(points: &[Point2<f64>]) -> Option<LineFit> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.y).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for p in points {
        let dx = p.x - mean_x;
        sxx += dx * dx;
        sxy += dx * (p.y - mean_y);
    }
    if sxx <= f64::EPSILON {
        return None;
    }
    let slope = sxy / sxx;
    Some(LineFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Normalize `v`, leaving a zero vector untouched.
#[inline]
pub fn normalize_or_keep(v: Vector2<f64>) -> Vector2<f64> {
    let n = v.norm();
    if n == 0.0 {
        v
    } else {
        v / n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn recovers_exact_line() {
        let pts: Vec<_> = (0..20)
            .map(|i| Point2::new(i as f64, 0.25 * i as f64 + 7.0))
            .collect();
        let fit = fit_line(&pts).expect("fit");
        assert_relative_eq!(fit.slope, 0.25, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 7.0, epsilon = 1e-12);
        assert_relative_eq!(fit.y_at(4.0), 8.0, epsilon = 1e-12);
    }

    #[test]
    fn vertical_samples_are_degenerate() {
        let pts = [Point2::new(3.0, 0.0), Point2::new(3.0, 5.0)];
        assert!(fit_line(&pts).is_none());
        assert!(fit_line(&pts[..1]).is_none());
    }

    #[test]
    fn zero_vector_is_kept() {
        let v = normalize_or_keep(Vector2::zeros());
        assert_eq!(v, Vector2::zeros());
        let u = normalize_or_keep(Vector2::new(3.0, 4.0));
        assert_relative_eq!(u.norm(), 1.0);
    }
}
