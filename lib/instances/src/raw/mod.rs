pub mod solomon;
use std::borrow::Cow;
use crate::ParseError;

pub trait FromRaw<T> where Self: Sized {
  fn from_raw(raw: T, id: Cow<str>) -> Result<Self, ParseError>;
}


pub(crate) mod metrics {
  use num_traits::{AsPrimitive, Num};

  pub trait Metric {
    fn compute<T: Num + AsPrimitive<f64>>(p1: (T, T), p2: (T, T)) -> f64;
  }


  pub struct Euclidean();

  impl Metric for Euclidean {
    fn compute<T: Num + AsPrimitive<f64>>(p1: (T, T), p2: (T, T)) -> f64 {
      let a = p1.0.as_() - p2.0.as_();
      let b = p1.1.as_() - p2.1.as_();
      (a*a + b*b).sqrt()
    }
  }

  /// Metric distance scaled by `factor` and rounded down.  Scaling happens before flooring,
  /// which is what reproduces the published Solomon benchmark objectives.
  #[inline]
  pub fn scaled_floor<M: Metric>(_metric: M, p1: (f64, f64), p2: (f64, f64), factor: i64) -> i64 {
    (factor as f64 * M::compute(p1, p2)).floor() as i64
  }

  #[cfg(test)]
  mod tests {
    use super::*;

    #[test]
    fn euclidean_is_symmetric() {
      let (p, q) = ((1.5f64, -2.0f64), (4.0f64, 7.25f64));
      assert_eq!(Euclidean::compute(p, q), Euclidean::compute(q, p));
      assert_eq!(Euclidean::compute(p, p), 0.0);
    }

    #[test]
    fn floor_after_scaling() {
      // sqrt(2) = 1.414.. ; scaled first gives 14, flooring first would give 10
      assert_eq!(scaled_floor(Euclidean(), (0.0, 0.0), (1.0, 1.0), 10), 14);
      assert_eq!(scaled_floor(Euclidean(), (0.0, 0.0), (3.0, 4.0), 10), 50);
    }
  }
}
