use std::ops::Add;
use super::{Assignment, ModelError, VarId};

/// Integer expression over model variables.
#[derive(Debug, Clone, PartialEq)]
pub enum IntExpr {
    Const(i64),
    Var(VarId),
    Sum(Vec<IntExpr>),
    Prod(Box<IntExpr>, Box<IntExpr>),
    Min(Vec<IntExpr>),
    Max(Vec<IntExpr>),
    /// Floor division by a constant
    Div(Box<IntExpr>, i64),
    /// `array[index]`: the entry selected by the value of `index`
    Element { array: Vec<IntExpr>, index: Box<IntExpr> },
}

impl From<VarId> for IntExpr {
    fn from(v: VarId) -> Self { IntExpr::Var(v) }
}

impl From<i64> for IntExpr {
    fn from(c: i64) -> Self { IntExpr::Const(c) }
}

pub fn element(array: Vec<IntExpr>, index: impl Into<IntExpr>) -> IntExpr {
    IntExpr::Element { array, index: Box::new(index.into()) }
}

/// Element over a table of constants.
pub fn element_const(values: &[i64], index: impl Into<IntExpr>) -> IntExpr {
    element(values.iter().map(|&c| IntExpr::Const(c)).collect(), index)
}

/// Element over an array of variables.
pub fn element_vars(vars: &[VarId], index: impl Into<IntExpr>) -> IntExpr {
    element(vars.iter().map(|&v| IntExpr::Var(v)).collect(), index)
}

pub fn max(a: impl Into<IntExpr>, b: impl Into<IntExpr>) -> IntExpr {
    IntExpr::Max(vec![a.into(), b.into()])
}

pub fn min(a: impl Into<IntExpr>, b: impl Into<IntExpr>) -> IntExpr {
    IntExpr::Min(vec![a.into(), b.into()])
}

pub fn prod(a: impl Into<IntExpr>, b: impl Into<IntExpr>) -> IntExpr {
    IntExpr::Prod(Box::new(a.into()), Box::new(b.into()))
}

pub fn sum(terms: impl IntoIterator<Item=IntExpr>) -> IntExpr {
    IntExpr::Sum(terms.into_iter().collect())
}

impl<T: Into<IntExpr>> Add<T> for IntExpr {
    type Output = IntExpr;

    fn add(self, rhs: T) -> IntExpr {
        let rhs = rhs.into();
        match self {
            IntExpr::Sum(mut terms) => {
                terms.push(rhs);
                IntExpr::Sum(terms)
            }
            lhs => IntExpr::Sum(vec![lhs, rhs]),
        }
    }
}

impl IntExpr {
    pub fn div(self, divisor: i64) -> IntExpr {
        IntExpr::Div(Box::new(self), divisor)
    }

    pub fn eval(&self, a: &Assignment) -> Result<i64, ModelError> {
        use IntExpr::*;
        match self {
            Const(c) => Ok(*c),
            Var(v) => a.value(*v),
            Sum(terms) => {
                let mut total = 0i64;
                for t in terms {
                    total = total.checked_add(t.eval(a)?).ok_or(ModelError::Overflow)?;
                }
                Ok(total)
            }
            Prod(x, y) => x.eval(a)?.checked_mul(y.eval(a)?).ok_or(ModelError::Overflow),
            Min(terms) => fold_extreme(terms, a, std::cmp::min),
            Max(terms) => fold_extreme(terms, a, std::cmp::max),
            Div(x, d) => {
                if *d == 0 {
                    return Err(ModelError::DivisionByZero);
                }
                let x = x.eval(a)?;
                let q = x / d;
                if x % d != 0 && ((x < 0) != (*d < 0)) { Ok(q - 1) } else { Ok(q) }
            }
            Element { array, index } => {
                let i = index.eval(a)?;
                if i < 0 || i as usize >= array.len() {
                    return Err(ModelError::ElementIndex { index: i, len: array.len() });
                }
                array[i as usize].eval(a)
            }
        }
    }
}

fn fold_extreme(terms: &[IntExpr], a: &Assignment, pick: fn(i64, i64) -> i64) -> Result<i64, ModelError> {
    let mut terms = terms.iter();
    let mut best = terms.next().ok_or(ModelError::EmptyAggregate)?.eval(a)?;
    for t in terms {
        best = pick(best, t.eval(a)?);
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Model, ModelSink};

    fn setup() -> (Model, Vec<VarId>, Assignment) {
        let mut m = Model::new("t");
        let xs = m.new_int_vars(3, -10, 10, "x");
        let mut a = Assignment::new(m.num_vars());
        a.set(xs[0], 2);
        a.set(xs[1], -7);
        a.set(xs[2], 1);
        (m, xs, a)
    }

    #[test]
    fn arithmetic() {
        let (_, x, a) = setup();
        assert_eq!((IntExpr::from(x[0]) + x[1] + 5i64).eval(&a).unwrap(), 0);
        assert_eq!(prod(x[0], x[1]).eval(&a).unwrap(), -14);
        assert_eq!(max(x[1], -3i64).eval(&a).unwrap(), -3);
        assert_eq!(min(x[0], x[2]).eval(&a).unwrap(), 1);
    }

    #[test]
    fn floor_division() {
        let (_, x, a) = setup();
        assert_eq!(IntExpr::from(x[1]).div(2).eval(&a).unwrap(), -4);
        assert_eq!(IntExpr::from(x[0]).div(2).eval(&a).unwrap(), 1);
        assert_eq!(IntExpr::Const(19).div(10).eval(&a).unwrap(), 1);
        assert!(matches!(IntExpr::Const(1).div(0).eval(&a), Err(ModelError::DivisionByZero)));
    }

    #[test]
    fn element_lookup() {
        let (_, x, a) = setup();
        assert_eq!(element_const(&[5, 6, 7], x[2]).eval(&a).unwrap(), 6);
        assert_eq!(element_vars(&x, x[0]).eval(&a).unwrap(), 1);
        assert!(matches!(
            element_const(&[5, 6, 7], x[1]).eval(&a),
            Err(ModelError::ElementIndex { index: -7, len: 3 })
        ));
    }

    #[test]
    fn sums_flatten() {
        let (_, x, _) = setup();
        let e = IntExpr::from(x[0]) + x[1] + x[2];
        assert_eq!(e, IntExpr::Sum(vec![x[0].into(), x[1].into(), x[2].into()]));
    }

    #[test]
    fn unassigned_is_an_error() {
        let (mut m, _, a) = setup();
        let y = m.new_int_var(0, 1, None);
        assert!(matches!(IntExpr::from(y).eval(&a), Err(ModelError::Unassigned(_))));
    }
}
