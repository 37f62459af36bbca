use super::{Assignment, IntExpr, ModelError, VarId};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Rel {
    Eq,
    Ne,
    Le,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Rel(Rel, IntExpr, IntExpr),
    /// `expr` takes one of `values`
    AllowedValues { expr: IntExpr, values: Vec<i64> },
    Or(Vec<Constraint>),
    /// `prev` is a permutation of `0..prev.len()`, and the positions with `prev[i] != i` form a
    /// single cycle.  Positions with `prev[i] == i` are left out of the circuit.
    SubCircuit { prev: Vec<VarId> },
    /// `loads[k]` is the total weight of the items `i` with `assignments[i] == k`, and `used` is
    /// the number of bins with non-zero load.
    Pack { loads: Vec<VarId>, assignments: Vec<VarId>, weights: Vec<i64>, used: VarId },
}

impl Constraint {
    pub fn eq(a: impl Into<IntExpr>, b: impl Into<IntExpr>) -> Self {
        Constraint::Rel(Rel::Eq, a.into(), b.into())
    }

    pub fn ne(a: impl Into<IntExpr>, b: impl Into<IntExpr>) -> Self {
        Constraint::Rel(Rel::Ne, a.into(), b.into())
    }

    pub fn le(a: impl Into<IntExpr>, b: impl Into<IntExpr>) -> Self {
        Constraint::Rel(Rel::Le, a.into(), b.into())
    }

    pub fn allowed(expr: impl Into<IntExpr>, values: Vec<i64>) -> Self {
        Constraint::AllowedValues { expr: expr.into(), values }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Constraint::Rel(..) => "rel",
            Constraint::AllowedValues { .. } => "allowed",
            Constraint::Or(_) => "or",
            Constraint::SubCircuit { .. } => "subcircuit",
            Constraint::Pack { .. } => "pack",
        }
    }

    pub fn is_satisfied(&self, a: &Assignment) -> Result<bool, ModelError> {
        match self {
            Constraint::Rel(rel, lhs, rhs) => {
                let (x, y) = (lhs.eval(a)?, rhs.eval(a)?);
                Ok(match rel {
                    Rel::Eq => x == y,
                    Rel::Ne => x != y,
                    Rel::Le => x <= y,
                })
            }
            Constraint::AllowedValues { expr, values } => Ok(values.contains(&expr.eval(a)?)),
            Constraint::Or(alternatives) => {
                for c in alternatives {
                    if c.is_satisfied(a)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Constraint::SubCircuit { prev } => {
                let values = prev.iter().map(|&v| a.value(v)).collect::<Result<Vec<_>, _>>()?;
                Ok(is_subcircuit(&values))
            }
            Constraint::Pack { loads, assignments, weights, used } => {
                let mut totals = vec![0i64; loads.len()];
                for (&item, &w) in assignments.iter().zip(weights) {
                    let bin = a.value(item)?;
                    if bin < 0 || bin as usize >= totals.len() {
                        return Ok(false);
                    }
                    totals[bin as usize] += w;
                }
                for (&load, &total) in loads.iter().zip(&totals) {
                    if a.value(load)? != total {
                        return Ok(false);
                    }
                }
                let nonempty = totals.iter().filter(|&&t| t != 0).count() as i64;
                Ok(a.value(*used)? == nonempty)
            }
        }
    }
}

fn is_subcircuit(prev: &[i64]) -> bool {
    let n = prev.len();
    let mut seen = vec![false; n];
    for &p in prev {
        if p < 0 || p as usize >= n || seen[p as usize] {
            return false;
        }
        seen[p as usize] = true;
    }

    let active = prev.iter().enumerate().filter(|&(i, &p)| i as i64 != p).count();
    let start = match prev.iter().enumerate().position(|(i, &p)| i as i64 != p) {
        None => return true,
        Some(i) => i,
    };
    // prev is a permutation, so following it from `start` must come back to `start`
    let mut cycle_len = 1;
    let mut node = prev[start] as usize;
    while node != start {
        node = prev[node] as usize;
        cycle_len += 1;
    }
    cycle_len == active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Model, ModelSink};

    #[test]
    fn subcircuit_shapes() {
        assert!(is_subcircuit(&[]));
        assert!(is_subcircuit(&[0, 1, 2]));
        assert!(is_subcircuit(&[1, 2, 0]));
        assert!(is_subcircuit(&[2, 1, 0]));
        // two disjoint cycles
        assert!(!is_subcircuit(&[1, 0, 3, 2]));
        // not a permutation
        assert!(!is_subcircuit(&[1, 1, 0]));
        assert!(!is_subcircuit(&[3, 0, 1]));
    }

    #[test]
    fn pack_semantics() {
        let mut m = Model::new("pack");
        let loads = m.new_int_vars(2, 0, 10, "load");
        let items = m.new_int_vars(3, 0, 1, "bin");
        let used = m.new_int_var(0, 2, Some("used".into()));
        let pack = Constraint::Pack { loads: loads.clone(), assignments: items.clone(), weights: vec![3, 4, 0], used };

        let mut a = Assignment::new(m.num_vars());
        for &i in &items { a.set(i, 0); }
        a.set(loads[0], 7);
        a.set(loads[1], 0);
        a.set(used, 1);
        assert!(pack.is_satisfied(&a).unwrap());

        // zero-weight item does not make its bin count as used
        a.set(items[2], 1);
        assert!(pack.is_satisfied(&a).unwrap());

        a.set(items[1], 1);
        assert!(!pack.is_satisfied(&a).unwrap());
        a.set(loads[0], 3);
        a.set(loads[1], 4);
        a.set(used, 2);
        assert!(pack.is_satisfied(&a).unwrap());
    }

    #[test]
    fn disjunction() {
        let mut m = Model::new("or");
        let x = m.new_int_var(0, 5, None);
        let c = Constraint::Or(vec![Constraint::eq(x, 1i64), Constraint::allowed(x, vec![3, 4])]);
        let mut a = Assignment::new(1);
        a.set(x, 4);
        assert!(c.is_satisfied(&a).unwrap());
        a.set(x, 2);
        assert!(!c.is_satisfied(&a).unwrap());
    }
}
