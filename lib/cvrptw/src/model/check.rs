use super::*;

/// A (possibly partial) value for each variable of a model, indexed by [`VarId`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment {
    values: Vec<Option<i64>>,
}

impl Assignment {
    pub fn new(num_vars: usize) -> Self {
        Assignment { values: vec![None; num_vars] }
    }

    pub fn set(&mut self, var: VarId, value: i64) {
        let i = var.index();
        if i >= self.values.len() {
            self.values.resize(i + 1, None);
        }
        self.values[i] = Some(value);
    }

    #[inline]
    pub fn get(&self, var: VarId) -> Option<i64> {
        self.values.get(var.index()).copied().flatten()
    }

    #[inline]
    pub fn value(&self, var: VarId) -> Result<i64, ModelError> {
        self.get(var).ok_or(ModelError::Unassigned(var))
    }

    #[inline]
    pub fn len(&self) -> usize { self.values.len() }
}

#[derive(Debug, thiserror::Error)]
pub enum Violation {
    #[error("{var} = {value} is outside its domain [{lb}, {ub}]")]
    Domain { var: String, value: i64, lb: i64, ub: i64 },
    #[error("constraint #{index} violated: {text}")]
    Constraint { index: usize, text: String },
    #[error(transparent)]
    Eval(#[from] ModelError),
}

impl Model {
    /// Checks that `a` assigns every variable a value within its bounds and satisfies every
    /// posted constraint.  Stops at the first violation.
    pub fn check(&self, a: &Assignment) -> Result<(), Violation> {
        for (id, decl) in self.var_ids().zip(&self.vars) {
            let value = a.value(id)?;
            if value < decl.lb || value > decl.ub {
                return Err(Violation::Domain {
                    var: self.var_name(id).into_owned(),
                    value,
                    lb: decl.lb,
                    ub: decl.ub,
                });
            }
        }

        for (index, c) in self.constraints.iter().enumerate() {
            if !c.is_satisfied(a)? {
                return Err(Violation::Constraint { index, text: self.fmt_constraint(c) });
            }
        }
        Ok(())
    }

    /// Value of each objective term under `a`, in lexicographic order.
    pub fn objective_values(&self, a: &Assignment) -> Result<Vec<f64>, ModelError> {
        self.objectives.iter()
            .map(|o| Ok(o.expr.eval(a)? as f64 / o.divisor as f64))
            .collect()
    }

    /// Value of each KPI under `a`, in registration order.
    pub fn kpi_values(&self, a: &Assignment) -> Result<Vec<(String, i64)>, ModelError> {
        self.kpis.iter()
            .map(|k| Ok((k.name.clone(), k.expr.eval(a)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> (Model, VarId, VarId) {
        let mut m = Model::new("m");
        let x = m.new_int_var(0, 5, Some("x".into()));
        let y = m.new_int_var(0, 5, Some("y".into()));
        m.add(Constraint::le(x, y));
        m.add_objective(ObjectiveTerm::scaled("d", IntExpr::from(x) + y, 10));
        m.add_kpi(Kpi { name: "y".into(), expr: y.into() });
        (m, x, y)
    }

    #[test]
    fn complete_assignment() {
        let (m, x, y) = model();
        let mut a = Assignment::new(m.num_vars());
        a.set(x, 2);
        a.set(y, 3);
        m.check(&a).unwrap();
        assert_eq!(m.objective_values(&a).unwrap(), vec![0.5]);
        assert_eq!(m.kpi_values(&a).unwrap(), vec![("y".to_string(), 3)]);
    }

    #[test]
    fn violations() {
        let (m, x, y) = model();
        let mut a = Assignment::new(m.num_vars());
        a.set(x, 2);
        assert!(matches!(m.check(&a), Err(Violation::Eval(ModelError::Unassigned(_)))));

        a.set(y, 9);
        match m.check(&a) {
            Err(Violation::Domain { var, value: 9, .. }) => assert_eq!(var, "y"),
            other => panic!("unexpected {:?}", other),
        }

        a.set(y, 1);
        match m.check(&a) {
            Err(Violation::Constraint { index: 0, text }) => assert_eq!(text, "x <= y"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn set_grows() {
        let mut a = Assignment::new(0);
        a.set(VarId(4), 1);
        assert_eq!(a.len(), 5);
        assert_eq!(a.get(VarId(4)), Some(1));
        assert_eq!(a.get(VarId(2)), None);
        assert_eq!(a.get(VarId(40)), None);
    }
}
