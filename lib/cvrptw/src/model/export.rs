use super::*;
use itertools::Itertools;
use std::io::{self, Write};

fn fmt_list(values: &[i64]) -> String {
    values.iter().join(", ")
}

impl Model {
    fn fmt_vars(&self, vars: &[VarId]) -> String {
        vars.iter().map(|&v| self.var_name(v)).join(", ")
    }

    pub fn fmt_expr(&self, e: &IntExpr) -> String {
        match e {
            IntExpr::Const(c) => c.to_string(),
            IntExpr::Var(v) => self.var_name(*v).into_owned(),
            IntExpr::Sum(terms) if terms.is_empty() => "0".to_string(),
            IntExpr::Sum(terms) => format!("({})", terms.iter().map(|t| self.fmt_expr(t)).join(" + ")),
            IntExpr::Prod(a, b) => format!("({} * {})", self.fmt_expr(a), self.fmt_expr(b)),
            IntExpr::Min(terms) => format!("min({})", terms.iter().map(|t| self.fmt_expr(t)).join(", ")),
            IntExpr::Max(terms) => format!("max({})", terms.iter().map(|t| self.fmt_expr(t)).join(", ")),
            IntExpr::Div(a, d) => format!("intDiv({}, {})", self.fmt_expr(a), d),
            IntExpr::Element { array, index } => format!(
                "element([{}], {})",
                array.iter().map(|t| self.fmt_expr(t)).join(", "),
                self.fmt_expr(index)
            ),
        }
    }

    pub fn fmt_constraint(&self, c: &Constraint) -> String {
        match c {
            Constraint::Rel(rel, a, b) => {
                let op = match rel {
                    Rel::Eq => "==",
                    Rel::Ne => "!=",
                    Rel::Le => "<=",
                };
                format!("{} {} {}", self.fmt_expr(a), op, self.fmt_expr(b))
            }
            Constraint::AllowedValues { expr, values } =>
                format!("allowedAssignments({}, [{}])", self.fmt_expr(expr), fmt_list(values)),
            Constraint::Or(alternatives) =>
                format!("or({})", alternatives.iter().map(|c| self.fmt_constraint(c)).join(", ")),
            Constraint::SubCircuit { prev } => format!("subCircuit([{}])", self.fmt_vars(prev)),
            Constraint::Pack { loads, assignments, weights, used } => format!(
                "pack([{}], [{}], [{}], {})",
                self.fmt_vars(loads),
                self.fmt_vars(assignments),
                fmt_list(weights),
                self.var_name(*used)
            ),
        }
    }

    /// Writes the model as text, one statement per line.  Two equal models always produce the
    /// same bytes.
    pub fn export(&self, mut w: impl Write) -> io::Result<()> {
        writeln!(w, "// model: {}", self.name)?;
        for (id, decl) in self.var_ids().zip(&self.vars) {
            writeln!(w, "{} = intVar({}..{});", self.var_name(id), decl.lb, decl.ub)?;
        }
        for c in &self.constraints {
            writeln!(w, "{};", self.fmt_constraint(c))?;
        }
        if !self.inferred.is_empty() {
            writeln!(w, "inferred([{}]);", self.fmt_vars(&self.inferred))?;
        }
        for k in &self.kpis {
            writeln!(w, "kpi {} = {};", k.name, self.fmt_expr(&k.expr))?;
        }

        let fmt_obj = |o: &ObjectiveTerm| {
            if o.divisor == 1 {
                self.fmt_expr(&o.expr)
            } else {
                format!("{} / {}", self.fmt_expr(&o.expr), o.divisor)
            }
        };
        match self.objectives.as_slice() {
            [] => {}
            [o] => writeln!(w, "minimize({});", fmt_obj(o))?,
            terms => writeln!(w, "minimize(staticLex({}));", terms.iter().map(fmt_obj).join(", "))?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::expr::{element_const, max};

    fn build() -> Model {
        let mut m = Model::new("tiny");
        let p = m.new_int_vars(2, 0, 1, "prev");
        let u = m.new_int_var(0, 1, Some("used".into()));
        m.add(Constraint::eq(max(p[0], 1i64), p[1]));
        m.add(Constraint::allowed(p[0], vec![0, 1]));
        m.add(Constraint::SubCircuit { prev: p.clone() });
        m.add_inferred(&[u]);
        m.add_kpi(Kpi { name: "used".into(), expr: u.into() });
        m.add_objective(ObjectiveTerm::scaled("dist", element_const(&[3, 4], p[0]), 10));
        m.add_objective(ObjectiveTerm::new("vehicles", u.into()));
        m
    }

    #[test]
    fn text_format() {
        let mut out = Vec::new();
        build().export(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected = "\
// model: tiny
prev_0 = intVar(0..1);
prev_1 = intVar(0..1);
used = intVar(0..1);
max(prev_0, 1) == prev_1;
allowedAssignments(prev_0, [0, 1]);
subCircuit([prev_0, prev_1]);
inferred([used]);
kpi used = used;
minimize(staticLex(element([3, 4], prev_0) / 10, used));
";
        assert_eq!(text, expected);
    }

    #[test]
    fn export_is_deterministic() {
        let (mut a, mut b) = (Vec::new(), Vec::new());
        build().export(&mut a).unwrap();
        build().export(&mut b).unwrap();
        assert_eq!(a, b);
    }
}
