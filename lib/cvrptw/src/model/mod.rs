//! Solver-independent constraint model.  Variables, expressions, global constraints and
//! objectives are recorded in posting order; nothing here propagates or searches.
use std::borrow::Cow;
use std::collections::HashMap;

pub mod expr;
pub mod constraint;
mod check;
mod export;

pub use expr::IntExpr;
pub use constraint::{Constraint, Rel};
pub use check::{Assignment, Violation};

/// Index of a variable within the [`Model`] that created it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(u32);

impl VarId {
    #[inline]
    pub fn index(&self) -> usize { self.0 as usize }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntVarDecl {
    pub lb: i64,
    pub ub: i64,
    pub name: Option<String>,
}

/// Tracked quantity, reported alongside the objective but never optimised.
#[derive(Debug, Clone, PartialEq)]
pub struct Kpi {
    pub name: String,
    pub expr: IntExpr,
}

/// A minimised term, valued as `expr / divisor`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveTerm {
    pub name: String,
    pub expr: IntExpr,
    pub divisor: i64,
}

impl ObjectiveTerm {
    pub fn new(name: &str, expr: IntExpr) -> Self {
        ObjectiveTerm { name: name.to_string(), expr, divisor: 1 }
    }

    pub fn scaled(name: &str, expr: IntExpr, divisor: i64) -> Self {
        ObjectiveTerm { name: name.to_string(), expr, divisor }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("variable {0:?} does not belong to this model")]
    UnknownVar(VarId),
    #[error("variable {0:?} has no value")]
    Unassigned(VarId),
    #[error("element index {index} out of range (0..{len})")]
    ElementIndex { index: i64, len: usize },
    #[error("min/max over an empty set of expressions")]
    EmptyAggregate,
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow while evaluating an expression")]
    Overflow,
    #[error("inconsistent visit bookkeeping: {0}")]
    Bookkeeping(String),
    #[error("invalid route plan: {0}")]
    RoutePlan(String),
    #[error("route of vehicle {vehicle} does not lead back to its start")]
    BrokenRoute { vehicle: usize },
}

/// The capability a model compiler posts into.  Objectives are lexicographic in the order they
/// are added: the first is primary, each later one only breaks ties of those before it.
pub trait ModelSink {
    fn new_int_var(&mut self, lb: i64, ub: i64, name: Option<String>) -> VarId;

    fn add(&mut self, constraint: Constraint);

    /// Marks variables whose values are fixed once the remaining (decision) variables are.
    fn add_inferred(&mut self, vars: &[VarId]);

    fn add_kpi(&mut self, kpi: Kpi);

    fn add_objective(&mut self, term: ObjectiveTerm);

    fn new_int_vars(&mut self, count: usize, lb: i64, ub: i64, prefix: &str) -> Vec<VarId> {
        (0..count)
            .map(|i| self.new_int_var(lb, ub, Some(format!("{}_{}", prefix, i))))
            .collect()
    }
}

/// Recording model: keeps everything posted to it, in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    pub name: String,
    vars: Vec<IntVarDecl>,
    constraints: Vec<Constraint>,
    inferred: Vec<VarId>,
    kpis: Vec<Kpi>,
    objectives: Vec<ObjectiveTerm>,
}

impl Model {
    pub fn new(name: &str) -> Self {
        Model { name: name.to_string(), ..Default::default() }
    }

    #[inline]
    pub fn num_vars(&self) -> usize { self.vars.len() }

    pub fn var(&self, id: VarId) -> Result<&IntVarDecl, ModelError> {
        self.vars.get(id.index()).ok_or(ModelError::UnknownVar(id))
    }

    pub fn var_ids(&self) -> impl Iterator<Item=VarId> {
        (0..self.vars.len() as u32).map(VarId)
    }

    pub fn var_name(&self, id: VarId) -> Cow<str> {
        match self.vars.get(id.index()).and_then(|v| v.name.as_deref()) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(format!("_x{}", id.0)),
        }
    }

    pub fn constraints(&self) -> &[Constraint] { &self.constraints }

    pub fn inferred(&self) -> &[VarId] { &self.inferred }

    pub fn kpis(&self) -> &[Kpi] { &self.kpis }

    pub fn objectives(&self) -> &[ObjectiveTerm] { &self.objectives }

    pub fn size_info(&self) -> HashMap<String, isize> {
        let mut info = HashMap::new();
        info.insert("variables".to_string(), self.vars.len() as isize);
        info.insert("constraints".to_string(), self.constraints.len() as isize);
        for c in &self.constraints {
            *info.entry(format!("constraints.{}", c.kind())).or_insert(0) += 1;
        }
        info.insert("inferred".to_string(), self.inferred.len() as isize);
        info.insert("kpis".to_string(), self.kpis.len() as isize);
        info.insert("objectives".to_string(), self.objectives.len() as isize);
        info
    }
}

impl ModelSink for Model {
    fn new_int_var(&mut self, lb: i64, ub: i64, name: Option<String>) -> VarId {
        let id = VarId(self.vars.len() as u32);
        self.vars.push(IntVarDecl { lb, ub, name });
        id
    }

    fn add(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    fn add_inferred(&mut self, vars: &[VarId]) {
        self.inferred.extend_from_slice(vars);
    }

    fn add_kpi(&mut self, kpi: Kpi) {
        self.kpis.push(kpi);
    }

    fn add_objective(&mut self, term: ObjectiveTerm) {
        self.objectives.push(term);
    }
}
