//! The seam between a compiled model and whatever engine searches it.
use crate::model::{Assignment, Model, ModelError, Violation};
use crate::vrp::{RouteSolution, RoutingModel};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SearchType {
    Auto,
    DepthFirst,
    Restart,
    MultiPoint,
}

impl FromStr for SearchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        return match s {
            "auto" => Ok(Self::Auto),
            "dfs" => Ok(Self::DepthFirst),
            "restart" => Ok(Self::Restart),
            "multipoint" => Ok(Self::MultiPoint),
            _ => Err(format!("invalid search type: {}", s))
        };
    }
}

#[derive(Debug, Clone)]
pub struct SearchParameters {
    pub time_limit: Option<Duration>,
    pub search_type: SearchType,
    pub log_period: u64,
    pub workers: Option<usize>,
    /// Assignment to start the search from, typically from [`RoutingModel::hydrate`]
    pub starting_point: Option<Assignment>,
}

impl Default for SearchParameters {
    fn default() -> Self {
        SearchParameters {
            time_limit: Some(Duration::from_secs(5)),
            search_type: SearchType::Restart,
            log_period: 1_000_000,
            workers: None,
            starting_point: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SolverStatus {
    /// Solution found and proven optimal
    Optimal,
    /// Solution found, optimality not proven
    Feasible,
    /// Proven to have no solution
    Infeasible,
    /// Stopped (out of time) with neither a solution nor an infeasibility proof
    Unknown,
}

#[derive(Debug, Clone)]
pub struct SolverResponse {
    pub status: SolverStatus,
    pub assignment: Option<Assignment>,
}

/// An engine able to search a [`Model`].  Expected to honour `params.time_limit` itself.
pub trait Solver {
    fn solve(&mut self, model: &Model, params: &SearchParameters) -> anyhow::Result<SolverResponse>;
}

#[derive(Debug, Clone)]
pub struct Solved {
    pub solution: RouteSolution,
    pub objective: Vec<f64>,
    /// Tracked (non-optimised) values such as `used`, in registration order
    pub kpis: Vec<(String, i64)>,
    pub proven_optimal: bool,
    pub elapsed: Duration,
    /// The solver returned after `time_limit` had passed
    pub over_budget: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    #[error("model proven infeasible after {elapsed:?}")]
    Infeasible { elapsed: Duration },
    #[error("no proof either way within the budget of {budget:?} (ran {elapsed:?})")]
    BudgetExhausted {
        budget: Option<Duration>,
        elapsed: Duration,
        best: Option<Box<RouteSolution>>,
    },
    #[error("solver returned an invalid solution: {0}")]
    InvalidSolution(#[from] Violation),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("solver failed: {0:#}")]
    Backend(anyhow::Error),
}

fn verified(routing: &RoutingModel, model: &Model, a: &Assignment) -> Result<RouteSolution, SolveError> {
    model.check(a)?;
    Ok(routing.decode(a)?)
}

/// Runs `solver` once on `model` and verifies whatever it reports.  Infeasibility and running out
/// of budget are distinct outcomes, and neither is retried.
#[instrument(level = "info", skip_all, fields(model = %model.name))]
pub fn solve(solver: &mut dyn Solver, routing: &RoutingModel, model: &Model, params: &SearchParameters) -> Result<Solved, SolveError> {
    let t0 = Instant::now();
    let response = solver.solve(model, params).map_err(SolveError::Backend)?;
    let elapsed = t0.elapsed();
    let status = response.status;
    debug!(?status, ?elapsed);
    let over_budget = params.time_limit.map_or(false, |budget| elapsed > budget);
    if over_budget {
        warn!(budget = ?params.time_limit, ?elapsed, "solver overran its time limit");
    }

    match status {
        SolverStatus::Optimal | SolverStatus::Feasible => {
            let a = response.assignment.ok_or_else(|| {
                SolveError::Backend(anyhow::anyhow!("{:?} reported without an assignment", status))
            })?;
            let solution = verified(routing, model, &a)?;
            let objective = model.objective_values(&a)?;
            let kpis = model.kpi_values(&a)?;
            info!(?objective, ?kpis, "solved");
            Ok(Solved {
                solution,
                objective,
                kpis,
                proven_optimal: status == SolverStatus::Optimal,
                elapsed,
                over_budget,
            })
        }
        SolverStatus::Infeasible => {
            info!("infeasible");
            Err(SolveError::Infeasible { elapsed })
        }
        SolverStatus::Unknown => {
            let best = match response.assignment {
                Some(a) => match verified(routing, model, &a) {
                    Ok(sol) => Some(Box::new(sol)),
                    Err(e) => {
                        warn!(error = %e, "discarding unverified incumbent");
                        None
                    }
                },
                None => None,
            };
            info!(found = best.is_some(), "budget exhausted");
            Err(SolveError::BudgetExhausted { budget: params.time_limit, elapsed, best })
        }
    }
}
