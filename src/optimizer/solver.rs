//! Solver adapter
//!
//! The rest of the crate sees the LP engine only through [`SolverAdapter`]:
//! a finished [`FlowModel`] goes in, a status plus variable values come out.
//! [`GoodLpSolver`] implements it on `good_lp` with the pure-Rust `minilp`
//! backend.

use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use validator::Validate;

use super::{FlowModel, OptimizerError, SolveConfig};

/// Outcome class reported by the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    Undefined,
    /// Time limit exceeded; values are best-effort
    NotSolved,
}

impl SolveStatus {
    /// Whether variable values returned with this status can be reported
    pub fn has_usable_values(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::NotSolved)
    }
}

/// Raw solver answer for one model
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedModel {
    pub status: SolveStatus,
    /// One value per model variable, indexed by `VarId`; `None` when the
    /// backend produced no assignment
    pub values: Option<Vec<f64>>,
    pub objective_value: Option<f64>,
    pub elapsed: Duration,
}

pub trait SolverAdapter: Send + Sync {
    fn solve(&self, model: &FlowModel, config: &SolveConfig) -> Result<SolvedModel, OptimizerError>;
}

/// `good_lp` adapter
///
/// The `minilp` backend always solves to proven optimality, so any relative
/// gap is met. It has no time limit hook either: the limit is checked after
/// the fact and an overrun is reported as [`SolveStatus::NotSolved`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpSolver;

impl SolverAdapter for GoodLpSolver {
    fn solve(
        &self,
        model: &FlowModel,
        config: &SolveConfig,
    ) -> Result<SolvedModel, OptimizerError> {
        config.validate()?;

        if config.verbose {
            info!(
                formulation = %model.formulation(),
                variables = model.variables().len(),
                constraints = model.constraints().len(),
                relative_gap = config.relative_gap,
                time_limit_seconds = config.time_limit_seconds,
                "solving flow model"
            );
        } else {
            debug!(
                variables = model.variables().len(),
                constraints = model.constraints().len(),
                "solving flow model"
            );
        }

        let started = Instant::now();
        let (status, values) = match decide_without_backend(model) {
            Some(decided) => decided,
            None => run_backend(model)?,
        };
        let elapsed = started.elapsed();

        let status = apply_time_limit(status, values.as_deref(), elapsed, config.time_limit_seconds);

        let objective_value = values.as_deref().map(|v| model.objective().evaluate(v));

        if config.verbose {
            info!(
                %status,
                ?objective_value,
                elapsed_ms = elapsed.as_millis() as u64,
                "solver finished"
            );
        } else {
            debug!(%status, ?objective_value, "solver finished");
        }

        Ok(SolvedModel {
            status,
            values,
            objective_value,
            elapsed,
        })
    }
}

/// An answer that arrives after the limit keeps its values but loses the
/// optimality claim. Statuses without values are left alone.
fn apply_time_limit(
    status: SolveStatus,
    values: Option<&[f64]>,
    elapsed: Duration,
    limit_seconds: u64,
) -> SolveStatus {
    if values.is_none() || elapsed <= Duration::from_secs(limit_seconds) {
        return status;
    }
    warn!(
        elapsed_ms = elapsed.as_millis() as u64,
        time_limit_seconds = limit_seconds,
        "solver exceeded its time limit, returning best-effort values"
    );
    SolveStatus::NotSolved
}

/// Rows without variables are constants; a violated one makes the model
/// infeasible outright, and a model without variables is decided by them alone.
fn decide_without_backend(model: &FlowModel) -> Option<(SolveStatus, Option<Vec<f64>>)> {
    let constant_rows_hold = model
        .constraints()
        .iter()
        .filter(|c| c.expr.is_empty())
        .all(|c| c.is_satisfied(&[], 1e-9));

    if !constant_rows_hold {
        return Some((SolveStatus::Infeasible, None));
    }
    if model.variables().is_empty() {
        return Some((SolveStatus::Optimal, Some(Vec::new())));
    }
    None
}

#[cfg(feature = "optimization")]
fn run_backend(model: &FlowModel) -> Result<(SolveStatus, Option<Vec<f64>>), OptimizerError> {
    use good_lp::solvers::minilp::minilp;
    use good_lp::{
        variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable,
    };

    use super::ConstraintSense;

    let mut vars = ProblemVariables::new();
    let handles: Vec<Variable> = model
        .variables()
        .iter()
        .map(|v| vars.add(variable().min(v.lower).max(v.upper)))
        .collect();

    let to_expression = |terms: &[(super::VarId, f64)]| {
        let mut expr = Expression::default();
        for (var, coefficient) in terms {
            expr.add_mul(*coefficient, handles[var.0]);
        }
        expr
    };

    let mut problem = vars
        .minimise(to_expression(model.objective().terms()))
        .using(minilp);

    for c in model.constraints().iter().filter(|c| !c.expr.is_empty()) {
        let expr = to_expression(c.expr.terms());
        problem = problem.with(match c.sense {
            ConstraintSense::LessOrEqual => expr.leq(c.rhs),
            ConstraintSense::Equal => expr.eq(c.rhs),
        });
    }

    match problem.solve() {
        Ok(solution) => {
            let values = handles.iter().map(|h| solution.value(*h)).collect();
            Ok((SolveStatus::Optimal, Some(values)))
        }
        Err(ResolutionError::Infeasible) => Ok((SolveStatus::Infeasible, None)),
        Err(ResolutionError::Unbounded) => Ok((SolveStatus::Unbounded, None)),
        Err(other) => {
            tracing::error!(error = %other, "LP backend failed");
            Ok((SolveStatus::Undefined, None))
        }
    }
}

#[cfg(not(feature = "optimization"))]
fn run_backend(_model: &FlowModel) -> Result<(SolveStatus, Option<Vec<f64>>), OptimizerError> {
    Err(OptimizerError::Unsupported)
}
