use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use super::OptimizerError;
use crate::domain::{DemandVector, NetworkDefinition};

/// Upper bound given to every flow variable before topology and blocking apply
pub const DEFAULT_ROUTE_CAPACITY: f64 = 100.0;

/// How the flow variables are materialized
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Formulation {
    /// One variable per (well, refinery) pair, disallowed pairs bounded to zero
    Dense,
    /// One variable per allowed route
    Sparse,
}

/// Solver settings handed to the [`SolverAdapter`](super::SolverAdapter)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SolveConfig {
    #[validate(range(min = 0.0, max = 1.0))]
    pub relative_gap: f64,
    #[validate(range(min = 1))]
    pub time_limit_seconds: u64,
    pub verbose: bool,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            relative_gap: 0.0,
            time_limit_seconds: 120,
            verbose: true,
        }
    }
}

/// Index of a variable inside its owning [`FlowModel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VarId(pub usize);

/// Continuous flow on one well -> refinery pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowVariable {
    pub well: String,
    pub refinery: String,
    pub lower: f64,
    pub upper: f64,
}

impl FlowVariable {
    pub fn name(&self) -> String {
        format!("flow_{}_{}", self.well, self.refinery)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        self.terms.push((var, coefficient));
    }

    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    /// Total coefficient of `var`, summing repeated terms
    pub fn coefficient(&self, var: VarId) -> f64 {
        self.terms
            .iter()
            .filter(|(v, _)| *v == var)
            .map(|(_, c)| c)
            .sum()
    }

    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms.iter().map(|(v, c)| c * values[v.0]).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl FromIterator<(VarId, f64)> for LinearExpr {
    fn from_iter<T: IntoIterator<Item = (VarId, f64)>>(iter: T) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConstraintSense {
    LessOrEqual,
    Equal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearConstraint {
    pub name: String,
    pub expr: LinearExpr,
    pub sense: ConstraintSense,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.sense {
            ConstraintSense::LessOrEqual => lhs <= self.rhs + tolerance,
            ConstraintSense::Equal => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

/// Minimisation LP over well -> refinery flows
///
/// Owns its variables; created fresh for every solve and dropped after the
/// results are extracted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowModel {
    formulation: Formulation,
    variables: Vec<FlowVariable>,
    #[serde(skip)]
    index: HashMap<(String, String), VarId>,
    objective: LinearExpr,
    constraints: Vec<LinearConstraint>,
}

impl FlowModel {
    pub fn new(formulation: Formulation) -> Self {
        Self {
            formulation,
            variables: Vec::new(),
            index: HashMap::new(),
            objective: LinearExpr::default(),
            constraints: Vec::new(),
        }
    }

    pub fn add_variable(&mut self, well: &str, refinery: &str, upper: f64) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(FlowVariable {
            well: well.to_string(),
            refinery: refinery.to_string(),
            lower: 0.0,
            upper,
        });
        self.index.insert((well.to_string(), refinery.to_string()), id);
        id
    }

    pub fn formulation(&self) -> Formulation {
        self.formulation
    }

    pub fn variables(&self) -> &[FlowVariable] {
        &self.variables
    }

    pub fn variable(&self, id: VarId) -> &FlowVariable {
        &self.variables[id.0]
    }

    pub fn var_id(&self, well: &str, refinery: &str) -> Option<VarId> {
        self.index
            .get(&(well.to_string(), refinery.to_string()))
            .copied()
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn constraint(&self, name: &str) -> Option<&LinearConstraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    pub fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    /// Lower `upper` bounds of the selected variables to zero, returning how many changed
    pub(crate) fn zero_upper_bounds<F>(&mut self, mut select: F) -> usize
    where
        F: FnMut(&FlowVariable) -> bool,
    {
        let mut changed = 0;
        for var in self.variables.iter_mut().filter(|v| select(v)) {
            if var.upper != 0.0 {
                var.upper = 0.0;
                changed += 1;
            }
        }
        changed
    }
}

/// Turns a network and a demand vector into a [`FlowModel`]
pub trait ModelBuilder: Send + Sync {
    fn formulation(&self) -> Formulation;

    fn build(
        &self,
        network: &NetworkDefinition,
        demand: &DemandVector,
    ) -> Result<FlowModel, OptimizerError>;
}
