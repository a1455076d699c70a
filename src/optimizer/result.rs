use serde::Serialize;
use tracing::{debug, error};

use super::{FlowModel, SolveStatus, SolvedModel};

/// Flows at or below this are solver noise, not active routes
pub const FLOW_EPSILON: f64 = 1e-6;

/// Quantity shipped on one route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteFlow {
    pub well: String,
    pub refinery: String,
    pub amount: f64,
}

/// Structured answer of a solve with usable values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowSolution {
    pub status: SolveStatus,
    pub total_cost: f64,
    /// Strictly positive flows ordered by (well, refinery)
    pub flows: Vec<RouteFlow>,
}

impl FlowSolution {
    pub fn flow(&self, well: &str, refinery: &str) -> f64 {
        self.flows
            .iter()
            .find(|f| f.well == well && f.refinery == refinery)
            .map(|f| f.amount)
            .unwrap_or(0.0)
    }

    pub fn well_outflow(&self, well: &str) -> f64 {
        self.flows.iter().filter(|f| f.well == well).map(|f| f.amount).sum()
    }

    pub fn refinery_inflow(&self, refinery: &str) -> f64 {
        self.flows
            .iter()
            .filter(|f| f.refinery == refinery)
            .map(|f| f.amount)
            .sum()
    }

    pub fn total_flow(&self) -> f64 {
        self.flows.iter().map(|f| f.amount).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OptimizationOutcome {
    Solved(FlowSolution),
    /// The solver produced nothing that may be presented as a plan
    Unusable { status: SolveStatus },
}

impl OptimizationOutcome {
    pub fn status(&self) -> SolveStatus {
        match self {
            OptimizationOutcome::Solved(s) => s.status,
            OptimizationOutcome::Unusable { status } => *status,
        }
    }

    pub fn solution(&self) -> Option<&FlowSolution> {
        match self {
            OptimizationOutcome::Solved(s) => Some(s),
            OptimizationOutcome::Unusable { .. } => None,
        }
    }

    pub fn is_infeasible(&self) -> bool {
        self.status() == SolveStatus::Infeasible
    }
}

/// Interpret a solved model, regardless of which builder produced it
pub fn extract(model: &FlowModel, solved: &SolvedModel) -> OptimizationOutcome {
    let values = match (&solved.values, solved.status.has_usable_values()) {
        (Some(values), true) => values,
        _ => {
            if solved.status == SolveStatus::Infeasible {
                error!("model not feasible, results must not be used");
            }
            return OptimizationOutcome::Unusable {
                status: solved.status,
            };
        }
    };

    let mut flows: Vec<RouteFlow> = model
        .variables()
        .iter()
        .zip(values)
        .filter(|(_, value)| **value > FLOW_EPSILON)
        .map(|(var, value)| RouteFlow {
            well: var.well.clone(),
            refinery: var.refinery.clone(),
            amount: *value,
        })
        .collect();
    flows.sort_by(|a, b| (&a.well, &a.refinery).cmp(&(&b.well, &b.refinery)));

    let total_cost = solved
        .objective_value
        .unwrap_or_else(|| model.objective().evaluate(values));

    debug!(active_routes = flows.len(), total_cost, "flows extracted");

    OptimizationOutcome::Solved(FlowSolution {
        status: solved.status,
        total_cost,
        flows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::{Formulation, LinearExpr};
    use std::time::Duration;

    fn model() -> FlowModel {
        let mut model = FlowModel::new(Formulation::Sparse);
        let b = model.add_variable("B", "X", 100.0);
        let a = model.add_variable("A", "X", 100.0);
        let c = model.add_variable("C", "X", 100.0);
        let objective: LinearExpr = [(a, 1.0), (b, 2.0), (c, 3.0)].into_iter().collect();
        model.set_objective(objective);
        model
    }

    fn solved(status: SolveStatus, values: Option<Vec<f64>>) -> SolvedModel {
        SolvedModel {
            status,
            values,
            objective_value: None,
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn test_positive_flows_are_sorted_and_costed() {
        let model = model();
        let outcome = extract(&model, &solved(SolveStatus::Optimal, Some(vec![5.0, 5.0, 0.0])));

        let solution = outcome.solution().unwrap();
        assert_eq!(solution.flows.len(), 2);
        assert_eq!(solution.flows[0].well, "A");
        assert_eq!(solution.flows[1].well, "B");
        assert_eq!(solution.total_cost, 15.0);
        assert_eq!(solution.total_flow(), 10.0);
        assert_eq!(solution.flow("C", "X"), 0.0);
    }

    #[test]
    fn test_noise_is_not_a_flow() {
        let model = model();
        let outcome = extract(
            &model,
            &solved(SolveStatus::Optimal, Some(vec![1e-9, 4.0, -1e-12])),
        );
        let solution = outcome.solution().unwrap();
        assert_eq!(solution.flows.len(), 1);
        assert_eq!(solution.flows[0].well, "A");
    }

    #[test]
    fn test_infeasible_values_are_not_reported() {
        let model = model();
        // Values handed back alongside an infeasible status are meaningless
        let outcome = extract(
            &model,
            &solved(SolveStatus::Infeasible, Some(vec![5.0, 5.0, 5.0])),
        );
        assert!(outcome.is_infeasible());
        assert!(outcome.solution().is_none());
    }

    #[test]
    fn test_best_effort_values_are_usable() {
        let model = model();
        let outcome = extract(&model, &solved(SolveStatus::NotSolved, Some(vec![0.0, 1.0, 0.0])));
        assert_eq!(outcome.status(), SolveStatus::NotSolved);
        assert_eq!(outcome.solution().unwrap().total_cost, 1.0);
    }

    #[test]
    fn test_solver_objective_takes_precedence() {
        let model = model();
        let mut answer = solved(SolveStatus::Optimal, Some(vec![1.0, 1.0, 1.0]));
        answer.objective_value = Some(6.000001);
        let outcome = extract(&model, &answer);
        assert_eq!(outcome.solution().unwrap().total_cost, 6.000001);
    }
}
