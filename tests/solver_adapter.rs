mod common;

use std::time::Duration;

use common::*;
use refinery_flow::domain::BlockList;
use refinery_flow::optimizer::{
    FlowModel, FlowOptimizer, OptimizerError, SolveConfig, SolveStatus, SolvedModel,
    SolverAdapter,
};

/// Answers every model with a fixed status, filling each variable with 1.0
/// when the status carries values.
struct FixedStatusSolver(SolveStatus);

impl SolverAdapter for FixedStatusSolver {
    fn solve(
        &self,
        model: &FlowModel,
        _config: &SolveConfig,
    ) -> Result<SolvedModel, OptimizerError> {
        let values = self
            .0
            .has_usable_values()
            .then(|| vec![1.0; model.variables().len()]);
        let objective_value = values.as_deref().map(|v| model.objective().evaluate(v));
        Ok(SolvedModel {
            status: self.0,
            values,
            objective_value,
            elapsed: Duration::from_millis(5),
        })
    }
}

fn optimizer_with(status: SolveStatus) -> FlowOptimizer {
    FlowOptimizer::sparse(SolveConfig::default())
        .with_solver(Box::new(FixedStatusSolver(status)))
}

fn two_wells() -> refinery_flow::domain::NetworkDefinition {
    network(
        &[("A", 1.0, 5.0), ("B", 2.0, 10.0)],
        &[("X", 0.0, 20.0)],
        &[("A", "X"), ("B", "X")],
    )
}

#[test]
fn test_best_effort_answer_is_reported_as_not_solved() {
    let report = optimizer_with(SolveStatus::NotSolved)
        .optimize(&two_wells(), &demand(10.0), &BlockList::none())
        .unwrap();

    assert_eq!(report.status(), SolveStatus::NotSolved);
    let solution = report.outcome.solution().unwrap();
    assert_eq!(solution.flows.len(), 2);
    assert!((solution.total_cost - 3.0).abs() < TOLERANCE);

    let text = report.to_string();
    assert!(text.starts_with("Optimization Status: NotSolved\n"));
    assert!(text.contains("TOTAL COST: 3\n"));
    assert!(text.contains("A --> X = 1\n"));
}

#[test]
fn test_unbounded_answer_has_no_flows() {
    let report = optimizer_with(SolveStatus::Unbounded)
        .optimize(&two_wells(), &demand(10.0), &BlockList::none().with_wells(["B"]))
        .unwrap();

    assert_eq!(report.status(), SolveStatus::Unbounded);
    assert!(report.outcome.solution().is_none());
    assert!(!report.outcome.is_infeasible());
    assert_eq!(report.blocked_wells, vec!["B".to_string()]);

    let text = report.to_string();
    assert!(text.contains("Solver returned Unbounded"));
    assert!(!text.contains("-->"));
}
