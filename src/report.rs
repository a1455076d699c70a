//! Console reporting
//!
//! Presentation only: everything here reads an [`OptimizationReport`] and
//! never feeds back into the optimizer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::optimizer::{Formulation, OptimizationOutcome, SolveStatus};

const SEPARATOR: &str = "--------------------";

/// Everything one optimize call produced
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationReport {
    pub run_id: Uuid,
    pub solved_at: DateTime<Utc>,
    pub formulation: Formulation,
    pub outcome: OptimizationOutcome,
    pub blocked_wells: Vec<String>,
    pub blocked_refineries: Vec<String>,
    /// Input problems that were tolerated
    pub warnings: Vec<String>,
}

impl OptimizationReport {
    pub fn status(&self) -> SolveStatus {
        self.outcome.status()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for OptimizationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Optimization Status: {}", self.status())?;

        for warning in &self.warnings {
            writeln!(f, "WARNING: {warning}")?;
        }

        match &self.outcome {
            OptimizationOutcome::Solved(solution) => {
                writeln!(f, "TOTAL COST: {}", solution.total_cost)?;
                writeln!(f, "Flows")?;
                for flow in &solution.flows {
                    writeln!(f, "{} --> {} = {}", flow.well, flow.refinery, flow.amount)?;
                }
            }
            OptimizationOutcome::Unusable { status } => {
                if *status == SolveStatus::Infeasible {
                    writeln!(f, "********* ERROR: Model not feasible, don't use results.")?;
                } else {
                    writeln!(f, "********* ERROR: Solver returned {status}, no flows available.")?;
                }
            }
        }

        writeln!(f, "{SEPARATOR}")?;
        if !self.blocked_wells.is_empty() {
            writeln!(f, "BLOCKED WELLS: {}", self.blocked_wells.join(", "))?;
        }
        if !self.blocked_refineries.is_empty() {
            writeln!(f, "BLOCKED REFINERIES: {}", self.blocked_refineries.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::{FlowSolution, RouteFlow};

    fn report(outcome: OptimizationOutcome) -> OptimizationReport {
        OptimizationReport {
            run_id: Uuid::new_v4(),
            solved_at: Utc::now(),
            formulation: Formulation::Sparse,
            outcome,
            blocked_wells: vec!["A".to_string()],
            blocked_refineries: Vec::new(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_solved_report_lists_flows() {
        let text = report(OptimizationOutcome::Solved(FlowSolution {
            status: SolveStatus::Optimal,
            total_cost: 20.0,
            flows: vec![RouteFlow {
                well: "B".into(),
                refinery: "X".into(),
                amount: 10.0,
            }],
        }))
        .to_string();

        assert!(text.starts_with("Optimization Status: Optimal\n"));
        assert!(text.contains("TOTAL COST: 20\n"));
        assert!(text.contains("B --> X = 10\n"));
        assert!(text.contains("BLOCKED WELLS: A\n"));
        assert!(!text.contains("BLOCKED REFINERIES"));
    }

    #[test]
    fn test_infeasible_report_has_no_flows() {
        let text = report(OptimizationOutcome::Unusable {
            status: SolveStatus::Infeasible,
        })
        .to_string();

        assert!(text.contains("Optimization Status: Infeasible"));
        assert!(text.contains("Model not feasible, don't use results."));
        assert!(!text.contains("TOTAL COST"));
        assert!(!text.contains("-->"));
    }

    #[test]
    fn test_warnings_are_echoed() {
        let mut r = report(OptimizationOutcome::Unusable {
            status: SolveStatus::Undefined,
        });
        r.warnings.push("`blocked_wells` is not a list of ids".into());
        let text = r.to_string();
        assert!(text.contains("WARNING: `blocked_wells`"));
        assert!(text.contains("Solver returned Undefined"));
    }

    #[test]
    fn test_json_shape() {
        let json = report(OptimizationOutcome::Unusable {
            status: SolveStatus::Infeasible,
        })
        .to_json()
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["formulation"], "sparse");
        assert_eq!(value["outcome"]["outcome"], "unusable");
        assert_eq!(value["outcome"]["status"], "Infeasible");
    }
}
