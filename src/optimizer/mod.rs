//! Flow optimization
//!
//! build -> block -> solve -> extract, one fresh [`FlowModel`] per call.

pub mod blocking;
pub mod constraints;
pub mod error;
pub mod result;
pub mod solver;
pub mod strategies;
pub mod types;

pub use blocking::*;
pub use error::*;
pub use result::*;
pub use solver::*;
pub use strategies::*;
pub use types::*;

use chrono::Utc;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::config::ModelSettings;
use crate::domain::{BlockList, DemandVector, NetworkDefinition, Scenario};
use crate::report::OptimizationReport;

pub struct FlowOptimizer {
    pub builder: Box<dyn ModelBuilder>,
    pub solver: Box<dyn SolverAdapter>,
    pub config: SolveConfig,
}

impl FlowOptimizer {
    /// Node-indexed entry point
    pub fn dense(config: SolveConfig) -> Self {
        Self::new(Box::new(DenseBuilder::default()), config)
    }

    /// Arc-indexed entry point
    pub fn sparse(config: SolveConfig) -> Self {
        Self::new(Box::new(SparseBuilder::default()), config)
    }

    pub fn from_settings(settings: &ModelSettings, config: SolveConfig) -> Self {
        let builder: Box<dyn ModelBuilder> = match settings.formulation {
            Formulation::Dense => Box::new(DenseBuilder::new(settings.route_capacity)),
            Formulation::Sparse => Box::new(SparseBuilder::new(settings.route_capacity)),
        };
        Self::new(builder, config)
    }

    fn new(builder: Box<dyn ModelBuilder>, config: SolveConfig) -> Self {
        Self {
            builder,
            solver: Box::new(GoodLpSolver),
            config,
        }
    }

    pub fn with_solver(mut self, solver: Box<dyn SolverAdapter>) -> Self {
        self.solver = solver;
        self
    }

    pub fn formulation(&self) -> Formulation {
        self.builder.formulation()
    }

    pub fn optimize(
        &self,
        network: &NetworkDefinition,
        demand: &DemandVector,
        blocks: &BlockList,
    ) -> Result<OptimizationReport, OptimizerError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("optimize", %run_id, formulation = %self.formulation());
        let _guard = span.enter();

        let model = self.builder.build(network, demand)?;
        let model = RouteBlockingPolicy::new(network, blocks).apply(model);
        let solved = self.solver.solve(&model, &self.config)?;
        let outcome = extract(&model, &solved);

        match outcome.solution() {
            Some(solution) => info!(
                status = %solution.status,
                total_cost = solution.total_cost,
                active_routes = solution.flows.len(),
                "optimization finished"
            ),
            None => warn!(status = %outcome.status(), "optimization produced no usable flows"),
        }

        Ok(OptimizationReport {
            run_id,
            solved_at: Utc::now(),
            formulation: self.formulation(),
            outcome,
            blocked_wells: blocks.wells.iter().cloned().collect(),
            blocked_refineries: blocks.refineries.iter().cloned().collect(),
            warnings: Vec::new(),
        })
    }

    /// Optimize a loaded scenario, carrying its input warnings into the report
    pub fn optimize_scenario(
        &self,
        scenario: &Scenario,
    ) -> Result<OptimizationReport, OptimizerError> {
        let mut report = self.optimize(&scenario.network, &scenario.demand, &scenario.blocks)?;
        report.warnings = scenario.warnings.clone();
        Ok(report)
    }
}
