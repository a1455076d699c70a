//! Sparse (arc-indexed) formulation
//!
//! Only allowed routes get a variable, so every sum is implicitly restricted
//! to route members and nothing needs zeroing after allocation.

use tracing::debug;

use crate::domain::{DemandVector, NetworkDefinition};
use crate::optimizer::constraints::formulate;
use crate::optimizer::{
    FlowModel, Formulation, ModelBuilder, OptimizerError, DEFAULT_ROUTE_CAPACITY,
};

#[derive(Debug, Clone)]
pub struct SparseBuilder {
    route_capacity: f64,
}

impl Default for SparseBuilder {
    fn default() -> Self {
        Self {
            route_capacity: DEFAULT_ROUTE_CAPACITY,
        }
    }
}

impl SparseBuilder {
    pub fn new(route_capacity: f64) -> Self {
        Self { route_capacity }
    }
}

impl ModelBuilder for SparseBuilder {
    fn formulation(&self) -> Formulation {
        Formulation::Sparse
    }

    fn build(
        &self,
        network: &NetworkDefinition,
        demand: &DemandVector,
    ) -> Result<FlowModel, OptimizerError> {
        let mut model = FlowModel::new(Formulation::Sparse);

        for route in network.routes() {
            model.add_variable(&route.well, &route.refinery, self.route_capacity);
        }

        let formulated = formulate(network, demand, |w, r| {
            if network.is_allowed(w, r) {
                model.var_id(w, r)
            } else {
                None
            }
        })?;
        formulated.install(&mut model);

        debug!(
            variables = model.variables().len(),
            constraints = model.constraints().len(),
            "sparse flow model built"
        );

        Ok(model)
    }
}
