//! Dense (node-indexed) formulation
//!
//! Allocates one flow variable for every (well, refinery) pair in the cross
//! product, then forces the upper bound of every pair outside the allowed
//! route set to zero. Simple indexing at the price of |wells| x |refineries|
//! variables, most of them pinned at zero on sparse topologies.

use tracing::debug;

use crate::domain::{DemandVector, NetworkDefinition};
use crate::optimizer::constraints::formulate;
use crate::optimizer::{
    FlowModel, Formulation, ModelBuilder, OptimizerError, DEFAULT_ROUTE_CAPACITY,
};

#[derive(Debug, Clone)]
pub struct DenseBuilder {
    /// Upper bound of every allowed pair before blocking
    route_capacity: f64,
}

impl Default for DenseBuilder {
    fn default() -> Self {
        Self {
            route_capacity: DEFAULT_ROUTE_CAPACITY,
        }
    }
}

impl DenseBuilder {
    pub fn new(route_capacity: f64) -> Self {
        Self { route_capacity }
    }
}

impl ModelBuilder for DenseBuilder {
    fn formulation(&self) -> Formulation {
        Formulation::Dense
    }

    fn build(
        &self,
        network: &NetworkDefinition,
        demand: &DemandVector,
    ) -> Result<FlowModel, OptimizerError> {
        let mut model = FlowModel::new(Formulation::Dense);

        for w in network.wells() {
            for r in network.refineries() {
                model.add_variable(w, r, self.route_capacity);
            }
        }

        let formulated = formulate(network, demand, |w, r| model.var_id(w, r))?;
        formulated.install(&mut model);

        // Forbidden routes
        let forbidden = model.zero_upper_bounds(|v| !network.is_allowed(&v.well, &v.refinery));

        debug!(
            variables = model.variables().len(),
            forbidden,
            constraints = model.constraints().len(),
            "dense flow model built"
        );

        Ok(model)
    }
}
