#![allow(dead_code)]
use refinery_flow::domain::{DemandVector, NetworkDefinition, NetworkTables};
use refinery_flow::optimizer::{Formulation, FlowOptimizer, SolveConfig};

pub const TOLERANCE: f64 = 1e-6;

pub fn network(
    wells: &[(&str, f64, f64)],
    refineries: &[(&str, f64, f64)],
    routes: &[(&str, &str)],
) -> NetworkDefinition {
    NetworkDefinition::from_tables(NetworkTables {
        well_unit_cost: wells.iter().map(|(id, c, _)| (id.to_string(), *c)).collect(),
        well_capacity: wells.iter().map(|(id, _, k)| (id.to_string(), *k)).collect(),
        refinery_unit_cost: refineries.iter().map(|(id, c, _)| (id.to_string(), *c)).collect(),
        refinery_capacity: refineries.iter().map(|(id, _, k)| (id.to_string(), *k)).collect(),
        allowed_routes: routes
            .iter()
            .map(|(w, r)| (w.to_string(), r.to_string()))
            .collect(),
    })
    .expect("valid test network")
}

pub fn optimizer(formulation: Formulation) -> FlowOptimizer {
    let config = SolveConfig {
        verbose: false,
        ..SolveConfig::default()
    };
    match formulation {
        Formulation::Dense => FlowOptimizer::dense(config),
        Formulation::Sparse => FlowOptimizer::sparse(config),
    }
}

pub fn demand(total: f64) -> DemandVector {
    DemandVector::single("C1", total).expect("valid demand")
}

pub fn slickoil() -> NetworkDefinition {
    network(
        &[
            ("1", 3.0, 40.0),
            ("2", 12.0, 50.0),
            ("3", 4.0, 40.0),
            ("4", 6.0, 100.0),
            ("5", 10.0, 100.0),
            ("6", 2.5, 100.0),
        ],
        &[
            ("A", 4.0, 100.0),
            ("B", 2.0, 40.0),
            ("C", 6.0, 80.0),
            ("D", 1.0, 100.0),
            ("E", 8.0, 80.0),
        ],
        &[
            ("1", "A"),
            ("1", "B"),
            ("2", "B"),
            ("2", "C"),
            ("2", "D"),
            ("3", "B"),
            ("3", "C"),
            ("3", "E"),
            ("4", "A"),
            ("4", "E"),
            ("5", "D"),
            ("5", "E"),
            ("6", "C"),
            ("6", "E"),
        ],
    )
}
