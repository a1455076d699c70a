//! Objective and constraint generation shared by both builders
//!
//! The builders differ only in which (well, refinery) pairs carry a variable;
//! they pass a lookup returning `None` for pairs that must not be summed.

use super::{ConstraintSense, FlowModel, LinearConstraint, LinearExpr, OptimizerError, VarId};
use crate::domain::{DemandVector, NetworkDefinition, Node};

pub const DEMAND_CONSTRAINT: &str = "demand_satisfaction";

pub fn well_constraint_name(well: &str) -> String {
    format!("well_{well}_production")
}

pub fn refinery_constraint_name(refinery: &str) -> String {
    format!("refinery_{refinery}_production")
}

/// Objective plus constraint rows, ready to install into a model
#[derive(Debug)]
pub(crate) struct Formulated {
    pub objective: LinearExpr,
    pub constraints: Vec<LinearConstraint>,
}

impl Formulated {
    pub fn install(self, model: &mut FlowModel) {
        model.set_objective(self.objective);
        for c in self.constraints {
            model.add_constraint(c);
        }
    }
}

pub(crate) fn formulate<F>(
    network: &NetworkDefinition,
    demand: &DemandVector,
    lookup: F,
) -> Result<Formulated, OptimizerError>
where
    F: Fn(&str, &str) -> Option<VarId>,
{
    let mut constraints = Vec::with_capacity(network.well_count() + network.refinery_count() + 1);
    constraints.extend(well_capacity(network, &lookup)?);
    constraints.extend(refinery_capacity(network, &lookup)?);
    constraints.push(demand_satisfaction(network, demand, &lookup));

    Ok(Formulated {
        objective: total_cost(network, &lookup)?,
        constraints,
    })
}

/// Production cost charged at the well plus processing cost charged at the
/// refinery. A unit on (w, r) therefore carries cost(w) + cost(r), as two
/// separate terms.
pub(crate) fn total_cost<F>(
    network: &NetworkDefinition,
    lookup: &F,
) -> Result<LinearExpr, OptimizerError>
where
    F: Fn(&str, &str) -> Option<VarId>,
{
    let mut objective = LinearExpr::default();

    for w in network.wells() {
        let cost = network.unit_cost(Node::Well(w))?;
        for r in network.refineries() {
            if let Some(var) = lookup(w, r) {
                objective.add_term(var, cost);
            }
        }
    }

    for r in network.refineries() {
        let cost = network.unit_cost(Node::Refinery(r))?;
        for w in network.wells() {
            if let Some(var) = lookup(w, r) {
                objective.add_term(var, cost);
            }
        }
    }

    Ok(objective)
}

pub(crate) fn well_capacity<F>(
    network: &NetworkDefinition,
    lookup: &F,
) -> Result<Vec<LinearConstraint>, OptimizerError>
where
    F: Fn(&str, &str) -> Option<VarId>,
{
    network
        .wells()
        .map(|w| -> Result<LinearConstraint, OptimizerError> {
            Ok(LinearConstraint {
                name: well_constraint_name(w),
                expr: network
                    .refineries()
                    .filter_map(|r| lookup(w, r))
                    .map(|v| (v, 1.0))
                    .collect(),
                sense: ConstraintSense::LessOrEqual,
                rhs: network.capacity(Node::Well(w))?,
            })
        })
        .collect()
}

pub(crate) fn refinery_capacity<F>(
    network: &NetworkDefinition,
    lookup: &F,
) -> Result<Vec<LinearConstraint>, OptimizerError>
where
    F: Fn(&str, &str) -> Option<VarId>,
{
    network
        .refineries()
        .map(|r| -> Result<LinearConstraint, OptimizerError> {
            Ok(LinearConstraint {
                name: refinery_constraint_name(r),
                expr: network
                    .wells()
                    .filter_map(|w| lookup(w, r))
                    .map(|v| (v, 1.0))
                    .collect(),
                sense: ConstraintSense::LessOrEqual,
                rhs: network.capacity(Node::Refinery(r))?,
            })
        })
        .collect()
}

/// Every flow in the network sums to the total over all customers
pub(crate) fn demand_satisfaction<F>(
    network: &NetworkDefinition,
    demand: &DemandVector,
    lookup: &F,
) -> LinearConstraint
where
    F: Fn(&str, &str) -> Option<VarId>,
{
    let expr = network
        .wells()
        .flat_map(|w| network.refineries().map(move |r| (w, r)))
        .filter_map(|(w, r)| lookup(w, r))
        .map(|v| (v, 1.0))
        .collect();

    LinearConstraint {
        name: DEMAND_CONSTRAINT.to_string(),
        expr,
        sense: ConstraintSense::Equal,
        rhs: demand.total(),
    }
}
