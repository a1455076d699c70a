use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::NetworkError;

/// Required quantity per customer
///
/// The flow model only ever sees [`DemandVector::total`]: demand is one
/// network-wide equality, there is no per-customer routing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DemandVector(BTreeMap<String, f64>);

impl DemandVector {
    pub fn new(demands: BTreeMap<String, f64>) -> Result<Self, NetworkError> {
        for (id, qty) in &demands {
            if !qty.is_finite() || *qty < 0.0 {
                return Err(NetworkError::InvalidValue {
                    field: "demand",
                    id: id.clone(),
                    value: *qty,
                });
            }
        }
        Ok(Self(demands))
    }

    /// Single-customer demand
    pub fn single(customer: impl Into<String>, quantity: f64) -> Result<Self, NetworkError> {
        Self::new(BTreeMap::from([(customer.into(), quantity)]))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }
}
