use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// Which side of a route a node sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Well,
    Refinery,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Well => write!(f, "well"),
            NodeKind::Refinery => write!(f, "refinery"),
        }
    }
}

/// Borrowed reference to a node in a [`NetworkDefinition`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node<'a> {
    Well(&'a str),
    Refinery(&'a str),
}

impl<'a> Node<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Well(_) => NodeKind::Well,
            Node::Refinery(_) => NodeKind::Refinery,
        }
    }

    pub fn id(&self) -> &'a str {
        match self {
            Node::Well(id) | Node::Refinery(id) => id,
        }
    }
}

/// Network definition errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    #[error("Unknown {kind} '{id}'")]
    UnknownNode { kind: NodeKind, id: String },

    #[error("Invalid {field} for '{id}': {value}")]
    InvalidValue {
        field: &'static str,
        id: String,
        value: f64,
    },

    #[error("Malformed block list `{field}`: expected a list of ids, got {found}")]
    MalformedBlockList { field: &'static str, found: String },

    #[error("Cannot read scenario {path}: {reason}")]
    Scenario { path: String, reason: String },
}

/// Unit cost (currency/unit) and capacity (units) of a well or refinery
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub unit_cost: f64,
    pub capacity: f64,
}

/// Allowed well -> refinery pair
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Route {
    pub well: String,
    pub refinery: String,
}

impl Route {
    pub fn new(well: impl Into<String>, refinery: impl Into<String>) -> Self {
        Self {
            well: well.into(),
            refinery: refinery.into(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --> {}", self.well, self.refinery)
    }
}

/// Cost, capacity and route tables as they arrive from outside, one map per column
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkTables {
    pub well_unit_cost: BTreeMap<String, f64>,
    pub well_capacity: BTreeMap<String, f64>,
    pub refinery_unit_cost: BTreeMap<String, f64>,
    pub refinery_capacity: BTreeMap<String, f64>,
    pub allowed_routes: Vec<(String, String)>,
}

/// Immutable description of the supply network
///
/// Built once from [`NetworkTables`] and passed by reference to the model
/// builders. The node set is the key set of the cost tables; every node must
/// also appear in its capacity table, and every route must join a known well
/// to a known refinery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkDefinition {
    wells: BTreeMap<String, Facility>,
    refineries: BTreeMap<String, Facility>,
    routes: BTreeSet<Route>,
}

impl NetworkDefinition {
    pub fn from_tables(tables: NetworkTables) -> Result<Self, NetworkError> {
        let wells = join_tables(
            NodeKind::Well,
            tables.well_unit_cost,
            &tables.well_capacity,
        )?;
        let refineries = join_tables(
            NodeKind::Refinery,
            tables.refinery_unit_cost,
            &tables.refinery_capacity,
        )?;

        let mut routes = BTreeSet::new();
        for (well, refinery) in tables.allowed_routes {
            if !wells.contains_key(&well) {
                return Err(NetworkError::UnknownNode {
                    kind: NodeKind::Well,
                    id: well,
                });
            }
            if !refineries.contains_key(&refinery) {
                return Err(NetworkError::UnknownNode {
                    kind: NodeKind::Refinery,
                    id: refinery,
                });
            }
            routes.insert(Route { well, refinery });
        }

        Ok(Self {
            wells,
            refineries,
            routes,
        })
    }

    /// Well ids in ascending order
    pub fn wells(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.wells.keys().map(String::as_str)
    }

    /// Refinery ids in ascending order
    pub fn refineries(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.refineries.keys().map(String::as_str)
    }

    /// Allowed routes ordered by (well, refinery)
    pub fn routes(&self) -> impl Iterator<Item = &Route> + '_ {
        self.routes.iter()
    }

    pub fn well_count(&self) -> usize {
        self.wells.len()
    }

    pub fn refinery_count(&self) -> usize {
        self.refineries.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn contains(&self, node: Node<'_>) -> bool {
        self.facility(node).is_ok()
    }

    pub fn unit_cost(&self, node: Node<'_>) -> Result<f64, NetworkError> {
        self.facility(node).map(|f| f.unit_cost)
    }

    pub fn capacity(&self, node: Node<'_>) -> Result<f64, NetworkError> {
        self.facility(node).map(|f| f.capacity)
    }

    pub fn is_allowed(&self, well: &str, refinery: &str) -> bool {
        // BTreeSet<Route> can't be probed with borrowed halves, so scan the well's range
        self.routes
            .range(Route::new(well, "")..)
            .take_while(|r| r.well == well)
            .any(|r| r.refinery == refinery)
    }

    fn facility(&self, node: Node<'_>) -> Result<&Facility, NetworkError> {
        let table = match node {
            Node::Well(_) => &self.wells,
            Node::Refinery(_) => &self.refineries,
        };
        table.get(node.id()).ok_or_else(|| NetworkError::UnknownNode {
            kind: node.kind(),
            id: node.id().to_string(),
        })
    }
}

fn join_tables(
    kind: NodeKind,
    costs: BTreeMap<String, f64>,
    capacities: &BTreeMap<String, f64>,
) -> Result<BTreeMap<String, Facility>, NetworkError> {
    let mut joined = BTreeMap::new();
    for (id, unit_cost) in costs {
        let capacity = *capacities
            .get(&id)
            .ok_or_else(|| NetworkError::UnknownNode {
                kind,
                id: id.clone(),
            })?;

        if !unit_cost.is_finite() {
            return Err(NetworkError::InvalidValue {
                field: "unit_cost",
                id,
                value: unit_cost,
            });
        }
        if !capacity.is_finite() || capacity < 0.0 {
            return Err(NetworkError::InvalidValue {
                field: "capacity",
                id,
                value: capacity,
            });
        }

        joined.insert(id, Facility { unit_cost, capacity });
    }

    if let Some(orphan) = capacities.keys().find(|id| !joined.contains_key(*id)) {
        tracing::warn!(
            %kind,
            id = %orphan,
            "capacity given for a node without a unit cost, ignoring"
        );
    }

    Ok(joined)
}
