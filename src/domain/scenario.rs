//! Scenario files
//!
//! A scenario bundles everything one solve needs: the network tables, the
//! demand vector and the optional block lists. TOML and JSON are accepted,
//! picked by file extension.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::{
    BlockList, BlockListInput, DemandVector, NetworkDefinition, NetworkError, NetworkTables,
};

/// On-disk layout of a scenario
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioFile {
    pub demands: BTreeMap<String, f64>,
    pub well_unit_cost: BTreeMap<String, f64>,
    pub well_capacity: BTreeMap<String, f64>,
    pub refinery_unit_cost: BTreeMap<String, f64>,
    pub refinery_capacity: BTreeMap<String, f64>,
    pub allowed_routes: Vec<(String, String)>,
    #[serde(default)]
    pub blocked_wells: Option<BlockListInput>,
    #[serde(default)]
    pub blocked_refineries: Option<BlockListInput>,
}

/// A validated scenario ready to optimize
#[derive(Debug, Clone)]
pub struct Scenario {
    pub network: NetworkDefinition,
    pub demand: DemandVector,
    pub blocks: BlockList,
    /// Problems in the input that were tolerated rather than rejected
    pub warnings: Vec<String>,
}

impl Scenario {
    pub fn load(path: impl AsRef<Path>, strict_block_lists: bool) -> Result<Self, NetworkError> {
        let path = path.as_ref();
        let scenario_err = |reason: String| NetworkError::Scenario {
            path: path.display().to_string(),
            reason,
        };

        let raw = std::fs::read_to_string(path).map_err(|e| scenario_err(e.to_string()))?;
        let file: ScenarioFile = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&raw).map_err(|e| scenario_err(e.to_string()))?,
            _ => toml::from_str(&raw).map_err(|e| scenario_err(e.to_string()))?,
        };

        tracing::debug!(path = %path.display(), "scenario file parsed");
        Self::from_file(file, strict_block_lists)
    }

    pub fn from_file(file: ScenarioFile, strict_block_lists: bool) -> Result<Self, NetworkError> {
        let network = NetworkDefinition::from_tables(NetworkTables {
            well_unit_cost: file.well_unit_cost,
            well_capacity: file.well_capacity,
            refinery_unit_cost: file.refinery_unit_cost,
            refinery_capacity: file.refinery_capacity,
            allowed_routes: file.allowed_routes,
        })?;
        let demand = DemandVector::new(file.demands)?;

        let mut warnings = Vec::new();
        let (wells, warning) =
            BlockListInput::resolve(file.blocked_wells, "blocked_wells", strict_block_lists)?;
        warnings.extend(warning);
        let (refineries, warning) = BlockListInput::resolve(
            file.blocked_refineries,
            "blocked_refineries",
            strict_block_lists,
        )?;
        warnings.extend(warning);

        let blocks = BlockList::none()
            .with_wells(wells)
            .with_refineries(refineries);

        Ok(Self {
            network,
            demand,
            blocks,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BASE: &str = r#"
allowed_routes = [["A", "X"], ["B", "X"]]

[demands]
C1 = 10

[well_unit_cost]
A = 1
B = 2

[well_capacity]
A = 5
B = 10

[refinery_unit_cost]
X = 0

[refinery_capacity]
X = 20
"#;

    fn parse(extra: &str, strict: bool) -> Result<Scenario, NetworkError> {
        let file: ScenarioFile = toml::from_str(&format!("{extra}\n{BASE}")).unwrap();
        Scenario::from_file(file, strict)
    }

    #[test]
    fn test_parse_without_blocks() {
        let scenario = parse("", false).unwrap();
        assert_eq!(scenario.network.route_count(), 2);
        assert_eq!(scenario.demand.total(), 10.0);
        assert!(scenario.blocks.is_empty());
        assert!(scenario.warnings.is_empty());
    }

    #[test]
    fn test_parse_block_lists() {
        let scenario = parse(
            "blocked_wells = [\"A\"]\nblocked_refineries = []",
            false,
        )
        .unwrap();
        assert!(scenario.blocks.blocks_well("A"));
        assert!(scenario.blocks.refineries.is_empty());
    }

    #[test]
    fn test_scalar_block_list_is_a_warning() {
        let scenario = parse("blocked_wells = \"A\"", false).unwrap();
        assert!(scenario.blocks.is_empty());
        assert_eq!(scenario.warnings.len(), 1);
    }

    #[test]
    fn test_mixed_block_list_keeps_string_ids() {
        let scenario = parse("blocked_wells = [\"A\", 2]", false).unwrap();
        assert!(scenario.blocks.blocks_well("A"));
        assert_eq!(scenario.blocks.wells.len(), 1);
        assert_eq!(scenario.warnings.len(), 1);
        assert!(scenario.warnings[0].contains("blocked_wells"));
    }

    #[test]
    fn test_scalar_block_list_strict() {
        let err = parse("blocked_wells = \"A\"", true).unwrap_err();
        assert!(matches!(
            err,
            NetworkError::MalformedBlockList {
                field: "blocked_wells",
                ..
            }
        ));
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{
                "demands": {{"C1": 10}},
                "well_unit_cost": {{"A": 1}},
                "well_capacity": {{"A": 15}},
                "refinery_unit_cost": {{"X": 0}},
                "refinery_capacity": {{"X": 20}},
                "allowed_routes": [["A", "X"]],
                "blocked_refineries": ["X"]
            }}"#
        )
        .unwrap();

        let scenario = Scenario::load(file.path(), true).unwrap();
        assert!(scenario.network.is_allowed("A", "X"));
        assert!(scenario.blocks.blocks_refinery("X"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Scenario::load("does/not/exist.toml", false).unwrap_err();
        assert!(matches!(err, NetworkError::Scenario { .. }));
    }
}
