use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::NetworkError;

/// Wells and refineries excluded from the next solve
///
/// Empty means no blocking. Ids that name no node are kept; they simply match
/// no allowed route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockList {
    #[serde(default)]
    pub wells: BTreeSet<String>,
    #[serde(default)]
    pub refineries: BTreeSet<String>,
}

impl BlockList {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_wells<I, S>(mut self, wells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.wells.extend(wells.into_iter().map(Into::into));
        self
    }

    pub fn with_refineries<I, S>(mut self, refineries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.refineries.extend(refineries.into_iter().map(Into::into));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.wells.is_empty() && self.refineries.is_empty()
    }

    pub fn blocks_well(&self, well: &str) -> bool {
        self.wells.contains(well)
    }

    pub fn blocks_refinery(&self, refinery: &str) -> bool {
        self.refineries.contains(refinery)
    }
}

/// A block-list field as written in a scenario file
///
/// Anything other than a list of ids lands in `Entries` or `Malformed`
/// instead of failing deserialization, so the caller decides whether it is a
/// warning or an error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BlockListInput {
    Ids(Vec<String>),
    /// A list with at least one entry that is not a string id
    Entries(Vec<serde_json::Value>),
    Malformed(serde_json::Value),
}

impl BlockListInput {
    /// Resolve to ids. `Ok((ids, Some(warning)))` when something was
    /// ignored in permissive mode.
    pub fn resolve(
        input: Option<Self>,
        field: &'static str,
        strict: bool,
    ) -> Result<(Vec<String>, Option<String>), NetworkError> {
        match input {
            None => Ok((Vec::new(), None)),
            Some(BlockListInput::Ids(ids)) => Ok((ids, None)),
            Some(BlockListInput::Entries(entries)) => {
                let (ids, rejected): (Vec<_>, Vec<_>) = entries
                    .into_iter()
                    .partition(serde_json::Value::is_string);
                let found = serde_json::Value::Array(rejected).to_string();
                if strict {
                    return Err(NetworkError::MalformedBlockList { field, found });
                }
                tracing::warn!(field, %found, "block list entries are not ids, ignoring them");
                let ids = ids
                    .into_iter()
                    .filter_map(|id| id.as_str().map(str::to_owned))
                    .collect();
                Ok((
                    ids,
                    Some(format!("`{field}` has entries that are not ids ({found}); ignored")),
                ))
            }
            Some(BlockListInput::Malformed(value)) => {
                let found = value.to_string();
                if strict {
                    return Err(NetworkError::MalformedBlockList { field, found });
                }
                tracing::warn!(
                    field,
                    %found,
                    "block list is not a list of ids, no blocking applied"
                );
                Ok((
                    Vec::new(),
                    Some(format!(
                        "`{field}` is not a list of ids ({found}); no blocking applied"
                    )),
                ))
            }
        }
    }
}
