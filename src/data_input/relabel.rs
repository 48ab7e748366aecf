// src/data_input/relabel.rs

use std::collections::{HashMap, HashSet};

use crate::error::{Result, VizError};
use crate::types::ProbeColumns;

/// Simultaneous renaming of probe columns.
///
/// The mapping must be a permutation of its own source names, so applying it
/// can never produce two columns with the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRelabel {
    mapping: Vec<(String, String)>,
}

impl ProbeRelabel {
    /// Builds a relabeling from explicit `from -> to` pairs.
    pub fn new<S: Into<String>>(pairs: impl IntoIterator<Item = (S, S)>) -> Result<Self> {
        let mapping: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(from, to)| (from.into(), to.into()))
            .collect();

        let sources: HashSet<&str> = mapping.iter().map(|(from, _)| from.as_str()).collect();
        let targets: HashSet<&str> = mapping.iter().map(|(_, to)| to.as_str()).collect();
        if sources.len() != mapping.len() {
            return Err(VizError::invalid_config("probe relabel renames a column twice"));
        }
        if targets.len() != mapping.len() {
            return Err(VizError::invalid_config(
                "probe relabel maps two columns to the same name",
            ));
        }
        if sources != targets {
            return Err(VizError::invalid_config(
                "probe relabel must permute its own column names",
            ));
        }
        Ok(Self { mapping })
    }

    /// Builds a relabeling that exchanges the names of each pair.
    pub fn swap_pairs(pairs: &[(&str, &str)]) -> Result<Self> {
        Self::new(
            pairs
                .iter()
                .flat_map(|&(a, b)| [(a, b), (b, a)])
                .filter(|(from, to)| from != to),
        )
    }

    /// Wiring correction for the deployed hive logger: the cable of the
    /// fourth level was plugged in rotated by one position.
    pub fn hive_wiring_correction() -> Self {
        Self {
            mapping: [("T16", "T13"), ("T13", "T14"), ("T14", "T15"), ("T15", "T16")]
                .iter()
                .map(|&(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }

    pub fn inverse(&self) -> Self {
        Self {
            mapping: self
                .mapping
                .iter()
                .map(|(from, to)| (to.clone(), from.clone()))
                .collect(),
        }
    }

    /// True when applying the relabeling twice restores every name.
    pub fn is_involution(&self) -> bool {
        let lookup: HashMap<&str, &str> = self
            .mapping
            .iter()
            .map(|(from, to)| (from.as_str(), to.as_str()))
            .collect();
        lookup
            .iter()
            .all(|(from, to)| lookup.get(to).is_some_and(|back| back == from))
    }

    pub fn target_of(&self, name: &str) -> Option<&str> {
        self.mapping
            .iter()
            .find(|(from, _)| from == name)
            .map(|(_, to)| to.as_str())
    }

    /// Renames every matching column at once; unmatched columns keep their names.
    pub fn apply(&self, columns: &mut ProbeColumns) {
        let renamed: Vec<Option<String>> = columns
            .iter()
            .map(|name| self.target_of(name).map(str::to_string))
            .collect();
        for (column, new_name) in columns.iter_mut().zip(renamed) {
            if let Some(new_name) = new_name {
                *column = new_name;
            }
        }
    }
}


// src/data_input/relabel.rs
