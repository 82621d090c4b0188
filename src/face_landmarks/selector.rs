use std::collections::BTreeMap;

use crate::error::ConfigError;

use super::{Landmark, LandmarkSet};

/// Precomputed, ordered table of the landmark indices that make up a feature
/// vector. Built once from the configured index groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandmarkSelector {
    indices: Vec<usize>,
}

impl LandmarkSelector {
    /// Sorted, de-duplicated union of every group.
    pub fn from_groups(groups: &BTreeMap<String, Vec<usize>>) -> Result<Self, ConfigError> {
        if groups.is_empty() {
            return Err(ConfigError::NoIndexGroups);
        }
        if let Some((name, _)) = groups.iter().find(|(_, indices)| indices.is_empty()) {
            return Err(ConfigError::EmptyIndexGroup(name.clone()));
        }

        let mut indices: Vec<usize> = groups.values().flatten().copied().collect();
        indices.sort_unstable();
        indices.dedup();

        Ok(Self { indices })
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of selected landmarks (`K`).
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Yields one entry per selected index, in table order. Out-of-range indices
    /// and an absent face both yield `None`.
    pub fn select<'a>(
        &'a self,
        face: Option<&'a LandmarkSet>,
    ) -> impl Iterator<Item = Option<Landmark>> + 'a {
        self.indices
            .iter()
            .map(move |&index| face.and_then(|f| f.get_landmark(index)))
    }
}
