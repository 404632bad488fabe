//! Candidate pools for the form autocompletes and the filter pass that
//! narrows a pool down to a suggestion set.

pub mod cities;
pub mod engine;
pub mod fields;

use directory_api::endpoints::cities::CityRecord;
use itertools::Itertools;

/// Upper bound on the number of suggestions shown at once.
pub const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub label: String,
    pub secondary_label: Option<String>,
    pub key: Option<String>,
}

impl Candidate {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            secondary_label: None,
            key: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// The key when one was provided, otherwise the label. A suggestion set
    /// never holds two candidates with the same identity.
    pub fn identity(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.label)
    }

    /// Attaches a secondary label; blank values are dropped.
    pub fn with_secondary(mut self, secondary: impl Into<String>) -> Self {
        let secondary = secondary.into();
        self.secondary_label = if secondary.trim().is_empty() {
            None
        } else {
            Some(secondary)
        };
        self
    }
}

impl From<&CityRecord> for Candidate {
    fn from(city: &CityRecord) -> Self {
        let candidate = Candidate::new(city.name.clone()).with_secondary(city.district.clone());
        match city.id {
            Some(id) => candidate.with_key(id.to_string()),
            None => candidate,
        }
    }
}

impl From<&str> for Candidate {
    fn from(label: &str) -> Self {
        Candidate::new(label)
    }
}

/// The filter pass: case-insensitive substring match on the primary label,
/// source order kept, later candidates sharing an identity dropped, truncated
/// to [`MAX_SUGGESTIONS`].
pub fn filter_candidates(pool: &[Candidate], query: &str) -> Vec<Candidate> {
    let needle = query.to_lowercase();
    pool.iter()
        .filter(|candidate| candidate.label.to_lowercase().contains(&needle))
        .unique_by(|candidate| candidate.identity().to_owned())
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect()
}
