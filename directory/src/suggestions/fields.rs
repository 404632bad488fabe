use directory_api::endpoints::businesses::{field_of_work_pool, Business};

use super::Candidate;

/// Field-of-work pool. No network: the values come from records the caller
/// already holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldOfWorkSource {
    pool: Vec<Candidate>,
}

impl FieldOfWorkSource {
    pub fn from_businesses(businesses: &[Business]) -> Self {
        Self {
            pool: field_of_work_pool(businesses)
                .into_iter()
                .map(Candidate::new)
                .collect(),
        }
    }

    pub fn load(&self) -> &[Candidate] {
        &self.pool
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Adds a newly seen value, keeping the pool sorted and distinct.
    pub fn insert(&mut self, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        if let Err(position) = self
            .pool
            .binary_search_by(|candidate| candidate.label.as_str().cmp(value))
        {
            self.pool.insert(position, Candidate::new(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use directory_api::endpoints::businesses::NewBusiness;

    fn business(field_of_work: &str) -> Business {
        Business::from_new(NewBusiness::new("Name", "050", field_of_work), Utc::now())
    }

    fn labels(source: &FieldOfWorkSource) -> Vec<&str> {
        source.load().iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_pool_is_distinct_sorted_and_non_empty() {
        let businesses = vec![
            business("Plumber"),
            business("Electrician"),
            business("Plumber"),
            business("  "),
        ];
        let source = FieldOfWorkSource::from_businesses(&businesses);
        assert_eq!(labels(&source), vec!["Electrician", "Plumber"]);
    }

    #[test]
    fn test_insert_keeps_order_and_skips_known_values() {
        let mut source = FieldOfWorkSource::from_businesses(&[business("Plumber")]);
        source.insert("Carpenter");
        source.insert("Plumber");
        source.insert(" Welder ");
        source.insert("");
        assert_eq!(labels(&source), vec!["Carpenter", "Plumber", "Welder"]);
    }
}
