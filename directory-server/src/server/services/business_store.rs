use chrono::Utc;
use dashmap::DashMap;
use directory_api::endpoints::{
    businesses::{Business, BusinessUpdate, NewBusiness},
    BusinessId,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tokio::{fs, sync::Mutex};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Business {0} not found")]
    NotFound(BusinessId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    businesses: Vec<Business>,
    saved_at: i64, // Unix timestamp
}

/// Business collection keyed by id, optionally mirrored to a JSON snapshot file.
pub struct BusinessStore {
    businesses: DashMap<BusinessId, Business>,
    snapshot_path: Option<PathBuf>,
    // Serializes snapshot writes so an older collection never overwrites a newer one.
    write_lock: Mutex<()>,
}

impl BusinessStore {
    pub fn in_memory() -> Self {
        Self {
            businesses: DashMap::new(),
            snapshot_path: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Opens a store backed by `path`. A missing file starts an empty collection.
    pub async fn open(path: PathBuf) -> Result<Self, StoreError> {
        let businesses = DashMap::new();

        if fs::try_exists(&path).await? {
            let data = fs::read_to_string(&path).await?;
            let snapshot: Snapshot = serde_json::from_str(&data)?;
            for business in snapshot.businesses {
                businesses.insert(business.id, business);
            }
        } else if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        tracing::info!(
            path = %path.display(),
            count = businesses.len(),
            "Business store opened"
        );

        Ok(Self {
            businesses,
            snapshot_path: Some(path),
            write_lock: Mutex::new(()),
        })
    }

    /// All records, newest first.
    pub fn list(&self) -> Vec<Business> {
        let mut businesses: Vec<Business> =
            self.businesses.iter().map(|b| b.value().clone()).collect();
        businesses.sort();
        businesses
    }

    pub fn get(&self, id: &BusinessId) -> Option<Business> {
        self.businesses.get(id).map(|b| b.clone())
    }

    pub fn len(&self) -> usize {
        self.businesses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.businesses.is_empty()
    }

    /// Stores an already validated submission.
    pub async fn insert(&self, business: NewBusiness) -> Result<Business, StoreError> {
        let business = Business::from_new(business, Utc::now());
        self.businesses.insert(business.id, business.clone());
        tracing::debug!(business_id = %business.id, "Created business");

        if let Err(e) = self.persist().await {
            self.businesses.remove(&business.id);
            return Err(e);
        }
        Ok(business)
    }

    pub async fn update(
        &self,
        id: &BusinessId,
        update: &BusinessUpdate,
    ) -> Result<Business, StoreError> {
        let (previous, updated) = {
            let mut entry = self
                .businesses
                .get_mut(id)
                .ok_or(StoreError::NotFound(*id))?;
            let previous = entry.clone();
            update.apply_to(&mut entry);
            entry.updated_at = Utc::now();
            (previous, entry.clone())
        };
        tracing::debug!(business_id = %id, "Updated business");

        if let Err(e) = self.persist().await {
            self.businesses.insert(*id, previous);
            return Err(e);
        }
        Ok(updated)
    }

    pub async fn remove(&self, id: &BusinessId) -> Result<Business, StoreError> {
        let (_, removed) = self
            .businesses
            .remove(id)
            .ok_or(StoreError::NotFound(*id))?;
        tracing::debug!(business_id = %id, "Deleted business");

        if let Err(e) = self.persist().await {
            self.businesses.insert(*id, removed);
            return Err(e);
        }
        Ok(removed)
    }

    /// Writes the collection to the snapshot file. Callers undo their
    /// in-memory change when this fails so memory and file stay in step.
    async fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let _guard = self.write_lock.lock().await;
        let snapshot = Snapshot {
            businesses: self.list(),
            saved_at: Utc::now().timestamp(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, path).await?;
        Ok(())
    }
}
