use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use directory_api::{endpoints::cities::CityRecord, CityDatasetClient, DirectoryApiError};
use futures::future::{BoxFuture, FutureExt, Shared};

use super::Candidate;

/// Remote list of localities.
pub trait CityDataset: Send + Sync + 'static {
    fn fetch_cities(
        &self,
    ) -> impl Future<Output = Result<Vec<CityRecord>, DirectoryApiError>> + Send;
}

/// The government localities dataset, first page only.
pub struct RemoteCityDataset {
    client: CityDatasetClient,
    resource_id: String,
}

impl RemoteCityDataset {
    pub fn new(base_url: &str, resource_id: impl Into<String>) -> Self {
        Self {
            client: CityDatasetClient::with_base_url(base_url),
            resource_id: resource_id.into(),
        }
    }
}

impl CityDataset for RemoteCityDataset {
    async fn fetch_cities(&self) -> Result<Vec<CityRecord>, DirectoryApiError> {
        self.client.fetch_cities(&self.resource_id).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("city dataset unavailable: {0}")]
pub struct CityLoadError(String);

type PendingLoad = Shared<BoxFuture<'static, Result<Arc<[Candidate]>, CityLoadError>>>;

#[derive(Default)]
struct CitySlot {
    cached: Option<Arc<[Candidate]>>,
    pending: Option<PendingLoad>,
}

/// Lazily loaded city pool, shared through `Arc` by everything that needs
/// city suggestions. Concurrent callers share one in-flight fetch; a
/// successful result is kept for the life of the process, a failed one
/// leaves nothing behind so the next call fetches again.
pub struct CitySource<D> {
    dataset: Arc<D>,
    slot: Arc<Mutex<CitySlot>>,
}

impl<D: CityDataset> CitySource<D> {
    pub fn new(dataset: D) -> Self {
        Self {
            dataset: Arc::new(dataset),
            slot: Arc::new(Mutex::new(CitySlot::default())),
        }
    }

    pub fn is_cached(&self) -> bool {
        lock(&self.slot).cached.is_some()
    }

    pub async fn load(&self) -> Result<Arc<[Candidate]>, CityLoadError> {
        let pending = {
            let mut slot = lock(&self.slot);
            if let Some(cached) = &slot.cached {
                return Ok(cached.clone());
            }
            match &slot.pending {
                Some(pending) => pending.clone(),
                None => {
                    let pending = self.start_fetch();
                    slot.pending = Some(pending.clone());
                    pending
                }
            }
        };
        pending.await
    }

    /// The fetch runs on its own task so it completes (and fills the cache)
    /// even when every caller awaiting it has been cancelled.
    fn start_fetch(&self) -> PendingLoad {
        let dataset = self.dataset.clone();
        let slot = self.slot.clone();

        let fetch = tokio::spawn(async move {
            tracing::info!("Fetching city dataset");
            let result = dataset.fetch_cities().await;

            let mut slot = lock(&slot);
            slot.pending = None;
            match result {
                Ok(records) => {
                    let candidates: Arc<[Candidate]> =
                        records.iter().map(Candidate::from).collect();
                    tracing::info!("Cached {} cities", candidates.len());
                    slot.cached = Some(candidates.clone());
                    Ok(candidates)
                }
                Err(e) => {
                    tracing::warn!("Failed to load city dataset: {}", e);
                    Err(CityLoadError(e.to_string()))
                }
            }
        });

        async move {
            match fetch.await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!("City dataset task ended early: {}", e);
                    Err(CityLoadError(e.to_string()))
                }
            }
        }
        .boxed()
        .shared()
    }
}

fn lock(slot: &Mutex<CitySlot>) -> MutexGuard<'_, CitySlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use directory_api::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FakeDataset {
        calls: Arc<AtomicUsize>,
        failures_left: AtomicUsize,
        latency: Duration,
    }

    impl FakeDataset {
        fn new(calls: Arc<AtomicUsize>) -> Self {
            Self {
                calls,
                failures_left: AtomicUsize::new(0),
                latency: Duration::from_millis(50),
            }
        }

        fn failing_first(calls: Arc<AtomicUsize>, failures: usize) -> Self {
            Self {
                failures_left: AtomicUsize::new(failures),
                ..Self::new(calls)
            }
        }
    }

    fn record(name: &str) -> CityRecord {
        CityRecord {
            id: None,
            name: name.to_string(),
            english_name: String::new(),
            district: String::new(),
            council: String::new(),
        }
    }

    impl CityDataset for FakeDataset {
        async fn fetch_cities(&self) -> Result<Vec<CityRecord>, DirectoryApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.latency).await;

            let failing = self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failing {
                return Err(DirectoryApiError::Api(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "down".to_string(),
                ));
            }
            Ok(vec![record("Tel Aviv"), record("Haifa")])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_loads_share_one_fetch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CitySource::new(FakeDataset::new(calls.clone()));

        let (first, second) = tokio::join!(source.load(), source.load());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.unwrap().len(), 2);
        assert_eq!(second.unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_pool_is_reused() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CitySource::new(FakeDataset::new(calls.clone()));

        source.load().await.unwrap();
        assert!(source.is_cached());
        let again = source.load().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(again[0].label, "Tel Aviv");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_clears_pending_slot_so_later_call_retries() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CitySource::new(FakeDataset::failing_first(calls.clone(), 1));

        let (first, second) = tokio::join!(source.load(), source.load());
        assert!(first.is_err());
        assert!(second.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!source.is_cached());

        let retried = source.load().await.unwrap();
        assert_eq!(retried.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_completes_after_caller_is_cancelled() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Arc::new(CitySource::new(FakeDataset::new(calls.clone())));

        let caller = {
            let source = source.clone();
            tokio::spawn(async move { source.load().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        caller.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(source.is_cached());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
