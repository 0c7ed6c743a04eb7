//! Background actor loading with generation tracking.
//!
//! Every [`ActorLoader::request`] gets a new, strictly increasing generation.
//! Loads run on a tokio runtime and report back over a channel; the frame
//! loop drains that channel between ticks. Only the outcome carrying the
//! latest generation is ever handed out, so a slow early request can never
//! overwrite the result of a later one.

use std::sync::{Arc, OnceLock};

use tokio::runtime::{Handle, Runtime};

use crate::assets::prefab::ActorPrefab;
use crate::assets::repository::AssetRepository;
use crate::errors::{Error, Result};

fn get_asset_runtime() -> Result<&'static Runtime> {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();
    if let Some(rt) = RUNTIME.get() {
        return Ok(rt);
    }
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("marionette-assets")
        .enable_all()
        .build()
        .map_err(|e| Error::Runtime(e.to_string()))?;
    // Another thread may have won the race; its runtime is kept.
    let _ = RUNTIME.set(runtime);
    RUNTIME
        .get()
        .ok_or_else(|| Error::Runtime("asset runtime unavailable".to_string()))
}

/// Result of one load request.
#[derive(Debug)]
pub struct LoadOutcome {
    pub generation: u64,
    pub name: String,
    pub result: Result<ActorPrefab>,
}

pub struct ActorLoader {
    repository: Arc<AssetRepository>,
    runtime: Handle,
    tx: flume::Sender<LoadOutcome>,
    rx: flume::Receiver<LoadOutcome>,
    latest: u64,
    pending: Option<String>,
    last_error: Option<String>,
}

impl ActorLoader {
    /// Loader spawning onto `runtime`.
    #[must_use]
    pub fn new(repository: Arc<AssetRepository>, runtime: Handle) -> Self {
        let (tx, rx) = flume::unbounded();
        Self {
            repository,
            runtime,
            tx,
            rx,
            latest: 0,
            pending: None,
            last_error: None,
        }
    }

    /// Loader on a lazily created, process-wide asset runtime.
    pub fn with_shared_runtime(repository: Arc<AssetRepository>) -> Result<Self> {
        let runtime = get_asset_runtime()?.handle().clone();
        Ok(Self::new(repository, runtime))
    }

    #[must_use]
    pub fn repository(&self) -> &Arc<AssetRepository> {
        &self.repository
    }

    /// Generation of the most recent request, 0 before any request.
    #[must_use]
    pub fn latest_generation(&self) -> u64 {
        self.latest
    }

    /// Name of the request still in flight, if the latest one has not
    /// completed yet.
    #[must_use]
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Message of the most recent failed load, cleared by the next success.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.latest
    }

    /// Starts loading `name` and returns the request's generation. Any
    /// earlier request still in flight becomes stale.
    pub fn request(&mut self, name: impl Into<String>) -> u64 {
        self.latest += 1;
        let generation = self.latest;
        let name = name.into();
        log::info!("Loading '{name}' (generation {generation})");
        self.pending = Some(name.clone());

        let repository = Arc::clone(&self.repository);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = repository.load(&name).await;
            if tx
                .send(LoadOutcome {
                    generation,
                    name,
                    result,
                })
                .is_err()
            {
                log::debug!("Loader dropped before generation {generation} finished");
            }
        });

        generation
    }

    /// Drains completed loads without blocking and returns the latest
    /// request's outcome if it has arrived. Stale outcomes are dropped.
    pub fn poll_latest(&mut self) -> Option<LoadOutcome> {
        let mut current = None;
        while let Ok(outcome) = self.rx.try_recv() {
            current = self.accept(outcome).or(current);
        }
        current
    }

    /// Waits for the next outcome that belongs to the latest request.
    /// Returns `None` if no request is pending.
    pub async fn next_outcome(&mut self) -> Option<LoadOutcome> {
        while self.pending.is_some() {
            let outcome = self.rx.recv_async().await.ok()?;
            if let Some(current) = self.accept(outcome) {
                return Some(current);
            }
        }
        None
    }

    fn accept(&mut self, outcome: LoadOutcome) -> Option<LoadOutcome> {
        if !self.is_current(outcome.generation) {
            log::warn!(
                "Discarding stale load of '{}' (generation {}, latest {})",
                outcome.name,
                outcome.generation,
                self.latest
            );
            return None;
        }

        self.pending = None;
        match &outcome.result {
            Ok(_) => self.last_error = None,
            Err(e) => {
                log::error!("Failed to load '{}': {e}", outcome.name);
                self.last_error = Some(format!("{}: {e}", outcome.name));
            }
        }
        Some(outcome)
    }
}

impl std::fmt::Debug for ActorLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorLoader")
            .field("latest", &self.latest)
            .field("pending", &self.pending)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}
