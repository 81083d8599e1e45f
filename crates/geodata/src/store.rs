use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{error, info};

use crate::feature::FeatureCollection;

/// Error raised by a feature feed.
#[derive(Debug)]
pub struct FeedError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl FeedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<FeatureCollection, FeedError>> + Send + 'a>>;

/// A read-only feature feed, fetched once per load cycle.
///
/// Implementations cover whatever transport the host has (filesystem, HTTP);
/// the store only cares about the joined outcome.
pub trait FeatureSource {
    fn name(&self) -> &str;
    fn fetch(&self) -> FetchFuture<'_>;
}

/// Holds the two externally supplied feature collections.
///
/// Both slots start empty and are committed at most once per load cycle; no
/// component mutates a committed collection (they are shared via `Arc`).
/// Reloading means running a fresh fetch cycle into a fresh store.
#[derive(Debug, Default, Clone)]
pub struct GeoDataStore {
    sidewalks: Option<Arc<FeatureCollection>>,
    census_blocks: Option<Arc<FeatureCollection>>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub sidewalks_loaded: bool,
    pub census_blocks_loaded: bool,
}

impl GeoDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sidewalks(&self) -> Option<&Arc<FeatureCollection>> {
        self.sidewalks.as_ref()
    }

    pub fn census_blocks(&self) -> Option<&Arc<FeatureCollection>> {
        self.census_blocks.as_ref()
    }

    pub fn commit_sidewalks(&mut self, collection: FeatureCollection) {
        self.sidewalks = Some(Arc::new(collection));
    }

    pub fn commit_census_blocks(&mut self, collection: FeatureCollection) {
        self.census_blocks = Some(Arc::new(collection));
    }

    /// Fetch both feeds concurrently and commit whatever succeeded.
    ///
    /// The two fetches are independent in-flight requests joined before
    /// either result is committed; this is the only suspension point in the
    /// system. A failed feed is logged and its slot stays empty so dependent
    /// layers degrade to "absent" instead of failing the whole load. There is
    /// no automatic retry.
    pub async fn load(
        &mut self,
        sidewalk_source: &dyn FeatureSource,
        census_source: &dyn FeatureSource,
    ) -> LoadReport {
        let (sidewalks, census_blocks) =
            tokio::join!(sidewalk_source.fetch(), census_source.fetch());

        let sidewalks_loaded = match sidewalks {
            Ok(collection) => {
                info!(
                    feed = sidewalk_source.name(),
                    features = collection.len(),
                    "sidewalk feed loaded"
                );
                self.commit_sidewalks(collection);
                true
            }
            Err(e) => {
                error!(feed = sidewalk_source.name(), error = %e, "sidewalk feed failed");
                false
            }
        };

        let census_blocks_loaded = match census_blocks {
            Ok(collection) => {
                info!(
                    feed = census_source.name(),
                    features = collection.len(),
                    "census feed loaded"
                );
                self.commit_census_blocks(collection);
                true
            }
            Err(e) => {
                error!(feed = census_source.name(), error = %e, "census feed failed");
                false
            }
        };

        LoadReport {
            sidewalks_loaded,
            census_blocks_loaded,
        }
    }
}
