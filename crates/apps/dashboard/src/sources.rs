//! Feed sources for the dashboard: local files and HTTP endpoints.

use std::path::PathBuf;

use geodata::{FeatureCollection, FeatureSource, FeedError, FetchFuture};

/// GeoJSON file on disk.
pub struct FileSource {
    name: String,
    path: PathBuf,
}

impl FileSource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

impl FeatureSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> FetchFuture<'_> {
        Box::pin(async move {
            let payload = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
                FeedError::with_source(format!("read {}", self.path.display()), e)
            })?;
            FeatureCollection::from_geojson_str(&payload)
                .map_err(|e| FeedError::with_source(format!("parse {}", self.path.display()), e))
        })
    }
}

/// GeoJSON endpoint fetched over HTTP(S).
pub struct HttpSource {
    name: String,
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            client,
        }
    }
}

impl FeatureSource for HttpSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> FetchFuture<'_> {
        Box::pin(async move {
            let response = self
                .client
                .get(&self.url)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| FeedError::with_source(format!("GET {}", self.url), e))?;
            let payload = response
                .text()
                .await
                .map_err(|e| FeedError::with_source(format!("read body of {}", self.url), e))?;
            FeatureCollection::from_geojson_str(&payload)
                .map_err(|e| FeedError::with_source(format!("parse {}", self.url), e))
        })
    }
}

/// Pick a source implementation from the argument shape.
pub fn source_for(name: &str, location: &str, client: &reqwest::Client) -> Box<dyn FeatureSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(name, location, client.clone()))
    } else {
        Box::new(FileSource::new(name, location))
    }
}
