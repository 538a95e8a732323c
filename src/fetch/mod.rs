//! Dataset loading from a local file or an HTTP(S) URL.
//!
//! This is the only asynchronous step: once [`load_dataset`] returns, every
//! derivation runs synchronously over the in-memory [`Dataset`].

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use crate::dataset::{Dataset, parse_dataset};
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::io::Read;
use tracing::{debug, info, warn};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Downloads `url` with `client` and returns the body.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    Ok(resp.bytes().await?.to_vec())
}

/// Reads `source` from disk, or over HTTP when it starts with `http`.
/// Gzip-compressed content is inflated transparently.
#[tracing::instrument(skip_all, fields(source = %source))]
pub async fn read_source(source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http") {
        let client = BasicClient::new()?;
        fetch_bytes(&client, source)
            .await
            .with_context(|| format!("failed to download dataset from {source}"))?
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("failed to read dataset file {source}"))?
    };
    debug!(bytes = bytes.len(), "Dataset bytes received");

    inflate_if_gzipped(bytes)
}

/// Loads and parses the dataset at `source`.
///
/// Directory entries that point at missing airports are logged, not rejected.
pub async fn load_dataset(source: &str) -> Result<Dataset> {
    let bytes = read_source(source).await?;
    let dataset = parse_dataset(&bytes)?;

    let dangling = dataset.dangling_directory_codes();
    if !dangling.is_empty() {
        warn!(codes = ?dangling, "Airport list references airports missing from the dataset");
    }

    info!(
        airports = dataset.airports.len(),
        directory = dataset.airport_list.len(),
        "Dataset loaded"
    );
    Ok(dataset)
}

fn inflate_if_gzipped(bytes: Vec<u8>) -> Result<Vec<u8>> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(bytes);
    }

    let mut inflated = Vec::new();
    GzDecoder::new(bytes.as_slice())
        .read_to_end(&mut inflated)
        .context("dataset looks gzip-compressed but could not be inflated")?;
    debug!(bytes = inflated.len(), "Inflated gzip dataset");
    Ok(inflated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::env;
    use std::fs;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "airports": {"DEN": {"name": "Denver International"}},
        "airportList": [
            {"code": "DEN", "name": "Denver International"},
            {"code": "PHX", "name": "Phoenix Sky Harbor"}
        ]
    }"#;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[tokio::test]
    async fn test_load_plain_file() {
        let path = temp_path("flight_delay_views_plain.json");
        fs::write(&path, SAMPLE).unwrap();

        let dataset = load_dataset(&path).await.unwrap();

        assert_eq!(dataset.airports.len(), 1);
        assert_eq!(dataset.dangling_directory_codes(), vec!["PHX"]);

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_load_gzipped_file() {
        let path = temp_path("flight_delay_views_gzip.json.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(SAMPLE.as_bytes()).unwrap();
        fs::write(&path, encoder.finish().unwrap()).unwrap();

        let dataset = load_dataset(&path).await.unwrap();

        assert!(dataset.airport("DEN").is_some());

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_fails() {
        let result = load_dataset("/nonexistent/analysis_results.json").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_malformed_file_fails() {
        let path = temp_path("flight_delay_views_malformed.json");
        fs::write(&path, r#"{"airports": []}"#).unwrap();

        assert!(load_dataset(&path).await.is_err());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_corrupt_gzip_fails() {
        let bytes = vec![0x1f, 0x8b, 0x00, 0x01, 0x02];
        assert!(inflate_if_gzipped(bytes).is_err());
    }
}
