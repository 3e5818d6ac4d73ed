//! Source fetching.
//!
//! A source is either an `http(s)://` URL or a filesystem path. Sources
//! whose location ends in `.gz` are gunzipped after reading.

use std::io::Read as _;

use crate::DashboardError;

/// Where a source lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLocation<'a> {
    Url(&'a str),
    Path(&'a str),
}

impl<'a> SourceLocation<'a> {
    #[must_use]
    pub fn parse(location: &'a str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed)
        } else {
            Self::Path(trimmed)
        }
    }

    /// Returns `true` if the source is gzip-compressed.
    #[must_use]
    pub fn is_gzipped(&self) -> bool {
        let location = match *self {
            Self::Url(url) => url.split(['?', '#']).next().unwrap_or(url),
            Self::Path(path) => path,
        };
        location.to_ascii_lowercase().ends_with(".gz")
    }
}

impl std::fmt::Display for SourceLocation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(s) | Self::Path(s) => f.write_str(s),
        }
    }
}

/// Fetches the raw bytes of a source, decompressing `.gz` sources.
///
/// # Errors
///
/// * [`DashboardError::Http`] if a URL cannot be fetched
/// * [`DashboardError::Io`] if a file cannot be read or gunzipped
/// * [`DashboardError::Conversion`] if the server answers with an error
///   status
pub async fn fetch_bytes(
    client: &reqwest::Client,
    location: &str,
) -> Result<Vec<u8>, DashboardError> {
    let source = SourceLocation::parse(location);

    let bytes = match source {
        SourceLocation::Url(url) => {
            let resp = client.get(url).send().await?;
            if !resp.status().is_success() {
                return Err(DashboardError::Conversion {
                    message: format!("Request for {url} failed with status {}", resp.status()),
                });
            }
            resp.bytes().await?.to_vec()
        }
        SourceLocation::Path(path) => tokio::fs::read(path).await?,
    };

    log::debug!("Fetched {} bytes from {source}", bytes.len());

    if source.is_gzipped() {
        let decompressed = gunzip(&bytes)?;
        log::debug!("Decompressed to {} bytes", decompressed.len());
        return Ok(decompressed);
    }

    Ok(bytes)
}

/// Fetches a source as UTF-8 text.
///
/// # Errors
///
/// Returns the errors of [`fetch_bytes`], or [`DashboardError::Conversion`]
/// if the content is not UTF-8.
pub async fn fetch_text(client: &reqwest::Client, location: &str) -> Result<String, DashboardError> {
    let bytes = fetch_bytes(client, location).await?;
    String::from_utf8(bytes).map_err(|e| DashboardError::Conversion {
        message: format!("{location} is not valid UTF-8: {e}"),
    })
}

fn gunzip(bytes: &[u8]) -> Result<Vec<u8>, DashboardError> {
    let mut decoder = flate2::read::GzDecoder::new(bytes);
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;
    Ok(decompressed)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn classifies_locations() {
        assert_eq!(
            SourceLocation::parse("https://example.org/data.csv"),
            SourceLocation::Url("https://example.org/data.csv")
        );
        assert_eq!(
            SourceLocation::parse("data/data.csv"),
            SourceLocation::Path("data/data.csv")
        );
        assert!(SourceLocation::parse("data/data.csv.gz").is_gzipped());
        assert!(SourceLocation::parse("https://example.org/data.csv.GZ?token=1").is_gzipped());
        assert!(!SourceLocation::parse("data/data.csv").is_gzipped());
    }

    #[tokio::test]
    async fn reads_plain_and_gzipped_files() {
        let dir = std::env::temp_dir().join("epi_map_source_test");
        std::fs::create_dir_all(&dir).unwrap();

        let plain = dir.join("table.csv");
        std::fs::write(&plain, "region\nGAZA\n").unwrap();

        let gz = dir.join("table.csv.gz");
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(b"region\nTETE\n").unwrap();
        std::fs::write(&gz, encoder.finish().unwrap()).unwrap();

        let client = reqwest::Client::new();
        let text = fetch_text(&client, plain.to_str().unwrap()).await.unwrap();
        assert_eq!(text, "region\nGAZA\n");
        let text = fetch_text(&client, gz.to_str().unwrap()).await.unwrap();
        assert_eq!(text, "region\nTETE\n");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let client = reqwest::Client::new();
        let result = fetch_bytes(&client, "/nonexistent/epi_map/data.csv").await;
        assert!(matches!(result, Err(DashboardError::Io(_))));
    }
}
