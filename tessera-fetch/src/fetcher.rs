//! Resource fetching for image columns.
//!
//! Values stored as paths may point at the local file system or at a
//! remote HTTP(S) host; the [Fetcher] resolves both through one call
//! surface and hands back a seekable byte stream.

use std::fs::File;
use std::io;

use opendal::services::Http;
use opendal::Operator;
use tracing::{debug, instrument, trace};
use url::Url;

use crate::reader::FetchReader;

#[derive(Debug, thiserror::Error)]
/// An error that can occur while opening a resource.
pub enum FetchError {
    #[error("IO Error: {0}")]
    /// The local file could not be opened or read.
    IoError(#[from] io::Error),
    #[error("Invalid location: {0:?}")]
    /// The location is not a valid URL or file path.
    InvalidLocation(String),
    #[error("Transport Error: {0}")]
    /// The remote host could not serve the resource.
    TransportError(#[from] opendal::Error),
}

/// Opens resources identified by a path or URI as byte streams,
/// transparently across local and remote storage.
///
/// Remote transfers run on a runtime owned by the fetcher, so callers
/// get a plain blocking call; the calling thread is parked for the
/// duration of the transfer. No retries are performed, failures
/// surface to the caller immediately.
///
/// The fetcher holds no mutable state after construction and can be
/// shared freely across threads.
pub struct Fetcher {
    runtime: tokio::runtime::Runtime,
}

impl Fetcher {
    /// Creates a new [Fetcher].
    pub fn new() -> Result<Self, FetchError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self { runtime })
    }

    #[instrument(skip(self))]
    /// Opens the resource at the given location as a [FetchReader].
    ///
    /// Locations starting with `http://` or `https://` are fetched from
    /// the remote host and buffered in memory. A `file://` prefix is
    /// stripped, anything else is treated as a local file path and
    /// streamed from disk.
    pub fn open(&self, location: &str) -> Result<FetchReader, FetchError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            return self.open_remote(location);
        }

        let path = location.strip_prefix("file://").unwrap_or(location);
        trace!("Opening local file");
        let file = File::open(path)?;
        Ok(FetchReader::local(file))
    }

    fn open_remote(&self, location: &str) -> Result<FetchReader, FetchError> {
        let url = Url::parse(location)
            .map_err(|_| FetchError::InvalidLocation(location.to_string()))?;
        let endpoint = format!("{}://{}", url.scheme(), url.authority());

        let builder = Http::default().endpoint(&endpoint);
        let operator = Operator::new(builder)?.finish();

        debug!(endpoint = %endpoint, "Fetching remote resource");
        let buffer = self.runtime.block_on(operator.read(url.path()))?;
        Ok(FetchReader::memory(buffer.to_bytes()))
    }
}
