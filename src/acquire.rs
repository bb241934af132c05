use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::BaseDirs;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::error::InteractomeError;
use crate::fs_util;

pub const INWEB_ARCHIVE: &str = "InBio_Map_core_2016_09_12.zip";
pub const INWEB_CORE_TABLE: &str = "InBio_Map_core_2016_09_12/core.psimitab";

const INWEB_LOGIN_URL: &str = "https://www.intomics.com/inbio/api/login_guest?ref=&_=1509120239303";
const INWEB_DATA_URL: &str = "https://www.intomics.com/inbio/map/api/get_data";

pub trait InwebClient: Send + Sync {
    /// Fetches the InBio Map core archive into `destination`. One attempt, no retry.
    fn download_archive(&self, destination: &Path) -> Result<(), InteractomeError>;
}

#[derive(Clone)]
pub struct InwebHttpClient {
    client: Client,
}

impl InwebHttpClient {
    pub fn new() -> Result<Self, InteractomeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("kira-im/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| InteractomeError::DownloadHttp(err.to_string()))?,
        );
        // The data endpoint only serves sessions opened through the guest login.
        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|err| InteractomeError::DownloadHttp(err.to_string()))?;
        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, InteractomeError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| InteractomeError::DownloadHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "InWeb request failed".to_string());
            return Err(InteractomeError::DownloadStatus { status, message });
        }
        Ok(response)
    }
}

impl InwebClient for InwebHttpClient {
    fn download_archive(&self, destination: &Path) -> Result<(), InteractomeError> {
        self.get(INWEB_LOGIN_URL)?;
        let bytes = self
            .get(&format!("{INWEB_DATA_URL}?file={INWEB_ARCHIVE}"))?
            .bytes()
            .map_err(|err| InteractomeError::DownloadHttp(err.to_string()))?;
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| InteractomeError::Filesystem(err.to_string()))?;
        }
        let mut file = File::create(destination)
            .map_err(|err| InteractomeError::Filesystem(err.to_string()))?;
        file.write_all(&bytes)
            .map_err(|err| InteractomeError::Filesystem(err.to_string()))?;
        Ok(())
    }
}

/// Downloads and unpacks the InWeb archive under `work_dir`, returning the
/// path of the extracted `core.psimitab`.
pub fn acquire_inweb(client: &dyn InwebClient, work_dir: &Path) -> Result<PathBuf, InteractomeError> {
    let archive = work_dir.join(INWEB_ARCHIVE);
    tracing::info!(archive = %archive.display(), "downloading InWeb InBioMap");
    client.download_archive(&archive)?;
    let core = fs_util::extract_entry(&archive, INWEB_CORE_TABLE, work_dir)?;
    tracing::info!(path = %core.display(), "InWeb InBioMap ready");
    Ok(core)
}

/// `~/.cache/kira-interactome/inweb`
pub fn default_download_dir() -> Result<PathBuf, InteractomeError> {
    BaseDirs::new()
        .map(|dirs| {
            dirs.home_dir()
                .join(".cache")
                .join("kira-interactome")
                .join("inweb")
        })
        .ok_or_else(|| InteractomeError::Filesystem("unable to resolve cache directory".to_string()))
}
