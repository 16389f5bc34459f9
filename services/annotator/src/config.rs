use anyhow::{bail, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub progress_file: PathBuf,
    pub results_dir: PathBuf,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let data_dir = PathBuf::from(var("ANNOTATE_DATA_DIR", "../data"));
        let progress_file = PathBuf::from(var("ANNOTATE_PROGRESS_FILE", "annotation_progress.json"));
        let results_dir = PathBuf::from(var("ANNOTATE_RESULTS_DIR", "results"));
        let bind_addr = var("ANNOTATE_BIND_ADDR", "0.0.0.0:5000");

        // fail fast on a typo rather than at bind time
        if bind_addr.parse::<SocketAddr>().is_err() {
            bail!("ANNOTATE_BIND_ADDR must be host:port, got {bind_addr:?}");
        }
        if progress_file.as_os_str().is_empty() {
            bail!("ANNOTATE_PROGRESS_FILE must not be empty");
        }

        Ok(Self {
            data_dir,
            progress_file,
            results_dir,
            bind_addr,
        })
    }
}
