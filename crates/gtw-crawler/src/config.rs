use std::cmp;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlerConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_page_buffer")]
    pub page_buffer: usize,

    #[serde(default = "default_concurrent_downloads")]
    pub concurrent_downloads: usize,

    /// Optional delay in milliseconds applied before each download.
    #[serde(default = "default_download_delay_ms")]
    pub download_delay_ms: Option<u64>,

    #[serde(default = "default_num_workers")]
    pub num_workers: usize,

    #[serde(default = "default_handle_sigint")]
    pub handle_sigint: bool,

    #[serde(default = "default_on_dl_error")]
    pub on_dl_error: OnError,

    #[serde(default = "default_on_parse_error")]
    pub on_parse_error: OnError,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            page_buffer: default_page_buffer(),
            concurrent_downloads: default_concurrent_downloads(),
            download_delay_ms: default_download_delay_ms(),
            num_workers: default_num_workers(),
            handle_sigint: default_handle_sigint(),
            on_dl_error: default_on_dl_error(),
            on_parse_error: default_on_parse_error(),
        }
    }
}

fn default_user_agent() -> String {
    String::from("GTWbot")
}

fn default_page_buffer() -> usize {
    10_000
}

fn default_concurrent_downloads() -> usize {
    100
}

fn default_download_delay_ms() -> Option<u64> {
    None
}

fn default_num_workers() -> usize {
    cmp::max(1, num_cpus::get().saturating_sub(2))
}

fn default_handle_sigint() -> bool {
    true
}

fn default_on_dl_error() -> OnError {
    OnError::SkipAndLog
}

fn default_on_parse_error() -> OnError {
    OnError::SkipAndLog
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ArgEnum))]
pub enum OnError {
    Fail,
    SkipAndLog,
}
