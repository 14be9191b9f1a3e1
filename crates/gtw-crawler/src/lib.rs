mod config;
mod crawler;
mod spider;

pub use config::{CrawlerConfig, OnError};
pub use crawler::crawl_spider;
pub use spider::{CountedTx, FetchRequest, Spider};

pub use anyhow;
