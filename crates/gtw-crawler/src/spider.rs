use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

/// Scraping logic plugged into the crawl loop.
///
/// Each downloaded page is handed back to [`Spider::parse`] along with the
/// request that produced it; `parse` runs to completion and yields zero or
/// more follow-up requests.
pub trait Spider {
    type Config: Clone + Send + 'static;

    /// Callback identifier attached to each request, dispatched on in `parse`.
    type Callback: Clone + Send + 'static;

    /// Context bag carried from a request to its response callback.
    type Meta: Clone + Default + Send + 'static;

    fn new(config: &Self::Config) -> anyhow::Result<Self>
    where
        Self: Sized;

    /// Requests seeding the crawl.
    fn start(&self) -> Vec<FetchRequest<Self::Callback, Self::Meta>>;

    /// Whether a follow-up request should be scheduled at all.
    fn accept(&self, _url: &str) -> bool {
        true
    }

    fn parse(
        &mut self,
        page: String,
        request: FetchRequest<Self::Callback, Self::Meta>,
    ) -> anyhow::Result<Vec<FetchRequest<Self::Callback, Self::Meta>>>;

    fn finalizer(&mut self) {}
}

#[derive(Debug, Clone)]
pub struct FetchRequest<C, M> {
    pub url: String,
    pub callback: C,
    pub meta: M,
}

impl<C, M> FetchRequest<C, M>
where
    M: Default,
{
    pub fn new(url: impl Into<String>, callback: C) -> Self {
        Self {
            url: url.into(),
            callback,
            meta: M::default(),
        }
    }
}

impl<C, M> FetchRequest<C, M> {
    pub fn with_meta(url: impl Into<String>, callback: C, meta: M) -> Self {
        Self {
            url: url.into(),
            callback,
            meta,
        }
    }
}

/// Sender that counts successful sends, used for crawl termination accounting.
#[derive(Debug)]
pub struct CountedTx<T> {
    tx: mpsc::UnboundedSender<T>,
    counter: Arc<AtomicUsize>,
}

impl<T> Clone for CountedTx<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            counter: self.counter.clone(),
        }
    }
}

impl<T> CountedTx<T> {
    pub fn new(tx: mpsc::UnboundedSender<T>, counter: Arc<AtomicUsize>) -> Self {
        Self { tx, counter }
    }

    pub fn send(&self, item: T) {
        match self.tx.send(item) {
            Ok(()) => {
                self.counter.fetch_add(1, Ordering::SeqCst);
            }
            Err(e) => {
                log::error!("Couldn't send request: {e}");
            }
        }
    }
}
