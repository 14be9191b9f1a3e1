use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Error, Result};
use futures::{future, stream, try_join, StreamExt};
use lazy_static::lazy_static;
use reqwest::header::USER_AGENT;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::config::{CrawlerConfig, OnError};
use crate::spider::{CountedTx, FetchRequest, Spider};

lazy_static! {
    static ref HTTP_CLI: reqwest::Client = reqwest::ClientBuilder::new()
        .gzip(true)
        .deflate(true)
        .build()
        .unwrap();
}

#[derive(Debug)]
struct Page<C, M> {
    body: String,
    request: FetchRequest<C, M>,
}

async fn download<C, M>(
    config: &CrawlerConfig,
    request: FetchRequest<C, M>,
) -> Result<Page<C, M>> {
    if let Some(delay) = config.download_delay_ms {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let resp = HTTP_CLI
        .get(&request.url)
        .header(USER_AGENT, &config.user_agent)
        .send()
        .await?;

    let body = resp.text().await?;

    Ok(Page { body, request })
}

fn until_err<T, E>(
    err: &mut &mut Result<(), E>,
    item: Result<T, E>,
) -> impl Future<Output = Option<T>> {
    match item {
        Ok(item) => future::ready(Some(item)),
        Err(e) => {
            **err = Err(e);
            future::ready(None)
        }
    }
}

pub async fn crawl_spider<T>(
    crawler_conf: &CrawlerConfig,
    spider_conf: &T::Config,
) -> anyhow::Result<()>
where
    T: Spider + 'static,
{
    let pages_in = Arc::new(AtomicUsize::new(0));
    let pages_out = Arc::new(AtomicUsize::new(0));

    let (tx_stop, rx_stop) = crossbeam_channel::unbounded::<()>();
    let (tx_req, rx_req) = mpsc::unbounded_channel::<FetchRequest<T::Callback, T::Meta>>();
    let (tx_page, rx_page) =
        crossbeam_channel::bounded::<Page<T::Callback, T::Meta>>(crawler_conf.page_buffer);

    let tx_req = CountedTx::new(tx_req, pages_in.clone());

    // Workers

    let mut workers = vec![];
    for id in 0..crawler_conf.num_workers {
        let rx_stop = rx_stop.clone();
        let rx_page = rx_page.clone();
        let tx_req = tx_req.clone();
        let pages_out = pages_out.clone();
        let spider_conf = spider_conf.clone();
        let crawler_conf = crawler_conf.clone();
        let worker = thread::Builder::new()
            .name(format!("{id}"))
            .spawn(move || {
                let mut spider = <T as Spider>::new(&spider_conf)?;
                loop {
                    crossbeam_channel::select! {
                        recv(rx_page) -> page => {
                            if let Ok(Page { body, request }) = page {
                                let url = request.url.clone();
                                match spider.parse(body, request) {
                                    Ok(requests) => {
                                        for req in requests {
                                            if spider.accept(&req.url) {
                                                tx_req.send(req);
                                            } else {
                                                log::debug!("Skipping URL {}: not accepted", req.url);
                                            }
                                        }
                                    }
                                    Err(e) => match crawler_conf.on_parse_error {
                                        OnError::SkipAndLog => {
                                            log::error!("Skipping parse for page {url} got: {e}");
                                        }
                                        OnError::Fail => {
                                            pages_out.fetch_add(1, Ordering::SeqCst);
                                            return Err(e);
                                        }
                                    },
                                }
                                pages_out.fetch_add(1, Ordering::SeqCst);
                            } else {
                                break
                            }
                        },
                        recv(rx_stop) -> _ => break
                    }
                }
                Ok::<(), Error>(())
            })?;
        workers.push(worker);
    }
    let workers = async move {
        tokio::task::spawn_blocking(|| {
            for w in workers {
                w.join().unwrap()?;
            }
            Ok::<(), Error>(())
        })
        .await?
    };

    // Downloader

    let pages_in_c = pages_in.clone();
    let downloader = async move {
        let stream = UnboundedReceiverStream::new(rx_req)
            .zip(stream::repeat_with(move || pages_in_c.clone()))
            .map(|(req, pages_in)| async move {
                download(crawler_conf, req).await.map_err(|e| {
                    pages_in.fetch_sub(1, Ordering::SeqCst);
                    e
                })
            })
            .buffer_unordered(crawler_conf.concurrent_downloads);

        match crawler_conf.on_dl_error {
            OnError::Fail => {
                let mut err = Ok::<(), Error>(());
                stream
                    .scan(&mut err, until_err)
                    .map(|page| tx_page.send(page).ok())
                    .collect::<Vec<_>>()
                    .await;
                err
            }
            OnError::SkipAndLog => {
                stream
                    .filter_map(
                        |dl| async move { dl.map_err(|e| log::warn!("Skipping URL: {e}")).ok() },
                    )
                    .map(|page| tx_page.send(page).ok())
                    .collect::<Vec<_>>()
                    .await;

                Ok(())
            }
        }
    };

    // Seeder

    let spider = <T as Spider>::new(spider_conf)?;
    let seeder = async move {
        for req in spider.start() {
            tx_req.send(req);
        }
        drop(tx_req);
        Ok::<(), Error>(())
    };

    // Run all tasks

    let handle_sigint = crawler_conf.handle_sigint;
    let num_workers = crawler_conf.num_workers;
    let done = async move {
        loop {
            if handle_sigint {
                if timeout(Duration::from_secs(1), tokio::signal::ctrl_c())
                    .await
                    .is_ok()
                {
                    return Err::<(), _>(anyhow!("Interrupted"));
                }
            } else {
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
            if pages_out.load(Ordering::SeqCst) == pages_in.load(Ordering::SeqCst) {
                for _ in 0..num_workers {
                    tx_stop.send(()).ok();
                }
                return Ok::<_, Error>(());
            }
        }
    };

    let res = try_join!(workers, downloader, seeder, done);
    <T as Spider>::new(spider_conf)?.finalizer();
    res?;

    Ok(())
}
