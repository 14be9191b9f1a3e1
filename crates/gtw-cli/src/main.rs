use std::fs::File;
use std::path::PathBuf;
use std::{env, io};

use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use gtw_crawler::{crawl_spider, CrawlerConfig, OnError};
use gtw_github::{GitHubSpider, GitHubSpiderConfig};
use tokio::runtime;

/// GitHub Tree Walker
#[derive(Debug, Parser)]
#[clap(version)]
pub struct Args {
    #[clap(subcommand)]
    pub cmd: SubCommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum SubCommand {
    #[clap(name = "crawl")]
    Crawl(CrawlArgs),
    #[clap(hide = true)]
    Completion,
}

/// Walk the configured projects starting from the site homepage
#[derive(Debug, clap::Args)]
pub struct CrawlArgs {
    /// Search query used to locate the projects
    #[clap(long, default_value = "scrapy")]
    pub query: String,
    /// Page to start crawling from
    #[clap(long, default_value = "https://github.com/")]
    pub start_url: String,
    /// Optional default crawler yaml configuration file
    #[clap(env = "GTW_CRAWLER_CONFIG", parse(from_os_str), long)]
    pub crawler_config: Option<PathBuf>,
    /// Override crawler's user agent
    #[clap(long)]
    pub user_agent: Option<String>,
    /// Override crawler's page buffer size
    #[clap(long)]
    pub page_buffer: Option<usize>,
    /// Override crawler's maximum concurrent page downloads
    #[clap(long)]
    pub concurrent_downloads: Option<usize>,
    /// Delay in milliseconds between page downloads
    #[clap(long)]
    pub download_delay_ms: Option<u64>,
    /// Override crawler's number of CPU workers used to parse pages
    #[clap(long)]
    pub num_workers: Option<usize>,
    /// No SIGINT handling
    #[clap(long)]
    pub no_sigint: bool,
    /// Override crawler's download error handling strategy
    #[clap(arg_enum, long)]
    pub on_dl_error: Option<OnError>,
    /// Override crawler's parse error handling strategy
    #[clap(arg_enum, long)]
    pub on_parse_error: Option<OnError>,
    /// When quiet no logs are outputted
    #[clap(long, short)]
    pub quiet: bool,
}

impl TryFrom<&CrawlArgs> for CrawlerConfig {
    type Error = anyhow::Error;

    fn try_from(args: &CrawlArgs) -> Result<Self, Self::Error> {
        let mut conf = if let Some(file) = args.crawler_config.as_ref().map(File::open) {
            serde_yaml::from_reader(file?)?
        } else {
            CrawlerConfig::default()
        };
        if let Some(user_agent) = &args.user_agent {
            conf.user_agent = user_agent.to_string();
        }
        if let Some(page_buffer) = args.page_buffer {
            conf.page_buffer = page_buffer;
        }
        if let Some(concurrent_downloads) = args.concurrent_downloads {
            conf.concurrent_downloads = concurrent_downloads;
        }
        if let Some(delay) = args.download_delay_ms {
            conf.download_delay_ms = Some(delay);
        }
        if let Some(num_workers) = args.num_workers {
            conf.num_workers = num_workers;
        }
        if let Some(on_dl_error) = args.on_dl_error {
            conf.on_dl_error = on_dl_error;
        }
        if let Some(on_parse_error) = args.on_parse_error {
            conf.on_parse_error = on_parse_error;
        }
        if args.no_sigint {
            conf.handle_sigint = false;
        }
        Ok(conf)
    }
}

pub fn crawl(args: CrawlArgs) -> anyhow::Result<()> {
    let crawler_conf = (&args).try_into()?;
    let spider_conf = GitHubSpiderConfig {
        start_url: args.start_url,
        query: args.query,
    };
    let rt = runtime::Builder::new_multi_thread().enable_all().build()?;
    rt.block_on(crawl_spider::<GitHubSpider>(&crawler_conf, &spider_conf))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.cmd {
        SubCommand::Crawl(args) => {
            if !args.quiet {
                env::set_var("RUST_LOG", "gtw_github=debug,gtw_crawler=warn");
                env_logger::init();
            }
            crawl(args)
        }
        SubCommand::Completion => {
            generate(Shell::Bash, &mut Args::command(), "gtw", &mut io::stdout());
            Ok(())
        }
    }
}
