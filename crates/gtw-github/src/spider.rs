use anyhow::anyhow;
use gtw_crawler::{FetchRequest, Spider};
use lazy_static::lazy_static;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::extract::extract_links;
use crate::position::CrawlPosition;
use crate::project::{Project, PROJECTS};
use crate::walker::{resolve_children, resolve_projects, Step};

lazy_static! {
    static ref SEARCH_FORM: Selector = Selector::parse("form.js-site-search-form").unwrap();
    static ref REPO_LINKS: Selector =
        Selector::parse("ul.repo-list.js-repo-list > li > h3 > a").unwrap();
    static ref ITEM_LINKS: Selector =
        Selector::parse("a.js-directory-link.js-navigation-open").unwrap();
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubSpiderConfig {
    #[serde(default = "default_start_url")]
    pub start_url: String,

    /// Query submitted in the site search form to locate the projects.
    #[serde(default = "default_query")]
    pub query: String,
}

impl Default for GitHubSpiderConfig {
    fn default() -> Self {
        Self {
            start_url: default_start_url(),
            query: default_query(),
        }
    }
}

fn default_start_url() -> String {
    String::from("https://github.com/")
}

fn default_query() -> String {
    String::from("scrapy")
}

/// Where a fetched page sits in the walk; drives which parser handles it.
/// Transitions are one-way, `Directory` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback {
    Home,
    SearchResults,
    ProjectRoot,
    Directory,
}

/// Context bag carried from a request to its response callback.
#[derive(Debug, Clone, Default)]
pub struct Meta {
    pub position: CrawlPosition,
    pub project: Option<&'static Project>,
}

type Request = FetchRequest<Callback, Meta>;

pub struct GitHubSpider {
    config: GitHubSpiderConfig,
    allowed_domain: Option<String>,
}

impl Spider for GitHubSpider {
    type Config = GitHubSpiderConfig;
    type Callback = Callback;
    type Meta = Meta;

    fn new(config: &GitHubSpiderConfig) -> anyhow::Result<Self> {
        let allowed_domain = Url::parse(&config.start_url)?
            .domain()
            .map(str::to_string);

        Ok(Self {
            config: config.clone(),
            allowed_domain,
        })
    }

    fn start(&self) -> Vec<Request> {
        vec![FetchRequest::new(
            self.config.start_url.clone(),
            Callback::Home,
        )]
    }

    fn accept(&self, url: &str) -> bool {
        let Some(allowed) = &self.allowed_domain else {
            return true;
        };
        match Url::parse(url).ok().and_then(|u| u.domain().map(str::to_string)) {
            Some(domain) => {
                domain == *allowed || domain.ends_with(&format!(".{allowed}"))
            }
            None => false,
        }
    }

    fn parse(&mut self, page: String, request: Request) -> anyhow::Result<Vec<Request>> {
        let base = Url::parse(&request.url)?;
        let html = Html::parse_document(&page);

        match request.callback {
            Callback::Home => self.parse_home(&html, &base),
            Callback::SearchResults => Ok(self.parse_search_results(&html, &base)),
            Callback::ProjectRoot => Ok(self.parse_project(&html, &base, &request.meta)),
            Callback::Directory => Ok(self.parse_directory(&html, &base, &request.meta)),
        }
    }
}

impl GitHubSpider {
    /// Submit the site search form with the configured query.
    fn parse_home(&self, html: &Html, base: &Url) -> anyhow::Result<Vec<Request>> {
        let form = html
            .select(&SEARCH_FORM)
            .next()
            .ok_or_else(|| anyhow!("Missing search form on {base}"))?;

        let action = form.value().attr("action").unwrap_or("/search");
        let mut url = base.join(action)?;
        url.query_pairs_mut().append_pair("q", &self.config.query);

        Ok(vec![FetchRequest::new(url, Callback::SearchResults)])
    }

    /// Locate each project of the table among the search results.
    fn parse_search_results(&self, html: &Html, base: &Url) -> Vec<Request> {
        let links = extract_links(html, &REPO_LINKS, base);

        resolve_projects(PROJECTS, &links)
            .into_iter()
            .map(|(project, url)| {
                FetchRequest::with_meta(
                    url,
                    Callback::ProjectRoot,
                    Meta {
                        position: CrawlPosition::for_project(project.name),
                        project: Some(project),
                    },
                )
            })
            .collect()
    }

    /// Walk into each expected directory of the project's root listing.
    fn parse_project(&self, html: &Html, base: &Url, meta: &Meta) -> Vec<Request> {
        let Some(project) = meta.project else {
            log::error!("Missing project in request meta for {base}, skipping page");
            return vec![];
        };

        let links = extract_links(html, &ITEM_LINKS, base);
        let dirs = project.dirs.iter().map(|dir| dir.name);

        resolve_children(dirs, &links, &meta.position, Step::Directory)
            .into_iter()
            .map(|(_, position, url)| {
                FetchRequest::with_meta(
                    url,
                    Callback::Directory,
                    Meta {
                        position,
                        project: meta.project,
                    },
                )
            })
            .collect()
    }

    /// Leaf of the walk: log the expected files found here, fetch nothing
    /// further. File-level fetching would be plugged in at this point.
    fn parse_directory(&self, html: &Html, base: &Url, meta: &Meta) -> Vec<Request> {
        let Some(project) = meta.project else {
            log::error!("Missing project in request meta for {base}, skipping page");
            return vec![];
        };

        let dir = project
            .dirs
            .iter()
            .find(|dir| Some(dir.name) == meta.position.current_dir.as_deref());
        let Some(dir) = dir else {
            log::error!(
                "Unknown directory {:?} for project `{}`, skipping page",
                meta.position.current_dir,
                project.name
            );
            return vec![];
        };

        let links = extract_links(html, &ITEM_LINKS, base);
        for (name, position, url) in
            resolve_children(dir.files.iter().copied(), &links, &meta.position, Step::File)
        {
            log::debug!(
                "Now on `{}` / `{}` / `{name}` ({url})",
                position.project_name.as_deref().unwrap_or(""),
                position.current_dir.as_deref().unwrap_or(""),
            );
        }

        vec![]
    }
}
