mod extract;
mod position;
mod project;
mod spider;
mod walker;

pub use extract::{extract_links, PageLink};
pub use position::CrawlPosition;
pub use project::{Project, ProjectDir, PROJECTS};
pub use spider::{Callback, GitHubSpider, GitHubSpiderConfig, Meta};
pub use walker::{resolve_children, resolve_projects, Step};
