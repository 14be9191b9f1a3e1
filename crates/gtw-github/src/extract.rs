use scraper::{Html, Selector};
use url::Url;

/// An anchor extracted from a page: its visible label, raw `href`, and the
/// canonicalized absolute URL resolved against the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub label: String,
    pub href: String,
    pub url: String,
}

/// Extract the links matching `selector`, resolved against `base`.
///
/// Anchors without an `href`, or whose `href` doesn't resolve, are dropped.
pub fn extract_links(html: &Html, selector: &Selector, base: &Url) -> Vec<PageLink> {
    html.select(selector)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let url = base.join(href).ok()?;
            let label = anchor.text().collect::<String>().trim().to_string();
            Some(PageLink {
                label,
                href: href.to_string(),
                url: url.to_string(),
            })
        })
        .collect()
}
