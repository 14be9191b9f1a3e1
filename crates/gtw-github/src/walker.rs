use crate::extract::PageLink;
use crate::position::CrawlPosition;
use crate::project::Project;

/// Which field of [`CrawlPosition`] a resolved child fills in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Directory,
    File,
}

/// Pair each project of the table with its continuation URL on the page.
///
/// Projects whose short URL is not among the page links are logged and
/// skipped; a missing project never aborts the run. Table order is kept.
pub fn resolve_projects<'a>(
    projects: &'a [Project],
    links: &[PageLink],
) -> Vec<(&'a Project, String)> {
    let mut resolved = vec![];
    for project in projects {
        match links.iter().find(|link| link.href == project.short_url) {
            Some(link) => resolved.push((project, link.url.clone())),
            None => {
                log::error!(
                    "Couldn't find {} in repo links, skipping project `{}`",
                    project.short_url,
                    project.name
                );
            }
        }
    }
    resolved
}

/// Pair each expected child name with an updated position and its
/// continuation URL on the page.
///
/// Children are matched against the links' visible labels; missing ones are
/// logged and skipped. Each match derives a fresh position from `position`
/// with the name recorded under the field picked by `step`.
pub fn resolve_children<'a>(
    expected: impl IntoIterator<Item = &'a str>,
    links: &[PageLink],
    position: &CrawlPosition,
    step: Step,
) -> Vec<(&'a str, CrawlPosition, String)> {
    let mut resolved = vec![];
    for name in expected {
        match links.iter().find(|link| link.label == name) {
            Some(link) => {
                let next = match step {
                    Step::Directory => position.with_dir(name),
                    Step::File => position.with_file(name),
                };
                resolved.push((name, next, link.url.clone()));
            }
            None => {
                log::error!("Couldn't find `{name}` in page items, skipping ({position:?})");
            }
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::PROJECTS;

    fn link(label: &str, href: &str, url: &str) -> PageLink {
        PageLink {
            label: label.to_string(),
            href: href.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn projects_resolved_in_table_order() {
        let links = vec![
            link("scrapylib", "/scrapinghub/scrapylib", "https://github.com/scrapinghub/scrapylib"),
            link("scrapyd", "/scrapy/scrapyd", "https://github.com/scrapy/scrapyd"),
            link("Scrapy", "/scrapy/scrapy", "https://github.com/scrapy/scrapy"),
        ];

        let resolved = resolve_projects(PROJECTS, &links);

        let names: Vec<_> = resolved.iter().map(|(p, _)| p.name).collect();
        assert_eq!(vec!["Scrapy", "scrapyd", "scrapylib"], names);
        assert_eq!("https://github.com/scrapy/scrapy", resolved[0].1);
    }

    #[test]
    fn missing_projects_skipped_without_panic() {
        // scrapylib absent from the page
        let links = vec![
            link("Scrapy", "/scrapy/scrapy", "https://github.com/scrapy/scrapy"),
            link("scrapyd", "/scrapy/scrapyd", "https://github.com/scrapy/scrapyd"),
        ];

        let resolved = resolve_projects(PROJECTS, &links);

        let names: Vec<_> = resolved.iter().map(|(p, _)| p.name).collect();
        assert_eq!(vec!["Scrapy", "scrapyd"], names);
    }

    #[test]
    fn no_projects_on_empty_page() {
        assert!(resolve_projects(PROJECTS, &[]).is_empty());
    }

    #[test]
    fn children_matched_by_label() {
        let links = vec![
            link("docs", "/scrapy/scrapy/tree/master/docs", "https://github.com/scrapy/scrapy/tree/master/docs"),
            link("extras", "/scrapy/scrapy/tree/master/extras", "https://github.com/scrapy/scrapy/tree/master/extras"),
        ];
        let position = CrawlPosition::for_project("Scrapy");

        let resolved = resolve_children(
            ["docs", "scrapy", "extras"],
            &links,
            &position,
            Step::Directory,
        );

        assert_eq!(2, resolved.len());

        let (name, pos, url) = &resolved[0];
        assert_eq!(&"docs", name);
        assert_eq!(Some("docs".to_string()), pos.current_dir);
        assert_eq!(Some("Scrapy".to_string()), pos.project_name);
        assert_eq!("https://github.com/scrapy/scrapy/tree/master/docs", url);

        let (name, pos, _) = &resolved[1];
        assert_eq!(&"extras", name);
        assert_eq!(Some("extras".to_string()), pos.current_dir);
        assert_eq!(Some("Scrapy".to_string()), pos.project_name);

        // parent untouched
        assert_eq!(None, position.current_dir);
    }

    #[test]
    fn file_step_fills_filename() {
        let links = vec![link(
            "faq.rst",
            "/scrapy/scrapy/blob/master/docs/faq.rst",
            "https://github.com/scrapy/scrapy/blob/master/docs/faq.rst",
        )];
        let position = CrawlPosition::for_project("Scrapy").with_dir("docs");

        let resolved = resolve_children(["faq.rst"], &links, &position, Step::File);

        assert_eq!(1, resolved.len());
        let (_, pos, _) = &resolved[0];
        assert_eq!(Some("faq.rst".to_string()), pos.filename);
        assert_eq!(Some("docs".to_string()), pos.current_dir);
        assert_eq!(Some("Scrapy".to_string()), pos.project_name);
    }

    #[test]
    fn first_matching_link_wins() {
        let links = vec![
            link("docs", "/first", "https://github.com/first"),
            link("docs", "/second", "https://github.com/second"),
        ];
        let position = CrawlPosition::for_project("Scrapy");

        let resolved = resolve_children(["docs"], &links, &position, Step::Directory);

        assert_eq!("https://github.com/first", resolved[0].2);
    }
}
