/// Traversal state carried along a project → directory → file branch.
///
/// Each step produces a new value instead of mutating the parent's, so
/// branches in flight never alias state. Fields only fill forward, they
/// are never reset within one branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlPosition {
    pub project_name: Option<String>,
    pub current_dir: Option<String>,
    pub filename: Option<String>,
}

impl CrawlPosition {
    pub fn for_project(name: &str) -> Self {
        Self {
            project_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn with_dir(&self, dir: &str) -> Self {
        let mut pos = self.clone();
        pos.current_dir = Some(dir.to_string());
        pos
    }

    pub fn with_file(&self, file: &str) -> Self {
        let mut pos = self.clone();
        pos.filename = Some(file.to_string());
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_fills_forward() {
        let pos = CrawlPosition::for_project("Scrapy");
        assert_eq!(Some("Scrapy".to_string()), pos.project_name);
        assert_eq!(None, pos.current_dir);
        assert_eq!(None, pos.filename);

        let pos = pos.with_dir("docs");
        assert_eq!(Some("Scrapy".to_string()), pos.project_name);
        assert_eq!(Some("docs".to_string()), pos.current_dir);
        assert_eq!(None, pos.filename);

        let pos = pos.with_file("faq.rst");
        assert_eq!(Some("Scrapy".to_string()), pos.project_name);
        assert_eq!(Some("docs".to_string()), pos.current_dir);
        assert_eq!(Some("faq.rst".to_string()), pos.filename);
    }

    #[test]
    fn update_does_not_alias_parent() {
        let parent = CrawlPosition::for_project("Scrapy");
        let child = parent.with_dir("docs");

        assert_eq!(None, parent.current_dir);
        assert_eq!(Some("docs".to_string()), child.current_dir);

        let sibling = parent.with_dir("extras");
        assert_eq!(Some("docs".to_string()), child.current_dir);
        assert_eq!(Some("extras".to_string()), sibling.current_dir);
    }
}
