/// A directory to walk in a project, with the filenames expected inside it.
#[derive(Debug, PartialEq, Eq)]
pub struct ProjectDir {
    pub name: &'static str,
    pub files: &'static [&'static str],
}

/// Immutable description of a project to walk.
///
/// `short_url` is relative to the site homepage; `dirs` keeps the walk
/// order of the original table.
#[derive(Debug, PartialEq, Eq)]
pub struct Project {
    pub name: &'static str,
    pub short_url: &'static str,
    pub dirs: &'static [ProjectDir],
}

/// All projects to walk, shared read-only by every traversal branch.
pub static PROJECTS: &[Project] = &[
    Project {
        name: "Scrapy",
        short_url: "/scrapy/scrapy",
        dirs: &[
            ProjectDir {
                name: "docs",
                files: &["README", "conf.py", "faq.rst"],
            },
            ProjectDir {
                name: "scrapy",
                files: &["VERSION", "spider.py"],
            },
            ProjectDir {
                name: "extras",
                files: &["scrapy.1", "scrapy_zsh_completion"],
            },
        ],
    },
    Project {
        name: "scrapyd",
        short_url: "/scrapy/scrapyd",
        dirs: &[
            ProjectDir {
                name: "docs",
                files: &["conf.py", "index.rst", "install.rst"],
            },
            ProjectDir {
                name: "scrapyd",
                files: &["VERSION", "app.py", "utils.py"],
            },
            ProjectDir {
                name: "extras",
                files: &["test-scrapyd.sh"],
            },
        ],
    },
    Project {
        name: "scrapylib",
        short_url: "/scrapinghub/scrapylib",
        dirs: &[
            ProjectDir {
                name: "scrapylib",
                files: &["redisqueue.py", "links.py"],
            },
            ProjectDir {
                name: "tests",
                files: &["test_links.py", "test_magicfields.py"],
            },
        ],
    },
];
