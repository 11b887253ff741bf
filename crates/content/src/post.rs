//! Post documents: YAML front-matter followed by a Markdown body.

use chrono::Utc;
use pulldown_cmark::{html, Options, Parser};
use serde::{Deserialize, Serialize};

const DEFAULT_AUTHOR: &str = "Engineer";
const DEFAULT_READ_TIME: &str = "5 min read";

/// Front-matter keys. Everything is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub excerpt: Option<String>,
    pub tags: Option<Vec<String>>,
    pub author: Option<String>,
    pub read_time: Option<String>,
}

/// Listing entry for the blog index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub author: String,
    pub read_time: String,
}

/// A full post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(flatten)]
    pub summary: PostSummary,
    /// Raw Markdown body
    pub content: String,
    /// Rendered HTML body
    pub html: String,
}

impl Post {
    /// Build a post from front-matter and body, filling defaults.
    pub fn new(slug: &str, front: FrontMatter, body: &str) -> Self {
        let summary = PostSummary {
            slug: slug.to_string(),
            title: non_empty(front.title).unwrap_or_else(|| slug.to_string()),
            date: non_empty(front.date).unwrap_or_else(|| Utc::now().to_rfc3339()),
            excerpt: front.excerpt.unwrap_or_default(),
            tags: front.tags.unwrap_or_default(),
            author: non_empty(front.author).unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            read_time: non_empty(front.read_time)
                .unwrap_or_else(|| DEFAULT_READ_TIME.to_string()),
        };

        Self {
            summary,
            content: body.to_string(),
            html: render_markdown(body),
        }
    }
}

/// Blank front-matter values count as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Split a document into (front-matter, body).
///
/// Front-matter must open on the first line with `---` and close with a
/// line that is exactly `---`. Anything else is treated as all body.
pub fn split_front_matter(src: &str) -> (Option<&str>, &str) {
    let src = src.strip_prefix('\u{feff}').unwrap_or(src);

    let Some(rest) = src
        .strip_prefix("---\n")
        .or_else(|| src.strip_prefix("---\r\n"))
    else {
        return (None, src);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }

    (None, src)
}

/// Parse front-matter YAML. An empty block yields defaults.
pub fn parse_front_matter(yaml: &str) -> Result<FrontMatter, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(FrontMatter::default());
    }
    serde_yaml::from_str(yaml)
}

/// Render Markdown to HTML.
pub fn render_markdown(body: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(body, options);
    let mut out = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
