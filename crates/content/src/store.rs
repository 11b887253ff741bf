//! Post store backed by a directory of Markdown files.

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use moka::future::Cache;
use regex::Regex;
use tracing::{debug, warn};

use crate::config::ContentConfig;
use crate::error::{ContentError, Result};
use crate::post::{parse_front_matter, split_front_matter, Post, PostSummary};

/// Extensions tried, in order, when resolving a slug.
const EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Max cached posts.
const POST_CACHE_MAX_CAPACITY: u64 = 1_000;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid slug regex"));

/// Reads posts from disk and caches parsed results for a short TTL.
#[derive(Clone)]
pub struct PostStore {
    dir: PathBuf,
    posts: Cache<String, Arc<Post>>,
    listing: Cache<(), Arc<Vec<PostSummary>>>,
}

impl PostStore {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            posts: Cache::builder()
                .max_capacity(POST_CACHE_MAX_CAPACITY)
                .time_to_live(ttl)
                .build(),
            listing: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }

    pub fn from_config(config: &ContentConfig) -> Self {
        Self::new(&config.posts_dir, Duration::from_secs(config.cache_ttl_secs))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether the posts directory exists.
    pub async fn is_available(&self) -> bool {
        tokio::fs::metadata(&self.dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    /// All posts, newest first. Unreadable files are skipped.
    pub async fn list(&self) -> Arc<Vec<PostSummary>> {
        self.listing
            .get_with((), async { Arc::new(self.scan().await) })
            .await
    }

    /// One post by slug. A trailing `.md`/`.mdx` is ignored.
    pub async fn get(&self, slug: &str) -> Result<Option<Arc<Post>>> {
        let slug = normalize_slug(slug)?;

        if let Some(post) = self.posts.get(&slug).await {
            debug!(slug = %slug, "Post cache hit");
            return Ok(Some(post));
        }

        for ext in EXTENSIONS {
            let path = self.dir.join(format!("{}.{}", slug, ext));
            match tokio::fs::read_to_string(&path).await {
                Ok(src) => {
                    let post = Arc::new(parse_post(&slug, &path, &src)?);
                    self.posts.insert(slug, post.clone()).await;
                    return Ok(Some(post));
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(source) => return Err(ContentError::Io { path, source }),
            }
        }

        Ok(None)
    }

    /// Drop cached posts and listing.
    pub fn invalidate(&self) {
        self.posts.invalidate_all();
        self.listing.invalidate_all();
    }

    async fn scan(&self) -> Vec<PostSummary> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "Failed to read posts directory");
                return Vec::new();
            }
        };

        let mut summaries = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Failed to read directory entry");
                    break;
                }
            };

            let path = entry.path();
            let Some(slug) = post_slug(&path) else {
                continue;
            };

            let loaded = match tokio::fs::read_to_string(&path).await {
                Ok(src) => parse_post(&slug, &path, &src),
                Err(source) => Err(ContentError::Io {
                    path: path.clone(),
                    source,
                }),
            };

            match loaded {
                Ok(post) => summaries.push(post.summary),
                Err(e) => warn!(error = %e, "Skipping post"),
            }
        }

        sort_newest_first(&mut summaries);
        summaries
    }
}

fn parse_post(slug: &str, path: &Path, src: &str) -> Result<Post> {
    let (yaml, body) = split_front_matter(src);
    let front = match yaml {
        Some(yaml) => parse_front_matter(yaml).map_err(|source| ContentError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })?,
        None => Default::default(),
    };
    Ok(Post::new(slug, front, body))
}

/// Slug for a post file, or `None` if it is not a post.
fn post_slug(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    if !EXTENSIONS.contains(&ext) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    SLUG_RE.is_match(stem).then(|| stem.to_string())
}

fn normalize_slug(slug: &str) -> Result<String> {
    let slug = slug
        .strip_suffix(".mdx")
        .or_else(|| slug.strip_suffix(".md"))
        .unwrap_or(slug);

    if !SLUG_RE.is_match(slug) {
        return Err(ContentError::InvalidSlug(slug.to_string()));
    }
    Ok(slug.to_string())
}

fn sort_newest_first(posts: &mut [PostSummary]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
}
