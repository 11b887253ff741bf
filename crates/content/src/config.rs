//! Content configuration.

use serde::{Deserialize, Serialize};

/// Blog content configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Directory holding `*.md` / `*.mdx` posts
    #[serde(default = "default_posts_dir")]
    pub posts_dir: String,
    /// How long parsed posts stay cached, in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_posts_dir() -> String {
    "content/posts".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    60
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            posts_dir: default_posts_dir(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}
