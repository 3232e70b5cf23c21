use crate::tools::orchestrator::RetryPolicy;

// ---------------------------------------------------------------------------
// ScoutConfig: file-based config loader (avurna-scout.json) with env-var fallback
// ---------------------------------------------------------------------------

pub const ENV_CONFIG_PATH: &str = "AVURNA_SCOUT_CONFIG";
pub const ENV_MAX_RECURSION_DEPTH: &str = "AVURNA_MAX_RECURSION_DEPTH";
pub const ENV_PAGE_CEILING: &str = "AVURNA_PAGE_CEILING";
pub const ENV_USER_AGENT: &str = "AVURNA_USER_AGENT";
pub const ENV_LLM_MODEL: &str = "AVURNA_LLM_MODEL";

/// Retry-loop sub-config (mirrors the `retry` key in avurna-scout.json).
#[derive(serde::Deserialize, Default, Clone, Debug)]
pub struct RetryConfig {
    /// Hard ceiling on crawl depth, and on the number of attempts. Default: 5.
    pub max_recursion_depth: Option<u32>,
    /// Hard ceiling on the per-attempt page budget. Default: 20.
    pub page_ceiling: Option<u32>,
    /// Pages added per escalation. Default: 3.
    pub page_step: Option<u32>,
    /// Milliseconds added to the fetch timeout per escalation. Default: 2000.
    pub timeout_step_ms: Option<u64>,
    /// Upper bound for the escalated fetch timeout. Default: 30000.
    pub timeout_ceiling_ms: Option<u64>,
}

impl RetryConfig {
    /// Max depth: JSON field → `AVURNA_MAX_RECURSION_DEPTH` env var → 5.
    pub fn resolve_max_recursion_depth(&self) -> u32 {
        if let Some(n) = self.max_recursion_depth {
            return n;
        }
        env_parse(ENV_MAX_RECURSION_DEPTH).unwrap_or(5)
    }

    /// Page ceiling: JSON field → `AVURNA_PAGE_CEILING` env var → 20.
    pub fn resolve_page_ceiling(&self) -> u32 {
        if let Some(n) = self.page_ceiling {
            return n;
        }
        env_parse(ENV_PAGE_CEILING).unwrap_or(20)
    }

    pub fn to_policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        RetryPolicy {
            max_recursion_depth: self.resolve_max_recursion_depth(),
            page_ceiling: self.resolve_page_ceiling(),
            depth_step: defaults.depth_step,
            page_step: self.page_step.unwrap_or(defaults.page_step),
            timeout_step_ms: self.timeout_step_ms.unwrap_or(defaults.timeout_step_ms),
            timeout_ceiling_ms: self
                .timeout_ceiling_ms
                .unwrap_or(defaults.timeout_ceiling_ms),
        }
    }
}

/// Fetch / crawl sub-config.
#[derive(serde::Deserialize, Default, Clone, Debug)]
pub struct FetchConfig {
    /// Fixed User-Agent. Ignored when `rotate_user_agent` is true.
    pub user_agent: Option<String>,
    /// Pick a random desktop browser User-Agent per request.
    pub rotate_user_agent: Option<bool>,
    /// Parallel linked-page fetches per crawl level. Default: 4.
    pub crawl_concurrency: Option<usize>,
    /// How long visited linked pages stay cached. Default: 600.
    pub cache_ttl_secs: Option<u64>,
}

impl FetchConfig {
    /// User agent: JSON field → `AVURNA_USER_AGENT` env var → built-in bot UA.
    pub fn resolve_user_agent(&self) -> String {
        if let Some(ua) = &self.user_agent {
            if !ua.trim().is_empty() {
                return ua.trim().to_string();
            }
        }
        std::env::var(ENV_USER_AGENT)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| crate::scraping::stealth::DEFAULT_USER_AGENT.to_string())
    }

    pub fn resolve_rotate_user_agent(&self) -> bool {
        self.rotate_user_agent.unwrap_or(false)
    }

    pub fn resolve_crawl_concurrency(&self) -> usize {
        self.crawl_concurrency.unwrap_or(4).max(1)
    }

    pub fn resolve_cache_ttl_secs(&self) -> u64 {
        self.cache_ttl_secs.unwrap_or(600)
    }
}

/// Text-completion sub-config. Used only for optional abstractive summaries.
#[derive(serde::Deserialize, Default, Clone, Debug)]
pub struct LlmConfig {
    /// Set to `false` to never call the LLM even when a key is present.
    pub enabled: Option<bool>,
    /// Endpoint, e.g. `https://api.openai.com/v1` or `http://localhost:11434/v1` (Ollama).
    pub base_url: Option<String>,
    /// API key. Never logged. An explicit `""` means "no key required".
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl LlmConfig {
    pub fn resolve_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// API key: JSON field (even empty) → `OPENAI_API_KEY` env var → `None`.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(k) = &self.api_key {
            return Some(k.trim().to_string());
        }
        std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
    }

    /// Base URL: JSON field → `OPENAI_BASE_URL` env var → `https://api.openai.com/v1`.
    pub fn resolve_base_url(&self) -> String {
        if let Some(u) = &self.base_url {
            if !u.trim().is_empty() {
                return u.clone();
            }
        }
        std::env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
    }

    /// Model: JSON field → `AVURNA_LLM_MODEL` env var → `gpt-4o-mini`.
    pub fn resolve_model(&self) -> String {
        if let Some(m) = &self.model {
            if !m.trim().is_empty() {
                return m.clone();
            }
        }
        std::env::var(ENV_LLM_MODEL)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "gpt-4o-mini".to_string())
    }
}

/// Top-level config loaded from `avurna-scout.json`.
#[derive(serde::Deserialize, Default, Clone, Debug)]
pub struct ScoutConfig {
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Load `avurna-scout.json` from standard locations.
///
/// Search order (first found wins):
/// 1. `AVURNA_SCOUT_CONFIG` env var path
/// 2. `./avurna-scout.json`
/// 3. `~/.avurna-scout/config.json`
///
/// Missing file → `ScoutConfig::default()` (all env-var fallbacks apply).
/// Parse error → log a warning, return `ScoutConfig::default()`.
pub fn load_scout_config() -> ScoutConfig {
    let mut candidates = vec![std::path::PathBuf::from("avurna-scout.json")];
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".avurna-scout").join("config.json"));
    }
    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        candidates.insert(0, std::path::PathBuf::from(env_path));
    }

    for path in &candidates {
        let Ok(contents) = std::fs::read_to_string(path) else {
            continue;
        };
        return match parse_scout_config(&contents) {
            Ok(cfg) => {
                tracing::info!("avurna-scout config loaded from {}", path.display());
                cfg
            }
            Err(e) => {
                tracing::warn!(
                    "avurna-scout config parse error at {}: {}; using defaults",
                    path.display(),
                    e
                );
                ScoutConfig::default()
            }
        };
    }

    ScoutConfig::default()
}

pub fn parse_scout_config(contents: &str) -> Result<ScoutConfig, serde_json::Error> {
    serde_json::from_str(contents)
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_values_take_precedence() {
        let cfg = parse_scout_config(
            r#"{"retry": {"max_recursion_depth": 3, "page_ceiling": 12, "page_step": 4},
                "fetch": {"user_agent": "TestBot/2.0", "crawl_concurrency": 0},
                "llm": {"api_key": "", "model": "llama3"}}"#,
        )
        .unwrap();

        let policy = cfg.retry.to_policy();
        assert_eq!(policy.max_recursion_depth, 3);
        assert_eq!(policy.page_ceiling, 12);
        assert_eq!(policy.page_step, 4);
        assert_eq!(policy.timeout_step_ms, 2000);
        assert_eq!(cfg.fetch.resolve_user_agent(), "TestBot/2.0");
        assert_eq!(cfg.fetch.resolve_crawl_concurrency(), 1);
        assert_eq!(cfg.llm.resolve_api_key().as_deref(), Some(""));
        assert_eq!(cfg.llm.resolve_model(), "llama3");
    }

    #[test]
    fn missing_sections_default() {
        let cfg = parse_scout_config("{}").unwrap();
        assert!(cfg.llm.resolve_enabled());
        assert!(!cfg.fetch.resolve_rotate_user_agent());
        assert_eq!(cfg.fetch.resolve_cache_ttl_secs(), 600);
    }
}
