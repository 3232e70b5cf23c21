use rand::seq::IndexedRandom;

/// Identifies the scout honestly when rotation is off.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; AvurnaScout/1.0)";

pub const USER_AGENTS: &[&str] = &[
    // Chrome Desktop (Windows, macOS, Linux)
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36",

    // Firefox Desktop
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0",

    // Safari Desktop
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_2_1) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",

    // Edge Desktop
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36 Edg/121.0.0.0",
];

/// A random entry of [`USER_AGENTS`].
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::rng();
    USER_AGENTS
        .choose(&mut rng)
        .copied()
        .unwrap_or(DEFAULT_USER_AGENT)
}

/// How the fetcher picks a `User-Agent` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAgentPolicy {
    Fixed(String),
    Rotate,
}

impl UserAgentPolicy {
    pub fn pick(&self) -> &str {
        match self {
            UserAgentPolicy::Fixed(ua) => ua.as_str(),
            UserAgentPolicy::Rotate => random_user_agent(),
        }
    }
}

impl Default for UserAgentPolicy {
    fn default() -> Self {
        UserAgentPolicy::Fixed(DEFAULT_USER_AGENT.to_string())
    }
}
