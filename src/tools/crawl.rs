use crate::core::text::truncate_chars;
use crate::scraping::extractor::HtmlExtractor;
use crate::scraping::fetcher::{FetchError, PageSource};
use crate::types::*;
use futures::stream::{self, StreamExt};
use moka::future::Cache;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Characters of a linked page's summary kept in its digest.
pub const DIGEST_SUMMARY_CHARS: usize = 300;
const CACHE_CAPACITY: u64 = 10_000;

fn default_exclude_patterns() -> Vec<String> {
    [
        // Common non-content patterns
        "/login", "/logout", "/signup", "/register", "/cart", "/checkout", "/admin", "/api/",
        ".pdf", ".zip", ".exe", ".dmg", ".tar", ".gz", ".mp4", ".mp3", ".wav", ".avi", ".mov",
        ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

/// What the crawler remembers about a visited linked page.
#[derive(Debug, Clone)]
pub struct CachedPage {
    pub url: String,
    pub title: String,
    pub site_type: SiteType,
    pub summary: String,
    /// Absolute nav links found on the page, candidates for the next level.
    pub links: Vec<String>,
}

impl CachedPage {
    fn digest(&self, depth: u32) -> LinkedPageDigest {
        LinkedPageDigest {
            url: self.url.clone(),
            depth,
            title: self.title.clone(),
            site_type: self.site_type,
            summary: self.summary.clone(),
            error: None,
        }
    }
}

/// Follows same-site nav links breadth-first to spend an attempt's depth and
/// page budget. Successfully visited pages are cached across attempts.
pub struct LinkedPageCrawler {
    max_concurrent: usize,
    exclude_patterns: Vec<String>,
    extractor: HtmlExtractor,
    cache: Cache<String, Arc<CachedPage>>,
}

impl LinkedPageCrawler {
    pub fn new(max_concurrent: usize, cache_ttl: Duration) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
            exclude_patterns: default_exclude_patterns(),
            extractor: HtmlExtractor::new(),
            cache: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(cache_ttl)
                .build(),
        }
    }

    /// Visit up to `max_pages - 1` linked pages (the root counts as one) no
    /// deeper than `recursion_depth` link hops from `root`.
    ///
    /// Digests come back level by level, in link order within a level. A page
    /// that fails to load still yields a digest with `error` set and counts
    /// against the budget.
    pub async fn crawl(
        &self,
        source: &dyn PageSource,
        root: &PageExtract,
        params: RetryParams,
    ) -> Vec<LinkedPageDigest> {
        let budget = params.max_pages.saturating_sub(1) as usize;
        if params.recursion_depth == 0 || budget == 0 {
            return Vec::new();
        }
        let Some(base_domain) = Url::parse(&root.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
        else {
            return Vec::new();
        };
        let timeout = Duration::from_millis(params.timeout_ms);

        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(normalize_url(&root.url));
        let mut frontier =
            self.next_frontier(root.nav_links.iter().map(|l| l.href.as_str()), &base_domain, &mut visited);

        let mut digests = Vec::new();
        let mut depth = 1;
        while depth <= params.recursion_depth && !frontier.is_empty() && digests.len() < budget {
            frontier.truncate(budget - digests.len());
            debug!("Crawling {} linked page(s) at depth {}", frontier.len(), depth);

            let mut level: Vec<(usize, String, Result<Arc<CachedPage>, String>)> =
                stream::iter(frontier.into_iter().enumerate())
                    .map(|(index, url)| async move {
                        let visit = self.visit(source, &url, timeout).await;
                        (index, url, visit)
                    })
                    .buffer_unordered(self.max_concurrent)
                    .collect()
                    .await;
            level.sort_by_key(|(index, _, _)| *index);

            let mut children: Vec<String> = Vec::new();
            for (_, url, visit) in level {
                match visit {
                    Ok(page) => {
                        digests.push(page.digest(depth));
                        if depth < params.recursion_depth {
                            children.extend(page.links.iter().cloned());
                        }
                    }
                    Err(e) => {
                        warn!("Failed to crawl {}: {}", url, e);
                        digests.push(LinkedPageDigest {
                            url,
                            depth,
                            title: String::new(),
                            site_type: SiteType::General,
                            summary: String::new(),
                            error: Some(e),
                        });
                    }
                }
            }

            frontier = self.next_frontier(children.iter().map(String::as_str), &base_domain, &mut visited);
            depth += 1;
        }

        info!(
            "Crawled {} linked page(s) from {} (depth {}, maxPages {})",
            digests.len(),
            root.url,
            params.recursion_depth,
            params.max_pages
        );
        digests
    }

    fn next_frontier<'a>(
        &self,
        links: impl Iterator<Item = &'a str>,
        base_domain: &str,
        visited: &mut HashSet<String>,
    ) -> Vec<String> {
        links
            .filter(|url| should_crawl(url, base_domain, &self.exclude_patterns))
            .filter(|url| visited.insert(normalize_url(url)))
            .map(|url| url.to_string())
            .collect()
    }

    async fn visit(
        &self,
        source: &dyn PageSource,
        url: &str,
        timeout: Duration,
    ) -> Result<Arc<CachedPage>, String> {
        let key = normalize_url(url);
        if let Some(hit) = self.cache.get(&key).await {
            debug!("Linked page cache hit: {}", url);
            return Ok(hit);
        }

        let envelope = tokio::time::timeout(timeout, source.fetch(url, None, timeout))
            .await
            .unwrap_or_else(|_| Err(FetchError::Timeout(timeout.as_millis() as u64)))
            .map_err(|e| e.to_string())?;

        let FetchedContent::Html { body } = &envelope.content else {
            return Err(format!("Skipped non-HTML content ({:?})", envelope.kind()));
        };

        let extract = self.extractor.extract(body, &envelope.url);
        let page = Arc::new(CachedPage {
            url: envelope.url.clone(),
            title: extract.title,
            site_type: extract.site_type,
            summary: truncate_chars(&extract.summary, DIGEST_SUMMARY_CHARS),
            links: extract.nav_links.into_iter().map(|l| l.href).collect(),
        });
        self.cache.insert(key, Arc::clone(&page)).await;
        Ok(page)
    }
}

/// Normalize URL for deduplication (remove fragments, trailing slashes, etc.)
fn normalize_url(url: &str) -> String {
    if let Ok(mut parsed) = Url::parse(url) {
        parsed.set_fragment(None);
        let mut result = parsed.to_string();
        if result.ends_with('/') && result.len() > 1 {
            result.pop();
        }
        result.to_lowercase()
    } else {
        url.to_lowercase()
    }
}

/// Same site (subdomains allowed), http(s), and not an excluded path.
fn should_crawl(url: &str, base_domain: &str, exclude_patterns: &[String]) -> bool {
    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(_) => return false,
    };
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return false;
    }

    let url_domain = parsed.host_str().unwrap_or("");
    let same_site = url_domain == base_domain
        || url_domain
            .strip_suffix(base_domain)
            .is_some_and(|prefix| prefix.ends_with('.'));
    if !same_site {
        return false;
    }

    let url_lower = url.to_lowercase();
    !exclude_patterns
        .iter()
        .any(|pattern| url_lower.contains(&pattern.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves a fixed set of pages and counts fetches.
    struct SiteMap {
        pages: HashMap<String, String>,
        fetches: AtomicUsize,
    }

    impl SiteMap {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(u, b)| (u.to_string(), b.to_string()))
                    .collect(),
                fetches: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PageSource for SiteMap {
        async fn fetch(
            &self,
            url: &str,
            _referer: Option<&str>,
            _timeout: Duration,
        ) -> Result<FetchEnvelope, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            match self.pages.get(url) {
                Some(body) => Ok(FetchEnvelope {
                    url: url.to_string(),
                    content: FetchedContent::Html { body: body.clone() },
                }),
                None => Err(FetchError::Status(404)),
            }
        }
    }

    fn root_with_links(links: &[&str]) -> PageExtract {
        PageExtract {
            url: "https://site.test/".to_string(),
            nav_links: links
                .iter()
                .map(|href| NavLink {
                    href: href.to_string(),
                    text: "link".to_string(),
                })
                .collect(),
            ..Default::default()
        }
    }

    fn params(depth: u32, pages: u32) -> RetryParams {
        RetryParams {
            recursion_depth: depth,
            max_pages: pages,
            timeout_ms: 1_000,
        }
    }

    #[test]
    fn crawl_filter() {
        let excludes = default_exclude_patterns();
        assert!(should_crawl("https://site.test/a", "site.test", &excludes));
        assert!(should_crawl("https://docs.site.test/a", "site.test", &excludes));
        assert!(!should_crawl("https://other.test/a", "site.test", &excludes));
        assert!(!should_crawl("https://evilsite.test/a", "site.test", &excludes));
        assert!(!should_crawl("https://site.test.evil.test/a", "site.test", &excludes));
        assert!(!should_crawl("https://site.test/login", "site.test", &excludes));
        assert!(!should_crawl("https://site.test/file.PDF", "site.test", &excludes));
        assert_eq!(normalize_url("https://Site.test/A/#top"), "https://site.test/a");
    }

    #[tokio::test]
    async fn breadth_first_within_budget() {
        let site = SiteMap::new(&[
            ("https://site.test/a", r#"<h1>A</h1><a href="https://site.test/a1">A1</a>"#),
            ("https://site.test/b", "<h1>B</h1>"),
            ("https://site.test/a1", "<h1>A1</h1>"),
        ]);
        let crawler = LinkedPageCrawler::new(2, Duration::from_secs(60));
        let root = root_with_links(&["https://site.test/a", "https://site.test/b", "https://site.test/"]);

        let shallow = crawler.crawl(&site, &root, params(1, 10)).await;
        let urls: Vec<_> = shallow.iter().map(|d| d.url.as_str()).collect();
        assert_eq!(urls, vec!["https://site.test/a", "https://site.test/b"]);

        let deep = crawler.crawl(&site, &root, params(2, 10)).await;
        assert_eq!(deep.len(), 3);
        assert_eq!(deep[2].url, "https://site.test/a1");
        assert_eq!(deep[2].depth, 2);
        assert_eq!(deep[2].title, "A1");

        let capped = crawler.crawl(&site, &root, params(2, 2)).await;
        assert_eq!(capped.len(), 1);
    }

    #[tokio::test]
    async fn cache_reuses_pages_and_skips_failures() {
        let site = SiteMap::new(&[("https://site.test/a", "<h1>A</h1>")]);
        let crawler = LinkedPageCrawler::new(4, Duration::from_secs(60));
        let root = root_with_links(&["https://site.test/a", "https://site.test/missing"]);

        let first = crawler.crawl(&site, &root, params(1, 5)).await;
        assert_eq!(first.len(), 2);
        assert!(first[1].error.is_some());
        assert_eq!(site.fetches.load(Ordering::SeqCst), 2);

        crawler.crawl(&site, &root, params(1, 5)).await;
        // Only the failed page is fetched again.
        assert_eq!(site.fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_depth_or_single_page_budget_crawls_nothing() {
        let site = SiteMap::new(&[]);
        let crawler = LinkedPageCrawler::new(1, Duration::from_secs(60));
        let root = root_with_links(&["https://site.test/a"]);
        assert!(crawler.crawl(&site, &root, params(0, 5)).await.is_empty());
        assert!(crawler.crawl(&site, &root, params(3, 1)).await.is_empty());
        assert_eq!(site.fetches.load(Ordering::SeqCst), 0);
    }
}
