use anyhow::{anyhow, Context, Result};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use url::Url;

/// Path of the resolver endpoint; URLs pointing back at it are never followed.
pub const RESOLVER_PATH: &str = "/resolve-redirect";

/// Parallel resolutions per batch request.
pub const BATCH_CONCURRENCY: usize = 8;

/// True when `url` would call this service's own resolver.
pub fn is_self_call(url: &str, own_host: Option<&str>) -> bool {
    match own_host {
        Some(host) if !host.is_empty() => url.contains(RESOLVER_PATH) && url.contains(host),
        _ => false,
    }
}

/// Follow redirects for `url` and return the final URL.
///
/// Tries `HEAD` first and falls back to `GET` when `HEAD` fails, returns a
/// non-2xx status, or did not move. A URL that does not redirect comes back
/// exactly as given.
pub async fn resolve_redirect(client: &Client, url: &str) -> Result<String> {
    let original = Url::parse(url).with_context(|| format!("Invalid URL '{}'", url))?;

    let head = client.head(original.clone()).send().await;
    let final_url = match head {
        Ok(resp) if resp.status().is_success() && resp.url() != &original => {
            resp.url().clone()
        }
        Ok(_) | Err(_) => {
            debug!("HEAD did not resolve {}, falling back to GET", url);
            let resp = client
                .get(original.clone())
                .send()
                .await
                .map_err(|e| anyhow!("Failed to resolve {}: {}", url, e))?;
            resp.url().clone()
        }
    };

    if final_url == original {
        Ok(url.to_string())
    } else {
        info!("Resolved {} -> {}", url, final_url);
        Ok(final_url.to_string())
    }
}

/// Resolve many URLs concurrently. Each resolution is independent; failures
/// map back to the original URL.
pub async fn resolve_redirect_batch(
    client: &Client,
    urls: Vec<String>,
    max_concurrent: usize,
    own_host: Option<&str>,
) -> BTreeMap<String, String> {
    let pairs: Vec<(String, String)> = stream::iter(urls)
        .map(|url| async move {
            if is_self_call(&url, own_host) {
                return (url.clone(), url);
            }
            match resolve_redirect(client, &url).await {
                Ok(resolved) => (url, resolved),
                Err(e) => {
                    warn!("{}", e);
                    (url.clone(), url)
                }
            }
        })
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;

    pairs.into_iter().collect()
}
