use ::thiserror::Error;

use crate::gateways::ChannelExplorer;
use crate::gateways::ExtractionTarget;
use crate::gateways::PageExtract;
use crate::utils::aliases::Fallible;

#[derive(Debug, Error)]
#[error("crawl exhausted after {attempts} attempts while enumerating {subject}")]
pub struct CrawlExhausted {
    pub subject: &'static str,
    pub attempts: usize,
}

/// Fully realizes a lazily-rendered, virtualized element list: waits out a short
/// first-appearance window, then alternates scroll and re-query until two
/// consecutive polls agree on the element count. Stability is never declared
/// before at least one scroll has happened; a selector that never matches within
/// the window yields the empty set.
#[derive(Debug, Clone, Copy)]
pub struct ScrollUntilStablePolicy {
    pub first_match_timeout: ::std::time::Duration,
    pub poll_interval: ::std::time::Duration,
}

impl Default for ScrollUntilStablePolicy {
    fn default() -> Self {
        Self {
            first_match_timeout: ::std::time::Duration::from_millis(500),
            poll_interval: ::std::time::Duration::from_secs(1),
        }
    }
}

impl ScrollUntilStablePolicy {
    pub async fn realize(
        &self, explorer: &::std::sync::Arc<dyn ChannelExplorer>, target: ExtractionTarget,
    ) -> Fallible<Vec<PageExtract>> {
        let mut matches = ::std::sync::Arc::clone(explorer).extract(target).await?;

        if matches.is_empty() {
            ::tokio::time::sleep(self.first_match_timeout).await;
            matches = ::std::sync::Arc::clone(explorer).extract(target).await?;

            if matches.is_empty() {
                return Ok(Vec::new());
            }
        }

        loop {
            let before = matches.len();

            ::std::sync::Arc::clone(explorer).scroll_down().await?;
            ::tokio::time::sleep(self.poll_interval).await;

            matches = ::std::sync::Arc::clone(explorer).extract(target).await?;

            if matches.len() == before {
                return Ok(matches);
            }
        }
    }
}

/// Bounded whole-page-reload recovery around one (navigate, scroll-and-wait)
/// sequence. An attempt that errors or comes back empty is retried; exhaustion is
/// `CrawlExhausted`. No backoff.
#[derive(Debug, Clone, Copy)]
pub struct NavigationRetryPolicy {
    pub max_attempts: usize,
}

impl Default for NavigationRetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 5 }
    }
}

impl NavigationRetryPolicy {
    pub async fn run<T, F, Fut>(&self, subject: &'static str, mut attempt: F) -> Fallible<Vec<T>>
    where
        F: FnMut(usize) -> Fut,
        Fut: ::std::future::Future<Output = Fallible<Vec<T>>>,
    {
        for nth in 1..=self.max_attempts {
            match attempt(nth).await {
                Ok(matches) if !matches.is_empty() => return Ok(matches),
                Ok(_) => ::tracing::warn!(subject, attempt = nth, "enumeration came back empty"),
                Err(error) => ::tracing::warn!(subject, attempt = nth, %error, "navigation attempt failed"),
            }
        }

        Err(CrawlExhausted { subject, attempts: self.max_attempts }.into())
    }
}
