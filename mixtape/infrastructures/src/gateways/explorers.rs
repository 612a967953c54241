use ::async_trait::async_trait;
use ::chromiumoxide::browser::Browser;
use ::chromiumoxide::browser::BrowserConfig;
use ::chromiumoxide::element::Element;
use ::chromiumoxide::page::Page;
use ::futures_util::StreamExt as _;
use ::use_cases::gateways::ChannelExplorer;
use ::use_cases::gateways::ExtractionTarget;
use ::use_cases::gateways::PageExtract;

use crate::utils::aliases::Fallible;

/// Every selector the crawl depends on, in one swappable place. The crawl state
/// machine never sees these; it only sees what `extract` hands back.
#[derive(Debug, Clone)]
pub struct PageSelectors {
    /// One element per playlist tile on the channel's playlists tab.
    pub playlist_tiles: &'static str,
    /// The title link, queried within a tile.
    pub playlist_title: &'static str,
    /// The "view more" link, queried within a tile.
    pub playlist_link: &'static str,
    /// One element per video link on a playlist page.
    pub video_links: &'static str,
    pub consent_buttons: &'static str,
    pub consent_menu_items: &'static str,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            playlist_tiles: "#items #details",
            playlist_title: "h3 a",
            playlist_link: "#view-more a",
            video_links: "div h3 a",
            consent_buttons: "button",
            consent_menu_items: "[role='menuitem']",
        }
    }
}

/// `ChannelExplorer` over a headless Chromium instance driven through the
/// DevTools protocol. One browser, one page, owned for the crawl and closed
/// before the transfer phase starts.
pub struct ChromiumChannelExplorer {
    browser: ::tokio::sync::Mutex<Browser>,
    page: Page,
    handler_task: ::tokio::task::JoinHandle<()>,
    selectors: PageSelectors,
    navigation_timeout: ::std::time::Duration,
}

impl ChromiumChannelExplorer {
    pub async fn launch(selectors: PageSelectors) -> Fallible<Self> {
        let config = BrowserConfig::builder().build().map_err(|error| ::anyhow::anyhow!(error))?;

        let (browser, mut handler) = Browser::launch(config).await?;

        let handler_task = ::tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser: ::tokio::sync::Mutex::new(browser),
            page,
            handler_task,
            selectors,
            navigation_timeout: ::std::time::Duration::from_secs(5),
        })
    }

    async fn labeled_element(&self, selector: &str, label: &str) -> Fallible<Option<Element>> {
        let elements = self.page.find_elements(selector).await.unwrap_or_default();

        for element in elements {
            if let Some(aria_label) = element.attribute("aria-label").await? {
                if aria_label.contains(label) {
                    return Ok(Some(element));
                }
            }

            if let Some(text) = element.inner_text().await? {
                if text.trim().eq_ignore_ascii_case(label) {
                    return Ok(Some(element));
                }
            }
        }

        Ok(None)
    }

    async fn nested_text(element: &Element, selector: &str) -> Fallible<Option<String>> {
        let Ok(nested) = element.find_element(selector).await else {
            return Ok(None);
        };

        Ok(nested.inner_text().await?.map(|text| text.trim().to_owned()))
    }

    async fn nested_attribute(element: &Element, selector: &str, name: &str) -> Fallible<Option<String>> {
        let Ok(nested) = element.find_element(selector).await else {
            return Ok(None);
        };

        Ok(nested.attribute(name).await?)
    }
}

#[async_trait]
impl ChannelExplorer for ChromiumChannelExplorer {
    async fn navigate(self: ::std::sync::Arc<Self>, url: &str) -> Fallible<()> {
        ::tracing::debug!(url, "navigating");

        ::tokio::time::timeout(self.navigation_timeout, async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;

            Fallible::Ok(())
        })
        .await??;

        Ok(())
    }

    async fn dismiss_consent_gate(self: ::std::sync::Arc<Self>) -> Fallible<bool> {
        let Some(language_menu) =
            self.labeled_element(self.selectors.consent_buttons, "Down arrow").await?
        else {
            return Ok(false);
        };

        language_menu.click().await?;

        if let Some(english) = self.labeled_element(self.selectors.consent_menu_items, "English").await? {
            english.click().await?;
        }

        let Some(accept_all) = self.labeled_element(self.selectors.consent_buttons, "Accept all").await?
        else {
            return Ok(false);
        };

        accept_all.click().await?;

        ::tokio::time::timeout(self.navigation_timeout, self.page.wait_for_navigation()).await??;

        ::tracing::debug!("dismissed the consent interstitial");

        Ok(true)
    }

    async fn scroll_down(self: ::std::sync::Arc<Self>) -> Fallible<()> {
        self.page.evaluate("window.scrollTo(0, document.documentElement.scrollHeight)").await?;

        Ok(())
    }

    async fn extract(self: ::std::sync::Arc<Self>, target: ExtractionTarget) -> Fallible<Vec<PageExtract>> {
        match target {
            ExtractionTarget::PlaylistTiles => {
                let tiles = self.page.find_elements(self.selectors.playlist_tiles).await.unwrap_or_default();

                let mut extracts = Vec::with_capacity(tiles.len());

                for tile in &tiles {
                    let Some(label) = Self::nested_text(tile, self.selectors.playlist_title).await? else {
                        continue;
                    };
                    let Some(href) =
                        Self::nested_attribute(tile, self.selectors.playlist_link, "href").await?
                    else {
                        continue;
                    };

                    extracts.push(PageExtract { label: label.into(), href: href.into() });
                }

                Ok(extracts)
            },

            ExtractionTarget::VideoLinks => {
                let links = self.page.find_elements(self.selectors.video_links).await.unwrap_or_default();

                let mut extracts = Vec::with_capacity(links.len());

                for link in &links {
                    let Some(label) = link.inner_text().await? else {
                        continue;
                    };
                    let Some(href) = link.attribute("href").await? else {
                        continue;
                    };

                    extracts.push(PageExtract { label: label.trim().to_owned().into(), href: href.into() });
                }

                Ok(extracts)
            },
        }
    }

    async fn close(self: ::std::sync::Arc<Self>) -> Fallible<()> {
        let mut browser = self.browser.lock().await;

        browser.close().await?;
        let _ = browser.wait().await;

        self.handler_task.abort();

        Ok(())
    }
}
