use ::async_trait::async_trait;
use ::once_cell::sync::Lazy;
use ::use_cases::boundaries::MirrorChannelOutputBoundary;
use ::use_cases::boundaries::Update;
use ::use_cases::models::events::CrawlEvent;
use ::use_cases::models::events::DiagnosticEvent;
use ::use_cases::models::events::DiagnosticLevel;
use ::use_cases::models::events::PlaylistTransferEvent;
use ::use_cases::models::events::VideoTransferEvent;

use crate::utils::aliases::Fallible;
use crate::utils::macros::progress_style;

/// Console rendering of the mirror run: colored message lines plus one progress
/// bar per playlist, routed through a `MultiProgress` so lines and bar never
/// garble each other.
pub struct ConsoleMirrorView {
    progress_bars: ::indicatif::MultiProgress,
    playlist_progress_bar: ::std::sync::Mutex<Option<::indicatif::ProgressBar>>,
}

impl ConsoleMirrorView {
    pub fn new() -> Self {
        Self {
            progress_bars: ::indicatif::MultiProgress::new(),
            playlist_progress_bar: ::std::sync::Mutex::new(None),
        }
    }

    fn println(&self, message: impl AsRef<str>) -> Fallible<()> {
        self.progress_bars.println(message)?;

        Ok(())
    }

    fn with_playlist_bar(&self, apply: impl FnOnce(&::indicatif::ProgressBar)) {
        if let Some(progress_bar) = self.playlist_progress_bar.lock().expect("view state poisoned").as_ref() {
            apply(progress_bar);
        }
    }
}

#[async_trait]
impl Update<CrawlEvent> for ConsoleMirrorView {
    async fn update(&self, event: &CrawlEvent) -> Fallible<()> {
        use ::colored::Colorize as _;

        match event {
            CrawlEvent::ChannelOpened(event) => {
                self.println(format!("Crawling {}", event.url))?;
            },
            CrawlEvent::ConsentGateDismissed => {
                self.println("Dismissed the consent interstitial")?;
            },
            CrawlEvent::PlaylistsEnumerated(event) => {
                self.println(format!("Found {} playlists", event.count))?;
            },
            CrawlEvent::PlaylistExpanded(event) => {
                self.println(format!("{}: {} videos", event.playlist, event.videos))?;
            },
            CrawlEvent::NavigationRetried(event) => {
                self.println(
                    format!("Retrying {} (attempt {}/{})", event.subject, event.attempt, event.max_attempts)
                        .yellow()
                        .to_string(),
                )?;
            },
        }

        Ok(())
    }
}

#[async_trait]
impl Update<VideoTransferEvent> for ConsoleMirrorView {
    async fn update(&self, event: &VideoTransferEvent) -> Fallible<()> {
        use ::colored::Colorize as _;

        match event {
            VideoTransferEvent::Skipped(event) => {
                self.println(format!("Video {} already exists", event.video))?;
                self.with_playlist_bar(|progress_bar| progress_bar.inc(1));
            },
            VideoTransferEvent::Started(event) => {
                self.println(format!("Downloading video {}", event.video).green().to_string())?;
            },
            VideoTransferEvent::Completed(event) => {
                self.println(format!("Video {} is downloaded", event.video))?;
            },
            VideoTransferEvent::Denied(event) => {
                self.println(
                    format!("Video {} is not allowed to be downloaded! ({})", event.video, event.reason)
                        .yellow()
                        .to_string(),
                )?;
            },
        }

        Ok(())
    }
}

#[async_trait]
impl Update<PlaylistTransferEvent> for ConsoleMirrorView {
    async fn update(&self, event: &PlaylistTransferEvent) -> Fallible<()> {
        use ::colored::Colorize as _;

        match event {
            PlaylistTransferEvent::Started(event) => {
                static PLAYLIST_PROGRESS_BAR_STYLE: Lazy<::indicatif::ProgressStyle> =
                    progress_style!("{prefix} {bar:50} {pos}/{len}");

                self.println(format!("Processing a playlist: {}", event.playlist).blue().to_string())?;

                let progress_bar = self.progress_bars.add(
                    ::indicatif::ProgressBar::new(event.total_videos as u64)
                        .with_style(PLAYLIST_PROGRESS_BAR_STYLE.clone()),
                );
                progress_bar.set_prefix(event.playlist.to_string());

                *self.playlist_progress_bar.lock().expect("view state poisoned") = Some(progress_bar);
            },
            PlaylistTransferEvent::ProgressUpdated(event) => {
                self.with_playlist_bar(|progress_bar| {
                    progress_bar.set_position(event.completed_videos as u64);
                });
            },
            PlaylistTransferEvent::Completed(event) => {
                if let Some(progress_bar) =
                    self.playlist_progress_bar.lock().expect("view state poisoned").take()
                {
                    progress_bar.finish_and_clear();
                }

                self.println(format!("Wrote playlist {} ({} entries)", event.playlist, event.entries))?;
            },
        }

        Ok(())
    }
}

#[async_trait]
impl Update<DiagnosticEvent> for ConsoleMirrorView {
    async fn update(&self, event: &DiagnosticEvent) -> Fallible<()> {
        use ::colored::Colorize as _;

        let message = match event.level {
            DiagnosticLevel::Warning => event.message.yellow(),
            DiagnosticLevel::Error => event.message.red(),
        };

        self.println(message.to_string())
    }
}

#[async_trait]
impl MirrorChannelOutputBoundary for ConsoleMirrorView {
    async fn activate(&self) -> Fallible<()> {
        Ok(())
    }

    async fn deactivate(&self) -> Fallible<()> {
        self.progress_bars.clear()?;

        Ok(())
    }
}
