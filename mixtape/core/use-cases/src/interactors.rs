use ::async_trait::async_trait;
use ::domain::ChannelTarget;
use ::domain::PlaylistRecord;
use ::domain::VideoRecord;

use crate::boundaries::Accept;
use crate::boundaries::MirrorChannelOutputBoundary;
use crate::boundaries::MirrorChannelRequestModel;
use crate::gateways::ChannelExplorer;
use crate::gateways::ExtractionTarget;
use crate::gateways::MediaGateway;
use crate::gateways::PlaylistRepository;
use crate::gateways::Resolution;
use crate::models::descriptors::PlaylistDescriptor;
use crate::models::events::ChannelOpenedEvent;
use crate::models::events::CrawlEvent;
use crate::models::events::DiagnosticEvent;
use crate::models::events::DiagnosticLevel;
use crate::models::events::NavigationRetriedEvent;
use crate::models::events::PlaylistExpandedEvent;
use crate::models::events::PlaylistTransferCompletedEvent;
use crate::models::events::PlaylistTransferEvent;
use crate::models::events::PlaylistTransferProgressUpdatedEvent;
use crate::models::events::PlaylistTransferStartedEvent;
use crate::models::events::PlaylistsEnumeratedEvent;
use crate::models::events::VideoTransferCompletedEvent;
use crate::models::events::VideoTransferDeniedEvent;
use crate::models::events::VideoTransferEvent;
use crate::models::events::VideoTransferSkippedEvent;
use crate::models::events::VideoTransferStartedEvent;
use crate::policies::NavigationRetryPolicy;
use crate::policies::ScrollUntilStablePolicy;
use crate::utils::aliases::Fallible;

/// Size of the transfer worker pool. The pool is shared across playlists but
/// drained fully between them; there is no cross-playlist concurrency.
pub const DOWNLOAD_WORKERS: usize = 3;

/// Two-phase channel mirroring: a strictly sequential crawl materializes every
/// playlist and its videos in memory, the explorer is closed, and only then does
/// the transfer phase touch the media service.
pub struct MirrorChannelInteractor {
    pub output_boundary: ::std::sync::Arc<dyn MirrorChannelOutputBoundary>,

    pub explorer: ::std::sync::Arc<dyn ChannelExplorer>,
    pub media: ::std::sync::Arc<dyn MediaGateway>,
    pub playlists: ::std::sync::Arc<dyn PlaylistRepository>,

    pub scroll_policy: ScrollUntilStablePolicy,
    pub retry_policy: NavigationRetryPolicy,
    pub worker_pool: ::std::sync::Arc<::tokio::sync::Semaphore>,
}

#[async_trait]
impl Accept<MirrorChannelRequestModel> for MirrorChannelInteractor {
    async fn accept(self: ::std::sync::Arc<Self>, request: MirrorChannelRequestModel) -> Fallible<()> {
        self.output_boundary.activate().await?;

        let crawled = ::std::sync::Arc::clone(&self).crawl(&request.target).await;
        let closed = ::std::sync::Arc::clone(&self.explorer).close().await;

        let playlists = crawled?;
        closed?;

        ::std::sync::Arc::clone(&self).materialize(&request.target, playlists).await?;

        self.output_boundary.deactivate().await?;

        Ok(())
    }
}

impl MirrorChannelInteractor {
    async fn crawl(self: ::std::sync::Arc<Self>, target: &ChannelTarget) -> Fallible<Vec<PlaylistRecord>> {
        let channel_url = target.playlists_url();

        self.output_boundary
            .update(&CrawlEvent::ChannelOpened(ChannelOpenedEvent {
                handle: target.handle.to_string().into(),
                url: channel_url.clone().into(),
            }))
            .await?;

        ::tracing::info!(handle = %target.handle, "crawling channel playlists");

        let tiles = self
            .retry_policy
            .run("playlists", |attempt| {
                let this = ::std::sync::Arc::clone(&self);
                let channel_url = channel_url.clone();

                async move {
                    if attempt > 1 {
                        this.output_boundary
                            .update(&CrawlEvent::NavigationRetried(NavigationRetriedEvent {
                                subject: "playlists",
                                attempt,
                                max_attempts: this.retry_policy.max_attempts,
                            }))
                            .await?;
                    }

                    ::std::sync::Arc::clone(&this.explorer).navigate(&channel_url).await?;

                    // The interstitial is a presence-checked feature, and dismissing it
                    // is best-effort; a failed click only degrades this attempt.
                    match ::std::sync::Arc::clone(&this.explorer).dismiss_consent_gate().await {
                        Ok(true) => this.output_boundary.update(&CrawlEvent::ConsentGateDismissed).await?,
                        Ok(false) => {},
                        Err(error) => {
                            this.output_boundary
                                .update(&DiagnosticEvent {
                                    level: DiagnosticLevel::Warning,
                                    message: format!("consent gate dismissal failed: {error:#}").into(),
                                })
                                .await?;
                        },
                    }

                    this.scroll_policy.realize(&this.explorer, ExtractionTarget::PlaylistTiles).await
                }
            })
            .await?;

        let mut playlists = tiles
            .iter()
            .enumerate()
            .map(|(index, tile)| PlaylistRecord::from_tile(index + 1, &tile.label, &tile.href, target.media_kind))
            .collect::<Vec<_>>();

        self.output_boundary
            .update(&CrawlEvent::PlaylistsEnumerated(PlaylistsEnumeratedEvent { count: playlists.len() }))
            .await?;

        ::tracing::info!(count = playlists.len(), "enumerated playlists");

        for playlist in &mut playlists {
            let source_url = playlist.source_url.clone();

            let links = self
                .retry_policy
                .run("playlist videos", |attempt| {
                    let this = ::std::sync::Arc::clone(&self);
                    let source_url = source_url.clone();

                    async move {
                        if attempt > 1 {
                            this.output_boundary
                                .update(&CrawlEvent::NavigationRetried(NavigationRetriedEvent {
                                    subject: "playlist videos",
                                    attempt,
                                    max_attempts: this.retry_policy.max_attempts,
                                }))
                                .await?;
                        }

                        ::std::sync::Arc::clone(&this.explorer).navigate(&source_url).await?;

                        this.scroll_policy.realize(&this.explorer, ExtractionTarget::VideoLinks).await
                    }
                })
                .await?;

            playlist.videos = links
                .iter()
                .enumerate()
                .map(|(index, link)| VideoRecord::from_link(index + 1, &link.label, &link.href))
                .collect();

            self.output_boundary
                .update(&CrawlEvent::PlaylistExpanded(PlaylistExpandedEvent {
                    playlist: playlist.display_name.clone(),
                    videos: playlist.videos.len(),
                }))
                .await?;
        }

        Ok(playlists)
    }

    async fn materialize(
        self: ::std::sync::Arc<Self>, target: &ChannelTarget, playlists: Vec<PlaylistRecord>,
    ) -> Fallible<()> {
        let media_output_path = target.media_output_path();

        for playlist in playlists {
            self.output_boundary
                .update(&PlaylistTransferEvent::Started(PlaylistTransferStartedEvent {
                    playlist: playlist.file_name.clone(),
                    total_videos: playlist.videos.len(),
                }))
                .await?;

            ::tracing::info!(playlist = %playlist.display_name, videos = playlist.videos.len(), "processing playlist");

            let mut descriptor = PlaylistDescriptor::new(playlist.file_name.clone());

            let total_videos = playlist.videos.len();
            let completed_videos = ::std::sync::Arc::new(::std::sync::atomic::AtomicUsize::new(0));

            let mut transfers = Vec::new();

            for video in &playlist.videos {
                let media_file = video.media_file_name(target.media_kind);
                let relative_path = format!("./{}/{}", target.media_kind.library_dir(), media_file);

                // The descriptor lists the intended entry whether or not the file is
                // ever fetched.
                descriptor.push_entry(video.display_name.clone(), relative_path);

                if ::tokio::fs::try_exists(media_output_path.join(&media_file)).await? {
                    completed_videos.fetch_add(1, ::std::sync::atomic::Ordering::Relaxed);

                    self.output_boundary
                        .update(&VideoTransferEvent::Skipped(VideoTransferSkippedEvent {
                            video: video.display_name.clone(),
                        }))
                        .await?;

                    continue;
                }

                let stream = match ::std::sync::Arc::clone(&self.media).resolve(video, target.media_kind).await? {
                    Resolution::Available(stream) => stream,
                    Resolution::Denied(reason) => {
                        ::tracing::warn!(video = %video.display_name, %reason, "video is not downloadable");

                        self.output_boundary
                            .update(&VideoTransferEvent::Denied(VideoTransferDeniedEvent {
                                video: video.display_name.clone(),
                                reason,
                            }))
                            .await?;

                        continue;
                    },
                };

                self.output_boundary
                    .update(&VideoTransferEvent::Started(VideoTransferStartedEvent {
                        video: video.display_name.clone(),
                    }))
                    .await?;

                transfers.push(::tokio::spawn({
                    let this = ::std::sync::Arc::clone(&self);

                    let directory = media_output_path.clone();
                    let media_file = media_file.clone();
                    let video_name = video.display_name.clone();

                    let completed_videos = ::std::sync::Arc::clone(&completed_videos);

                    async move {
                        let _worker = ::std::sync::Arc::clone(&this.worker_pool).acquire_owned().await?;

                        ::std::sync::Arc::clone(&this.media)
                            .transfer(stream, directory.into(), media_file.into())
                            .await?;

                        let completed =
                            completed_videos.fetch_add(1, ::std::sync::atomic::Ordering::Relaxed) + 1;

                        this.output_boundary
                            .update(&VideoTransferEvent::Completed(VideoTransferCompletedEvent {
                                video: video_name,
                            }))
                            .await?;
                        this.output_boundary
                            .update(&PlaylistTransferEvent::ProgressUpdated(PlaylistTransferProgressUpdatedEvent {
                                completed_videos: completed,
                                total_videos,
                            }))
                            .await?;

                        Fallible::Ok(())
                    }
                }));
            }

            // Wait-all before the next playlist. A failed transfer aborts the run
            // here, but sibling tasks already on the pool run to completion.
            for transfer in transfers {
                transfer.await??;
            }

            ::std::sync::Arc::clone(&self.playlists)
                .persist(&target.destination_folder, &descriptor)
                .await?;

            self.output_boundary
                .update(&PlaylistTransferEvent::Completed(PlaylistTransferCompletedEvent {
                    playlist: descriptor.file_name.clone(),
                    entries: descriptor.entries().len(),
                }))
                .await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ::domain::MediaKind;

    use super::*;
    use crate::boundaries::Update;
    use crate::gateways::AccessDenial;
    use crate::gateways::PageExtract;
    use crate::gateways::ResolvedStream;
    use crate::gateways::StreamSelector;
    use crate::policies::CrawlExhausted;
    use crate::utils::aliases::MaybeOwnedPath;
    use crate::utils::aliases::MaybeOwnedString;

    type CallLog = ::std::sync::Arc<::std::sync::Mutex<Vec<String>>>;

    struct ScriptedExplorer {
        playlists: Vec<(&'static str, &'static str)>,
        videos: ::std::collections::HashMap<&'static str, Vec<(&'static str, &'static str)>>,
        current_url: ::std::sync::Mutex<String>,
        log: CallLog,
    }

    impl ScriptedExplorer {
        fn new(
            playlists: Vec<(&'static str, &'static str)>,
            videos: ::std::collections::HashMap<&'static str, Vec<(&'static str, &'static str)>>,
            log: CallLog,
        ) -> ::std::sync::Arc<Self> {
            ::std::sync::Arc::new(Self {
                playlists,
                videos,
                current_url: ::std::sync::Mutex::new(String::new()),
                log,
            })
        }
    }

    #[async_trait]
    impl ChannelExplorer for ScriptedExplorer {
        async fn navigate(self: ::std::sync::Arc<Self>, url: &str) -> Fallible<()> {
            *self.current_url.lock().unwrap() = url.to_owned();
            self.log.lock().unwrap().push(format!("navigate:{url}"));
            Ok(())
        }

        async fn dismiss_consent_gate(self: ::std::sync::Arc<Self>) -> Fallible<bool> {
            Ok(false)
        }

        async fn scroll_down(self: ::std::sync::Arc<Self>) -> Fallible<()> {
            Ok(())
        }

        async fn extract(self: ::std::sync::Arc<Self>, target: ExtractionTarget) -> Fallible<Vec<PageExtract>> {
            let current_url = self.current_url.lock().unwrap().clone();

            let matches = match target {
                ExtractionTarget::PlaylistTiles if current_url.ends_with("/playlists") => self.playlists.clone(),
                ExtractionTarget::VideoLinks => {
                    self.videos.get(current_url.as_str()).cloned().unwrap_or_default()
                },
                _ => Vec::new(),
            };

            Ok(matches
                .into_iter()
                .map(|(label, href)| PageExtract { label: label.into(), href: href.into() })
                .collect())
        }

        async fn close(self: ::std::sync::Arc<Self>) -> Fallible<()> {
            self.log.lock().unwrap().push("close".to_owned());
            Ok(())
        }
    }

    struct ScriptedMedia {
        denied: ::std::collections::HashMap<&'static str, AccessDenial>,
        log: CallLog,
    }

    #[async_trait]
    impl MediaGateway for ScriptedMedia {
        async fn resolve(
            self: ::std::sync::Arc<Self>, video: &VideoRecord, media_kind: MediaKind,
        ) -> Fallible<Resolution> {
            self.log.lock().unwrap().push(format!("resolve:{}", video.video_id));

            if let Some(reason) = self.denied.get(&*video.video_id) {
                return Ok(Resolution::Denied(*reason));
            }

            Ok(Resolution::Available(ResolvedStream {
                watch_url: video.watch_url.clone(),
                selector: match media_kind {
                    MediaKind::Audio => StreamSelector::AudioOnly,
                    MediaKind::Video => StreamSelector::HighestResolution,
                },
            }))
        }

        async fn transfer(
            self: ::std::sync::Arc<Self>, _: ResolvedStream, directory: MaybeOwnedPath,
            file_name: MaybeOwnedString,
        ) -> Fallible<()> {
            self.log.lock().unwrap().push(format!("transfer:{file_name}"));

            ::std::fs::create_dir_all(&directory)?;
            ::std::fs::write(directory.join(&*file_name), b"media")?;

            Ok(())
        }
    }

    struct RenderingRepository;

    #[async_trait]
    impl PlaylistRepository for RenderingRepository {
        async fn persist(
            self: ::std::sync::Arc<Self>, directory: &::std::path::Path, descriptor: &PlaylistDescriptor,
        ) -> Fallible<()> {
            ::std::fs::create_dir_all(directory)?;
            ::std::fs::write(directory.join(&*descriptor.file_name), descriptor.render())?;

            Ok(())
        }
    }

    struct RecordingView {
        events: ::std::sync::Mutex<Vec<String>>,
    }

    impl RecordingView {
        fn new() -> ::std::sync::Arc<Self> {
            ::std::sync::Arc::new(Self { events: ::std::sync::Mutex::new(Vec::new()) })
        }

        fn record(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }

        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Update<CrawlEvent> for RecordingView {
        async fn update(&self, event: &CrawlEvent) -> Fallible<()> {
            self.record(match event {
                CrawlEvent::ChannelOpened(event) => format!("channel-opened:{}", event.handle),
                CrawlEvent::ConsentGateDismissed => "consent-dismissed".to_owned(),
                CrawlEvent::PlaylistsEnumerated(event) => format!("playlists:{}", event.count),
                CrawlEvent::PlaylistExpanded(event) => format!("expanded:{}:{}", event.playlist, event.videos),
                CrawlEvent::NavigationRetried(event) => format!("retried:{}:{}", event.subject, event.attempt),
            });

            Ok(())
        }
    }

    #[async_trait]
    impl Update<VideoTransferEvent> for RecordingView {
        async fn update(&self, event: &VideoTransferEvent) -> Fallible<()> {
            self.record(match event {
                VideoTransferEvent::Skipped(event) => format!("skipped:{}", event.video),
                VideoTransferEvent::Started(event) => format!("started:{}", event.video),
                VideoTransferEvent::Completed(event) => format!("completed:{}", event.video),
                VideoTransferEvent::Denied(event) => format!("denied:{}:{}", event.video, event.reason),
            });

            Ok(())
        }
    }

    #[async_trait]
    impl Update<PlaylistTransferEvent> for RecordingView {
        async fn update(&self, event: &PlaylistTransferEvent) -> Fallible<()> {
            self.record(match event {
                PlaylistTransferEvent::Started(event) => format!("playlist-started:{}", event.playlist),
                PlaylistTransferEvent::ProgressUpdated(event) => {
                    format!("progress:{}/{}", event.completed_videos, event.total_videos)
                },
                PlaylistTransferEvent::Completed(event) => {
                    format!("playlist-completed:{}:{}", event.playlist, event.entries)
                },
            });

            Ok(())
        }
    }

    #[async_trait]
    impl Update<DiagnosticEvent> for RecordingView {
        async fn update(&self, event: &DiagnosticEvent) -> Fallible<()> {
            self.record(format!("diagnostic:{}", event.message));

            Ok(())
        }
    }

    #[async_trait]
    impl MirrorChannelOutputBoundary for RecordingView {
        async fn activate(&self) -> Fallible<()> {
            Ok(())
        }

        async fn deactivate(&self) -> Fallible<()> {
            Ok(())
        }
    }

    fn interactor(
        explorer: ::std::sync::Arc<ScriptedExplorer>, media: ::std::sync::Arc<ScriptedMedia>,
        view: ::std::sync::Arc<RecordingView>,
    ) -> ::std::sync::Arc<MirrorChannelInteractor> {
        ::std::sync::Arc::new(MirrorChannelInteractor {
            output_boundary: view,
            explorer,
            media,
            playlists: ::std::sync::Arc::new(RenderingRepository),
            scroll_policy: ScrollUntilStablePolicy {
                first_match_timeout: ::std::time::Duration::ZERO,
                poll_interval: ::std::time::Duration::ZERO,
            },
            retry_policy: NavigationRetryPolicy::default(),
            worker_pool: ::std::sync::Arc::new(::tokio::sync::Semaphore::new(DOWNLOAD_WORKERS)),
        })
    }

    const PLAYLIST_URL: &str = "https://www.youtube.com/playlist?list=PL1";

    fn two_video_channel(log: &CallLog) -> ::std::sync::Arc<ScriptedExplorer> {
        ScriptedExplorer::new(
            vec![("My: Cool/List", "/playlist?list=PL1")],
            [(
                PLAYLIST_URL,
                vec![("First Video", "/watch?v=aaa&list=PL1"), ("Second: Video", "/watch?v=bbb")],
            )]
            .into_iter()
            .collect(),
            ::std::sync::Arc::clone(log),
        )
    }

    fn request(output_dir: &::std::path::Path) -> MirrorChannelRequestModel {
        MirrorChannelRequestModel {
            target: ChannelTarget::resolve("@foo", "mp4", output_dir).unwrap(),
        }
    }

    #[tokio::test]
    async fn a_channel_with_one_playlist_materializes_media_and_a_playlist_file() {
        let out = ::tempfile::tempdir().unwrap();
        let log: CallLog = ::std::sync::Arc::default();

        let explorer = two_video_channel(&log);
        let media = ::std::sync::Arc::new(ScriptedMedia {
            denied: ::std::collections::HashMap::new(),
            log: ::std::sync::Arc::clone(&log),
        });

        interactor(explorer, media, RecordingView::new()).accept(request(out.path())).await.unwrap();

        assert!(out.path().join("foo/Videos/aaa.mp4").exists());
        assert!(out.path().join("foo/Videos/bbb.mp4").exists());

        let playlist = ::std::fs::read_to_string(out.path().join("foo/01-My-Cool_List_mp4.m3u")).unwrap();
        assert_eq!(
            playlist,
            "#EXTINF:-1,01-First_Video\n./Videos/aaa.mp4\n#EXTINF:-1,02-Second-Video\n./Videos/bbb.mp4\n"
        );
    }

    #[tokio::test]
    async fn the_explorer_is_closed_before_the_first_media_call() {
        let out = ::tempfile::tempdir().unwrap();
        let log: CallLog = ::std::sync::Arc::default();

        let explorer = two_video_channel(&log);
        let media = ::std::sync::Arc::new(ScriptedMedia {
            denied: ::std::collections::HashMap::new(),
            log: ::std::sync::Arc::clone(&log),
        });

        interactor(explorer, media, RecordingView::new()).accept(request(out.path())).await.unwrap();

        let log = log.lock().unwrap();
        let closed_at = log.iter().position(|call| call == "close").unwrap();
        let first_resolve = log.iter().position(|call| call.starts_with("resolve:")).unwrap();

        assert!(closed_at < first_resolve, "calls: {log:?}");
    }

    #[tokio::test]
    async fn rerunning_a_mirrored_channel_transfers_nothing_but_rewrites_the_playlist() {
        let out = ::tempfile::tempdir().unwrap();

        let first_log: CallLog = ::std::sync::Arc::default();
        let media = ::std::sync::Arc::new(ScriptedMedia {
            denied: ::std::collections::HashMap::new(),
            log: ::std::sync::Arc::clone(&first_log),
        });
        interactor(two_video_channel(&first_log), media, RecordingView::new())
            .accept(request(out.path()))
            .await
            .unwrap();

        ::std::fs::remove_file(out.path().join("foo/01-My-Cool_List_mp4.m3u")).unwrap();

        let second_log: CallLog = ::std::sync::Arc::default();
        let media = ::std::sync::Arc::new(ScriptedMedia {
            denied: ::std::collections::HashMap::new(),
            log: ::std::sync::Arc::clone(&second_log),
        });
        interactor(two_video_channel(&second_log), media, RecordingView::new())
            .accept(request(out.path()))
            .await
            .unwrap();

        let second_log = second_log.lock().unwrap();
        assert!(!second_log.iter().any(|call| call.starts_with("resolve:")), "calls: {second_log:?}");
        assert!(!second_log.iter().any(|call| call.starts_with("transfer:")), "calls: {second_log:?}");

        assert!(out.path().join("foo/01-My-Cool_List_mp4.m3u").exists());
    }

    #[tokio::test]
    async fn a_preexisting_file_is_skipped_but_still_listed_in_the_descriptor() {
        let out = ::tempfile::tempdir().unwrap();
        let log: CallLog = ::std::sync::Arc::default();

        ::std::fs::create_dir_all(out.path().join("foo/Videos")).unwrap();
        ::std::fs::write(out.path().join("foo/Videos/aaa.mp4"), b"already here").unwrap();

        let explorer = two_video_channel(&log);
        let media = ::std::sync::Arc::new(ScriptedMedia {
            denied: ::std::collections::HashMap::new(),
            log: ::std::sync::Arc::clone(&log),
        });
        let view = RecordingView::new();

        interactor(explorer, media, ::std::sync::Arc::clone(&view)).accept(request(out.path())).await.unwrap();

        let log = log.lock().unwrap();
        assert!(!log.contains(&"resolve:aaa".to_owned()), "calls: {log:?}");
        assert!(!log.contains(&"transfer:aaa.mp4".to_owned()), "calls: {log:?}");
        assert!(log.contains(&"transfer:bbb.mp4".to_owned()), "calls: {log:?}");

        assert!(view.events().contains(&"skipped:01-First_Video".to_owned()));

        let playlist = ::std::fs::read_to_string(out.path().join("foo/01-My-Cool_List_mp4.m3u")).unwrap();
        assert_eq!(playlist.matches("#EXTINF:-1,").count(), 2);
    }

    #[tokio::test]
    async fn a_denied_video_is_listed_but_never_transferred_and_does_not_abort() {
        let out = ::tempfile::tempdir().unwrap();
        let log: CallLog = ::std::sync::Arc::default();

        let explorer = ScriptedExplorer::new(
            vec![("Mix", "/playlist?list=PL1")],
            [(
                PLAYLIST_URL,
                vec![
                    ("First", "/watch?v=aaa"),
                    ("Second", "/watch?v=bbb"),
                    ("Third", "/watch?v=ccc"),
                ],
            )]
            .into_iter()
            .collect(),
            ::std::sync::Arc::clone(&log),
        );
        let media = ::std::sync::Arc::new(ScriptedMedia {
            denied: [("bbb", AccessDenial::MembersOnly)].into_iter().collect(),
            log: ::std::sync::Arc::clone(&log),
        });
        let view = RecordingView::new();

        interactor(explorer, media, ::std::sync::Arc::clone(&view)).accept(request(out.path())).await.unwrap();

        let log = log.lock().unwrap();
        assert!(log.contains(&"resolve:bbb".to_owned()));
        assert!(!log.contains(&"transfer:bbb.mp4".to_owned()), "calls: {log:?}");
        assert!(log.contains(&"transfer:aaa.mp4".to_owned()));
        assert!(log.contains(&"transfer:ccc.mp4".to_owned()));

        assert!(view.events().contains(&"denied:02-Second:members-only".to_owned()));

        let playlist = ::std::fs::read_to_string(out.path().join("foo/01-Mix_mp4.m3u")).unwrap();
        assert_eq!(playlist.matches("#EXTINF:-1,").count(), 3);
        assert!(playlist.contains("./Videos/bbb.mp4"));
    }

    #[tokio::test]
    async fn a_channel_whose_playlists_never_enumerate_exhausts_the_crawl() {
        let out = ::tempfile::tempdir().unwrap();
        let log: CallLog = ::std::sync::Arc::default();

        let explorer = ScriptedExplorer::new(
            Vec::new(),
            ::std::collections::HashMap::new(),
            ::std::sync::Arc::clone(&log),
        );
        let media = ::std::sync::Arc::new(ScriptedMedia {
            denied: ::std::collections::HashMap::new(),
            log: ::std::sync::Arc::clone(&log),
        });

        let error = interactor(explorer, media, RecordingView::new())
            .accept(request(out.path()))
            .await
            .unwrap_err();

        let exhausted = error.downcast_ref::<CrawlExhausted>().unwrap();
        assert_eq!(exhausted.subject, "playlists");

        let log = log.lock().unwrap();
        assert_eq!(log.iter().filter(|call| call.starts_with("navigate:")).count(), 5);
        assert!(!log.iter().any(|call| call.starts_with("resolve:")), "calls: {log:?}");
        assert!(log.contains(&"close".to_owned()));
    }

    #[tokio::test]
    async fn a_playlist_whose_videos_never_enumerate_exhausts_the_crawl_before_any_download() {
        let out = ::tempfile::tempdir().unwrap();
        let log: CallLog = ::std::sync::Arc::default();

        let explorer = ScriptedExplorer::new(
            vec![("Mix", "/playlist?list=PL1")],
            ::std::collections::HashMap::new(),
            ::std::sync::Arc::clone(&log),
        );
        let media = ::std::sync::Arc::new(ScriptedMedia {
            denied: ::std::collections::HashMap::new(),
            log: ::std::sync::Arc::clone(&log),
        });

        let error = interactor(explorer, media, RecordingView::new())
            .accept(request(out.path()))
            .await
            .unwrap_err();

        let exhausted = error.downcast_ref::<CrawlExhausted>().unwrap();
        assert_eq!(exhausted.subject, "playlist videos");

        let log = log.lock().unwrap();
        assert!(!log.iter().any(|call| call.starts_with("resolve:")), "calls: {log:?}");
    }
}
