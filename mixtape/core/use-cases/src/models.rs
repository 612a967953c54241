pub mod events {
    use crate::gateways::AccessDenial;
    use crate::utils::aliases::MaybeOwnedString;

    #[derive(Debug, Clone)]
    pub enum CrawlEvent {
        ChannelOpened(ChannelOpenedEvent),
        ConsentGateDismissed,
        PlaylistsEnumerated(PlaylistsEnumeratedEvent),
        PlaylistExpanded(PlaylistExpandedEvent),
        NavigationRetried(NavigationRetriedEvent),
    }

    #[derive(Debug, Clone)]
    pub struct ChannelOpenedEvent {
        pub handle: MaybeOwnedString,
        pub url: MaybeOwnedString,
    }

    #[derive(Debug, Clone)]
    pub struct PlaylistsEnumeratedEvent {
        pub count: usize,
    }

    #[derive(Debug, Clone)]
    pub struct PlaylistExpandedEvent {
        pub playlist: MaybeOwnedString,
        pub videos: usize,
    }

    #[derive(Debug, Clone)]
    pub struct NavigationRetriedEvent {
        pub subject: &'static str,
        pub attempt: usize,
        pub max_attempts: usize,
    }

    #[derive(Debug, Clone)]
    pub enum VideoTransferEvent {
        Skipped(VideoTransferSkippedEvent),
        Started(VideoTransferStartedEvent),
        Completed(VideoTransferCompletedEvent),
        Denied(VideoTransferDeniedEvent),
    }

    #[derive(Debug, Clone)]
    pub struct VideoTransferSkippedEvent {
        pub video: MaybeOwnedString,
    }

    #[derive(Debug, Clone)]
    pub struct VideoTransferStartedEvent {
        pub video: MaybeOwnedString,
    }

    #[derive(Debug, Clone)]
    pub struct VideoTransferCompletedEvent {
        pub video: MaybeOwnedString,
    }

    #[derive(Debug, Clone)]
    pub struct VideoTransferDeniedEvent {
        pub video: MaybeOwnedString,
        pub reason: AccessDenial,
    }

    #[derive(Debug, Clone)]
    pub enum PlaylistTransferEvent {
        Started(PlaylistTransferStartedEvent),
        ProgressUpdated(PlaylistTransferProgressUpdatedEvent),
        Completed(PlaylistTransferCompletedEvent),
    }

    #[derive(Debug, Clone)]
    pub struct PlaylistTransferStartedEvent {
        pub playlist: MaybeOwnedString,
        pub total_videos: usize,
    }

    #[derive(Debug, Clone)]
    pub struct PlaylistTransferProgressUpdatedEvent {
        pub completed_videos: usize,
        pub total_videos: usize,
    }

    #[derive(Debug, Clone)]
    pub struct PlaylistTransferCompletedEvent {
        pub playlist: MaybeOwnedString,
        pub entries: usize,
    }

    #[derive(Debug, Clone)]
    pub struct DiagnosticEvent {
        pub level: DiagnosticLevel,
        pub message: MaybeOwnedString,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum DiagnosticLevel {
        Warning,
        Error,
    }
}

pub mod descriptors {
    use crate::utils::aliases::MaybeOwnedString;

    /// Ordered (display name, relative media path) accumulator for one playlist,
    /// rendered to the extended-M3U subset once the playlist's transfers settle.
    #[derive(Debug, Clone)]
    pub struct PlaylistDescriptor {
        pub file_name: MaybeOwnedString,
        entries: Vec<PlaylistEntry>,
    }

    #[derive(Debug, Clone)]
    pub struct PlaylistEntry {
        pub display_name: MaybeOwnedString,
        pub relative_path: MaybeOwnedString,
    }

    impl PlaylistDescriptor {
        pub fn new(file_name: impl Into<MaybeOwnedString>) -> Self {
            Self { file_name: file_name.into(), entries: Vec::new() }
        }

        pub fn push_entry(
            &mut self, display_name: impl Into<MaybeOwnedString>, relative_path: impl Into<MaybeOwnedString>,
        ) {
            self.entries.push(PlaylistEntry {
                display_name: display_name.into(),
                relative_path: relative_path.into(),
            });
        }

        pub fn entries(&self) -> &[PlaylistEntry] {
            &self.entries
        }

        /// `#EXTINF:-1,{name}` followed by the relative path, per entry, in insertion
        /// order. No `#EXTM3U` header.
        pub fn render(&self) -> String {
            use ::std::fmt::Write as _;

            let mut rendered = String::new();

            for entry in &self.entries {
                let _ = writeln!(rendered, "#EXTINF:-1,{}", entry.display_name);
                let _ = writeln!(rendered, "{}", entry.relative_path);
            }

            rendered
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn rendering_interleaves_extinf_lines_and_paths_in_insertion_order() {
            let mut descriptor = PlaylistDescriptor::new("01-Mix_mp3.m3u");
            descriptor.push_entry("01-First", "./Audios/aaa.mp3");
            descriptor.push_entry("02-Second", "./Audios/bbb.mp3");

            assert_eq!(
                descriptor.render(),
                "#EXTINF:-1,01-First\n./Audios/aaa.mp3\n#EXTINF:-1,02-Second\n./Audios/bbb.mp3\n"
            );
        }

        #[test]
        fn an_empty_descriptor_renders_to_nothing() {
            let descriptor = PlaylistDescriptor::new("03-Empty_mp4.m3u");

            assert_eq!(descriptor.render(), "");
            assert!(descriptor.entries().is_empty());
        }
    }
}
