pub(crate) mod utils;

use ::once_cell::sync::Lazy;
use ::regex::Regex;
use ::thiserror::Error;

use crate::utils::aliases::MaybeOwnedString;

#[derive(Debug, Error)]
pub enum TargetResolutionError {
    #[error("invalid channel reference `{0}`: expected a channel link or handle, e.g. https://www.youtube.com/@User, @User or User")]
    InvalidChannelReference(String),

    #[error("invalid media format `{0}`: valid formats are only \"mp4\" and \"mp3\"")]
    InvalidMediaFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    pub fn parse(format: &str) -> Result<Self, TargetResolutionError> {
        match format.to_ascii_lowercase().as_str() {
            "mp4" => Ok(Self::Video),
            "mp3" => Ok(Self::Audio),
            _ => Err(TargetResolutionError::InvalidMediaFormat(format.to_owned())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Video => "mp4",
            Self::Audio => "mp3",
        }
    }

    /// Name of the per-channel directory the media files land in.
    pub fn library_dir(&self) -> &'static str {
        match self {
            Self::Video => "Videos",
            Self::Audio => "Audios",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHandle(MaybeOwnedString);

impl ChannelHandle {
    /// Accepts a full channel URL (with or without `@`), an `@handle`, or a bare
    /// handle. Handle charset: word characters and hyphen.
    pub fn parse(reference: &str) -> Result<Self, TargetResolutionError> {
        static CHANNEL_REFERENCE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"^https://www\.youtube\.com/@?([\w-]+)$|^@([\w-]+)$|^([\w-]+)$")
                .expect("channel reference pattern must parse")
        });

        let captures = CHANNEL_REFERENCE
            .captures(reference)
            .ok_or_else(|| TargetResolutionError::InvalidChannelReference(reference.to_owned()))?;

        let handle = [1, 2, 3]
            .into_iter()
            .find_map(|group| captures.get(group))
            .ok_or_else(|| TargetResolutionError::InvalidChannelReference(reference.to_owned()))?;

        Ok(Self(handle.as_str().to_owned().into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ::std::fmt::Display for ChannelHandle {
    fn fmt(&self, formatter: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct ChannelTarget {
    pub handle: ChannelHandle,
    pub media_kind: MediaKind,
    pub destination_folder: ::std::path::PathBuf,
}

impl ChannelTarget {
    pub fn resolve(
        reference: &str, format: &str, output_dir: &::std::path::Path,
    ) -> Result<Self, TargetResolutionError> {
        let handle = ChannelHandle::parse(reference)?;
        let media_kind = MediaKind::parse(format)?;
        let destination_folder = output_dir.join(handle.as_str());

        Ok(Self { handle, media_kind, destination_folder })
    }

    /// The crawl entry point, the channel's playlists tab.
    pub fn playlists_url(&self) -> String {
        format!("https://youtube.com/@{}/playlists", self.handle)
    }

    pub fn media_output_path(&self) -> ::std::path::PathBuf {
        self.destination_folder.join(self.media_kind.library_dir())
    }
}

#[derive(Debug, Clone)]
pub struct PlaylistRecord {
    pub ordinal: usize,
    pub display_name: MaybeOwnedString,
    pub file_name: MaybeOwnedString,
    pub source_url: MaybeOwnedString,

    pub videos: Vec<VideoRecord>,
}

impl PlaylistRecord {
    /// Skeleton record (no videos yet) from a playlist tile's title text and
    /// "view more" href, 1-based in page order.
    pub fn from_tile(ordinal: usize, title: &str, href: &str, media_kind: MediaKind) -> Self {
        let display_name = sanitize_name(title);
        let file_name = format!("{ordinal:02}-{display_name}_{}.m3u", media_kind.extension());

        Self {
            ordinal,
            display_name: display_name.into(),
            file_name: file_name.into(),
            source_url: absolute_url(href).into(),
            videos: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VideoRecord {
    pub ordinal: usize,
    pub display_name: MaybeOwnedString,
    pub watch_url: MaybeOwnedString,
    pub video_id: MaybeOwnedString,
}

impl VideoRecord {
    /// Record from a video link's text and href, 1-based in playlist order.
    /// Everything from the first `&` of the href onward is dropped; the id is the
    /// `v=` query value, falling back to the last path segment.
    pub fn from_link(ordinal: usize, title: &str, href: &str) -> Self {
        let href = href.split('&').next().unwrap_or(href);
        let tail = href.rsplit_once("v=").map_or(href, |(_, tail)| tail);
        let video_id = tail.rsplit('/').next().unwrap_or(tail);

        Self {
            ordinal,
            display_name: format!("{ordinal:02}-{}", sanitize_name(title)).into(),
            watch_url: absolute_url(href).into(),
            video_id: video_id.to_owned().into(),
        }
    }

    pub fn media_file_name(&self, media_kind: MediaKind) -> String {
        format!("{}.{}", self.video_id, media_kind.extension())
    }
}

fn absolute_url(href: &str) -> String {
    if href.starts_with("http") {
        href.to_owned()
    } else {
        format!("https://www.youtube.com{href}")
    }
}

/// Maps arbitrary display text onto a filesystem-safe token: whitespace runs collapse
/// to one space, path-hostile characters and spaces become `_`, and `_` runs collapse
/// to a single `-`. Idempotent; all-punctuation input may sanitize to an empty string.
pub fn sanitize_name(name: &str) -> String {
    static WHITESPACE_RUNS: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern must parse"));
    static HOSTILE_CHARS: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#"[/\\:*?"<>| .]"#).expect("hostile character pattern must parse"));
    static UNDERSCORE_RUNS: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"__+").expect("underscore run pattern must parse"));

    let collapsed = WHITESPACE_RUNS.replace_all(name, " ");
    let replaced = HOSTILE_CHARS.replace_all(collapsed.trim(), "_");

    UNDERSCORE_RUNS.replace_all(&replaced, "-").trim().to_owned()
}
