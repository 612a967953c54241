use ::async_trait::async_trait;
use ::domain::MediaKind;
use ::domain::VideoRecord;
use ::thiserror::Error;

use crate::models::descriptors::PlaylistDescriptor;
use crate::utils::aliases::Fallible;
use crate::utils::aliases::MaybeOwnedPath;
use crate::utils::aliases::MaybeOwnedString;

/// The rendering-engine seam: everything the crawl phase knows about the page is
/// what these five operations hand back. Selector knowledge lives behind the
/// implementation, never in the crawl state machine.
#[async_trait]
pub trait ChannelExplorer: Send + Sync {
    /// Loads `url` and waits for the document, under the adapter's bounded timeout.
    async fn navigate(self: ::std::sync::Arc<Self>, url: &str) -> Fallible<()>;

    /// Dismisses the language/consent interstitial if present. Absence is not an
    /// error; returns whether anything was dismissed.
    async fn dismiss_consent_gate(self: ::std::sync::Arc<Self>) -> Fallible<bool>;

    async fn scroll_down(self: ::std::sync::Arc<Self>) -> Fallible<()>;

    /// Current matches for `target`, in document order.
    async fn extract(self: ::std::sync::Arc<Self>, target: ExtractionTarget) -> Fallible<Vec<PageExtract>>;

    async fn close(self: ::std::sync::Arc<Self>) -> Fallible<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionTarget {
    PlaylistTiles,
    VideoLinks,
}

#[derive(Debug, Clone)]
pub struct PageExtract {
    pub label: MaybeOwnedString,
    pub href: MaybeOwnedString,
}

/// The media-service seam, split the way the service fails: `resolve` answers
/// whether a stream can be had at all (denials are values, not errors, so the
/// pipeline decides continuation in one place), `transfer` moves the bytes.
#[async_trait]
pub trait MediaGateway: Send + Sync {
    async fn resolve(
        self: ::std::sync::Arc<Self>, video: &VideoRecord, media_kind: MediaKind,
    ) -> Fallible<Resolution>;

    async fn transfer(
        self: ::std::sync::Arc<Self>, stream: ResolvedStream, directory: MaybeOwnedPath,
        file_name: MaybeOwnedString,
    ) -> Fallible<()>;
}

#[derive(Debug, Clone)]
pub enum Resolution {
    Available(ResolvedStream),
    Denied(AccessDenial),
}

#[derive(Debug, Clone)]
pub struct ResolvedStream {
    pub watch_url: MaybeOwnedString,
    pub selector: StreamSelector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSelector {
    AudioOnly,
    HighestResolution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessDenial {
    #[error("private")]
    Private,

    #[error("members-only")]
    MembersOnly,

    #[error("age-restricted")]
    AgeRestricted,
}

#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    /// Writes the descriptor into `directory`, unconditionally replacing any file
    /// from a previous run.
    async fn persist(
        self: ::std::sync::Arc<Self>, directory: &::std::path::Path, descriptor: &PlaylistDescriptor,
    ) -> Fallible<()>;
}
