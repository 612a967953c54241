use ::async_trait::async_trait;

use crate::models::events::CrawlEvent;
use crate::models::events::DiagnosticEvent;
use crate::models::events::PlaylistTransferEvent;
use crate::models::events::VideoTransferEvent;
use crate::utils::aliases::Fallible;

#[async_trait]
pub trait Accept<Request>: Send + Sync {
    async fn accept(self: ::std::sync::Arc<Self>, request: Request) -> Fallible<()>;
}

#[async_trait]
pub trait Update<Event>: Send + Sync {
    async fn update(&self, event: &Event) -> Fallible<()>;
}

pub struct MirrorChannelRequestModel {
    pub target: ::domain::ChannelTarget,
}

#[async_trait]
pub trait MirrorChannelOutputBoundary:
    Update<CrawlEvent> + Update<VideoTransferEvent> + Update<PlaylistTransferEvent> + Update<DiagnosticEvent>
{
    async fn activate(&self) -> Fallible<()>;
    async fn deactivate(&self) -> Fallible<()>;
}
