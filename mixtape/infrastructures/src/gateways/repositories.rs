use ::async_trait::async_trait;
use ::derive_new::new;
use ::use_cases::gateways::PlaylistRepository;
use ::use_cases::models::descriptors::PlaylistDescriptor;

use crate::utils::aliases::Fallible;

/// Writes playlist descriptors as m3u files into the channel's destination
/// folder, unconditionally replacing whatever a previous run left behind.
#[derive(new)]
pub struct M3uPlaylistRepository;

#[async_trait]
impl PlaylistRepository for M3uPlaylistRepository {
    async fn persist(
        self: ::std::sync::Arc<Self>, directory: &::std::path::Path, descriptor: &PlaylistDescriptor,
    ) -> Fallible<()> {
        ::tokio::fs::create_dir_all(directory).await?;
        ::tokio::fs::write(directory.join(&*descriptor.file_name), descriptor.render()).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn persisting_overwrites_any_previous_playlist_file() {
        let directory = ::tempfile::tempdir().unwrap();

        ::std::fs::write(directory.path().join("01-Mix_mp3.m3u"), "stale contents").unwrap();

        let mut descriptor = PlaylistDescriptor::new("01-Mix_mp3.m3u");
        descriptor.push_entry("01-One", "./Audios/aaa.mp3");

        ::std::sync::Arc::new(M3uPlaylistRepository::new())
            .persist(directory.path(), &descriptor)
            .await
            .unwrap();

        let written = ::std::fs::read_to_string(directory.path().join("01-Mix_mp3.m3u")).unwrap();
        assert_eq!(written, "#EXTINF:-1,01-One\n./Audios/aaa.mp3\n");
    }

    #[tokio::test]
    async fn persisting_creates_the_channel_directory_when_missing() {
        let directory = ::tempfile::tempdir().unwrap();
        let nested = directory.path().join("foo");

        let descriptor = PlaylistDescriptor::new("02-Empty_mp4.m3u");

        ::std::sync::Arc::new(M3uPlaylistRepository::new()).persist(&nested, &descriptor).await.unwrap();

        assert_eq!(::std::fs::read_to_string(nested.join("02-Empty_mp4.m3u")).unwrap(), "");
    }
}
