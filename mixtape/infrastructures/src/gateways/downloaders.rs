use ::async_trait::async_trait;
use ::derive_new::new;
use ::domain::MediaKind;
use ::domain::VideoRecord;
use ::once_cell::sync::Lazy;
use ::regex::Regex;
use ::use_cases::gateways::AccessDenial;
use ::use_cases::gateways::MediaGateway;
use ::use_cases::gateways::Resolution;
use ::use_cases::gateways::ResolvedStream;
use ::use_cases::gateways::StreamSelector;

use crate::utils::aliases::Fallible;
use crate::utils::aliases::MaybeOwnedPath;
use crate::utils::aliases::MaybeOwnedString;
use crate::utils::macros::regex;

/// Media gateway over the `yt-dlp` executable: resolution probes availability
/// without downloading, transfer fetches the selected stream into the target
/// file name.
#[derive(new)]
pub struct YtdlpMediaGateway;

#[async_trait]
impl MediaGateway for YtdlpMediaGateway {
    async fn resolve(
        self: ::std::sync::Arc<Self>, video: &VideoRecord, media_kind: MediaKind,
    ) -> Fallible<Resolution> {
        #[rustfmt::skip]
        let output = ::tokio::process::Command::new("yt-dlp")
            .args([
                &*video.watch_url,
                "--quiet",
                "--color", "no_color",
                "--no-playlist",
                "--skip-download",
                "--print", "%(availability)s",
            ])
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if let Some(denial) = classify_denial(stdout.trim(), &stderr) {
            return Ok(Resolution::Denied(denial));
        }

        if !output.status.success() {
            ::anyhow::bail!("stream resolution failed for {}: {}", video.watch_url, stderr.trim());
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
        self: ::std::sync::Arc<Self>, stream: ResolvedStream, directory: MaybeOwnedPath,
        file_name: MaybeOwnedString,
    ) -> Fallible<()> {
        ::tokio::fs::create_dir_all(&directory).await?;

        ::tracing::debug!(url = %stream.watch_url, file = %file_name, "transferring");

        let mut command = ::tokio::process::Command::new("yt-dlp");

        #[rustfmt::skip]
        command
            .arg(&*stream.watch_url)
            .args([
                "--quiet",
                "--color", "no_color",
                "--no-playlist",
                "--abort-on-error",
                "--force-overwrites",
            ])
            .arg("--paths")
            .arg(&*directory);

        match stream.selector {
            StreamSelector::AudioOnly => {
                // The audio postprocessor renames to `.mp3` itself, so the output
                // template carries the stem only.
                let stem = file_name.rsplit_once('.').map_or(&*file_name, |(stem, _)| stem);

                command
                    .args(["--format", "bestaudio", "--extract-audio", "--audio-format", "mp3"])
                    .arg("--output")
                    .arg(format!("{stem}.%(ext)s"));
            },

            StreamSelector::HighestResolution => {
                command.args(["--format", "best[ext=mp4]/best"]).arg("--output").arg(&*file_name);
            },
        }

        let output = command.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            ::anyhow::bail!("transfer failed for {}: {}", stream.watch_url, stderr.trim());
        }

        Ok(())
    }
}

/// Maps the probe's availability token, or failing that the stderr wording, onto
/// the tolerated denial reasons. Anything unrecognized is not a denial.
fn classify_denial(availability: &str, stderr: &str) -> Option<AccessDenial> {
    match availability {
        "private" => return Some(AccessDenial::Private),
        "premium_only" | "subscriber_only" => return Some(AccessDenial::MembersOnly),
        "needs_auth" => return Some(AccessDenial::AgeRestricted),
        _ => {},
    }

    static PRIVATE: Lazy<Regex> = regex!(r"(?i)private video");
    static MEMBERS_ONLY: Lazy<Regex> = regex!(r"(?i)members-only|join this channel");
    static AGE_RESTRICTED: Lazy<Regex> = regex!(r"(?i)age.restricted|confirm your age");

    if PRIVATE.is_match(stderr) {
        Some(AccessDenial::Private)
    } else if MEMBERS_ONLY.is_match(stderr) {
        Some(AccessDenial::MembersOnly)
    } else if AGE_RESTRICTED.is_match(stderr) {
        Some(AccessDenial::AgeRestricted)
    } else {
        None
    }
}
