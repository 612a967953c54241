pub(crate) mod utils;

use ::infrastructures::boundaries::ConsoleMirrorView;
use ::infrastructures::gateways::downloaders::YtdlpMediaGateway;
use ::infrastructures::gateways::explorers::ChromiumChannelExplorer;
use ::infrastructures::gateways::explorers::PageSelectors;
use ::infrastructures::gateways::repositories::M3uPlaylistRepository;
use ::use_cases::boundaries::Accept;
use ::use_cases::boundaries::MirrorChannelOutputBoundary;
use ::use_cases::boundaries::MirrorChannelRequestModel;
use ::use_cases::gateways::ChannelExplorer;
use ::use_cases::gateways::MediaGateway;
use ::use_cases::gateways::PlaylistRepository;
use ::use_cases::interactors::MirrorChannelInteractor;
use ::use_cases::interactors::DOWNLOAD_WORKERS;
use ::use_cases::policies::NavigationRetryPolicy;
use ::use_cases::policies::ScrollUntilStablePolicy;

use crate::utils::aliases::Fallible;
use crate::utils::extensions::OptionExt;
use crate::utils::paths;

#[tokio::main]
async fn main() -> Fallible<()> {
    let writer = ::tracing_appender::rolling::daily("logs", "mixtape.log");
    let (writer, _guard) = ::tracing_appender::non_blocking(writer);

    ::tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(
            ::tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| ::tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .init();

    let command = ::clap::Command::new("mixtape")
        .about("Mass-download a channel's public playlists into a local media library")
        .arg(
            ::clap::Arg::new("channel")
                .required(true)
                .help("Channel URL, @handle or bare handle")
                .value_parser(::clap::value_parser!(::std::string::String)),
        )
        .arg(
            ::clap::Arg::new("format")
                .long("format")
                .default_value("mp4")
                .help("Media format: mp4 (video) or mp3 (audio only)")
                .value_parser(::clap::value_parser!(::std::string::String)),
        )
        .arg(
            ::clap::Arg::new("output-dir")
                .long("output-dir")
                .help("Output directory (default: the platform downloads directory)")
                .value_parser(::clap::value_parser!(::std::path::PathBuf)),
        );

    let matches = command.get_matches();

    let output_dir = match matches.get_one::<::std::path::PathBuf>("output-dir") {
        Some(dir) => paths::expand_tilde(dir),
        None => paths::default_downloads_dir()?,
    };

    // Reference and format problems are configuration errors; report them before
    // a browser ever launches.
    let target = match ::domain::ChannelTarget::resolve(
        matches.get_one::<::std::string::String>("channel").ok()?,
        matches.get_one::<::std::string::String>("format").ok()?,
        &output_dir,
    ) {
        Ok(target) => target,
        Err(error) => {
            println!("Warning: {error}");
            ::std::process::exit(1);
        },
    };

    let view = ::std::sync::Arc::new(ConsoleMirrorView::new());
    let explorer = ::std::sync::Arc::new(ChromiumChannelExplorer::launch(PageSelectors::default()).await?);
    let media = ::std::sync::Arc::new(YtdlpMediaGateway::new());
    let playlists = ::std::sync::Arc::new(M3uPlaylistRepository::new());

    let interactor = ::std::sync::Arc::new(MirrorChannelInteractor {
        output_boundary: view as ::std::sync::Arc<dyn MirrorChannelOutputBoundary>,
        explorer: explorer as ::std::sync::Arc<dyn ChannelExplorer>,
        media: media as ::std::sync::Arc<dyn MediaGateway>,
        playlists: playlists as ::std::sync::Arc<dyn PlaylistRepository>,
        scroll_policy: ScrollUntilStablePolicy::default(),
        retry_policy: NavigationRetryPolicy::default(),
        worker_pool: ::std::sync::Arc::new(::tokio::sync::Semaphore::new(DOWNLOAD_WORKERS)),
    });

    let request = MirrorChannelRequestModel { target };

    if let Err(error) = interactor.accept(request).await {
        println!("{error:#}");
        ::std::process::exit(1);
    }

    Ok(())
}
