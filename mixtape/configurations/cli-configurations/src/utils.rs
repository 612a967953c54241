pub mod aliases {
    pub type Fallible<T> = ::anyhow::Result<T>;
}

pub mod extensions {
    use crate::utils::aliases::Fallible;

    pub trait OptionExt<T> {
        fn ok(self) -> Fallible<T>;
    }

    impl<T> OptionExt<T> for Option<T> {
        #[track_caller]
        fn ok(self) -> Fallible<T> {
            match self {
                Some(val) => Ok(val),
                None => {
                    let location = ::std::panic::Location::caller();
                    Err(::anyhow::anyhow!(
                        "called `OptionExt::ok()` on a `None` value at {}:{}:{}",
                        location.file(),
                        location.line(),
                        location.column()
                    ))
                },
            }
        }
    }
}

pub mod paths {
    use crate::utils::aliases::Fallible;
    use crate::utils::extensions::OptionExt;

    /// `~` and `~/...` expand to the user's home directory; everything else passes
    /// through untouched.
    pub fn expand_tilde(path: &::std::path::Path) -> ::std::path::PathBuf {
        let Some(text) = path.to_str() else {
            return path.to_owned();
        };

        let Some(home) = ::dirs::home_dir() else {
            return path.to_owned();
        };

        if text == "~" {
            home
        } else if let Some(rest) = text.strip_prefix("~/") {
            home.join(rest)
        } else {
            path.to_owned()
        }
    }

    /// The platform downloads directory, the default output root.
    pub fn default_downloads_dir() -> Fallible<::std::path::PathBuf> {
        if let Some(downloads) = ::dirs::download_dir() {
            return Ok(downloads);
        }

        Ok(::dirs::home_dir().ok()?.join("Downloads"))
    }

}
