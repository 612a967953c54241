pub mod aliases {
    pub type Fallible<T> = ::anyhow::Result<T>;

    pub type MaybeOwnedString = ::std::borrow::Cow<'static, str>;
    pub type MaybeOwnedPath = ::std::borrow::Cow<'static, ::std::path::Path>;
}

pub mod macros {
    macro_rules! regex {
        ($pattern:expr) => {
            ::once_cell::sync::Lazy::new(|| {
                ::regex::Regex::new($pattern).expect("pattern must parse")
            })
        };
    }

    macro_rules! progress_style {
        ($template:expr) => {
            ::once_cell::sync::Lazy::new(|| {
                ::indicatif::ProgressStyle::with_template($template).expect("template must parse")
            })
        };
    }

    pub(crate) use progress_style;
    pub(crate) use regex;
}
