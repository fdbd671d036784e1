//! Constructors taking a format string, in the manner of [`format!`].
//!
//! The message is formatted once, when the error is created.

/// Creates an untracked error from a format string.
///
/// ```
/// let path = "data/acid-rain.csv";
/// let e = trackerr::untracked!("file could not be opened {:?}", path);
///
/// assert_eq!(e.message(), "file could not be opened \"data/acid-rain.csv\"");
/// ```
#[macro_export]
macro_rules! untracked {
    ($($arg:tt)+) => {
        $crate::untracked(::std::format_args!($($arg)+))
    };
}

/// Creates a tracked error from a format string.
///
/// The error is created from the default realm, or from the realm given before a `;`.
///
/// ```
/// let realm = trackerr::Realm::new();
/// let e = trackerr::track!(realm; "error number {}", 1);
///
/// assert_eq!(e.message(), "error number 1");
/// assert_eq!(e.identity().map(|id| id.get()), Some(1));
/// ```
#[macro_export]
macro_rules! track {
    ($realm:expr; $($arg:tt)+) => {
        $crate::Realm::track(&$realm, ::std::format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::track(::std::format_args!($($arg)+))
    };
}

/// Creates a tracked checkpoint error from a format string.
///
/// The error is created from the default realm, or from the realm given before a `;`.
#[macro_export]
macro_rules! checkpoint {
    ($realm:expr; $($arg:tt)+) => {
        $crate::Realm::checkpoint(&$realm, ::std::format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::checkpoint(::std::format_args!($($arg)+))
    };
}
