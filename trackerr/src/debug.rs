//! Printing errors while debugging.
//!
//! These functions are meant for day to day manual debugging, not for logging.

use std::io;
use std::panic::{self, UnwindSafe};

use log::{debug as log_debug, warn};

use crate::error::ErrorNode;
use crate::stack::Printer;

/// Prints the stack trace of `e` on the standard output, after a banner.
///
/// If `e` is `None`, a line noting the absence of error is printed instead.
///
/// # Errors
/// Returns any error raised while writing to the standard output.
pub fn debug(e: Option<&ErrorNode>) -> io::Result<()> {
    debug_to(&mut io::stdout().lock(), e)
}

/// Same as [`debug`], writing to `writer`.
///
/// # Errors
/// Returns any error raised while writing.
pub fn debug_to<W: io::Write + ?Sized>(writer: &mut W, e: Option<&ErrorNode>) -> io::Result<()> {
    Printer::default().debug_to(writer, e)
}

/// Runs `f`, catching any panic carrying an [`ErrorNode`].
///
/// - If `f` returns normally, its value is returned.
/// - If `f` panics with an [`ErrorNode`] (see [`std::panic::panic_any`]), the error is printed with
///   [`debug`]. It is then stored into `catch` and `None` is returned, or, if `catch` is `None`,
///   the panic is resumed with the very same error.
/// - If `f` panics with anything else, the panic is resumed untouched.
///
/// ```
/// let realm = trackerr::Realm::new();
/// let broken = realm.track("broken");
///
/// let mut caught = None;
/// let thrown = broken.clone();
/// let result = trackerr::debug_panic(Some(&mut caught), move || -> u32 { std::panic::panic_any(thrown) });
///
/// assert_eq!(result, None);
/// assert!(caught.unwrap().is(&broken));
/// ```
pub fn debug_panic<F, T>(catch: Option<&mut Option<ErrorNode>>, f: F) -> Option<T>
where
    F: FnOnce() -> T + UnwindSafe,
{
    let payload = match panic::catch_unwind(f) {
        Ok(value) => return Some(value),
        Err(payload) => payload,
    };

    let e = match payload.downcast::<ErrorNode>() {
        Ok(e) => e,
        Err(payload) => {
            log_debug!("resuming a panic which does not carry an error");
            panic::resume_unwind(payload)
        },
    };

    log_debug!("caught a panic carrying: {}", e.message());
    if let Err(err) = debug(Some(&e)) {
        warn!("failed to print the caught error: {err}");
    }

    match catch {
        Some(slot) => {
            *slot = Some(*e);
            None
        },
        None => panic::resume_unwind(e),
    }
}

#[cfg(test)]
mod tests {
    use std::panic::panic_any;

    use super::*;
    use crate::Realm;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn debug_nil() {
        let mut out = Vec::new();

        debug_to(&mut out, None).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "[Debugging error] nil error");
    }

    #[test]
    fn debug_stack() {
        let e = Realm::new().track("abc").because("def");
        let mut out = Vec::new();

        debug_to(&mut out, Some(&e)).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "[Debugging error]\n  abc\n⤷ def\n");
    }

    #[test]
    fn debug_panic_without_panic() {
        init_logger();
        let mut caught = None;

        let result = debug_panic(Some(&mut caught), || 42);

        assert_eq!(result, Some(42));
        assert!(caught.is_none());
    }

    #[test]
    fn debug_panic_catches() {
        init_logger();
        let alpha = Realm::new().track("tracked alpha");
        let thrown = alpha.clone();

        let mut caught = None;
        let result = debug_panic(Some(&mut caught), move || -> u32 { panic_any(thrown) });

        assert_eq!(result, None);
        assert_eq!(caught, Some(alpha));
    }

    #[test]
    fn debug_panic_resumes() {
        init_logger();
        let alpha = Realm::new().track("tracked alpha");
        let thrown = alpha.clone();

        let payload = panic::catch_unwind(move || debug_panic(None, move || -> u32 { panic_any(thrown) })).unwrap_err();

        let resumed = payload.downcast::<ErrorNode>().unwrap();
        assert!(resumed.is(&alpha));
        assert_eq!(resumed.message(), "tracked alpha");
    }

    #[test]
    fn debug_panic_ignores_other_payloads() {
        init_logger();
        let mut caught = None;

        let payload = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            debug_panic(Some(&mut caught), || -> u32 { panic_any(String::from("not an error")) })
        }))
        .unwrap_err();

        assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("not an error"));
        assert!(caught.is_none());
    }
}
