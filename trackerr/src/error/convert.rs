//! Conversion of foreign errors into cause chains.

use core::fmt;
use std::error::Error;

use super::{ErrorNode, Kind};

impl ErrorNode {
    /// Converts any error, along with its chain of [sources](Error::source), into a chain of
    /// untracked nodes.
    ///
    /// The conversion stops at the first error of the chain which is already an [`ErrorNode`]:
    /// that node is reused as is, so identities survive a detour through foreign error types.
    #[must_use]
    pub fn from_error(error: &(dyn Error + 'static)) -> Self {
        let mut messages = Vec::new();
        let mut tail = None;
        let mut current = Some(error);

        while let Some(err) = current {
            if let Some(node) = err.downcast_ref::<ErrorNode>() {
                tail = Some(node.clone());
                break;
            }

            messages.push(err.to_string());
            current = err.source();
        }

        let mut node = tail;
        for message in messages.into_iter().rev() {
            node = Some(Self::new(Kind::Untracked, message, node));
        }

        node.unwrap_or_else(|| Self::untracked(error))
    }
}

impl From<std::io::Error> for ErrorNode {
    fn from(error: std::io::Error) -> Self {
        Self::from_error(&error)
    }
}

impl From<fmt::Error> for ErrorNode {
    fn from(error: fmt::Error) -> Self {
        Self::from_error(&error)
    }
}

/// Annotates the error of a [`Result`] while propagating it.
///
/// ```
/// use trackerr::ResultExt;
///
/// let realm = trackerr::Realm::new();
/// let read_failed = realm.track("could not read the configuration");
///
/// let result = std::fs::read_to_string("/does/not/exist").wrap_err(&read_failed);
///
/// assert!(trackerr::is(&result.unwrap_err(), &read_failed));
/// ```
pub trait ResultExt<T> {
    /// Wraps the error, converted with [`ErrorNode::from_error`], in a copy of `head`.
    ///
    /// # Errors
    /// Returns the wrapped error if `self` is an error.
    fn wrap_err(self, head: &ErrorNode) -> Result<T, ErrorNode>;

    /// Same as [`ResultExt::wrap_err`], with an intermediate untracked error built from
    /// `message`, as [`ErrorNode::because_of`] does.
    ///
    /// # Errors
    /// Returns the wrapped error if `self` is an error.
    fn because_of<M: fmt::Display>(self, head: &ErrorNode, message: M) -> Result<T, ErrorNode>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Error + 'static,
{
    fn wrap_err(self, head: &ErrorNode) -> Result<T, ErrorNode> {
        self.map_err(|err| head.wrap(ErrorNode::from_error(&err)))
    }

    fn because_of<M: fmt::Display>(self, head: &ErrorNode, message: M) -> Result<T, ErrorNode> {
        self.map_err(|err| head.because_of(ErrorNode::from_error(&err), message))
    }
}
