//! Error nodes, the links of a cause chain.
//!
//! An [`ErrorNode`] is an immutable value: every builder ([`wrap`](ErrorNode::wrap),
//! [`because`](ErrorNode::because), [`because_of`](ErrorNode::because_of),
//! [`checkpoint`](ErrorNode::checkpoint)) returns a shallow copy of the receiver with a different
//! cause, sharing (and never modifying) the chain of causes it already had. Holding on to a node
//! before wrapping it is therefore always safe.
//!
//! As nodes can only ever refer to nodes built before them, cause chains cannot contain cycles.

pub mod convert;

use core::fmt;
use std::sync::Arc;

use crate::realm::Identity;
use crate::stack::{self, Stack};

/// The variant of an error node.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Kind {
    /// An error without identity, only useful for its message and for chaining.
    Untracked,

    /// An error with an identity, comparable without looking at its message.
    Tracked(Identity),

    /// A noteworthy node partitioning the chain, typically at the boundary of a package or a
    /// subsystem.
    ///
    /// Checkpoints created by a [`Realm`](crate::Realm) have an identity. The intermediate
    /// checkpoints inserted by [`ErrorNode::checkpoint`] are anonymous: they are rendered as
    /// checkpoints but behave like untracked errors otherwise.
    Checkpoint(Option<Identity>),
}

impl Kind {
    /// The identity carried by this kind, if any.
    #[inline]
    #[must_use]
    pub const fn identity(self) -> Option<Identity> {
        match self {
            Self::Untracked => None,
            Self::Tracked(identity) => Some(identity),
            Self::Checkpoint(identity) => identity,
        }
    }
}

/// Shared payload of an [`ErrorNode`].
struct Node {
    kind: Kind,
    message: Box<str>,
    cause: Option<ErrorNode>,
}

impl Drop for Node {
    /// Unlinks the chain iteratively, so that dropping very long chains cannot overflow the stack.
    fn drop(&mut self) {
        let mut next = self.cause.take();

        while let Some(ErrorNode(node)) = next {
            next = match Arc::try_unwrap(node) {
                Ok(mut node) => node.cause.take(),
                // still referenced elsewhere
                Err(_) => None,
            };
        }
    }
}

/// One link of a cause chain.
///
/// Cloning a node is cheap and yields the *same* node: clones of an untracked node compare equal,
/// whereas two untracked nodes built separately never do, even with the same message. Tracked
/// nodes compare by identity only.
#[derive(Clone)]
pub struct ErrorNode(Arc<Node>);

impl ErrorNode {
    pub(crate) fn new(kind: Kind, message: impl fmt::Display, cause: Option<ErrorNode>) -> Self {
        Self(Arc::new(Node {
            kind,
            message: message.to_string().into_boxed_str(),
            cause,
        }))
    }

    /// Creates an untracked error.
    #[inline]
    #[must_use]
    pub fn untracked(message: impl fmt::Display) -> Self {
        Self::new(Kind::Untracked, message, None)
    }

    /// Shallow copy of `self` with another cause.
    fn with_cause(&self, cause: Option<ErrorNode>) -> Self {
        Self(Arc::new(Node {
            kind: self.0.kind,
            message: self.0.message.clone(),
            cause,
        }))
    }

    /// The variant of this node.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.0.kind
    }

    /// The identity of this node, `None` if it is untracked.
    #[inline]
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.0.kind.identity()
    }

    /// The message of this node, which never includes the message of its cause.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.0.message
    }

    /// The direct cause of this node.
    #[inline]
    #[must_use]
    pub fn cause(&self) -> Option<&ErrorNode> {
        self.0.cause.as_ref()
    }

    /// Indicates whether this node has an identity.
    #[inline]
    #[must_use]
    pub fn is_tracked(&self) -> bool {
        self.identity().is_some()
    }

    /// Indicates whether this node is a checkpoint, anonymous or not.
    #[inline]
    #[must_use]
    pub fn is_checkpoint(&self) -> bool {
        matches!(self.0.kind, Kind::Checkpoint(_))
    }

    /// Returns true if both nodes have the same identity.
    ///
    /// This is a shallow comparison: neither messages nor causes are looked at. Untracked nodes
    /// are never the same as anything.
    #[inline]
    #[must_use]
    pub fn is(&self, other: &ErrorNode) -> bool {
        match (self.identity(), other.identity()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Returns a copy of `self` whose cause is `cause`, replacing the former cause if any.
    ///
    /// ```
    /// let cause = trackerr::untracked("cause message");
    /// let e = trackerr::untracked("wrapper message").wrap(cause);
    ///
    /// assert_eq!(trackerr::error_stack(&e), "  wrapper message\n⤷ cause message\n");
    /// ```
    #[must_use]
    pub fn wrap(&self, cause: ErrorNode) -> Self {
        self.with_cause(Some(cause))
    }

    /// Returns a copy of `self` caused by a new untracked error built from `message`.
    ///
    /// ```
    /// let e = trackerr::untracked("wrapper message").because("cause message");
    ///
    /// assert_eq!(trackerr::error_stack(&e), "  wrapper message\n⤷ cause message\n");
    /// ```
    #[must_use]
    pub fn because(&self, message: impl fmt::Display) -> Self {
        self.wrap(Self::untracked(message))
    }

    /// Returns a copy of `self` caused by a new untracked error built from `message`, itself
    /// caused by `cause`.
    ///
    /// ```
    /// let root = trackerr::untracked("root cause message");
    /// let e = trackerr::untracked("wrapper message").because_of(root, "caused by message");
    ///
    /// assert_eq!(
    ///     trackerr::error_stack(&e),
    ///     "  wrapper message\n⤷ caused by message\n⤷ root cause message\n"
    /// );
    /// ```
    #[must_use]
    pub fn because_of(&self, cause: ErrorNode, message: impl fmt::Display) -> Self {
        self.wrap(Self::new(Kind::Untracked, message, Some(cause)))
    }

    /// Alias of [`ErrorNode::because_of`].
    #[inline]
    #[must_use]
    pub fn caused_by(&self, cause: ErrorNode, message: impl fmt::Display) -> Self {
        self.because_of(cause, message)
    }

    /// Same as [`ErrorNode::because_of`], except the intermediate error is an anonymous
    /// checkpoint.
    ///
    /// The checkpoint draws no identity from any realm, so this can be called at any time, even
    /// after the realms in use have been sealed.
    ///
    /// ```
    /// let root = trackerr::untracked("root cause message");
    /// let e = trackerr::untracked("wrapper message").checkpoint(root, "checkpoint message");
    ///
    /// assert_eq!(
    ///     trackerr::error_stack(&e),
    ///     "  wrapper message\n——checkpoint message——\n⤷ root cause message\n"
    /// );
    /// ```
    #[must_use]
    pub fn checkpoint(&self, cause: ErrorNode, message: impl fmt::Display) -> Self {
        self.wrap(Self::new(Kind::Checkpoint(None), message, Some(cause)))
    }

    /// Returns a copy of `self`, identity and cause included, with another message.
    #[must_use]
    pub fn with_message(&self, message: impl fmt::Display) -> Self {
        Self::new(self.0.kind, message, self.0.cause.clone())
    }

    /// Iterates over the chain starting at `self`, `self` first and root cause last.
    #[inline]
    #[must_use]
    pub fn stack(&self) -> Stack<'_> {
        Stack::new(self)
    }

    /// Indicates whether both values are the very same node, not merely equal ones.
    #[inline]
    pub(crate) fn ptr_eq(&self, other: &ErrorNode) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ErrorNode {
    /// Tracked nodes are equal when their identities are; other nodes only when they are the same
    /// node.
    fn eq(&self, other: &Self) -> bool {
        self.is(other) || (self.identity().is_none() && other.identity().is_none() && self.ptr_eq(other))
    }
}

impl Eq for ErrorNode {}

impl fmt::Display for ErrorNode {
    /// Writes the message of the node. The alternate flag (`{:#}`) writes the whole stack trace
    /// instead.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str(&stack::error_stack(self))
        } else {
            f.write_str(self.message())
        }
    }
}

impl fmt::Debug for ErrorNode {
    /// Lists the kind and message of every link, head first, without recursing into causes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.stack().map(|node| (node.kind(), node.message())))
            .finish()
    }
}

impl std::error::Error for ErrorNode {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause().map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}
