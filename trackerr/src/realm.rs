//! Allocation of error identities.
//!
//! A [`Realm`] is a space in which every tracked error has its own unique [`Identity`]. The crate
//! owns a default realm, used through the free functions [`track`] and [`checkpoint`], which is
//! enough for most programs. Additional realms are mostly useful in tests, so that identities do
//! not leak between unrelated test cases.
//!
//! Tracked errors are meant to be created while a program initialises, typically to fill
//! `static` items. Once initialisation is over, a realm may be [sealed](Realm::seal) so that any
//! later attempt to create a tracked error is caught.

use core::fmt;
use core::num::NonZeroU64;
use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use derive_more::Display;
use log::{trace, warn};
use once_cell::sync::Lazy;

use crate::error::{ErrorNode, Kind};

/// The identity of a tracked error, unique within the realm which issued it.
///
/// Identities are strictly positive, the absence of identity denoting an untracked error.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[display(fmt = "#{}", _0)]
pub struct Identity(NonZeroU64);

impl Identity {
    /// Returns the raw value of the identity.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl From<Identity> for u64 {
    #[inline]
    fn from(identity: Identity) -> Self {
        identity.get()
    }
}

/// Reasons for which a realm refuses to issue an identity.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum RealmError {
    #[display(fmt = "no tracked errors may be created once the realm is sealed")]
    Sealed,

    #[display(fmt = "the identity pool of the realm is exhausted")]
    Exhausted,
}

impl std::error::Error for RealmError {}

pub type Result<T> = core::result::Result<T, RealmError>;

/// A pool of unique identities backed by an incrementing integer.
///
/// The counter is atomic, so a single realm may be shared between threads. Running out of
/// identities would require 2^64 allocations, which no program using this crate as intended will
/// ever reach; it is nonetheless reported as [`RealmError::Exhausted`] instead of wrapping around
/// to an identity issued earlier.
pub struct Realm {
    /// Last identity issued, 0 if none.
    id_pool: AtomicU64,

    sealed: AtomicBool,
}

impl Realm {
    /// Creates a new realm, whose first identity will be 1.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_after(0)
    }

    /// Creates a new realm whose first identity will be `last + 1`.
    #[inline]
    #[must_use]
    pub const fn starting_after(last: u64) -> Self {
        Self {
            id_pool: AtomicU64::new(last),
            sealed: AtomicBool::new(false),
        }
    }

    /// Issues a new identity.
    ///
    /// # Errors
    /// Returns an error if the realm is sealed or if its pool of identities is exhausted.
    pub fn try_allocate(&self) -> Result<Identity> {
        if self.is_sealed() {
            warn!("identity requested from a sealed realm");
            return Err(RealmError::Sealed);
        }

        let last = self
            .id_pool
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_add(1))
            .map_err(|_| RealmError::Exhausted)?;

        let identity = last.checked_add(1).and_then(NonZeroU64::new).map(Identity).ok_or(RealmError::Exhausted)?;
        trace!("realm issued identity {identity}");
        Ok(identity)
    }

    /// Issues a new identity.
    ///
    /// # Panics
    /// Panics if the realm is sealed or exhausted, see [`Realm::try_allocate`].
    #[must_use]
    pub fn allocate(&self) -> Identity {
        self.try_allocate().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Returns the number of identities issued so far.
    #[inline]
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.id_pool.load(Ordering::Acquire)
    }

    /// Prevents this realm from issuing any further identity.
    ///
    /// Untracked errors, and the anonymous checkpoints inserted by [`ErrorNode::checkpoint`], can
    /// still be created afterwards.
    #[inline]
    pub fn seal(&self) {
        self.sealed.store(true, Ordering::Release);
    }

    /// Indicates whether the realm has been sealed.
    #[inline]
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    /// Creates an untracked error. The realm is not consulted.
    #[inline]
    #[must_use]
    pub fn untracked(&self, message: impl fmt::Display) -> ErrorNode {
        ErrorNode::untracked(message)
    }

    /// Creates a new tracked error.
    ///
    /// # Errors
    /// Returns an error if no identity can be issued.
    pub fn try_track(&self, message: impl fmt::Display) -> Result<ErrorNode> {
        let identity = self.try_allocate()?;
        Ok(ErrorNode::new(Kind::Tracked(identity), message, None))
    }

    /// Creates a new tracked checkpoint error.
    ///
    /// # Errors
    /// Returns an error if no identity can be issued.
    pub fn try_checkpoint(&self, message: impl fmt::Display) -> Result<ErrorNode> {
        let identity = self.try_allocate()?;
        Ok(ErrorNode::new(Kind::Checkpoint(Some(identity)), message, None))
    }

    /// Creates a new tracked error.
    ///
    /// [`is_tracked`](crate::is_tracked) and [`has_tracked`](crate::has_tracked) both hold for
    /// the returned error.
    ///
    /// # Panics
    /// Panics if no identity can be issued, see [`Realm::try_allocate`].
    #[must_use]
    pub fn track(&self, message: impl fmt::Display) -> ErrorNode {
        ErrorNode::new(Kind::Tracked(self.allocate()), message, None)
    }

    /// Creates a new tracked checkpoint error.
    ///
    /// [`is_tracked`](crate::is_tracked), [`has_tracked`](crate::has_tracked) and
    /// [`is_checkpoint`](crate::is_checkpoint) all hold for the returned error.
    ///
    /// # Panics
    /// Panics if no identity can be issued, see [`Realm::try_allocate`].
    #[must_use]
    pub fn checkpoint(&self, message: impl fmt::Display) -> ErrorNode {
        ErrorNode::new(Kind::Checkpoint(Some(self.allocate())), message, None)
    }
}

impl Default for Realm {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Realm")
            .field("issued", &self.issued())
            .field("sealed", &self.is_sealed())
            .finish()
    }
}

static DEFAULT_REALM: Realm = Realm::new();

/// The realm used by the free functions of this crate.
#[inline]
#[must_use]
pub fn default_realm() -> &'static Realm {
    &DEFAULT_REALM
}

/// Creates an untracked error, one without identity.
///
/// Apart from its message being anything displayable, it is no different from any other leaf
/// error, but it can be chained like every [`ErrorNode`].
#[inline]
#[must_use]
pub fn untracked(message: impl fmt::Display) -> ErrorNode {
    ErrorNode::untracked(message)
}

/// Creates an untracked error wrapping `cause`.
#[inline]
#[must_use]
pub fn wrap(cause: ErrorNode, message: impl fmt::Display) -> ErrorNode {
    ErrorNode::untracked(message).wrap(cause)
}

/// Creates a tracked error from the default realm.
///
/// This is the recommended way to create trackable errors outside of tests.
///
/// # Panics
/// Panics if the default realm is sealed.
#[inline]
#[must_use]
pub fn track(message: impl fmt::Display) -> ErrorNode {
    DEFAULT_REALM.track(message)
}

/// Creates a tracked checkpoint error from the default realm.
///
/// # Panics
/// Panics if the default realm is sealed.
#[inline]
#[must_use]
pub fn checkpoint(message: impl fmt::Display) -> ErrorNode {
    DEFAULT_REALM.checkpoint(message)
}

/// Seals the default realm, usually once the program is initialised.
///
/// The well-known errors of this crate are created beforehand so they stay usable.
pub fn seal_default_realm() {
    Lazy::force(&ERR_TODO);
    Lazy::force(&ERR_BUG);
    Lazy::force(&ERR_INSANE);
    DEFAULT_REALM.seal();
}

/// Tracked error marking code still to be written.
///
/// Handy when writing code by stepwise refinement or test first.
pub static ERR_TODO: Lazy<ErrorNode> = Lazy::new(|| track("TODO: Implementation needed"));

/// Tracked error for use at the site of known bugs.
pub static ERR_BUG: Lazy<ErrorNode> = Lazy::new(|| track("BUG: Fix needed"));

/// Tracked error for failed sanity checks.
pub static ERR_INSANE: Lazy<ErrorNode> = Lazy::new(|| track("Sanity check failed!!"));
