//! Referenceable errors and readable stack traces.
//!
//! Asserting on error messages is brittle. Instead, this crate lets errors carry an
//! [`Identity`], issued by a [`Realm`], so that they can be recognised within a chain of causes
//! whatever their message. Errors are [`ErrorNode`]s: immutable links of a cause chain, either
//! untracked, tracked, or checkpoints partitioning the chain into meaningful sections.
//!
//! ```
//! let realm = trackerr::Realm::new();
//! let workflow_failed = realm.track("Workflow error");
//! let cannot_open = realm.checkpoint("File could not be opened");
//!
//! let e = workflow_failed.because_of(cannot_open.because("no such file or directory"), "Failed to read data");
//!
//! assert!(trackerr::all(&e, [&workflow_failed, &cannot_open]));
//! assert_eq!(
//!     trackerr::error_stack(&e),
//!     "  Workflow error\n⤷ Failed to read data\n——File could not be opened——\n⤷ no such file or directory\n"
//! );
//! ```
//!
//! Tracked errors are best created once, while the program initialises, from the default realm
//! through [`track`] and [`checkpoint`] (or the [`track!`] and [`checkpoint!`] macros), then
//! wrapped at will with the builders of [`ErrorNode`].

#[macro_use]
mod macros;

pub mod debug;
pub mod error;
pub mod query;
pub mod realm;
pub mod stack;

pub use debug::{debug, debug_panic, debug_to};
pub use error::convert::ResultExt;
pub use error::{ErrorNode, Kind};
pub use query::{all, any, has_tracked, is, is_checkpoint, is_tracked, is_trackerr};
pub use realm::{
    checkpoint, default_realm, seal_default_realm, track, untracked, wrap, Identity, Realm, RealmError, ERR_BUG,
    ERR_INSANE, ERR_TODO,
};
pub use stack::{
    as_stack, compose, default_format, error_stack, error_stack_with, squash, LineFormat, Printer, Stack, DEBUG_BANNER,
};
