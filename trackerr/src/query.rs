//! Classification of errors.
//!
//! These functions accept any error and follow its chain of [sources](Error::source), so a chain
//! of [`ErrorNode`]s may be classified even when it hides behind a foreign error type.

use core::borrow::Borrow;
use std::error::Error;

use crate::error::ErrorNode;

/// Iterates over `e` and its transitive sources.
fn sources<'e>(e: &'e (dyn Error + 'static)) -> impl Iterator<Item = &'e (dyn Error + 'static)> {
    core::iter::successors(Some(e), |&err| err.source())
}

/// Returns true if `target` is found within the chain of `e`.
///
/// Tracked errors are found by identity, untracked ones only if the very same node is part of the
/// chain.
#[must_use]
pub fn is(e: &(dyn Error + 'static), target: &ErrorNode) -> bool {
    sources(e).any(|err| err.downcast_ref::<ErrorNode>().map_or(false, |node| node == target))
}

/// Returns true if [`is`] holds for every target.
#[must_use]
pub fn all<I>(e: &(dyn Error + 'static), targets: I) -> bool
where
    I: IntoIterator,
    I::Item: Borrow<ErrorNode>,
{
    targets.into_iter().all(|target| is(e, target.borrow()))
}

/// Returns true if [`is`] holds for at least one target.
#[must_use]
pub fn any<I>(e: &(dyn Error + 'static), targets: I) -> bool
where
    I: IntoIterator,
    I::Item: Borrow<ErrorNode>,
{
    targets.into_iter().any(|target| is(e, target.borrow()))
}

/// Returns true if `e` or any of its causes has an identity.
#[must_use]
pub fn has_tracked(e: &(dyn Error + 'static)) -> bool {
    sources(e).any(is_tracked)
}

/// Returns true if `e` itself, regardless of its causes, has an identity.
#[must_use]
pub fn is_tracked(e: &(dyn Error + 'static)) -> bool {
    e.downcast_ref::<ErrorNode>().map_or(false, ErrorNode::is_tracked)
}

/// Returns true if `e` itself is a checkpoint.
#[must_use]
pub fn is_checkpoint(e: &(dyn Error + 'static)) -> bool {
    e.downcast_ref::<ErrorNode>().map_or(false, ErrorNode::is_checkpoint)
}

/// Returns true if `e` is an [`ErrorNode`], as opposed to an error defined elsewhere.
#[must_use]
pub fn is_trackerr(e: &(dyn Error + 'static)) -> bool {
    e.is::<ErrorNode>()
}

#[cfg(test)]
mod tests {
    use derive_more::Display;

    use super::*;
    use crate::Realm;

    /// Foreign error hiding a chain.
    #[derive(Debug, Display)]
    #[display(fmt = "boxed")]
    struct Boxed(ErrorNode);

    impl Error for Boxed {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn is_tracked_1() {
        let realm = Realm::new();

        assert!(is_tracked(&realm.track("abc")));
        assert!(is_tracked(&realm.checkpoint("abc")));
        assert!(!is_tracked(&realm.untracked("abc")));
    }

    #[test]
    fn is_tracked_ignores_causes() {
        let realm = Realm::new();

        let e = realm.untracked("head").wrap(realm.track("cause"));

        assert!(!is_tracked(&e));
        assert!(has_tracked(&e));
    }

    #[test]
    fn has_tracked_polarity() {
        let realm = Realm::new();

        let c = realm.untracked("charlie");
        let b = realm.untracked("beta").wrap(c);
        let a = realm.untracked("alpha").wrap(b.clone());
        assert!(!has_tracked(&a));

        let a = realm.untracked("alpha").wrap(b.wrap(realm.track("charlie")));
        assert!(has_tracked(&a));
    }

    #[test]
    fn anonymous_checkpoint_is_not_tracked() {
        let realm = Realm::new();

        let e = realm.untracked("head").checkpoint(realm.untracked("root"), "boundary");

        assert!(!has_tracked(&e));
        assert!(is_checkpoint(e.cause().unwrap()));
        assert!(!is_checkpoint(&e));
    }

    #[test]
    fn all_1() {
        let realm = Realm::new();
        let other = realm.track("other");

        let c = realm.track("charlie");
        let b = realm.track("beta").wrap(c.clone());
        let a = realm.track("alpha").wrap(b.clone());

        assert!(all(&a, [&a, &b, &c]));
        assert!(!all(&a, [&a, &b, &other]));
        assert!(all(&a, Vec::<ErrorNode>::new()));
    }

    #[test]
    fn any_1() {
        let realm = Realm::new();
        let other = realm.track("other");

        let c = realm.track("charlie");
        let b = realm.track("beta").wrap(c.clone());
        let a = realm.track("alpha").wrap(b.clone());

        assert!(any(&a, [&other, &c]));
        assert!(any(&a, vec![b.clone()]));
        assert!(!any(&a, [&other]));
        assert!(!any(&a, Vec::<ErrorNode>::new()));
    }

    #[test]
    fn untracked_targets() {
        let realm = Realm::new();

        let c = realm.untracked("charlie");
        let b = realm.untracked("beta").wrap(c.clone());
        let a = realm.untracked("alpha").wrap(b.clone());

        assert!(all(&a, [&a, &b, &c]));
        assert!(!is(&a, &realm.untracked("charlie")));
        // copies are new nodes
        assert!(!is(&a, &c.because("something")));
    }

    #[test]
    fn tracked_copies_match() {
        let realm = Realm::new();
        let tracked = realm.track("tracked");

        let e = realm.untracked("head").wrap(tracked.with_message("reworded").because("root"));

        assert!(is(&e, &tracked));
    }

    #[test]
    fn through_foreign_errors() {
        let realm = Realm::new();
        let tracked = realm.track("tracked");

        let e = Boxed(realm.untracked("head").wrap(tracked.clone()));

        assert!(is(&e, &tracked));
        assert!(has_tracked(&e));
        assert!(!is_tracked(&e));
        assert!(!is_trackerr(&e));
        assert!(is_trackerr(&e.0));
    }
}
