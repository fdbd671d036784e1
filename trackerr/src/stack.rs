//! Walking and rendering cause chains.
//!
//! The default rendering prints one line per node, head first and root cause last. Checkpoints
//! are enclosed in `——` while other nodes, except the head, are prefixed with `⤷ `:
//!
//! ```text
//!   Workflow error
//! ⤷ Failed to read data
//! ——File could not be opened "data/acid-rain.csv"——
//! ⤷ open data/acid-rain.csv
//! ⤷ no such file or directory
//! ```

use core::fmt;
use std::borrow::Cow;
use std::io;

use crate::error::ErrorNode;

/// Iterator over a cause chain, head first and root cause last.
///
/// See [`ErrorNode::stack`].
#[derive(Clone, Debug)]
pub struct Stack<'e> {
    next: Option<&'e ErrorNode>,
}

impl<'e> Stack<'e> {
    pub(crate) const fn new(head: &'e ErrorNode) -> Self {
        Self { next: Some(head) }
    }
}

impl<'e> Iterator for Stack<'e> {
    type Item = &'e ErrorNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.cause();
        Some(node)
    }
}

impl core::iter::FusedIterator for Stack<'_> {}

/// Flattens the chain starting at `head`: `head` first, root cause last.
#[must_use]
pub fn as_stack(head: &ErrorNode) -> Vec<ErrorNode> {
    head.stack().cloned().collect()
}

/// Builds a chain from a root cause and the errors successively wrapping it.
///
/// `wrappers` go from the closest to the root cause up to the head of the new chain.
///
/// ```
/// let head = trackerr::untracked("head message");
/// let mid = trackerr::untracked("mid level message");
/// let root = trackerr::untracked("root cause message");
///
/// let e = trackerr::compose(root, [mid, head]);
///
/// assert_eq!(
///     trackerr::error_stack(&e),
///     "  head message\n⤷ mid level message\n⤷ root cause message\n"
/// );
/// ```
#[must_use]
pub fn compose<I>(root: ErrorNode, wrappers: I) -> ErrorNode
where
    I: IntoIterator<Item = ErrorNode>,
{
    wrappers.into_iter().fold(root, |cause, wrapper| wrapper.wrap(cause))
}

/// Formats one line of a stack trace.
///
/// Lines are separated by the renderer, so implementations should not add line feeds of their own.
/// Any `Fn(&str, &ErrorNode, bool) -> String` is a line format.
#[cfg_attr(test, mockall::automock)]
pub trait LineFormat {
    /// Formats the line of `node`, whose message is `message`. `is_head` is only true for the
    /// first node of the chain.
    fn format_line(&self, message: &str, node: &ErrorNode, is_head: bool) -> String;
}

impl<F> LineFormat for F
where
    F: Fn(&str, &ErrorNode, bool) -> String,
{
    #[inline]
    fn format_line(&self, message: &str, node: &ErrorNode, is_head: bool) -> String {
        self(message, node, is_head)
    }
}

/// The default line format.
#[must_use]
pub fn default_format(message: &str, node: &ErrorNode, is_head: bool) -> String {
    if node.is_checkpoint() {
        format!("——{message}——")
    } else if is_head {
        format!("  {message}")
    } else {
        format!("⤷ {message}")
    }
}

/// Returns a human readable stack trace of the chain starting at `head`, using
/// [`default_format`].
#[must_use]
pub fn error_stack(head: &ErrorNode) -> String {
    error_stack_with(head, &default_format)
}

/// Returns a stack trace of the chain starting at `head`, formatting each line with `format`.
///
/// Every line, the last one included, ends with a line feed.
///
/// ```
/// use trackerr::ErrorNode;
///
/// let realm = trackerr::Realm::new();
/// let e = realm
///     .untracked("Dan's message")
///     .because_of(realm.checkpoint("Bob's message").because("Alice's message"), "Charlie's message");
///
/// let s = trackerr::error_stack_with(&e, &|message: &str, node: &ErrorNode, is_head: bool| {
///     if is_head {
///         format!("ERROR: {message}")
///     } else if node.is_checkpoint() {
///         format!("*** {message} ***")
///     } else {
///         format!("Caused by: {message}")
///     }
/// });
///
/// assert_eq!(
///     s,
///     "ERROR: Dan's message\nCaused by: Charlie's message\n*** Bob's message ***\nCaused by: Alice's message\n"
/// );
/// ```
#[must_use]
pub fn error_stack_with<F>(head: &ErrorNode, format: &F) -> String
where
    F: LineFormat + ?Sized,
{
    let mut trace = String::new();

    for (i, node) in head.stack().enumerate() {
        trace.push_str(&format.format_line(node.message(), node, i == 0));
        trace.push('\n');
    }

    trace
}

/// Renders the chain starting at `e` and returns it as the message of a new untracked error.
#[must_use]
pub fn squash(e: &ErrorNode) -> ErrorNode {
    ErrorNode::untracked(error_stack(e))
}

/// Banner printed before stack traces by [`debug`](crate::debug).
pub const DEBUG_BANNER: &str = "[Debugging error]";

/// Configurable stack trace printer.
///
/// [`Printer::default`] renders exactly like [`error_stack`] and prints exactly like
/// [`debug`](crate::debug).
pub struct Printer {
    format: Box<dyn LineFormat>,
    banner: Cow<'static, str>,
}

impl Printer {
    /// Creates a printer with the default line format and banner.
    #[must_use]
    pub fn new() -> Self {
        Self {
            format: Box::new(default_format),
            banner: Cow::Borrowed(DEBUG_BANNER),
        }
    }

    /// Replaces the line format.
    #[must_use]
    pub fn with_format<F: LineFormat + 'static>(mut self, format: F) -> Self {
        self.format = Box::new(format);
        self
    }

    /// Replaces the banner printed before stack traces.
    #[must_use]
    pub fn with_banner(mut self, banner: impl Into<Cow<'static, str>>) -> Self {
        self.banner = banner.into();
        self
    }

    /// Returns the stack trace of the chain starting at `head`.
    #[must_use]
    pub fn render(&self, head: &ErrorNode) -> String {
        error_stack_with(head, self.format.as_ref())
    }

    /// Same as [`squash`], rendering with this printer.
    #[must_use]
    pub fn squash(&self, e: &ErrorNode) -> ErrorNode {
        ErrorNode::untracked(self.render(e))
    }

    /// Writes the banner followed by the stack trace of `e`, or a line noting the absence of
    /// error if `e` is `None`.
    ///
    /// # Errors
    /// Returns any error raised while writing.
    pub fn debug_to<W: io::Write + ?Sized>(&self, writer: &mut W, e: Option<&ErrorNode>) -> io::Result<()> {
        match e {
            None => write!(writer, "{} nil error", self.banner),
            Some(e) => write!(writer, "{}\n{}", self.banner, self.render(e)),
        }
    }
}

impl fmt::Debug for Printer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Printer").field("banner", &self.banner).finish_non_exhaustive()
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use mockall::Sequence;

    use super::*;
    use crate::Realm;

    #[test]
    fn stack_order() {
        let realm = Realm::new();
        let klm = realm.untracked("klm");
        let hij = realm.track("hij").wrap(klm.clone());
        let efg = realm.untracked("efg").wrap(hij.clone());
        let abc = realm.track("abc").wrap(efg.clone());

        let stack = as_stack(&abc);

        assert_eq!(stack.len(), 4);
        assert_eq!(stack, vec![abc, efg, hij, klm]);
    }

    #[test]
    fn stack_is_restartable() {
        let e = ErrorNode::untracked("a").because_of(ErrorNode::untracked("c"), "b");

        assert_eq!(as_stack(&e), as_stack(&e));
        assert_eq!(e.stack().count(), 3);
    }

    #[test]
    fn single_node() {
        let e = ErrorNode::untracked("alone");

        assert_eq!(as_stack(&e), vec![e.clone()]);
        assert_eq!(error_stack(&e), "  alone\n");
    }

    #[test]
    fn long_chain() {
        let root = ErrorNode::untracked("root");
        let e = compose(root, (0..200_000).map(ErrorNode::untracked));

        assert_eq!(e.stack().count(), 200_001);
        assert_eq!(e.message(), "199999");

        let trace = error_stack(&e);
        assert_eq!(trace.lines().count(), 200_001);
        assert!(trace.starts_with("  199999\n⤷ 199998\n"));
        assert!(trace.ends_with("⤷ 0\n⤷ root\n"));

        let debug = format!("{e:?}");
        assert!(debug.starts_with("[(Untracked, \"199999\")"));
        assert!(debug.ends_with("(Untracked, \"root\")]"));

        drop(e);
    }

    #[test]
    fn error_stack_1() {
        let realm = Realm::new();

        let te = realm.track("abc");
        let cp = realm.checkpoint("hij");

        let given = cp.because("klm");
        let given = te.because_of(given, "efg");

        let expected = ["  abc", "⤷ efg", "——hij——", "⤷ klm", ""].join("\n");
        assert_eq!(error_stack(&given), expected);
    }

    #[test]
    fn checkpoint_head() {
        let e = Realm::new().checkpoint("boundary").because("root");

        assert_eq!(error_stack(&e), "——boundary——\n⤷ root\n");
    }

    #[test]
    fn formatter_calls() {
        let realm = Realm::new();
        let e = realm.track("abc").checkpoint(realm.untracked("klm"), "hij");

        let mut seq = Sequence::new();
        let mut format = MockLineFormat::new();
        for (expected, head) in [("abc", true), ("hij", false), ("klm", false)] {
            format
                .expect_format_line()
                .withf(move |message, _, is_head| message.to_string() == expected && *is_head == head)
                .times(1)
                .in_sequence(&mut seq)
                .returning(|message, _, _| format!("<{message}>"));
        }

        assert_eq!(error_stack_with(&e, &format), "<abc>\n<hij>\n<klm>\n");
    }

    #[test]
    fn closure_format() {
        let e = ErrorNode::untracked("a").because("b");

        let s = error_stack_with(&e, &|message: &str, _: &ErrorNode, is_head: bool| {
            if is_head {
                message.to_uppercase()
            } else {
                format!("- {message}")
            }
        });

        assert_eq!(s, "A\n- b\n");
    }

    #[test]
    fn squash_stack() {
        let realm = Realm::new();
        let e = realm.track("a").because("b");

        let squashed = squash(&e);

        assert!(!squashed.is_tracked());
        assert!(squashed.cause().is_none());
        assert_eq!(squashed.message(), "  a\n⤷ b\n");
    }

    #[test]
    fn printer() {
        let e = ErrorNode::untracked("a").because("b");
        let printer = Printer::default()
            .with_banner("[oops]")
            .with_format(|message: &str, _: &ErrorNode, _: bool| format!("* {message}"));

        let mut out = Vec::new();
        printer.debug_to(&mut out, Some(&e)).unwrap();
        printer.debug_to(&mut out, None).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "[oops]\n* a\n* b\n[oops] nil error");
        assert_eq!(printer.squash(&e).message(), "* a\n* b\n");
        assert_eq!(Printer::new().render(&e), error_stack(&e));
        assert_eq!(format!("{printer:?}"), "Printer { banner: \"[oops]\", .. }");
    }
}
