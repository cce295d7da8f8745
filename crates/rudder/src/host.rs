use std::sync::Arc;

use crate::location::Location;

/// Navigation-related events observable on the host's global event target.
///
/// `PopState` and `HashChange` are native browser notifications.  `Navigated`
/// is this adapter's synthetic custom event: pushing a history entry
/// programmatically fires no native event, so [`new_url`](crate::new_url)
/// dispatches `Navigated` to close that gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavEvent {
    /// The history cursor moved (back/forward or a relative jump).
    PopState,
    /// The fragment changed without a full navigation (e.g. a manual edit).
    HashChange,
    /// Synthetic notification for a programmatic history push.
    Navigated,
}

impl NavEvent {
    /// The three events a location-change subscription listens for.
    pub const ALL: [NavEvent; 3] = [NavEvent::PopState, NavEvent::HashChange, NavEvent::Navigated];
}

/// A callback registered on the host's event target.
pub type NavListener = Arc<dyn Fn(NavEvent) + Send + Sync>;

/// Handle identifying a registered listener, for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

/// Errors a host's history capability may raise.
///
/// Commands never validate their inputs; rejection is entirely the host's
/// call and surfaces through the effect executor (there is no result
/// channel back to the program).
#[derive(Debug, Clone, thiserror::Error)]
pub enum HostError {
    /// The host rejected a URL passed to a push or replace.
    #[error("malformed url: {0:?}")]
    MalformedUrl(String),
}

/// The browser capability surface this adapter consumes.
///
/// Implemented over the real browser bindings in a host shell, and by
/// [`FakeBrowser`](crate::testing::FakeBrowser) in tests.  All methods are
/// invoked from a single logical flow; implementations only need `Sync`
/// because listener callbacks and effect futures carry the host across
/// task boundaries.
pub trait BrowserHost: Send + Sync + 'static {
    /// Read the current location.
    fn location(&self) -> Location;

    /// Push a new history entry with the given URL.  Fires no notification;
    /// callers that need same-origin listeners informed must dispatch
    /// [`NavEvent::Navigated`] themselves.
    fn push_state(&self, url: &str) -> Result<(), HostError>;

    /// Replace the current history entry's URL in place.  Silent: no native
    /// event exists for a replace, and none is synthesized.
    fn replace_state(&self, url: &str) -> Result<(), HostError>;

    /// Move the history cursor by `delta` entries (positive = forward).
    /// Out-of-range deltas are clamped by the host; an actual move is
    /// announced through the native [`NavEvent::PopState`].
    fn go(&self, delta: i64);

    /// Register a listener for one event kind, returning a removal handle.
    fn add_event_listener(&self, event: NavEvent, listener: NavListener) -> ListenerId;

    /// Remove a previously registered listener.  Idempotent: removing an
    /// unknown or already-removed handle is a no-op.
    fn remove_event_listener(&self, id: ListenerId);

    /// Synchronously invoke every listener registered for `event`.
    fn dispatch_event(&self, event: NavEvent);
}
