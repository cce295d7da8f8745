//! An in-memory [`BrowserHost`] for exercising the adapter without a
//! browser.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::host::{BrowserHost, HostError, ListenerId, NavEvent, NavListener};
use crate::location::Location;

struct HistoryStack {
    entries: Vec<String>,
    cursor: usize,
}

#[derive(Default)]
struct ListenerCounters {
    added: HashMap<NavEvent, usize>,
    removed: HashMap<NavEvent, usize>,
}

/// In-memory browser host: a history stack, a cursor, and an event target.
///
/// Behavior mirrors the native capability this adapter consumes:
///
/// * `push_state` truncates the forward tail and appends — no notification.
/// * `replace_state` overwrites the current entry in place — silent.
/// * `go` clamps the cursor into range and dispatches [`NavEvent::PopState`]
///   only when the cursor actually moved.
/// * [`edit_hash`](FakeBrowser::edit_hash) simulates a user fragment edit
///   and always dispatches [`NavEvent::HashChange`], even for an identical
///   fragment, so tests can produce redundant notifications.
/// * Empty URLs are rejected with [`HostError::MalformedUrl`] — a strict
///   host, for exercising the effect-failure path.
///
/// Listener bookkeeping is observable through
/// [`listener_count`](FakeBrowser::listener_count),
/// [`add_count`](FakeBrowser::add_count), and
/// [`remove_count`](FakeBrowser::remove_count); removal of an unknown or
/// already-removed handle is a counted-nowhere no-op.
pub struct FakeBrowser {
    history: Mutex<HistoryStack>,
    listeners: Mutex<HashMap<ListenerId, (NavEvent, NavListener)>>,
    counters: Mutex<ListenerCounters>,
    next_listener_id: AtomicU64,
}

impl FakeBrowser {
    /// Create a host whose history contains the single entry `initial_href`.
    pub fn new(initial_href: impl Into<String>) -> Self {
        Self {
            history: Mutex::new(HistoryStack {
                entries: vec![initial_href.into()],
                cursor: 0,
            }),
            listeners: Mutex::new(HashMap::new()),
            counters: Mutex::new(ListenerCounters::default()),
            next_listener_id: AtomicU64::new(0),
        }
    }

    /// The href of the current history entry.
    pub fn current_href(&self) -> String {
        let history = self.history.lock().expect("history lock poisoned");
        history.entries[history.cursor].clone()
    }

    /// Number of entries on the history stack.
    pub fn entry_count(&self) -> usize {
        self.history.lock().expect("history lock poisoned").entries.len()
    }

    /// Simulate the user editing the address-bar fragment.
    ///
    /// Rewrites the current entry's fragment and dispatches
    /// [`NavEvent::HashChange`] unconditionally (the event target does not
    /// coalesce; that is the subscription's job).
    pub fn edit_hash(&self, fragment: &str) {
        {
            let mut history = self.history.lock().expect("history lock poisoned");
            let cursor = history.cursor;
            let entry = &mut history.entries[cursor];
            let base = match entry.split_once('#') {
                Some((before, _)) => before.to_string(),
                None => entry.clone(),
            };
            *entry = format!("{base}#{fragment}");
        }
        self.dispatch_event(NavEvent::HashChange);
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().expect("listener lock poisoned").len()
    }

    /// How many listeners have been registered for `event`.
    pub fn add_count(&self, event: NavEvent) -> usize {
        *self
            .counters
            .lock()
            .expect("counter lock poisoned")
            .added
            .get(&event)
            .unwrap_or(&0)
    }

    /// How many listeners for `event` have actually been removed.
    pub fn remove_count(&self, event: NavEvent) -> usize {
        *self
            .counters
            .lock()
            .expect("counter lock poisoned")
            .removed
            .get(&event)
            .unwrap_or(&0)
    }
}

impl BrowserHost for FakeBrowser {
    fn location(&self) -> Location {
        Location::from_href(self.current_href())
    }

    fn push_state(&self, url: &str) -> Result<(), HostError> {
        if url.is_empty() {
            return Err(HostError::MalformedUrl(url.to_string()));
        }
        let mut history = self.history.lock().expect("history lock poisoned");
        let cursor = history.cursor;
        history.entries.truncate(cursor + 1);
        history.entries.push(url.to_string());
        history.cursor += 1;
        Ok(())
    }

    fn replace_state(&self, url: &str) -> Result<(), HostError> {
        if url.is_empty() {
            return Err(HostError::MalformedUrl(url.to_string()));
        }
        let mut history = self.history.lock().expect("history lock poisoned");
        let cursor = history.cursor;
        history.entries[cursor] = url.to_string();
        Ok(())
    }

    fn go(&self, delta: i64) {
        let moved = {
            let mut history = self.history.lock().expect("history lock poisoned");
            let last = history.entries.len() as i64 - 1;
            let target = (history.cursor as i64 + delta).clamp(0, last) as usize;
            let moved = target != history.cursor;
            history.cursor = target;
            moved
        };
        // Lock released before fan-out: listeners read the location back.
        if moved {
            self.dispatch_event(NavEvent::PopState);
        }
    }

    fn add_event_listener(&self, event: NavEvent, listener: NavListener) -> ListenerId {
        let id = ListenerId(self.next_listener_id.fetch_add(1, Ordering::SeqCst));
        self.listeners
            .lock()
            .expect("listener lock poisoned")
            .insert(id, (event, listener));
        *self
            .counters
            .lock()
            .expect("counter lock poisoned")
            .added
            .entry(event)
            .or_insert(0) += 1;
        id
    }

    fn remove_event_listener(&self, id: ListenerId) {
        let removed = self
            .listeners
            .lock()
            .expect("listener lock poisoned")
            .remove(&id);
        if let Some((event, _)) = removed {
            *self
                .counters
                .lock()
                .expect("counter lock poisoned")
                .removed
                .entry(event)
                .or_insert(0) += 1;
        }
    }

    fn dispatch_event(&self, event: NavEvent) {
        let mut matching: Vec<(ListenerId, NavListener)> = {
            let listeners = self.listeners.lock().expect("listener lock poisoned");
            listeners
                .iter()
                .filter(|(_, (kind, _))| *kind == event)
                .map(|(id, (_, listener))| (*id, listener.clone()))
                .collect()
        };
        // Registration order; the lock is released before fan-out.
        matching.sort_by_key(|(id, _)| *id);
        for (_, listener) in matching {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn push_appends_and_moves_cursor() {
        let host = FakeBrowser::new("/");
        host.push_state("/a").unwrap();
        host.push_state("/b").unwrap();
        assert_eq!(host.current_href(), "/b");
        assert_eq!(host.entry_count(), 3);
    }

    #[test]
    fn push_truncates_forward_tail() {
        let host = FakeBrowser::new("/");
        host.push_state("/a").unwrap();
        host.push_state("/b").unwrap();
        host.go(-2);
        host.push_state("/c").unwrap();
        assert_eq!(host.entry_count(), 2);
        assert_eq!(host.current_href(), "/c");
    }

    #[test]
    fn replace_overwrites_in_place() {
        let host = FakeBrowser::new("/");
        host.replace_state("/renamed").unwrap();
        assert_eq!(host.current_href(), "/renamed");
        assert_eq!(host.entry_count(), 1);
    }

    #[test]
    fn empty_url_is_rejected() {
        let host = FakeBrowser::new("/");
        assert!(matches!(
            host.push_state(""),
            Err(HostError::MalformedUrl(_))
        ));
        assert!(matches!(
            host.replace_state(""),
            Err(HostError::MalformedUrl(_))
        ));
    }

    #[test]
    fn go_clamps_and_fires_only_on_movement() {
        let hits = Arc::new(AtomicUsize::new(0));
        let host = FakeBrowser::new("/");
        let counter = hits.clone();
        host.add_event_listener(
            NavEvent::PopState,
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        host.push_state("/a").unwrap();
        host.go(-1);
        assert_eq!(host.current_href(), "/");
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // Already at the oldest entry: clamped, no event.
        host.go(-5);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        host.go(0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        host.go(10);
        assert_eq!(host.current_href(), "/a");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn edit_hash_rewrites_fragment_and_fires() {
        let hits = Arc::new(AtomicUsize::new(0));
        let host = FakeBrowser::new("/page#old");
        let counter = hits.clone();
        host.add_event_listener(
            NavEvent::HashChange,
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        host.edit_hash("new");
        assert_eq!(host.current_href(), "/page#new");
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // Same fragment: the event target still fires.
        host.edit_hash("new");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn listener_removal_is_idempotent() {
        let host = FakeBrowser::new("/");
        let id = host.add_event_listener(NavEvent::PopState, Arc::new(|_| {}));
        assert_eq!(host.listener_count(), 1);

        host.remove_event_listener(id);
        host.remove_event_listener(id);
        assert_eq!(host.listener_count(), 0);
        assert_eq!(host.remove_count(NavEvent::PopState), 1);
    }

    #[test]
    fn dispatch_only_reaches_matching_listeners() {
        let pop_hits = Arc::new(AtomicUsize::new(0));
        let hash_hits = Arc::new(AtomicUsize::new(0));
        let host = FakeBrowser::new("/");

        let counter = pop_hits.clone();
        host.add_event_listener(
            NavEvent::PopState,
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        let counter = hash_hits.clone();
        host.add_event_listener(
            NavEvent::HashChange,
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        host.dispatch_event(NavEvent::PopState);
        assert_eq!(pop_hits.load(Ordering::SeqCst), 1);
        assert_eq!(hash_hits.load(Ordering::SeqCst), 0);
    }
}
