//! The program wrapper: composes a user program with URL-driven input.

use std::sync::{Arc, Mutex, OnceLock};

use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use rudder_core::{
    subscribe, Command, Dispatch, Program, Subscription, SubscriptionId, SubscriptionSource,
    Termination,
};

use crate::host::{BrowserHost, ListenerId, NavEvent, NavListener};
use crate::location::Location;
use crate::navigable::Navigable;

/// Single-assignment cell holding the location-change handler.
///
/// Listener registration happens first, through thin thunks that forward
/// into this cell; the real handler is installed immediately afterwards.
/// Invoking the cell while it is still empty means the subscription wiring
/// order was broken, which is a programming-invariant violation and fatal.
pub struct HandlerCell {
    slot: OnceLock<NavListener>,
}

impl HandlerCell {
    pub fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// Install the handler. Panics on a second installation.
    pub fn install(&self, listener: NavListener) {
        if self.slot.set(listener).is_err() {
            panic!("location-change handler installed twice");
        }
    }

    /// Forward an event to the installed handler.
    ///
    /// # Panics
    ///
    /// Panics if no handler has been installed yet.
    pub fn invoke(&self, event: NavEvent) {
        let listener = self
            .slot
            .get()
            .expect("location-change handler invoked before installation");
        listener(event);
    }
}

impl Default for HandlerCell {
    fn default() -> Self {
        Self::new()
    }
}

/// The listener registrations owned by one wrapped-program run.
///
/// Shared between the location-change subscription (which installs the
/// listeners at stream start and detaches them when the stream drops) and
/// the wrapped termination cleanup (which detaches them on early exit,
/// whichever comes first).  Detaching drains the handles, so it removes
/// each listener at most once here; host-level removal is idempotent anyway.
pub(crate) struct EventTaps<H: BrowserHost> {
    host: Arc<H>,
    ids: Mutex<Vec<ListenerId>>,
}

impl<H: BrowserHost> EventTaps<H> {
    pub(crate) fn new(host: Arc<H>) -> Arc<Self> {
        Arc::new(Self {
            host,
            ids: Mutex::new(Vec::new()),
        })
    }

    /// Register `listener` for the three navigation events.
    fn install(&self, listener: NavListener) {
        let mut ids = self.ids.lock().expect("listener table lock poisoned");
        for event in NavEvent::ALL {
            ids.push(self.host.add_event_listener(event, listener.clone()));
        }
        log::debug!("installed {} navigation listeners", ids.len());
    }

    /// Remove every registered listener.
    pub(crate) fn detach(&self) {
        let drained: Vec<ListenerId> = {
            let mut ids = self.ids.lock().expect("listener table lock poisoned");
            ids.drain(..).collect()
        };
        if !drained.is_empty() {
            log::debug!("removing {} navigation listeners", drained.len());
        }
        for id in drained {
            self.host.remove_event_listener(id);
        }
    }
}

/// Detaches the taps when the subscription stream is dropped.
struct DetachOnDrop<H: BrowserHost>(Arc<EventTaps<H>>);

impl<H: BrowserHost> Drop for DetachOnDrop<H> {
    fn drop(&mut self) {
        self.0.detach();
    }
}

/// Subscription source emitting the browser location on every effective
/// change.
///
/// At stream start it registers one handler for pop-state, hash-change, and
/// the synthetic navigated event.  The handler reads the current location
/// and coalesces by href: identical consecutive hrefs across any mix of
/// event types produce no emission after the first.  `last_href` starts
/// unset, is local to one subscription run, and is updated strictly before
/// the corresponding location is forwarded, so re-entrant dispatch cannot
/// repeat an href.
pub struct LocationChanges<H: BrowserHost> {
    host: Arc<H>,
    taps: Arc<EventTaps<H>>,
}

impl<H: BrowserHost> LocationChanges<H> {
    pub fn new(host: Arc<H>) -> Self {
        let taps = EventTaps::new(host.clone());
        Self { host, taps }
    }

    pub(crate) fn with_taps(host: Arc<H>, taps: Arc<EventTaps<H>>) -> Self {
        Self { host, taps }
    }
}

impl<H: BrowserHost> SubscriptionSource for LocationChanges<H> {
    type Output = Location;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::of::<LocationChanges<H>>()
    }

    fn stream(self) -> BoxStream<'static, Location> {
        let (tx, rx) = mpsc::unbounded_channel();

        let cell = Arc::new(HandlerCell::new());
        let thunk_cell = cell.clone();
        self.taps
            .install(Arc::new(move |event| thunk_cell.invoke(event)));

        let host = self.host;
        let last_href: Mutex<Option<String>> = Mutex::new(None);
        cell.install(Arc::new(move |_event| {
            let location = host.location();
            {
                let mut last = last_href.lock().expect("last href lock poisoned");
                if last.as_deref() == Some(location.href()) {
                    log::trace!("coalesced location event at {}", location.href());
                    return;
                }
                *last = Some(location.href().to_owned());
            }
            let _ = tx.send(location);
        }));

        let guard = DetachOnDrop(self.taps);
        Box::pin(UnboundedReceiverStream::new(rx).map(move |location| {
            let _keep = &guard;
            location
        }))
    }
}

/// The location-change subscription, ready to be declared by a program.
pub fn location_changes<H: BrowserHost>(host: Arc<H>) -> Subscription<Location> {
    subscribe(LocationChanges::new(host))
}

/// Wrap a user program so it reacts to browser address changes.
///
/// The returned bundle has its message type widened to [`Navigable<Msg>`]:
///
/// * **init** parses the location current at startup and hands the route to
///   the user's init — the identical `parser` serves init and every later
///   change, so the two paths always agree on the same input.
/// * **update** routes [`Navigable::Change`] through `url_update` and
///   [`Navigable::User`] through the user's update, tagging resulting
///   commands with `User`.
/// * **view** is untouched; the render hook receives a dispatch handle
///   pre-composed with `User`, so user code never sees the widened type.
/// * **subscriptions** are the location-change subscription plus the user's
///   own, each of the latter re-tagged with `User`.
/// * **termination** applies the user predicate to `User` payloads only (a
///   `Change` never terminates) and detaches the navigation listeners
///   before delegating to the user cleanup.  A program without a
///   termination pair gains one that only detaches the listeners.
pub fn to_navigable<H, Route, Model, Msg, View>(
    host: Arc<H>,
    parser: impl Fn(&Location) -> Route + Send + Sync + 'static,
    mut url_update: impl FnMut(Route, &mut Model) -> Command<Msg> + Send + 'static,
    program: Program<Route, Model, Msg, View>,
) -> Program<(), Model, Navigable<Msg>, View>
where
    H: BrowserHost,
    Route: 'static,
    Model: 'static,
    Msg: Send + 'static,
    View: 'static,
{
    let Program {
        init,
        update: mut user_update,
        view,
        set_state: mut user_set_state,
        subscriptions: user_subscriptions,
        termination: user_termination,
    } = program;

    let parser = Arc::new(parser);
    let taps = EventTaps::new(host.clone());

    let init_host = host.clone();
    let init_parser = parser.clone();
    let wrapped_init = move |_: ()| {
        let route = (*init_parser)(&init_host.location());
        let (model, cmd) = init(route);
        (model, cmd.map(Navigable::User))
    };

    let update_parser = parser;
    let wrapped_update = move |model: &mut Model, msg: Navigable<Msg>| match msg {
        Navigable::Change(location) => {
            url_update((*update_parser)(&location), model).map(Navigable::User)
        }
        Navigable::User(msg) => user_update(model, msg).map(Navigable::User),
    };

    let wrapped_set_state = move |model: &Model, dispatch: &Dispatch<Navigable<Msg>>| {
        user_set_state(model, &dispatch.map(Navigable::User));
    };

    let subs_host = host;
    let subs_taps = taps.clone();
    let wrapped_subscriptions = move |model: &Model| {
        let mut subs = vec![
            subscribe(LocationChanges::with_taps(
                subs_host.clone(),
                subs_taps.clone(),
            ))
            .map(Navigable::Change),
        ];
        subs.extend(
            user_subscriptions(model)
                .into_iter()
                .map(|sub| sub.map(Navigable::User)),
        );
        subs
    };

    let wrapped_termination = match user_termination {
        Some(Termination {
            should_exit,
            cleanup,
        }) => Termination::new(
            move |msg: &Navigable<Msg>| match msg {
                Navigable::Change(_) => false,
                Navigable::User(msg) => should_exit(msg),
            },
            move |model: &mut Model| {
                taps.detach();
                cleanup(model);
            },
        ),
        None => Termination::new(|_| false, move |_: &mut Model| taps.detach()),
    };

    Program {
        init: Box::new(wrapped_init),
        update: Box::new(wrapped_update),
        view,
        set_state: Box::new(wrapped_set_state),
        subscriptions: Box::new(wrapped_subscriptions),
        termination: Some(wrapped_termination),
    }
}
