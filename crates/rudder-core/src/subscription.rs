use std::any::TypeId;
use std::collections::HashMap;

use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// A long-lived event source declared by a program.
///
/// A subscription pairs an identity with a deferred stream: the stream is
/// built when the manager starts the subscription and dropped when it is
/// disposed, which is where sources release any listeners they registered.
/// Disposal only prevents future events from being observed; it never
/// interrupts an event already being handled.
pub struct Subscription<Msg: Send + 'static> {
    id: SubscriptionId,
    make_stream: Box<dyn FnOnce() -> BoxStream<'static, Msg> + Send>,
}

/// Identity for diffing subscriptions between update cycles.
///
/// One identity per source type: a singleton source (such as a
/// location-change listener) collapses to a single entry no matter how many
/// cycles re-declare it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(TypeId);

impl SubscriptionId {
    pub fn of<T: 'static>() -> Self {
        Self(TypeId::of::<T>())
    }
}

/// Trait for types that produce a stream of values.
///
/// [`stream`](SubscriptionSource::stream) is called once when the
/// subscription starts; dropping the returned stream is the disposal point.
pub trait SubscriptionSource: Send + 'static {
    /// The type of values this source emits.
    type Output: Send + 'static;

    /// Unique ID for this subscription instance.
    fn id(&self) -> SubscriptionId;

    /// Create the stream of values.
    fn stream(self) -> BoxStream<'static, Self::Output>;
}

/// Create a [`Subscription`] from a [`SubscriptionSource`].
pub fn subscribe<S: SubscriptionSource>(source: S) -> Subscription<S::Output> {
    Subscription {
        id: source.id(),
        make_stream: Box::new(move || source.stream()),
    }
}

impl<Msg: Send + 'static> Subscription<Msg> {
    /// Create from a raw stream and id.
    pub fn from_stream(id: SubscriptionId, stream: BoxStream<'static, Msg>) -> Self {
        Self {
            id,
            make_stream: Box::new(move || stream),
        }
    }

    /// This subscription's identity.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Tag every emitted message (for program composition).
    ///
    /// Mapping wraps the stream itself and keeps the source's identity, so
    /// a mapped subscription still reconciles against its unmapped ancestor.
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl FnMut(Msg) -> NewMsg + Send + 'static,
    ) -> Subscription<NewMsg> {
        let make_stream = self.make_stream;
        Subscription {
            id: self.id,
            make_stream: Box::new(move || make_stream().map(f).boxed()),
        }
    }
}

/// Owns the running subscriptions, diffing by identity between cycles.
///
/// Merging a program's declared subscriptions is concatenation of the
/// returned `Vec`; the manager reconciles that list against what is already
/// running.
pub struct SubscriptionManager<Msg: Send + 'static> {
    active: HashMap<SubscriptionId, AbortHandle>,
    msg_tx: mpsc::UnboundedSender<Msg>,
}

impl<Msg: Send + 'static> SubscriptionManager<Msg> {
    pub fn new(msg_tx: mpsc::UnboundedSender<Msg>) -> Self {
        Self {
            active: HashMap::new(),
            msg_tx,
        }
    }

    /// Diff the declared list against the running set: abort sources no
    /// longer declared, start sources that are new, leave the rest running.
    pub fn reconcile(&mut self, declared: Vec<Subscription<Msg>>) {
        let mut incoming: HashMap<SubscriptionId, Subscription<Msg>> = HashMap::new();
        for sub in declared {
            incoming.insert(sub.id, sub);
        }

        self.active.retain(|id, handle| {
            if incoming.contains_key(id) {
                return true;
            }
            log::debug!("subscription stopped: {id:?}");
            handle.abort();
            false
        });

        for (id, sub) in incoming {
            if self.active.contains_key(&id) {
                continue;
            }
            log::debug!("subscription started: {id:?}");
            let handle = self.start(sub);
            self.active.insert(id, handle);
        }
    }

    /// Build the source's stream and spawn the forwarding task.
    ///
    /// The stream is built here rather than inside the task, so any
    /// listener registration the source performs has happened by the time
    /// `reconcile` returns.
    fn start(&self, sub: Subscription<Msg>) -> AbortHandle {
        let mut stream = (sub.make_stream)();
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            while let Some(msg) = stream.next().await {
                if tx.send(msg).is_err() {
                    break;
                }
            }
        })
        .abort_handle()
    }

    /// Abort all active subscriptions.
    pub fn shutdown(&mut self) {
        for (_, handle) in self.active.drain() {
            handle.abort();
        }
    }

    /// Number of active subscriptions.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}
