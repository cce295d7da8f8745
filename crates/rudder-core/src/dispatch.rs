use std::sync::Arc;

/// A cloneable handle for sending messages into a program's update loop.
///
/// The render hook ([`Program::set_state`](crate::Program)) receives a
/// `Dispatch` so views can feed user interactions back as messages.  A
/// wrapper that widens a program's message type hands the inner program a
/// pre-composed handle via [`map`](Dispatch::map), so user code never sees
/// the wrapper's message type.
pub struct Dispatch<Msg> {
    send: Arc<dyn Fn(Msg) + Send + Sync>,
}

impl<Msg> Clone for Dispatch<Msg> {
    fn clone(&self) -> Self {
        Self {
            send: self.send.clone(),
        }
    }
}

impl<Msg: 'static> Dispatch<Msg> {
    /// Create a dispatch handle from a sending function.
    pub fn new(send: impl Fn(Msg) + Send + Sync + 'static) -> Self {
        Self {
            send: Arc::new(send),
        }
    }

    /// Create a handle that forwards into an unbounded channel.
    pub fn from_sender(tx: tokio::sync::mpsc::UnboundedSender<Msg>) -> Self
    where
        Msg: Send,
    {
        Self::new(move |msg| {
            let _ = tx.send(msg);
        })
    }

    /// Send a message.
    pub fn send(&self, msg: Msg) {
        (self.send)(msg);
    }

    /// Derive a handle for an inner message type, tagging each message on
    /// the way out.
    pub fn map<Inner: 'static>(
        &self,
        tag: impl Fn(Inner) -> Msg + Send + Sync + 'static,
    ) -> Dispatch<Inner> {
        let outer = self.send.clone();
        Dispatch {
            send: Arc::new(move |inner| outer(tag(inner))),
        }
    }
}
