//! Headless harness for exercising a [`Program`] bundle in tests.

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::mpsc;

use crate::command::{Action, Command, CommandInner};
use crate::dispatch::Dispatch;
use crate::error::EffectError;
use crate::program::{Program, SetStateFn, SubscriptionsFn, Termination, UpdateFn, ViewFn};
use crate::subscription::SubscriptionManager;

/// Drives a [`Program`] bundle without a host runtime.
///
/// `TestProgram` runs the init/update cycle in plain test code.  Immediate
/// messages are queued and flushed with [`drain_messages`]; fire-and-forget
/// effects are collected and executed with [`run_effects`]; async commands
/// that are not immediately ready are discarded.  Subscriptions are started
/// on demand via [`start_subscriptions`] (requires a tokio runtime) and
/// their output read back with [`recv`]/[`try_recv`].
///
/// [`drain_messages`]: TestProgram::drain_messages
/// [`run_effects`]: TestProgram::run_effects
/// [`start_subscriptions`]: TestProgram::start_subscriptions
/// [`recv`]: TestProgram::recv
/// [`try_recv`]: TestProgram::try_recv
pub struct TestProgram<Model: 'static, Msg: Send + 'static, View: 'static> {
    model: Model,
    update: UpdateFn<Model, Msg>,
    view: ViewFn<Model, View>,
    set_state: SetStateFn<Model, Msg>,
    subscriptions: SubscriptionsFn<Model, Msg>,
    termination: Option<Termination<Model, Msg>>,
    terminated: bool,
    quit_requested: bool,
    pending_messages: Vec<Msg>,
    pending_effects: Vec<BoxFuture<'static, Result<(), EffectError>>>,
    sub_manager: Option<SubscriptionManager<Msg>>,
    sub_rx: Option<mpsc::UnboundedReceiver<Msg>>,
    dispatch: Dispatch<Msg>,
    dispatch_rx: mpsc::UnboundedReceiver<Msg>,
}

impl<Model: 'static, Msg: Send + 'static, View: 'static> TestProgram<Model, Msg, View> {
    /// Take a program bundle apart and run its init hook.
    pub fn new<Arg: 'static>(program: Program<Arg, Model, Msg, View>, flags: Arg) -> Self {
        let Program {
            init,
            update,
            view,
            set_state,
            subscriptions,
            termination,
        } = program;

        let (model, init_cmd) = init(flags);
        let (dispatch_tx, dispatch_rx) = mpsc::unbounded_channel();

        let mut harness = Self {
            model,
            update,
            view,
            set_state,
            subscriptions,
            termination,
            terminated: false,
            quit_requested: false,
            pending_messages: Vec::new(),
            pending_effects: Vec::new(),
            sub_manager: None,
            sub_rx: None,
            dispatch: Dispatch::from_sender(dispatch_tx),
            dispatch_rx,
        };
        harness.collect(init_cmd);
        harness
    }

    /// Send a message, triggering a single update cycle.
    ///
    /// The termination predicate (if configured) is consulted first: a
    /// matching message terminates the program — subscriptions are shut
    /// down and the cleanup hook runs exactly once — and is not delivered
    /// to the update hook.  Messages sent after termination are dropped.
    pub fn send(&mut self, msg: Msg) {
        if self.terminated {
            return;
        }
        let exits = self
            .termination
            .as_ref()
            .is_some_and(|t| (t.should_exit)(&msg));
        if exits {
            self.terminate();
            return;
        }
        let cmd = (self.update)(&mut self.model, msg);
        self.collect(cmd);
    }

    /// Process all pending synchronous messages produced by [`Command::message`].
    pub fn drain_messages(&mut self) {
        while !self.pending_messages.is_empty() && !self.terminated {
            let messages: Vec<_> = self.pending_messages.drain(..).collect();
            for msg in messages {
                self.send(msg);
            }
        }
    }

    /// Execute collected fire-and-forget effects, propagating the first
    /// failure.  Effects that are not immediately ready are dropped.
    pub fn run_effects(&mut self) -> Result<(), EffectError> {
        for effect in self.pending_effects.drain(..) {
            if let Some(result) = effect.now_or_never() {
                result?;
            }
        }
        Ok(())
    }

    /// Number of effects collected and not yet executed.
    pub fn pending_effect_count(&self) -> usize {
        self.pending_effects.len()
    }

    /// Start the program's declared subscriptions.  Requires a tokio runtime.
    pub fn start_subscriptions(&mut self) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut manager = SubscriptionManager::new(tx);
        manager.reconcile((self.subscriptions)(&self.model));
        self.sub_manager = Some(manager);
        self.sub_rx = Some(rx);
    }

    /// Re-reconcile subscriptions against the current model.
    pub fn reconcile_subscriptions(&mut self) {
        if let Some(manager) = &mut self.sub_manager {
            manager.reconcile((self.subscriptions)(&self.model));
        }
    }

    /// Await the next subscription message.
    pub async fn recv(&mut self) -> Option<Msg> {
        match &mut self.sub_rx {
            Some(rx) => rx.recv().await,
            None => None,
        }
    }

    /// Non-blocking read of the next subscription message.
    pub fn try_recv(&mut self) -> Option<Msg> {
        self.sub_rx.as_mut().and_then(|rx| rx.try_recv().ok())
    }

    /// Call the view hook.
    pub fn render(&self) -> View {
        (self.view)(&self.model)
    }

    /// Call the render hook with this harness's dispatch handle; messages
    /// dispatched by the view land in the pending queue.
    pub fn render_state(&mut self) {
        let dispatch = self.dispatch.clone();
        (self.set_state)(&self.model, &dispatch);
        while let Ok(msg) = self.dispatch_rx.try_recv() {
            self.pending_messages.push(msg);
        }
    }

    /// Get a shared reference to the model for assertions.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Get a mutable reference to the model for direct test setup.
    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    /// Whether the termination predicate has fired.
    pub fn terminated(&self) -> bool {
        self.terminated
    }

    /// Whether a [`Command::quit`] was collected.
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    fn terminate(&mut self) {
        if let Some(manager) = &mut self.sub_manager {
            manager.shutdown();
        }
        if let Some(termination) = self.termination.take() {
            (termination.cleanup)(&mut self.model);
        }
        self.terminated = true;
    }

    fn collect(&mut self, cmd: Command<Msg>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => {
                self.pending_messages.push(msg);
            }
            CommandInner::Action(Action::Quit) => {
                self.quit_requested = true;
            }
            CommandInner::Effect(fut) => {
                self.pending_effects.push(fut);
            }
            // Async message futures run only if already resolved.
            CommandInner::Future(fut) => {
                if let Some(msg) = fut.now_or_never() {
                    self.pending_messages.push(msg);
                }
            }
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect(cmd);
                }
            }
        }
    }
}
