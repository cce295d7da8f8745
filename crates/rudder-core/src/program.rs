use crate::command::Command;
use crate::dispatch::Dispatch;
use crate::subscription::Subscription;

/// The program's init hook: startup argument to initial model plus command.
pub type InitFn<Arg, Model, Msg> = Box<dyn FnOnce(Arg) -> (Model, Command<Msg>) + Send>;

/// The program's update hook.
pub type UpdateFn<Model, Msg> = Box<dyn FnMut(&mut Model, Msg) -> Command<Msg> + Send>;

/// The program's view hook: pure function of the model.
pub type ViewFn<Model, View> = Box<dyn Fn(&Model) -> View + Send>;

/// The program's render hook: pushes the current state to the host renderer
/// along with a dispatch handle for feeding interactions back as messages.
pub type SetStateFn<Model, Msg> = Box<dyn FnMut(&Model, &Dispatch<Msg>) + Send>;

/// The program's subscription hook: declares active event sources.
pub type SubscriptionsFn<Model, Msg> = Box<dyn Fn(&Model) -> Vec<Subscription<Msg>> + Send>;

/// A program bundle: the hooks a host runtime drives.
///
/// This is a record of functions rather than a trait so that a wrapper can
/// take a bundle apart and return a new bundle of the same shape with a
/// widened message type — the hooks close over whatever state or capability
/// handles they need.
pub struct Program<Arg: 'static, Model: 'static, Msg: Send + 'static, View: 'static> {
    pub init: InitFn<Arg, Model, Msg>,
    pub update: UpdateFn<Model, Msg>,
    pub view: ViewFn<Model, View>,
    pub set_state: SetStateFn<Model, Msg>,
    pub subscriptions: SubscriptionsFn<Model, Msg>,
    pub termination: Option<Termination<Model, Msg>>,
}

/// Optional early-termination pair: a predicate over incoming messages and
/// a one-shot cleanup run when the predicate first holds.
pub struct Termination<Model: 'static, Msg: 'static> {
    pub should_exit: Box<dyn Fn(&Msg) -> bool + Send>,
    pub cleanup: Box<dyn FnOnce(&mut Model) + Send>,
}

impl<Model: 'static, Msg: 'static> Termination<Model, Msg> {
    pub fn new(
        should_exit: impl Fn(&Msg) -> bool + Send + 'static,
        cleanup: impl FnOnce(&mut Model) + Send + 'static,
    ) -> Self {
        Self {
            should_exit: Box::new(should_exit),
            cleanup: Box::new(cleanup),
        }
    }
}

impl<Arg: 'static, Model: 'static, Msg: Send + 'static, View: 'static> Program<Arg, Model, Msg, View> {
    /// Assemble a bundle from the three mandatory hooks.
    ///
    /// The render hook defaults to a no-op, the subscription list to empty,
    /// and termination to none; use the `with_*` builders to fill them in.
    pub fn new(
        init: impl FnOnce(Arg) -> (Model, Command<Msg>) + Send + 'static,
        update: impl FnMut(&mut Model, Msg) -> Command<Msg> + Send + 'static,
        view: impl Fn(&Model) -> View + Send + 'static,
    ) -> Self {
        Self {
            init: Box::new(init),
            update: Box::new(update),
            view: Box::new(view),
            set_state: Box::new(|_, _| {}),
            subscriptions: Box::new(|_| vec![]),
            termination: None,
        }
    }

    pub fn with_set_state(
        mut self,
        set_state: impl FnMut(&Model, &Dispatch<Msg>) + Send + 'static,
    ) -> Self {
        self.set_state = Box::new(set_state);
        self
    }

    pub fn with_subscriptions(
        mut self,
        subscriptions: impl Fn(&Model) -> Vec<Subscription<Msg>> + Send + 'static,
    ) -> Self {
        self.subscriptions = Box::new(subscriptions);
        self
    }

    pub fn with_termination(mut self, termination: Termination<Model, Msg>) -> Self {
        self.termination = Some(termination);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_defaults() {
        let mut program: Program<i32, i32, i32, String> = Program::new(
            |flags: i32| (flags, Command::none()),
            |model, msg| {
                *model += msg;
                Command::none()
            },
            |model| model.to_string(),
        );

        let (mut model, cmd) = (program.init)(10);
        assert!(cmd.is_none());
        assert!(program.termination.is_none());
        assert!((program.subscriptions)(&model).is_empty());

        (program.update)(&mut model, 5);
        assert_eq!((program.view)(&model), "15");
    }

    #[test]
    fn termination_pair_runs() {
        let termination: Termination<Vec<&'static str>, i32> =
            Termination::new(|msg| *msg == 0, |model: &mut Vec<&'static str>| model.push("cleaned"));

        assert!((termination.should_exit)(&0));
        assert!(!(termination.should_exit)(&1));

        let mut model = vec![];
        (termination.cleanup)(&mut model);
        assert_eq!(model, vec!["cleaned"]);
    }
}
