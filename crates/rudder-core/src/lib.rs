//! Program surface for the **rudder** navigation adapter.
//!
//! `rudder-core` defines the pieces an Elm-style program bundle is made of:
//! [`Command`]s describing side effects, [`Subscription`]s delivering
//! long-lived event streams, a [`Dispatch`] handle for feeding messages back
//! from a view, and the [`Program`] record of hooks itself.  It deliberately
//! stops short of a host runtime — there is no render loop here, only the
//! types a runtime (or a wrapper such as `rudder::to_navigable`) composes.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Program`] | Record of init / update / view / set_state / subscriptions / termination hooks |
//! | [`Command`] | Describes a side effect for the host's effect executor |
//! | [`Subscription`] | Long-lived event source with identity-based lifecycle |
//! | [`Dispatch`] | Cloneable, re-taggable message-sending handle |
//! | [`TestProgram`](testing::TestProgram) | Headless harness for driving a [`Program`] in tests |

pub mod command;
pub mod dispatch;
pub mod error;
pub mod program;
pub mod subscription;
pub mod testing;

pub use command::Command;
pub use dispatch::Dispatch;
pub use error::EffectError;
pub use program::{Program, Termination};
pub use subscription::{
    subscribe, Subscription, SubscriptionId, SubscriptionManager, SubscriptionSource,
};
