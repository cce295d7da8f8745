//! **rudder** — browser-history navigation for Elm-style programs.
//!
//! This crate lets a program built on the unidirectional-update hooks from
//! [`rudder_core`] react to browser address-bar changes and issue history
//! commands.  It is glue between two external collaborators: the host
//! framework's dispatch loop (represented by [`Program`]) and the browser's
//! history/location capability (represented by the [`BrowserHost`] trait,
//! injected so everything here can be tested against
//! [`testing::FakeBrowser`]).
//!
//! # Pieces
//!
//! * [`Location`] — read-only snapshot of the browser address.
//! * [`Navigable`] — the two-variant message union (`Change` / `User`).
//! * [`modify_url`], [`new_url`], [`jump`] (plus [`back`] / [`forward`]) —
//!   fire-and-forget history commands.
//! * [`to_navigable`] — wraps a user program, merging in a location-change
//!   subscription and the `Change` message path.
//!
//! # Quick example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rudder::{to_navigable, Location, Navigable};
//! use rudder_core::{Command, Program};
//!
//! #[derive(Debug, PartialEq)]
//! enum Route { Home, Settings, NotFound }
//!
//! fn parse(loc: &Location) -> Route {
//!     match loc.pathname() {
//!         "/" => Route::Home,
//!         "/settings" => Route::Settings,
//!         _ => Route::NotFound,
//!     }
//! }
//!
//! let program = Program::new(
//!     |route| (App { route }, Command::none()),
//!     |app, msg| app.update(msg),
//!     |app| app.render(),
//! );
//!
//! let wrapped = to_navigable(
//!     host,                                 // Arc<impl BrowserHost>
//!     parse,
//!     |route, app: &mut App| { app.route = route; Command::none() },
//!     program,
//! );
//! ```

pub mod history;
pub mod host;
pub mod location;
pub mod navigable;
pub mod testing;
pub mod wrapper;

pub use history::{back, forward, jump, modify_url, new_url};
pub use host::{BrowserHost, HostError, ListenerId, NavEvent, NavListener};
pub use location::Location;
pub use navigable::Navigable;
pub use wrapper::{location_changes, to_navigable, HandlerCell, LocationChanges};

// Re-export the program surface so downstream crates need one dependency.
pub use rudder_core as core;
pub use rudder_core::{Command, Dispatch, Program, Subscription, Termination};
