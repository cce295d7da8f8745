//! History commands: fire-and-forget effects targeting the host's
//! navigation stack.
//!
//! None of these produce a message.  A host-level rejection (e.g. a
//! malformed URL) surfaces through the effect's `Result` to whatever error
//! handling the effect executor owns; there is no retry and no local
//! recovery here.

use std::sync::Arc;

use rudder_core::{Command, EffectError};

use crate::host::{BrowserHost, NavEvent};

/// Replace the current history entry's URL with `url`.
///
/// No new entry is created and no notification fires — a replace is silent
/// at the host level and this adapter keeps it that way, so a
/// `Change` message is never produced by a `modify_url`.
pub fn modify_url<H: BrowserHost, Msg: Send + 'static>(
    host: &Arc<H>,
    url: impl Into<String>,
) -> Command<Msg> {
    let host = host.clone();
    let url = url.into();
    Command::effect(async move {
        log::debug!("history: replace {url}");
        host.replace_state(&url).map_err(EffectError::new)
    })
}

/// Push a new history entry with `url`, then dispatch the synthetic
/// [`NavEvent::Navigated`] notification.
///
/// The host fires no native event for a programmatic push; the synthetic
/// event makes same-origin listeners observe it exactly like user-driven
/// navigation.  Pushing the current href still dispatches the event, but
/// the location-change subscription coalesces it away since the href did
/// not actually change.
pub fn new_url<H: BrowserHost, Msg: Send + 'static>(
    host: &Arc<H>,
    url: impl Into<String>,
) -> Command<Msg> {
    let host = host.clone();
    let url = url.into();
    Command::effect(async move {
        log::debug!("history: push {url}");
        host.push_state(&url).map_err(EffectError::new)?;
        host.dispatch_event(NavEvent::Navigated);
        Ok(())
    })
}

/// Move the history cursor by `n` entries (positive = forward, negative =
/// backward, 0 = no-op).
///
/// Emits nothing synthetic: observing the move relies entirely on the
/// host's native pop-state notification.
pub fn jump<H: BrowserHost, Msg: Send + 'static>(host: &Arc<H>, n: i64) -> Command<Msg> {
    let host = host.clone();
    Command::effect(async move {
        log::debug!("history: jump {n}");
        host.go(n);
        Ok(())
    })
}

/// Go back `n` entries. Equivalent to [`jump`] with a negated count.
pub fn back<H: BrowserHost, Msg: Send + 'static>(host: &Arc<H>, n: i64) -> Command<Msg> {
    jump(host, -n)
}

/// Go forward `n` entries. Equivalent to [`jump`].
pub fn forward<H: BrowserHost, Msg: Send + 'static>(host: &Arc<H>, n: i64) -> Command<Msg> {
    jump(host, n)
}
