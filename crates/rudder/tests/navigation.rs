//! End-to-end behavior of the history commands, the location-change
//! subscription, and the program wrapper, driven against the in-memory
//! browser host.

use std::sync::Arc;

use futures::{FutureExt, StreamExt};

use rudder::testing::FakeBrowser;
use rudder::{
    back, forward, jump, location_changes, modify_url, new_url, to_navigable, BrowserHost,
    Location, LocationChanges, NavEvent, Navigable,
};
use rudder_core::testing::TestProgram;
use rudder_core::{
    Command, Program, Subscription, SubscriptionId, SubscriptionManager, SubscriptionSource,
    Termination,
};

fn change_stream(host: &Arc<FakeBrowser>) -> futures::stream::BoxStream<'static, Location> {
    LocationChanges::new(host.clone()).stream()
}

fn next_href(stream: &mut futures::stream::BoxStream<'static, Location>) -> Option<String> {
    stream
        .next()
        .now_or_never()
        .flatten()
        .map(|loc| loc.href().to_string())
}

// --- location-change subscription -------------------------------------

#[test]
fn coalesces_redundant_location_events() {
    let host = Arc::new(FakeBrowser::new("/a"));
    let mut stream = change_stream(&host);

    // Event hrefs observed: A, A, B, B, A.
    host.dispatch_event(NavEvent::PopState);
    host.dispatch_event(NavEvent::Navigated);
    host.replace_state("/b").unwrap();
    host.dispatch_event(NavEvent::HashChange);
    host.dispatch_event(NavEvent::PopState);
    host.replace_state("/a").unwrap();
    host.dispatch_event(NavEvent::Navigated);

    assert_eq!(next_href(&mut stream), Some("/a".to_string()));
    assert_eq!(next_href(&mut stream), Some("/b".to_string()));
    assert_eq!(next_href(&mut stream), Some("/a".to_string()));
    assert_eq!(next_href(&mut stream), None);
}

#[test]
fn registers_and_releases_three_listeners() {
    let host = Arc::new(FakeBrowser::new("/"));
    let stream = change_stream(&host);
    assert_eq!(host.listener_count(), 3);
    for event in NavEvent::ALL {
        assert_eq!(host.add_count(event), 1);
    }

    drop(stream);
    assert_eq!(host.listener_count(), 0);
    for event in NavEvent::ALL {
        assert_eq!(host.remove_count(event), 1);
    }
}

#[test]
fn hash_edits_are_observed_per_distinct_fragment() {
    let host = Arc::new(FakeBrowser::new("/page"));
    let mut stream = change_stream(&host);

    host.edit_hash("one");
    host.edit_hash("one");
    host.edit_hash("two");

    assert_eq!(next_href(&mut stream), Some("/page#one".to_string()));
    assert_eq!(next_href(&mut stream), Some("/page#two".to_string()));
    assert_eq!(next_href(&mut stream), None);
}

#[tokio::test]
async fn location_changes_subscription_feeds_a_manager() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Location>();
    let mut manager = SubscriptionManager::new(tx);
    let host = Arc::new(FakeBrowser::new("/start"));

    // Reconcile builds the stream, so the listeners exist on return.
    manager.reconcile(vec![location_changes(host.clone())]);
    assert_eq!(host.listener_count(), 3);

    host.replace_state("/next").unwrap();
    host.dispatch_event(NavEvent::PopState);
    let loc = rx.recv().await.expect("subscription closed");
    assert_eq!(loc.href(), "/next");

    manager.shutdown();
    tokio::task::yield_now().await;
    assert_eq!(host.listener_count(), 0);
}

// --- history commands --------------------------------------------------

/// Messages naming a history action, so command effects can be executed
/// through the harness.
#[derive(Debug)]
enum NavCmd {
    Modify(&'static str),
    New(&'static str),
    Jump(i64),
    Back(i64),
    Forward(i64),
}

fn command_program(host: &Arc<FakeBrowser>) -> Program<(), (), NavCmd, ()> {
    let host = host.clone();
    Program::new(
        |_| ((), Command::none()),
        move |_, msg: NavCmd| match msg {
            NavCmd::Modify(url) => modify_url(&host, url),
            NavCmd::New(url) => new_url(&host, url),
            NavCmd::Jump(n) => jump(&host, n),
            NavCmd::Back(n) => back(&host, n),
            NavCmd::Forward(n) => forward(&host, n),
        },
        |_| (),
    )
}

#[test]
fn modify_url_replaces_silently() {
    let host = Arc::new(FakeBrowser::new("/start"));
    let mut stream = change_stream(&host);

    let mut harness = TestProgram::new(command_program(&host), ());
    harness.send(NavCmd::Modify("/x"));
    harness.run_effects().unwrap();

    assert_eq!(host.current_href(), "/x");
    assert_eq!(host.entry_count(), 1);
    assert_eq!(next_href(&mut stream), None);
}

#[test]
fn new_url_pushes_and_is_observed_once() {
    let host = Arc::new(FakeBrowser::new("/start"));
    let mut stream = change_stream(&host);

    let mut harness = TestProgram::new(command_program(&host), ());
    harness.send(NavCmd::New("/y"));
    harness.run_effects().unwrap();

    assert_eq!(host.current_href(), "/y");
    assert_eq!(next_href(&mut stream), Some("/y".to_string()));
    assert_eq!(next_href(&mut stream), None);
}

#[test]
fn new_url_to_current_href_fires_no_change() {
    let host = Arc::new(FakeBrowser::new("/start"));
    let mut stream = change_stream(&host);
    let mut harness = TestProgram::new(command_program(&host), ());

    harness.send(NavCmd::New("/y"));
    harness.run_effects().unwrap();
    assert_eq!(next_href(&mut stream), Some("/y".to_string()));

    // Same href again: the synthetic event fires but is coalesced away.
    harness.send(NavCmd::New("/y"));
    harness.run_effects().unwrap();
    assert_eq!(host.entry_count(), 3);
    assert_eq!(next_href(&mut stream), None);
}

#[test]
fn jump_back_restores_previous_href() {
    let host = Arc::new(FakeBrowser::new("/one"));
    let mut stream = change_stream(&host);
    let mut harness = TestProgram::new(command_program(&host), ());

    harness.send(NavCmd::New("/two"));
    harness.run_effects().unwrap();
    assert_eq!(next_href(&mut stream), Some("/two".to_string()));

    harness.send(NavCmd::Jump(-1));
    harness.run_effects().unwrap();
    assert_eq!(host.current_href(), "/one");
    assert_eq!(next_href(&mut stream), Some("/one".to_string()));
    assert_eq!(next_href(&mut stream), None);
}

#[test]
fn back_and_forward_wrap_jump() {
    let host = Arc::new(FakeBrowser::new("/one"));
    let mut harness = TestProgram::new(command_program(&host), ());

    harness.send(NavCmd::New("/two"));
    harness.send(NavCmd::Back(1));
    harness.run_effects().unwrap();
    assert_eq!(host.current_href(), "/one");

    harness.send(NavCmd::Forward(1));
    harness.run_effects().unwrap();
    assert_eq!(host.current_href(), "/two");
}

#[test]
fn malformed_url_surfaces_through_the_effect_executor() {
    let host = Arc::new(FakeBrowser::new("/start"));
    let mut harness = TestProgram::new(command_program(&host), ());

    harness.send(NavCmd::New(""));
    let err = harness.run_effects().unwrap_err();
    assert!(err.to_string().contains("malformed url"));
    assert_eq!(host.current_href(), "/start");
}

// --- program wrapper ---------------------------------------------------

#[derive(Debug, PartialEq)]
enum AppMsg {
    Rename(String),
    Quit,
}

struct App {
    route: String,
    init_route: String,
    url_updates: Vec<String>,
    name: String,
    cleaned_up: bool,
}

fn parse(loc: &Location) -> String {
    loc.pathname().to_string()
}

fn user_program() -> Program<String, App, AppMsg, String> {
    Program::new(
        |route: String| {
            (
                App {
                    route: route.clone(),
                    init_route: route,
                    url_updates: vec![],
                    name: String::new(),
                    cleaned_up: false,
                },
                Command::none(),
            )
        },
        |app: &mut App, msg| match msg {
            AppMsg::Rename(name) => {
                app.name = name;
                Command::none()
            }
            AppMsg::Quit => Command::none(),
        },
        |app| format!("{} ({})", app.route, app.name),
    )
    .with_termination(Termination::new(
        |msg| matches!(msg, AppMsg::Quit),
        |app: &mut App| app.cleaned_up = true,
    ))
}

fn wrapped(host: &Arc<FakeBrowser>) -> Program<(), App, Navigable<AppMsg>, String> {
    to_navigable(
        host.clone(),
        parse,
        |route: String, app: &mut App| {
            app.url_updates.push(route.clone());
            app.route = route;
            Command::none()
        },
        user_program(),
    )
}

#[test]
fn init_route_comes_from_the_shared_parser() {
    let host = Arc::new(FakeBrowser::new("/inbox?page=2"));
    let harness = TestProgram::new(wrapped(&host), ());

    // Round-trip: wrapper startup and the change path parse the same input.
    assert_eq!(harness.model().init_route, parse(&host.location()));
    assert_eq!(harness.model().route, "/inbox");
}

#[test]
fn change_messages_route_through_url_update() {
    let host = Arc::new(FakeBrowser::new("/"));
    let mut harness = TestProgram::new(wrapped(&host), ());

    harness.send(Navigable::Change(Location::from_href("/settings")));
    assert_eq!(harness.model().route, "/settings");
    assert_eq!(harness.model().url_updates, vec!["/settings"]);

    harness.send(Navigable::User(AppMsg::Rename("pat".into())));
    assert_eq!(harness.model().name, "pat");
    assert_eq!(harness.render(), "/settings (pat)");
}

#[test]
fn render_hook_dispatch_is_pre_composed() {
    let host = Arc::new(FakeBrowser::new("/"));
    // The user render hook dispatches its own message type; the wrapper
    // owns the tagging.
    let program = user_program()
        .with_set_state(|_, dispatch| dispatch.send(AppMsg::Rename("from-view".into())));
    let wrapped = to_navigable(
        host.clone(),
        parse,
        |route: String, app: &mut App| {
            app.route = route;
            Command::none()
        },
        program,
    );

    let mut harness = TestProgram::new(wrapped, ());
    harness.render_state();
    harness.drain_messages();
    assert_eq!(harness.model().name, "from-view");
}

#[tokio::test]
async fn wrapped_subscription_delivers_change_messages() {
    let host = Arc::new(FakeBrowser::new("/start"));
    let mut harness = TestProgram::new(wrapped(&host), ());

    harness.start_subscriptions();
    tokio::task::yield_now().await;
    assert_eq!(host.listener_count(), 3);

    host.replace_state("/next").unwrap();
    host.dispatch_event(NavEvent::Navigated);

    let msg = harness.recv().await.expect("subscription closed");
    match &msg {
        Navigable::Change(loc) => assert_eq!(loc.href(), "/next"),
        other => panic!("expected a change message, got {other:?}"),
    }
    harness.send(msg);
    assert_eq!(harness.model().route, "/next");
}

#[tokio::test]
async fn user_subscriptions_are_merged_and_tagged() {
    let host = Arc::new(FakeBrowser::new("/"));
    let program = user_program().with_subscriptions(|_| {
        vec![Subscription::from_stream(
            SubscriptionId::of::<AppMsg>(),
            Box::pin(futures::stream::iter(vec![AppMsg::Rename("sam".into())])),
        )]
    });
    let wrapped = to_navigable(
        host.clone(),
        parse,
        |route: String, app: &mut App| {
            app.route = route;
            Command::none()
        },
        program,
    );

    let mut harness = TestProgram::new(wrapped, ());
    harness.start_subscriptions();

    let msg = harness.recv().await.expect("subscription closed");
    assert_eq!(msg, Navigable::User(AppMsg::Rename("sam".into())));
}

#[tokio::test]
async fn termination_ignores_changes_and_removes_listeners_once() {
    let host = Arc::new(FakeBrowser::new("/start"));
    let mut harness = TestProgram::new(wrapped(&host), ());

    harness.start_subscriptions();
    tokio::task::yield_now().await;
    assert_eq!(host.listener_count(), 3);

    // A change message never satisfies termination.
    harness.send(Navigable::Change(Location::from_href("/elsewhere")));
    assert!(!harness.terminated());

    harness.send(Navigable::User(AppMsg::Quit));
    assert!(harness.terminated());
    assert!(harness.model().cleaned_up);
    assert_eq!(host.listener_count(), 0);
    for event in NavEvent::ALL {
        assert_eq!(host.remove_count(event), 1);
    }

    // Let the aborted subscription task unwind; removal stays exactly once.
    tokio::task::yield_now().await;
    for event in NavEvent::ALL {
        assert_eq!(host.remove_count(event), 1);
    }

    // The terminated program drops further messages.
    harness.send(Navigable::User(AppMsg::Rename("late".into())));
    assert_eq!(harness.model().name, "");
}
