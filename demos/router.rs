//! A small routing session driven against the in-memory browser host.
//!
//! Run with: `cargo run --example router`

use std::sync::Arc;

use rudder::testing::FakeBrowser;
use rudder::{back, new_url, to_navigable, Location, Navigable};
use rudder_core::testing::TestProgram;
use rudder_core::{Command, Program};

#[derive(Debug, Clone, PartialEq)]
enum Route {
    Home,
    Docs(String),
    NotFound,
}

fn parse(loc: &Location) -> Route {
    match loc.pathname() {
        "/" => Route::Home,
        path => match path.strip_prefix("/docs/") {
            Some(topic) => Route::Docs(topic.to_string()),
            None => Route::NotFound,
        },
    }
}

#[derive(Debug)]
enum Msg {
    OpenDocs(&'static str),
    GoBack,
}

struct App {
    route: Route,
}

fn render(app: &App) -> String {
    match &app.route {
        Route::Home => "Home — pick a topic".to_string(),
        Route::Docs(topic) => format!("Docs: {topic}"),
        Route::NotFound => "404".to_string(),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let host = Arc::new(FakeBrowser::new("/"));

    let program = {
        let host = host.clone();
        Program::new(
            |route| (App { route }, Command::none()),
            move |_app: &mut App, msg| match msg {
                Msg::OpenDocs(topic) => new_url(&host, format!("/docs/{topic}")),
                Msg::GoBack => back(&host, 1),
            },
            render,
        )
    };

    let wrapped = to_navigable(
        host.clone(),
        parse,
        |route, app: &mut App| {
            app.route = route;
            Command::none()
        },
        program,
    );

    let mut session = TestProgram::new(wrapped, ());
    session.start_subscriptions();
    tokio::task::yield_now().await;
    println!("{}", session.render());

    session.send(Navigable::User(Msg::OpenDocs("install")));
    session.run_effects().expect("push failed");
    let change = session.recv().await.expect("subscription closed");
    session.send(change);
    println!("{}", session.render());

    session.send(Navigable::User(Msg::GoBack));
    session.run_effects().expect("jump failed");
    let change = session.recv().await.expect("subscription closed");
    session.send(change);
    println!("{}", session.render());
}
