//! Server harness and shared world for behaviour tests.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. Dropping the [`WorldFixture`] stops
//! the server even if a step panics.

use std::cell::RefCell;
use std::net::TcpListener;
use std::rc::Rc;

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use awc::BoxedSocket;
use awc::ws::Codec;
use pizzeria::Trace;
use pizzeria::inbound::http::configure_api;
use pizzeria::inbound::http::error::extractor_config;
use pizzeria::inbound::ws;
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

use crate::memory::memory_states;

pub(crate) const ALLOWED_ORIGIN: &str = "http://localhost:3000";

pub(crate) type Socket = actix_codec::Framed<BoxedSocket, Codec>;

pub(crate) struct PizzeriaWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    pub(crate) staff_token: Option<String>,
    pub(crate) customer_token: Option<String>,
    pub(crate) refresh_cookie: Option<String>,
    pub(crate) pizza_id: Option<i64>,
    pub(crate) order_id: Option<i64>,
    pub(crate) socket: Option<Socket>,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_body: Option<Value>,
    pub(crate) ws_frames: Vec<Value>,
}

pub(crate) type SharedWorld = Rc<RefCell<PizzeriaWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        let mut ctx = self.world.borrow_mut();
        let socket = ctx.socket.take();
        let server = ctx.server.clone();
        ctx.local.block_on(&ctx.runtime, async move {
            drop(socket);
            server.stop(true).await;
        });
    }
}

/// Run `operation` against the server. The future must not touch the world.
pub(crate) fn with_world_async<R, F>(world: &SharedWorld, operation: impl FnOnce(String) -> F) -> R
where
    F: std::future::Future<Output = R>,
{
    let ctx = world.borrow();
    let base_url = ctx.base_url.clone();
    ctx.local.block_on(&ctx.runtime, operation(base_url))
}

/// Run `operation` with the world's gateway socket borrowed mutably.
pub(crate) fn with_socket<R, F>(world: &SharedWorld, operation: impl FnOnce(Socket) -> F) -> R
where
    F: std::future::Future<Output = (Socket, R)>,
{
    let socket = world.borrow_mut().socket.take().expect("gateway socket");
    let (socket, result) = {
        let ctx = world.borrow();
        ctx.local.block_on(&ctx.runtime, operation(socket))
    };
    world.borrow_mut().socket = Some(socket);
    result
}

fn spawn_server() -> (String, ServerHandle) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let (http_state, ws_state) = memory_states(&[ALLOWED_ORIGIN]);
    let http_data = web::Data::new(http_state);
    let ws_data = web::Data::new(ws_state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(http_data.clone())
            .app_data(ws_data.clone())
            .configure(extractor_config)
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(configure_api))
            .service(ws::ws_entry)
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .expect("listen")
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    (format!("http://{addr}"), handle)
}

/// Start a server over fresh in-memory repositories.
pub(crate) fn world() -> WorldFixture {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();
    let (base_url, server) = local.block_on(&runtime, async { spawn_server() });

    WorldFixture {
        world: Rc::new(RefCell::new(PizzeriaWorld {
            runtime,
            local,
            base_url,
            server,
            staff_token: None,
            customer_token: None,
            refresh_cookie: None,
            pizza_id: None,
            order_id: None,
            socket: None,
            last_status: None,
            last_body: None,
            ws_frames: Vec::new(),
        })),
    }
}
