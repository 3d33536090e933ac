//! HTTP front end for the dashboard.
//!
//! A single-threaded `tiny_http` loop: each request is routed, answered and
//! dropped before the next one is read.

use std::io::Read;

use anyhow::Result;
use tiny_http::{Header, Method, Request, Response, Server};

use crate::callbacks::{CallbackError, UpdateRequest};
use crate::page;
use crate::state::Dashboard;

/// A routed response before it is turned into a `tiny_http::Response`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    fn html(body: String) -> Self {
        Reply { status: 200, content_type: "text/html; charset=utf-8", body }
    }

    fn json(body: String) -> Self {
        Reply { status: 200, content_type: "application/json", body }
    }

    fn text(status: u16, body: impl Into<String>) -> Self {
        Reply { status, content_type: "text/plain; charset=utf-8", body: body.into() }
    }
}

/// Pre-rendered pieces plus the live callback state.
pub struct App {
    dashboard: Dashboard,
    index_html: String,
    layout_json: String,
    dependencies_json: String,
}

impl App {
    pub fn new(dashboard: Dashboard) -> Result<Self> {
        let dependencies = dashboard.dependencies();
        let index_html = page::render(&dashboard.layout, &dependencies)?;
        let layout_json = serde_json::to_string(&dashboard.layout)?;
        let dependencies_json = serde_json::to_string(&dependencies)?;
        Ok(App {
            dashboard,
            index_html,
            layout_json,
            dependencies_json,
        })
    }

    /// Route one request. Never fails: every fault becomes a 4xx/5xx reply.
    pub fn route(&self, method: &Method, url: &str, body: &str) -> Reply {
        let path = url.split('?').next().unwrap_or(url);

        match (method, path) {
            (Method::Get, "/" | "/index.html") => Reply::html(self.index_html.clone()),
            (Method::Get, "/_dash-layout") => Reply::json(self.layout_json.clone()),
            (Method::Get, "/_dash-dependencies") => Reply::json(self.dependencies_json.clone()),
            (Method::Post, "/_dash-update-component") => self.update(body),
            (_, "/" | "/index.html" | "/_dash-layout" | "/_dash-dependencies" | "/_dash-update-component") => {
                Reply::text(405, "Method not allowed")
            }
            _ => Reply::text(404, "Not found"),
        }
    }

    fn update(&self, body: &str) -> Reply {
        let request: UpdateRequest = match serde_json::from_str(body) {
            Ok(req) => req,
            Err(e) => {
                log::warn!("malformed update request: {e}");
                return Reply::text(400, format!("malformed update request: {e}"));
            }
        };

        match self.dashboard.update(&request) {
            Ok(resp) => match serde_json::to_string(&resp) {
                Ok(json) => Reply::json(json),
                Err(e) => {
                    log::error!("serialising figure for {}: {e}", request.output);
                    Reply::text(500, "Internal server error")
                }
            },
            Err(e) => {
                log::warn!("update rejected: {e}");
                let status = match e {
                    CallbackError::UnknownOutput(_) => 404,
                    CallbackError::MissingInput { .. } | CallbackError::WrongInputType { .. } => 400,
                };
                Reply::text(status, e.to_string())
            }
        }
    }

    fn handle(&self, mut request: Request) {
        let method = request.method().clone();
        let url = request.url().to_string();

        let mut body = String::new();
        let reply = match request.as_reader().read_to_string(&mut body) {
            Ok(_) => self.route(&method, &url, &body),
            Err(e) => {
                log::warn!("{method} {url}: reading body failed: {e}");
                Reply::text(400, "Unreadable request body")
            }
        };
        log::debug!("{method} {url} -> {}", reply.status);

        let mut response = Response::from_string(reply.body).with_status_code(reply.status);
        if let Ok(header) = Header::from_bytes("Content-Type", reply.content_type) {
            response = response.with_header(header);
        }
        if let Err(e) = request.respond(response) {
            log::error!("{method} {url}: writing response failed: {e}");
        }
    }
}

/// Bind `host:port` and serve until the process is stopped.
pub fn serve(app: &App, host: &str, port: u16) -> Result<()> {
    let addr = format!("{host}:{port}");
    let server = Server::http(&addr).map_err(|e| anyhow::anyhow!("Failed to start server on {addr}: {e}"))?;

    log::info!("Dashboard running at http://{addr}/");
    log::info!("Press Ctrl+C to stop");

    for request in server.incoming_requests() {
        app.handle(request);
    }
    Ok(())
}
