use serde::Serialize;
use vitrina_core::config::{AppConfig, LoadOptions};
use vitrina_core::session::CatalogSession;
use vitrina_core::view::DisplayState;

use crate::commands::CommandResult;
use crate::presenter::render_text;

#[derive(Debug, Serialize)]
struct RenderOutput<'a> {
    command: &'a str,
    status: &'a str,
    display: &'a DisplayState,
}

/// Prints the display state of a fresh session.
pub fn run(options: LoadOptions, json: bool) -> CommandResult {
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "render",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let session = CatalogSession::from_config(&config.catalog);
    render_session(&session, json)
}

pub fn render_session(session: &CatalogSession, json: bool) -> CommandResult {
    if !json {
        return CommandResult::ok(render_text(session.display()));
    }

    let payload = RenderOutput { command: "render", status: "ok", display: session.display() };
    match serde_json::to_string(&payload) {
        Ok(output) => CommandResult::ok(output),
        Err(error) => CommandResult::failure("render", "serialization", error.to_string(), 3),
    }
}
