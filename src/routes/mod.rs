//! HTTP handlers and the helpers they share.

use actix_session::Session;
use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::domain::types::SessionId;

pub mod api;
pub mod main;
pub mod review;

/// Cookie session key holding the browser's review session id.
pub const REVIEW_SESSION_KEY: &str = "review_session";

/// Maps a flash message level onto a Bootstrap alert class.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context with the pending flash alerts and the active navigation entry.
pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Review session id stored in the cookie session, if any.
pub fn review_session_id(session: &Session) -> Option<SessionId> {
    match session.get::<SessionId>(REVIEW_SESSION_KEY) {
        Ok(id) => id,
        Err(err) => {
            log::warn!("Ignoring unreadable review session cookie: {err}");
            None
        }
    }
}

pub fn remember_review_session(session: &Session, id: SessionId) {
    if let Err(err) = session.insert(REVIEW_SESSION_KEY, id) {
        log::error!("Failed to store review session id: {err}");
    }
}
