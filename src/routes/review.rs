use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;
use validator::Validate;

use crate::domain::session::{DecisionReport, SessionError};
use crate::forms::review::{
    DecisionForm, DecisionPayload, KeyForm, SwipeForm, SwipePayload, UndoForm,
};
use crate::models::config::ServerConfig;
use crate::repository::InMemorySessionStore;
use crate::routes::{
    base_context, redirect, remember_review_session, render_template, review_session_id,
};
use crate::services::dataset::ReviewDataset;
use crate::services::review::{self as review_service, KeyOutcome};
use crate::services::ServiceError;

const REVIEW_URL: &str = "/crush";

fn celebrate(report: &DecisionReport) {
    for achievement in &report.achievements {
        FlashMessage::success(achievement.celebration()).send();
    }
}

/// Turns a rejected request into a flash message on the review page.
fn report_failure(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Session(SessionError::StaleCursor { .. }) | ServiceError::Conflict(_) => {
            FlashMessage::warning("That card was already handled.").send();
        }
        ServiceError::Session(SessionError::AlreadyComplete) => {
            FlashMessage::info("Every client has been reviewed.").send();
        }
        ServiceError::Session(SessionError::NothingToUndo) => {
            FlashMessage::info("Nothing to undo.").send();
        }
        ServiceError::NotFound => {
            FlashMessage::warning("Your review session expired, starting over.").send();
        }
        err => {
            log::error!("Review request failed: {err}");
            FlashMessage::error("Something went wrong, please try again.").send();
        }
    }
    redirect(REVIEW_URL)
}

#[get("/crush")]
pub async fn show_review(
    session: Session,
    store: web::Data<InMemorySessionStore>,
    dataset: web::Data<ReviewDataset>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let existing = review_session_id(&session);

    let loaded = review_service::load_review_page(store.get_ref(), &dataset, existing);
    let (id, page) = match loaded {
        Ok(loaded) => loaded,
        Err(err) => {
            log::error!("Failed to load review page: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };
    if existing != Some(id) {
        remember_review_session(&session, id);
    }

    let mut context = base_context(&flash_messages, "review");
    context.insert("review", &page);
    context.insert("swipe_threshold", &server_config.swipe_threshold);

    render_template(&tera, "review/index.html", &context)
}

#[post("/crush/decide")]
pub async fn decide(
    session: Session,
    store: web::Data<InMemorySessionStore>,
    web::Form(form): web::Form<DecisionForm>,
) -> impl Responder {
    let Some(id) = review_session_id(&session) else {
        return report_failure(ServiceError::NotFound);
    };

    let payload = match DecisionPayload::try_from(form) {
        Ok(payload) => payload,
        Err(err) => {
            log::warn!("Invalid decision form: {err}");
            FlashMessage::error("Unknown decision.").send();
            return redirect(REVIEW_URL);
        }
    };

    let result =
        review_service::submit_decision(store.get_ref(), id, payload.cursor, payload.decision);
    match result {
        Ok(report) => {
            celebrate(&report);
            redirect(REVIEW_URL)
        }
        Err(err) => report_failure(err),
    }
}

#[post("/crush/swipe")]
pub async fn swipe(
    session: Session,
    store: web::Data<InMemorySessionStore>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<SwipeForm>,
) -> impl Responder {
    let Some(id) = review_session_id(&session) else {
        return report_failure(ServiceError::NotFound);
    };

    let payload = match SwipePayload::try_from(form) {
        Ok(payload) => payload,
        Err(err) => {
            log::warn!("Invalid swipe form: {err}");
            return redirect(REVIEW_URL);
        }
    };

    match review_service::submit_swipe(
        store.get_ref(),
        id,
        payload.cursor,
        payload.gesture,
        server_config.swipe_threshold,
    ) {
        Ok(Some(report)) => {
            celebrate(&report);
            redirect(REVIEW_URL)
        }
        Ok(None) => redirect(REVIEW_URL),
        Err(err) => report_failure(err),
    }
}

#[post("/crush/key")]
pub async fn key(
    session: Session,
    store: web::Data<InMemorySessionStore>,
    web::Form(form): web::Form<KeyForm>,
) -> impl Responder {
    let Some(id) = review_session_id(&session) else {
        return report_failure(ServiceError::NotFound);
    };

    if let Err(err) = form.validate() {
        log::warn!("Invalid key form: {err}");
        return redirect(REVIEW_URL);
    }

    match review_service::submit_key(store.get_ref(), id, form.cursor, &form.key, form.modifier) {
        Ok(KeyOutcome::Decided(report)) => {
            celebrate(&report);
            redirect(REVIEW_URL)
        }
        Ok(KeyOutcome::Undone(_)) | Ok(KeyOutcome::Ignored) => redirect(REVIEW_URL),
        Err(err) => report_failure(err),
    }
}

#[post("/crush/undo")]
pub async fn undo(
    session: Session,
    store: web::Data<InMemorySessionStore>,
    web::Form(form): web::Form<UndoForm>,
) -> impl Responder {
    let Some(id) = review_session_id(&session) else {
        return report_failure(ServiceError::NotFound);
    };

    match review_service::undo_decision(store.get_ref(), id, form.cursor) {
        Ok(_) => redirect(REVIEW_URL),
        Err(err) => report_failure(err),
    }
}

#[post("/crush/reset")]
pub async fn reset(session: Session, store: web::Data<InMemorySessionStore>) -> impl Responder {
    let Some(id) = review_session_id(&session) else {
        return report_failure(ServiceError::NotFound);
    };

    match review_service::reset_session(store.get_ref(), id) {
        Ok(()) => redirect(REVIEW_URL),
        Err(err) => report_failure(err),
    }
}
