use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::repository::InMemorySessionStore;
use crate::routes::{REVIEW_SESSION_KEY, base_context, render_template, review_session_id};
use crate::services::dataset::ReviewDataset;
use crate::services::main as main_service;

/// Home dashboard. Leaving the review view discards its session.
#[get("/")]
pub async fn show_index(
    session: Session,
    store: web::Data<InMemorySessionStore>,
    dataset: web::Data<ReviewDataset>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let session_id = review_session_id(&session);

    let data = match main_service::load_index_page(store.get_ref(), &dataset, session_id) {
        Ok(data) => data,
        Err(err) => {
            log::error!("Failed to load index page: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };
    session.remove(REVIEW_SESSION_KEY);

    let mut context = base_context(&flash_messages, "index");
    context.insert("top_opportunities", &data.top_opportunities);
    context.insert("total_opportunity", &data.total_text);
    context.insert("remaining_opportunities", &data.remaining_count);
    context.insert("client_count", &data.client_count);
    context.insert("metric_panels", &[&data.billing, &data.payments]);
    context.insert("action_required", &data.action_required);
    context.insert("recent", &data.recent);

    render_template(&tera, "main/index.html", &context)
}
