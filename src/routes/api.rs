use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, web};

use crate::repository::InMemorySessionStore;
use crate::routes::review_session_id;
use crate::services::ServiceError;
use crate::services::api as api_service;
use crate::services::dataset::ReviewDataset;
use crate::services::review as review_service;

#[get("/v1/clients")]
pub async fn api_v1_clients(dataset: web::Data<ReviewDataset>) -> impl Responder {
    HttpResponse::Ok().json(api_service::list_clients(&dataset))
}

/// Snapshot of this browser's review session.
#[get("/v1/review")]
pub async fn api_v1_review(
    session: Session,
    store: web::Data<InMemorySessionStore>,
) -> impl Responder {
    let Some(id) = review_session_id(&session) else {
        return HttpResponse::NotFound().finish();
    };

    match review_service::load_review_snapshot(store.get_ref(), id) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to load review snapshot: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
