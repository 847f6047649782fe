#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "data")]
pub mod services;

#[cfg(feature = "server")]
pub use server::{configure, run};

#[cfg(feature = "server")]
mod server {
    use actix_cors::Cors;
    use actix_files::Files;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use chrono::Local;
    use tera::Tera;

    use crate::models::config::ServerConfig;
    use crate::repository::{InMemorySessionStore, JsonClientRepository};
    use crate::routes::api::{api_v1_clients, api_v1_review};
    use crate::routes::main::show_index;
    use crate::routes::review::{decide, key, reset, show_review, swipe, undo};
    use crate::services::dataset::load_dataset;

    /// Registers every route of the application.
    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.service(Files::new("/assets", "./assets"))
            .service(
                web::scope("/api")
                    .service(api_v1_clients)
                    .service(api_v1_review),
            )
            .service(show_index)
            .service(show_review)
            .service(decide)
            .service(swipe)
            .service(key)
            .service(undo)
            .service(reset);
    }

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        let today = server_config
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive());

        // The dataset is read once and shared read-only by every session.
        let repo = JsonClientRepository::new(&server_config.data_path);
        let dataset = load_dataset(&repo, today)
            .map_err(|e| std::io::Error::other(format!("Failed to load client data: {e}")))?;
        let dataset = web::Data::new(dataset);
        let sessions = web::Data::new(InMemorySessionStore::with_limits(
            server_config.session_idle_ttl(),
            server_config.max_sessions,
        ));

        // Keys and stores for sessions and flash messages.
        let secret_key = Key::try_from(server_config.secret.as_bytes())
            .map_err(|e| std::io::Error::other(format!("Invalid secret key: {e}")))?;

        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

        // Browsers drop cookies scoped to a bare `localhost` domain.
        let cookie_domain =
            (server_config.domain != "localhost").then(|| server_config.domain.clone());

        let bind_address = (server_config.address.clone(), server_config.port);
        log::info!("Listening on {}:{}", bind_address.0, bind_address.1);

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(message_framework.clone())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(server_config.cookie_secure)
                        .cookie_domain(cookie_domain.clone())
                        .build(),
                )
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .configure(configure)
                .app_data(web::Data::new(tera.clone()))
                .app_data(dataset.clone())
                .app_data(sessions.clone())
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
