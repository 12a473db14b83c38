pub mod handlers;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::sync::Arc;

use crate::{config::Config, volc::ImageService};

/// Shared, read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn ImageService>,
    pub req_key: String,
}

impl AppState {
    pub fn new(service: Arc<dyn ImageService>, req_key: impl Into<String>) -> Self {
        Self {
            service,
            req_key: req_key.into(),
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/generate", web::post().to(handlers::generate));
}

pub fn cors() -> Cors {
    Cors::permissive()
}

pub async fn run(config: &Config, state: AppState) -> std::io::Result<()> {
    let data = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors())
            .app_data(data.clone())
            .configure(configure)
    })
    .bind((config.server.host(), config.server.port()))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volc::tests::StubService;
    use actix_web::{http::header, test as actix_test};

    #[actix_web::test]
    async fn test_cors_preflight_allows_any_origin_with_credentials() {
        let service: Arc<dyn ImageService> =
            Arc::new(StubService::with_images(vec!["x".into()], vec![]));
        let app = actix_test::init_service(
            App::new()
                .wrap(cors())
                .app_data(web::Data::new(AppState::new(service, "jimeng_t2i_v40")))
                .configure(configure),
        )
        .await;

        let req = actix_test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/generate")
            .insert_header((header::ORIGIN, "http://example.com"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        let headers = resp.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://example.com"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }
}
