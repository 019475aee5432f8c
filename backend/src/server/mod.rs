//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::Settings;

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::MAX_ATTACHMENT_BYTES;
use crate::inbound::http::attachments::{download_file, upload_file};
use crate::inbound::http::auth::{current_account, login, logout, register};
use crate::inbound::http::complaints::{
    create_complaint, list_complaints, update_complaint_status,
};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::mess_menu::{delete_mess_menu, list_mess_menu, upsert_mess_menu};
use crate::inbound::http::payments::{create_payment, list_payments, mark_payment_paid};
use crate::inbound::http::renewals::{
    create_renewal_form, delete_renewal_form, get_renewal_form, list_renewal_forms,
    patch_renewal_attachments, review_renewal_form,
};
use crate::inbound::http::rooms::{assign_room, create_room, list_rooms, my_room};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::students::{delete_student, list_students};
use crate::middleware::trace::Trace;
#[cfg(debug_assertions)]
use utoipa::OpenApi;

/// Raw-body payload ceiling; the attachment limit plus header room so the
/// size check in the service produces the policy error instead of a 413.
const PAYLOAD_LIMIT: usize = MAX_ATTACHMENT_BYTES + 16 * 1024;

/// Everything `build_app` needs to assemble one application instance.
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

#[cfg(debug_assertions)]
async fn openapi_json() -> web::Json<utoipa::openapi::OpenApi> {
    web::Json(ApiDoc::openapi())
}

/// Assemble the application: session-guarded API scope, trace middleware,
/// and health probes.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(register)
        .service(login)
        .service(logout)
        .service(current_account)
        .service(list_students)
        .service(delete_student)
        .service(list_rooms)
        .service(create_room)
        .service(assign_room)
        .service(my_room)
        .service(list_renewal_forms)
        .service(create_renewal_form)
        .service(get_renewal_form)
        .service(review_renewal_form)
        .service(patch_renewal_attachments)
        .service(delete_renewal_form)
        .service(upload_file)
        .service(download_file)
        .service(list_complaints)
        .service(create_complaint)
        .service(update_complaint_status)
        .service(list_payments)
        .service(create_payment)
        .service(mark_payment_paid)
        .service(list_mess_menu)
        .service(upsert_mess_menu)
        .service(delete_mess_menu);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::PayloadConfig::new(PAYLOAD_LIMIT))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.route("/api-docs/openapi.json", web::get().to(openapi_json));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when opening the upload root, binding the
/// socket, or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config)?;
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        upload_root: _,
        terminal_policy: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
