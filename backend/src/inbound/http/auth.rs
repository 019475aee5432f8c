//! Account and session API handlers.
//!
//! ```text
//! POST /api/v1/register {"email":"s1@hostel.edu","password":"pw","displayName":"Priya","role":"student"}
//! POST /api/v1/login {"email":"s1@hostel.edu","password":"pw"}
//! POST /api/v1/logout
//! GET /api/v1/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    Account, AccountValidationError, Error, Identity, LoginCredentials, LoginValidationError,
    RegistrationDetails, Role, RoomNumber,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Account representation returned to clients.
///
/// The credential hash never appears here.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_room: Option<RoomNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            id: *account.id.as_uuid(),
            email: account.email.into(),
            display_name: account.display_name.into(),
            role: account.role,
            assigned_room: account.assigned_room,
            phone: account.phone,
            created_at: account.created_at,
        }
    }
}

/// Registration request body for `POST /api/v1/register`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn validation_field(err: &AccountValidationError) -> &'static str {
    match err {
        AccountValidationError::InvalidId => "id",
        AccountValidationError::EmptyEmail | AccountValidationError::MalformedEmail => "email",
        AccountValidationError::EmptyDisplayName
        | AccountValidationError::DisplayNameTooLong { .. } => "displayName",
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
        LoginValidationError::Account(inner) => Error::invalid_request(inner.to_string())
            .with_details(json!({ "field": validation_field(&inner) })),
    }
}

/// Register a new account and establish a session for it.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AccountView,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let details = RegistrationDetails::try_from_parts(
        &payload.email,
        &payload.password,
        &payload.display_name,
        payload.role,
        payload.phone,
    )
    .map_err(map_login_validation_error)?;
    let account = state.accounts.register(&details).await?;
    session.persist_identity(&Identity::new(account.id, account.role))?;
    Ok(HttpResponse::Created().json(AccountView::from(account)))
}

/// Authenticate an account and establish a session.
///
/// Uses the centralised `Error` type so clients get a consistent error
/// schema across all endpoints.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AccountView,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(map_login_validation_error)?;
    let account = state.accounts.authenticate(&credentials).await?;
    session.persist_identity(&Identity::new(account.id, account.role))?;
    Ok(HttpResponse::Ok().json(AccountView::from(account)))
}

/// Drop the caller's session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 204, description = "Session cleared"),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Return the calling account.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Calling account", body = AccountView),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentAccount"
)]
#[get("/me")]
pub async fn current_account(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AccountView>> {
    let identity = session.require_identity()?;
    let account = state.accounts.current_account(&identity).await?;
    Ok(web::Json(AccountView::from(account)))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use serde_json::Value;

    use super::*;
    use crate::inbound::http::test_utils::{test_http_state, test_session_middleware};

    fn test_app(
        state: web::Data<HttpState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().app_data(state).service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .service(register)
                .service(login)
                .service(logout)
                .service(current_account),
        )
    }

    fn register_body(email: &str, role: Role) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: "hunter2".into(),
            display_name: "Priya Sharma".into(),
            role,
            phone: None,
        }
    }

    #[actix_web::test]
    async fn register_creates_account_and_session() {
        let app = actix_test::init_service(test_app(test_http_state())).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(register_body("s1@hostel.edu", Role::Student))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let cookie = res
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("session cookie")
            .into_owned();
        let body: Value =
            serde_json::from_slice(&actix_test::read_body(res).await).expect("account JSON");
        assert_eq!(
            body.get("email").and_then(Value::as_str),
            Some("s1@hostel.edu")
        );
        assert_eq!(
            body.get("displayName").and_then(Value::as_str),
            Some("Priya Sharma")
        );
        assert!(body.get("credentialHash").is_none());

        let me = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/me")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(me.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn duplicate_email_registration_conflicts() {
        let app = actix_test::init_service(test_app(test_http_state())).await;

        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let res = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri("/api/v1/register")
                    .set_json(register_body("dup@hostel.edu", Role::Student))
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), expected);
        }
    }

    #[actix_web::test]
    async fn register_rejects_malformed_email() {
        let app = actix_test::init_service(test_app(test_http_state())).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(register_body("not-an-email", Role::Student))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value =
            serde_json::from_slice(&actix_test::read_body(res).await).expect("error payload");
        let details = body.get("details").expect("details present");
        assert_eq!(details.get("field").and_then(Value::as_str), Some("email"));
    }

    #[actix_web::test]
    async fn login_hides_which_credential_failed() {
        let app = actix_test::init_service(test_app(test_http_state())).await;

        actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(register_body("s1@hostel.edu", Role::Student))
                .to_request(),
        )
        .await;

        for (email, password) in [
            ("s1@hostel.edu", "wrong-password"),
            ("ghost@hostel.edu", "hunter2"),
        ] {
            let res = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri("/api/v1/login")
                    .set_json(LoginRequest {
                        email: email.into(),
                        password: password.into(),
                    })
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
            let body: Value =
                serde_json::from_slice(&actix_test::read_body(res).await).expect("error payload");
            assert_eq!(
                body.get("message").and_then(Value::as_str),
                Some("invalid email or password")
            );
        }
    }

    #[actix_web::test]
    async fn logout_invalidates_the_session() {
        let app = actix_test::init_service(test_app(test_http_state())).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(register_body("s1@hostel.edu", Role::Student))
                .to_request(),
        )
        .await;
        let cookie = res
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("session cookie")
            .into_owned();

        let out = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(out.status(), StatusCode::NO_CONTENT);
        let cleared = out
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("session cookie rewritten");
        assert!(cleared.value().is_empty());
    }

    #[actix_web::test]
    async fn me_requires_a_session() {
        let app = actix_test::init_service(test_app(test_http_state())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/me").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
