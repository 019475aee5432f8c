//! OpenAPI documentation configuration.
//!
//! Defines [`ApiDoc`], the generated specification covering every REST
//! endpoint in the inbound layer plus the session-cookie security scheme.
//! Debug builds serve the document at `/api-docs/openapi.json`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/register or /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Hostel backend API",
        description = "HTTP interface for hostel administration: accounts, \
                       rooms, renewal forms, attachments, complaints, fee \
                       payments, and mess menus."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_account,
        crate::inbound::http::students::list_students,
        crate::inbound::http::students::delete_student,
        crate::inbound::http::rooms::list_rooms,
        crate::inbound::http::rooms::create_room,
        crate::inbound::http::rooms::assign_room,
        crate::inbound::http::rooms::my_room,
        crate::inbound::http::renewals::list_renewal_forms,
        crate::inbound::http::renewals::create_renewal_form,
        crate::inbound::http::renewals::get_renewal_form,
        crate::inbound::http::renewals::review_renewal_form,
        crate::inbound::http::renewals::patch_renewal_attachments,
        crate::inbound::http::renewals::delete_renewal_form,
        crate::inbound::http::attachments::upload_file,
        crate::inbound::http::attachments::download_file,
        crate::inbound::http::complaints::list_complaints,
        crate::inbound::http::complaints::create_complaint,
        crate::inbound::http::complaints::update_complaint_status,
        crate::inbound::http::payments::list_payments,
        crate::inbound::http::payments::create_payment,
        crate::inbound::http::payments::mark_payment_paid,
        crate::inbound::http::mess_menu::list_mess_menu,
        crate::inbound::http::mess_menu::upsert_mess_menu,
        crate::inbound::http::mess_menu::delete_mess_menu,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
        crate::domain::Role,
        crate::domain::RenewalForm,
        crate::domain::FormStatus,
        crate::domain::AttachmentSlot,
        crate::domain::AttachmentRecord,
        crate::domain::RoomStatus,
        crate::domain::records::Complaint,
        crate::domain::records::ComplaintCategory,
        crate::domain::records::ComplaintStatus,
        crate::domain::records::Payment,
        crate::domain::records::PaymentType,
        crate::domain::records::PaymentStatus,
        crate::domain::records::MessMenu,
        crate::domain::records::MenuDay,
        crate::domain::records::MealType,
        crate::inbound::http::auth::AccountView,
        crate::inbound::http::auth::RegisterRequest,
        crate::inbound::http::auth::LoginRequest,
        crate::inbound::http::rooms::RoomView,
        crate::inbound::http::rooms::RoommateView,
        crate::inbound::http::rooms::MyRoomView,
        crate::inbound::http::rooms::CreateRoomRequest,
        crate::inbound::http::renewals::CreateRenewalRequest,
        crate::inbound::http::renewals::ReviewRequest,
        crate::inbound::http::renewals::AttachmentsPatchRequest,
        crate::inbound::http::complaints::CreateComplaintRequest,
        crate::inbound::http::complaints::ComplaintStatusRequest,
        crate::inbound::http::payments::CreatePaymentRequest,
        crate::inbound::http::mess_menu::UpsertMenuRequest,
    )),
    tags(
        (name = "auth", description = "Registration, login, and session state"),
        (name = "students", description = "Student directory administration"),
        (name = "rooms", description = "Room inventory and assignment"),
        (name = "renewals", description = "Renewal-form workflow"),
        (name = "attachments", description = "Document upload and download"),
        (name = "complaints", description = "Complaint tracking"),
        (name = "payments", description = "Fee-payment tracking"),
        (name = "mess-menu", description = "Mess-menu publishing"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI document structure.

    use super::*;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[test]
    fn renewal_form_schema_uses_the_wire_id_name() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let form_schema = schemas.get("RenewalForm").expect("RenewalForm schema");

        assert_object_schema_has_field(form_schema, "form_id");
        assert_object_schema_has_field(form_schema, "status");
        assert_object_schema_has_field(form_schema, "attachments");
    }

    #[test]
    fn every_api_path_is_registered() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/register",
            "/api/v1/login",
            "/api/v1/renewal-forms",
            "/api/v1/upload-file",
            "/api/v1/mess-menu",
            "/health/ready",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "path '{path}' should be documented"
            );
        }
    }
}
