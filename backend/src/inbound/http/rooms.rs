//! Room directory API handlers.
//!
//! ```text
//! GET /api/v1/rooms
//! POST /api/v1/rooms {"roomNumber":"A101","capacity":2}
//! PUT /api/v1/rooms/{room_number}/assign/{student_id}
//! GET /api/v1/my-room
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    AccountId, Error, OccupiedRoom, Room, RoomNumber, RoomStatus, RoommateInfo,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Room representation returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomView {
    pub room_number: RoomNumber,
    pub capacity: u32,
    pub occupant_ids: Vec<Uuid>,
    pub status: RoomStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Room> for RoomView {
    fn from(room: Room) -> Self {
        let status = room.status();
        Self {
            room_number: room.room_number,
            capacity: room.capacity,
            occupant_ids: room
                .occupant_ids
                .into_iter()
                .map(|id| *id.as_uuid())
                .collect(),
            status,
            created_at: room.created_at,
        }
    }
}

/// Roommate contact card shown to occupants of the same room.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoommateView {
    pub display_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl From<RoommateInfo> for RoommateView {
    fn from(info: RoommateInfo) -> Self {
        Self {
            display_name: info.display_name.into(),
            email: info.email.into(),
            phone: info.phone,
        }
    }
}

/// The calling student's room plus roommate contact details.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MyRoomView {
    pub room: RoomView,
    pub roommates: Vec<RoommateView>,
}

impl From<OccupiedRoom> for MyRoomView {
    fn from(occupied: OccupiedRoom) -> Self {
        Self {
            room: RoomView::from(occupied.room),
            roommates: occupied
                .roommates
                .into_iter()
                .map(RoommateView::from)
                .collect(),
        }
    }
}

/// Room creation request body.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub room_number: String,
    pub capacity: u32,
}

/// List every room with its derived occupancy status.
#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    responses(
        (status = 200, description = "Rooms ordered by room number", body = [RoomView]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["rooms"],
    operation_id = "listRooms"
)]
#[get("/rooms")]
pub async fn list_rooms(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<RoomView>>> {
    let identity = session.require_identity()?;
    let rooms = state.rooms.list_rooms(&identity).await?;
    Ok(web::Json(rooms.into_iter().map(RoomView::from).collect()))
}

/// Create an empty room.
#[utoipa::path(
    post,
    path = "/api/v1/rooms",
    request_body = CreateRoomRequest,
    responses(
        (status = 201, description = "Room created", body = RoomView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Room number already exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["rooms"],
    operation_id = "createRoom"
)]
#[post("/rooms")]
pub async fn create_room(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateRoomRequest>,
) -> ApiResult<HttpResponse> {
    let identity = session.require_identity()?;
    let room_number = RoomNumber::new(&payload.room_number)
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let room = state
        .rooms
        .create_room(&identity, room_number, payload.capacity)
        .await?;
    Ok(HttpResponse::Created().json(RoomView::from(room)))
}

/// Assign a student to a room.
#[utoipa::path(
    put,
    path = "/api/v1/rooms/{room_number}/assign/{student_id}",
    params(
        ("room_number" = String, Path, description = "Room key"),
        ("student_id" = Uuid, Path, description = "Student account identifier")
    ),
    responses(
        (status = 200, description = "Updated room", body = RoomView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Room or student not found", body = Error),
        (status = 409, description = "Room full or student already assigned", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["rooms"],
    operation_id = "assignRoom"
)]
#[put("/rooms/{room_number}/assign/{student_id}")]
pub async fn assign_room(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, Uuid)>,
) -> ApiResult<web::Json<RoomView>> {
    let identity = session.require_identity()?;
    let (raw_room, student_id) = path.into_inner();
    let room_number =
        RoomNumber::new(&raw_room).map_err(|err| Error::invalid_request(err.to_string()))?;
    let room = state
        .rooms
        .assign(&identity, &room_number, &AccountId::from(student_id))
        .await?;
    Ok(web::Json(RoomView::from(room)))
}

/// The calling student's room with roommate contact details.
#[utoipa::path(
    get,
    path = "/api/v1/my-room",
    responses(
        (status = 200, description = "Room and roommates", body = MyRoomView),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "No room assigned", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["rooms"],
    operation_id = "myRoom"
)]
#[get("/my-room")]
pub async fn my_room(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<MyRoomView>> {
    let identity = session.require_identity()?;
    let occupied = state
        .rooms
        .my_room(&identity)
        .await?
        .ok_or_else(|| Error::not_found("no room assigned"))?;
    Ok(web::Json(MyRoomView::from(occupied)))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, cookie::Cookie, test as actix_test, web};
    use serde_json::Value;

    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::auth::{RegisterRequest, register};
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
                .service(list_rooms)
                .service(create_room)
                .service(assign_room)
                .service(my_room),
        )
    }

    async fn register_with_role<S>(app: &S, email: &str, role: Role) -> (Cookie<'static>, Uuid)
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = actix_web::dev::ServiceResponse,
                Error = actix_web::Error,
            >,
    {
        let res = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(RegisterRequest {
                    email: email.into(),
                    password: "hunter2".into(),
                    display_name: "Test Account".into(),
                    role,
                    phone: Some("555-0101".into()),
                })
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
        let id = body
            .get("id")
            .and_then(Value::as_str)
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .expect("account id");
        (cookie, id)
    }

    async fn create_room_as<S>(app: &S, cookie: &Cookie<'static>, number: &str, capacity: u32)
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = actix_web::dev::ServiceResponse,
                Error = actix_web::Error,
            >,
    {
        let res = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/v1/rooms")
                .cookie(cookie.clone())
                .set_json(CreateRoomRequest {
                    room_number: number.into(),
                    capacity,
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn room_creation_is_admin_only() {
        let app = actix_test::init_service(test_app(test_http_state())).await;
        let (student_cookie, _) = register_with_role(&app, "s1@hostel.edu", Role::Student).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/rooms")
                .cookie(student_cookie)
                .set_json(CreateRoomRequest {
                    room_number: "A101".into(),
                    capacity: 2,
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn duplicate_room_number_conflicts() {
        let app = actix_test::init_service(test_app(test_http_state())).await;
        let (admin_cookie, _) = register_with_role(&app, "warden@hostel.edu", Role::Admin).await;
        create_room_as(&app, &admin_cookie, "A101", 2).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/rooms")
                .cookie(admin_cookie)
                .set_json(CreateRoomRequest {
                    room_number: "A101".into(),
                    capacity: 3,
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn assignment_updates_room_and_my_room() {
        let app = actix_test::init_service(test_app(test_http_state())).await;
        let (admin_cookie, _) = register_with_role(&app, "warden@hostel.edu", Role::Admin).await;
        let (s1_cookie, s1) = register_with_role(&app, "s1@hostel.edu", Role::Student).await;
        let (_, s2) = register_with_role(&app, "s2@hostel.edu", Role::Student).await;
        create_room_as(&app, &admin_cookie, "A101", 2).await;

        for student in [s1, s2] {
            let res = actix_test::call_service(
                &app,
                actix_test::TestRequest::put()
                    .uri(&format!("/api/v1/rooms/A101/assign/{student}"))
                    .cookie(admin_cookie.clone())
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::OK);
        }

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/my-room")
                .cookie(s1_cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value =
            serde_json::from_slice(&actix_test::read_body(res).await).expect("my-room JSON");
        assert_eq!(
            body.pointer("/room/roomNumber").and_then(Value::as_str),
            Some("A101")
        );
        assert_eq!(
            body.pointer("/room/status").and_then(Value::as_str),
            Some("full")
        );
        let roommates = body
            .get("roommates")
            .and_then(Value::as_array)
            .expect("roommates array");
        assert_eq!(roommates.len(), 1);
        assert_eq!(
            roommates
                .first()
                .and_then(|mate| mate.get("email"))
                .and_then(Value::as_str),
            Some("s2@hostel.edu")
        );
    }

    #[actix_web::test]
    async fn full_room_rejects_further_assignment() {
        let app = actix_test::init_service(test_app(test_http_state())).await;
        let (admin_cookie, _) = register_with_role(&app, "warden@hostel.edu", Role::Admin).await;
        let (_, s1) = register_with_role(&app, "s1@hostel.edu", Role::Student).await;
        let (_, s2) = register_with_role(&app, "s2@hostel.edu", Role::Student).await;
        create_room_as(&app, &admin_cookie, "B1", 1).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/rooms/B1/assign/{s1}"))
                .cookie(admin_cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/rooms/B1/assign/{s2}"))
                .cookie(admin_cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn my_room_without_assignment_is_not_found() {
        let app = actix_test::init_service(test_app(test_http_state())).await;
        let (cookie, _) = register_with_role(&app, "s1@hostel.edu", Role::Student).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/my-room")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
