use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use axum_helpers::{
    ObjectIdPath, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, DeliveryErrorResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{EventError, EventResult};
use crate::models::{
    CreateEvent, Event, EventFilter, JoinEvent, JoinResponse, Registration, UpdateEvent,
};
use crate::repository::{EventRepository, RegistrationRepository};
use crate::service::EventService;

pub const EVENT_DELETED: &str = "Event successfully deleted!";

#[derive(OpenApi)]
#[openapi(
    paths(
        list_events,
        create_event,
        get_event,
        get_event_legacy,
        update_event,
        delete_event,
        delete_event_legacy,
        join_event,
        list_registrations,
    ),
    components(
        schemas(Event, CreateEvent, UpdateEvent, EventFilter, JoinEvent, JoinResponse, Registration),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            DeliveryErrorResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Events", description = "Board-game meetup events")
    )
)]
pub struct ApiDoc;

type SharedService<R, G> = State<Arc<EventService<R, G>>>;

/// Event routes, mounted at the API root:
/// `/events/...` plus the singular `/event/{id}` read.
pub fn router<R, G>(service: EventService<R, G>) -> Router
where
    R: EventRepository + 'static,
    G: RegistrationRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/events",
            get(list_events)
                .post(create_event)
                .put(missing_event_id)
                .delete(missing_event_id),
        )
        .route("/events/", put(missing_event_id).delete(missing_event_id))
        .route("/events/join", post(join_event))
        .route("/events/delete/{id}", delete(delete_event_legacy))
        .route(
            "/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/events/{id}/users", get(list_registrations))
        .route("/event/{id}", get(get_event_legacy))
        .with_state(shared_service)
}

async fn missing_event_id() -> EventError {
    EventError::MissingId
}

/// List events, optionally by game type
#[utoipa::path(
    get,
    path = "/events",
    tag = "Events",
    params(EventFilter),
    responses(
        (status = 200, description = "Events in no particular order", body = Vec<Event>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_events<R: EventRepository, G: RegistrationRepository>(
    State(service): SharedService<R, G>,
    Query(filter): Query<EventFilter>,
) -> EventResult<Json<Vec<Event>>> {
    let events = service.list_events(filter).await?;
    Ok(Json(events))
}

/// Create an event
#[utoipa::path(
    post,
    path = "/events",
    tag = "Events",
    request_body = CreateEvent,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_event<R: EventRepository, G: RegistrationRepository>(
    State(service): SharedService<R, G>,
    ValidatedJson(input): ValidatedJson<CreateEvent>,
) -> EventResult<impl IntoResponse> {
    let event = service.create_event(input).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Get an event. Absent events are a `null` body, not a 404.
#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "Events",
    params(
        ("id" = String, Path, description = "Event ObjectId (24 hex chars)")
    ),
    responses(
        (status = 200, description = "The event, or null", body = Option<Event>),
        (status = 400, response = BadRequestIdResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_event<R: EventRepository, G: RegistrationRepository>(
    State(service): SharedService<R, G>,
    ObjectIdPath(id): ObjectIdPath,
) -> EventResult<Json<Option<Event>>> {
    let event = service.get_event(id).await?;
    Ok(Json(event))
}

/// Same as `GET /events/{id}`
#[utoipa::path(
    get,
    path = "/event/{id}",
    tag = "Events",
    params(
        ("id" = String, Path, description = "Event ObjectId (24 hex chars)")
    ),
    responses(
        (status = 200, description = "The event, or null", body = Option<Event>),
        (status = 400, response = BadRequestIdResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_event_legacy<R: EventRepository, G: RegistrationRepository>(
    state: SharedService<R, G>,
    id: ObjectIdPath,
) -> EventResult<Json<Option<Event>>> {
    get_event(state, id).await
}

/// Update the provided fields of an event
#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "Events",
    params(
        ("id" = String, Path, description = "Event ObjectId (24 hex chars)")
    ),
    request_body = UpdateEvent,
    responses(
        (status = 200, description = "Event after the update", body = Event),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_event<R: EventRepository, G: RegistrationRepository>(
    State(service): SharedService<R, G>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<UpdateEvent>,
) -> EventResult<Json<Event>> {
    let event = service.update_event(id, input).await?;
    Ok(Json(event))
}

/// Delete an event. Its registrations are kept.
#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "Events",
    params(
        ("id" = String, Path, description = "Event ObjectId (24 hex chars)")
    ),
    responses(
        (status = 200, description = "Confirmation message", body = String, example = json!("Event successfully deleted!")),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_event<R: EventRepository, G: RegistrationRepository>(
    State(service): SharedService<R, G>,
    ObjectIdPath(id): ObjectIdPath,
) -> EventResult<Json<&'static str>> {
    service.delete_event(id).await?;
    Ok(Json(EVENT_DELETED))
}

/// Same as `DELETE /events/{id}`
#[utoipa::path(
    delete,
    path = "/events/delete/{id}",
    tag = "Events",
    params(
        ("id" = String, Path, description = "Event ObjectId (24 hex chars)")
    ),
    responses(
        (status = 200, description = "Confirmation message", body = String),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_event_legacy<R: EventRepository, G: RegistrationRepository>(
    state: SharedService<R, G>,
    id: ObjectIdPath,
) -> EventResult<Json<&'static str>> {
    delete_event(state, id).await
}

/// Join an event and send the confirmation email
///
/// With `eventId` the event must exist and the join is recorded once per
/// email.
#[utoipa::path(
    post,
    path = "/events/join",
    tag = "Events",
    request_body = JoinEvent,
    responses(
        (status = 200, description = "Confirmation sent", body = JoinResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = DeliveryErrorResponse)
    )
)]
async fn join_event<R: EventRepository, G: RegistrationRepository>(
    State(service): SharedService<R, G>,
    ValidatedJson(input): ValidatedJson<JoinEvent>,
) -> EventResult<Json<JoinResponse>> {
    service.join_event(input).await?;
    Ok(Json(JoinResponse::sent()))
}

/// Who joined an event, oldest first
#[utoipa::path(
    get,
    path = "/events/{id}/users",
    tag = "Events",
    params(
        ("id" = String, Path, description = "Event ObjectId (24 hex chars)")
    ),
    responses(
        (status = 200, description = "Registrations, empty for unknown events", body = Vec<Registration>),
        (status = 400, response = BadRequestIdResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_registrations<R: EventRepository, G: RegistrationRepository>(
    State(service): SharedService<R, G>,
    ObjectIdPath(id): ObjectIdPath,
) -> EventResult<Json<Vec<Registration>>> {
    let registrations = service.list_registrations(id).await?;
    Ok(Json(registrations))
}
