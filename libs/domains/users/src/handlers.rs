use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use axum_helpers::{
    ObjectIdPath, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::auth_handlers::{self, SessionPayload};
use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const USER_DELETED: &str = "User successfully deleted!";

#[derive(OpenApi)]
#[openapi(
    paths(
        list_users,
        create_user,
        get_user,
        update_user,
        delete_user,
        delete_user_legacy,
        auth_handlers::session_callback,
    ),
    components(
        schemas(User, CreateUser, UpdateUser, SessionPayload),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Users", description = "AirDND user records"),
        (name = "Auth", description = "Sign-in callback hook")
    )
)]
pub struct ApiDoc;

type SharedService<R> = State<Arc<UserService<R>>>;

/// User routes plus the `/auth/session` provisioning hook, mounted at the
/// API root.
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/users",
            get(list_users)
                .post(create_user)
                .put(missing_user_id)
                .delete(missing_user_id),
        )
        .route("/users/", put(missing_user_id).delete(missing_user_id))
        .route("/users/delete/{id}", delete(delete_user_legacy))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/auth/session", post(auth_handlers::session_callback::<R>))
        .with_state(shared_service)
}

async fn missing_user_id() -> UserError {
    UserError::MissingId
}

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = Vec<User>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): SharedService<R>,
) -> UserResult<Json<Vec<User>>> {
    let users = service.list_users().await?;
    Ok(Json(users))
}

/// Create a user. Emails are unique.
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): SharedService<R>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user, or `null` when absent
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ObjectId (24 hex chars)")
    ),
    responses(
        (status = 200, description = "The user, or null", body = Option<User>),
        (status = 400, response = BadRequestIdResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): SharedService<R>,
    ObjectIdPath(id): ObjectIdPath,
) -> UserResult<Json<Option<User>>> {
    let user = service.get_user(id).await?;
    Ok(Json(user))
}

/// Update the provided fields of a user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ObjectId (24 hex chars)")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User after the update", body = User),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): SharedService<R>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> UserResult<Json<User>> {
    let user = service.update_user(id, input).await?;
    Ok(Json(user))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ObjectId (24 hex chars)")
    ),
    responses(
        (status = 200, description = "Confirmation message", body = String, example = json!("User successfully deleted!")),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): SharedService<R>,
    ObjectIdPath(id): ObjectIdPath,
) -> UserResult<Json<&'static str>> {
    service.delete_user(id).await?;
    Ok(Json(USER_DELETED))
}

/// Same as `DELETE /users/{id}`
#[utoipa::path(
    delete,
    path = "/users/delete/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ObjectId (24 hex chars)")
    ),
    responses(
        (status = 200, description = "Confirmation message", body = String),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user_legacy<R: UserRepository>(
    state: SharedService<R>,
    id: ObjectIdPath,
) -> UserResult<Json<&'static str>> {
    delete_user(state, id).await
}
