// HTTP surface - binds validated input to the domain services.
// Handlers never shape error responses; that happens once, in error.rs.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Path as AxumPath, Query, Request, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};

use crate::{
    app_state::AppState,
    error::AppError,
    models::{Comment, Like, Post, PostDetail, PostFeed, User},
    validation::{
        CreateCommentDto, CreatePostDto, CreateUserDto, LikePostDto, PaginationDto, UpdateUserDto,
        ValidationError, VerifyUserDto,
    },
};

/// Body extractor whose rejection goes through the standard error body. A
/// payload that does not deserialize into the DTO (wrong field type,
/// malformed JSON) is a validation failure like any other, not a bare 422.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(AppError::Validation(ValidationError::single(
                "body",
                rejection.body_text(),
            ))),
        }
    }
}

// --- auth ---

pub async fn verify_handler(
    State(state): State<AppState>,
    AppJson(dto): AppJson<VerifyUserDto>,
) -> Result<Json<Option<User>>, AppError> {
    let wallet = dto.validate()?;
    let user = state.users.verify_user(&wallet).await?;
    Ok(Json(user))
}

pub async fn register_handler(
    State(state): State<AppState>,
    AppJson(dto): AppJson<CreateUserDto>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let new_user = dto.validate()?;
    let user = state.users.create_user(new_user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

// --- posts ---

pub async fn create_post_handler(
    State(state): State<AppState>,
    AppJson(dto): AppJson<CreatePostDto>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let new_post = dto.validate()?;
    let post = state.posts.create_post(new_post).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn get_posts_handler(
    State(state): State<AppState>,
    Query(dto): Query<PaginationDto>,
) -> Result<Json<PostFeed>, AppError> {
    let page = dto.validate()?;
    let feed = state.posts.get_posts(page).await?;
    Ok(Json(feed))
}

pub async fn get_post_handler(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<i64>,
) -> Result<Json<Option<PostDetail>>, AppError> {
    let detail = state.posts.get_post_by_id(id).await?;
    Ok(Json(detail))
}

pub async fn like_post_handler(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<i64>,
    AppJson(dto): AppJson<LikePostDto>,
) -> Result<(StatusCode, Json<Like>), AppError> {
    let wallet = dto.validate()?;
    let like = state.posts.like_post(id, &wallet).await?;
    Ok((StatusCode::CREATED, Json(like)))
}

pub async fn create_comment_handler(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<i64>,
    AppJson(dto): AppJson<CreateCommentDto>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let new_comment = dto.validate()?;
    let comment = state.posts.create_comment(id, new_comment).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

// --- users ---

pub async fn get_user_handler(
    State(state): State<AppState>,
    AxumPath(wallet): AxumPath<String>,
) -> Result<Json<Option<User>>, AppError> {
    let user = state.users.verify_user(&wallet).await?;
    Ok(Json(user))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    AxumPath(wallet): AxumPath<String>,
    AppJson(dto): AppJson<UpdateUserDto>,
) -> Result<Json<User>, AppError> {
    let patch = dto.validate()?;
    let user = state.users.update_user(&wallet, patch).await?;
    Ok(Json(user))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Wallet auth
        .route("/auth/verify", post(verify_handler))
        .route("/auth/register", post(register_handler))
        // Posts, likes, comments
        .route("/posts", post(create_post_handler).get(get_posts_handler))
        .route("/posts/{id}", get(get_post_handler))
        .route("/posts/{id}/like", post(like_post_handler))
        .route("/posts/{id}/comment", post(create_comment_handler))
        // Profiles
        .route(
            "/users/{wallet}",
            get(get_user_handler).patch(update_user_handler),
        )
        .with_state(state)
}
