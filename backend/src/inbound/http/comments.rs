//! Comment API handlers, nested under a dish.
//!
//! The author of a new comment is always the authenticated caller. Editing
//! and deleting are strictly author-only (admins included); the bulk clear
//! is the one admin-gated operation on the nested list.

use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};

use crate::domain::{require_admin, CommentDraft, CommentId, CommentPatch, Error};
use crate::inbound::http::auth::authenticate_bearer;
use crate::inbound::http::dishes::parse_dish_id;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

fn parse_comment_id(raw: &str) -> Result<CommentId, Error> {
    raw.parse()
        .map_err(|_| Error::invalid_request("comment id is not a valid identifier"))
}

/// List a dish's comments with hydrated authors.
#[utoipa::path(
    get,
    path = "/dishes/{dishId}/comments",
    params(("dishId" = String, Path, description = "Dish identifier")),
    responses(
        (status = 200, description = "Comments in list order"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "No such dish")
    ),
    tags = ["comments"],
    operation_id = "listComments"
)]
#[get("/{dishId}/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    authenticate_bearer(&state, &req).await?;
    let dish_id = parse_dish_id(&path)?;
    let comments = state.comments.list(&dish_id).await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// Post a comment; the caller becomes the author.
#[utoipa::path(
    post,
    path = "/dishes/{dishId}/comments",
    params(("dishId" = String, Path, description = "Dish identifier")),
    request_body = CommentDraft,
    responses(
        (status = 200, description = "Dish re-read with the new comment"),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "No such dish")
    ),
    tags = ["comments"],
    operation_id = "addComment"
)]
#[post("/{dishId}/comments")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
    payload: web::Json<CommentDraft>,
) -> ApiResult<HttpResponse> {
    let caller = authenticate_bearer(&state, &req).await?;
    let dish_id = parse_dish_id(&path)?;
    let view = state
        .comments
        .add(&dish_id, &caller, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

/// Clear a dish's comment list (admin only).
#[utoipa::path(
    delete,
    path = "/dishes/{dishId}/comments",
    params(("dishId" = String, Path, description = "Dish identifier")),
    responses(
        (status = 200, description = "Comment list emptied"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "No such dish")
    ),
    tags = ["comments"],
    operation_id = "deleteAllComments"
)]
#[delete("/{dishId}/comments")]
pub async fn delete_all_comments(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = authenticate_bearer(&state, &req).await?;
    require_admin(&caller)?;
    let dish_id = parse_dish_id(&path)?;
    let view = state.comments.delete_all(&dish_id).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// Fetch one comment with a hydrated author.
#[utoipa::path(
    get,
    path = "/dishes/{dishId}/comments/{commentId}",
    params(
        ("dishId" = String, Path, description = "Dish identifier"),
        ("commentId" = String, Path, description = "Comment identifier")
    ),
    responses(
        (status = 200, description = "The comment"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "No such dish or comment")
    ),
    tags = ["comments"],
    operation_id = "getComment"
)]
#[get("/{dishId}/comments/{commentId}")]
pub async fn get_comment(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    authenticate_bearer(&state, &req).await?;
    let (raw_dish, raw_comment) = path.into_inner();
    let dish_id = parse_dish_id(&raw_dish)?;
    let comment_id = parse_comment_id(&raw_comment)?;
    let comment = state.comments.get(&dish_id, &comment_id).await?;
    Ok(HttpResponse::Ok().json(comment))
}

/// Update the caller's own comment; only fields present in the body change.
#[utoipa::path(
    put,
    path = "/dishes/{dishId}/comments/{commentId}",
    params(
        ("dishId" = String, Path, description = "Dish identifier"),
        ("commentId" = String, Path, description = "Comment identifier")
    ),
    request_body = CommentPatch,
    responses(
        (status = 200, description = "Dish re-read with the updated comment"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Caller is not the author"),
        (status = 404, description = "No such dish or comment")
    ),
    tags = ["comments"],
    operation_id = "updateComment"
)]
#[put("/{dishId}/comments/{commentId}")]
pub async fn update_comment(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
    payload: web::Json<CommentPatch>,
) -> ApiResult<HttpResponse> {
    let caller = authenticate_bearer(&state, &req).await?;
    let (raw_dish, raw_comment) = path.into_inner();
    let dish_id = parse_dish_id(&raw_dish)?;
    let comment_id = parse_comment_id(&raw_comment)?;
    let view = state
        .comments
        .update(&dish_id, &comment_id, &caller, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

/// Delete the caller's own comment.
#[utoipa::path(
    delete,
    path = "/dishes/{dishId}/comments/{commentId}",
    params(
        ("dishId" = String, Path, description = "Dish identifier"),
        ("commentId" = String, Path, description = "Comment identifier")
    ),
    responses(
        (status = 200, description = "Dish re-read without the comment"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Caller is not the author"),
        (status = 404, description = "No such dish or comment")
    ),
    tags = ["comments"],
    operation_id = "deleteComment"
)]
#[delete("/{dishId}/comments/{commentId}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let caller = authenticate_bearer(&state, &req).await?;
    let (raw_dish, raw_comment) = path.into_inner();
    let dish_id = parse_dish_id(&raw_dish)?;
    let comment_id = parse_comment_id(&raw_comment)?;
    let view = state
        .comments
        .delete(&dish_id, &comment_id, &caller)
        .await?;
    Ok(HttpResponse::Ok().json(view))
}
