//! Favourites API handlers, scoped to the authenticated caller.
//!
//! The single add conflicts on duplicates; the batch add merges
//! idempotently. The asymmetry mirrors the observed product behaviour and
//! is covered by tests so nobody "fixes" it by accident.

use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::domain::{DishId, Error};
use crate::inbound::http::auth::authenticate_bearer;
use crate::inbound::http::dishes::parse_dish_id;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// The caller's favourites, or an explicit "none yet" result.
#[utoipa::path(
    get,
    path = "/favorites",
    responses(
        (status = 200, description = "Favourites, or null when none were ever created"),
        (status = 401, description = "Unauthenticated")
    ),
    tags = ["favorites"],
    operation_id = "getFavorites"
)]
#[get("")]
pub async fn get_favorites(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let caller = authenticate_bearer(&state, &req).await?;
    match state.favorites.get(&caller.id).await? {
        Some(view) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "status": "Favourites found",
            "favorites": view,
        }))),
        None => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "status": "You have no favourites yet",
            "favorites": null,
        }))),
    }
}

/// Batch-add dish references; already-present references are skipped.
#[utoipa::path(
    post,
    path = "/favorites",
    request_body = Vec<DishId>,
    responses(
        (status = 200, description = "Merged favourites"),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthenticated")
    ),
    tags = ["favorites"],
    operation_id = "addFavoritesBatch"
)]
#[post("")]
pub async fn add_favorites_batch(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<Vec<DishId>>,
) -> ApiResult<HttpResponse> {
    let caller = authenticate_bearer(&state, &req).await?;
    let view = state
        .favorites
        .add_batch(&caller.id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "status": "Favourites updated",
        "favorites": view,
    })))
}

/// The verb is not offered on the favourites collection.
#[utoipa::path(
    put,
    path = "/favorites",
    responses((status = 405, description = "PUT is not supported on /favorites")),
    tags = ["favorites"],
    operation_id = "putFavoritesUnsupported"
)]
#[put("")]
pub async fn put_favorites_unsupported(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    authenticate_bearer(&state, &req).await?;
    Err(Error::method_not_allowed("PUT operation is not supported on /favorites").into())
}

/// Delete the caller's whole favourites record.
#[utoipa::path(
    delete,
    path = "/favorites",
    responses(
        (status = 200, description = "Favourites record deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Nothing to delete")
    ),
    tags = ["favorites"],
    operation_id = "clearFavorites"
)]
#[delete("")]
pub async fn clear_favorites(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let caller = authenticate_bearer(&state, &req).await?;
    state.favorites.clear(&caller.id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "status": "Favourites deleted",
    })))
}

/// Report whether one dish is in the caller's favourites.
#[utoipa::path(
    get,
    path = "/favorites/{dishId}",
    params(("dishId" = String, Path, description = "Dish identifier")),
    responses(
        (status = 200, description = "Membership probe result"),
        (status = 401, description = "Unauthenticated")
    ),
    tags = ["favorites"],
    operation_id = "probeFavorite"
)]
#[get("/{dishId}")]
pub async fn probe_favorite(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = authenticate_bearer(&state, &req).await?;
    let dish_id = parse_dish_id(&path)?;
    let exists = state.favorites.contains(&caller.id, &dish_id).await?;
    let favorites = state.favorites.get(&caller.id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "exists": exists,
        "favorites": favorites,
    })))
}

/// Add one dish reference; a duplicate is a conflict, never a no-op.
#[utoipa::path(
    post,
    path = "/favorites/{dishId}",
    params(("dishId" = String, Path, description = "Dish identifier")),
    responses(
        (status = 200, description = "Updated favourites"),
        (status = 401, description = "Unauthenticated"),
        (status = 409, description = "Already favourited")
    ),
    tags = ["favorites"],
    operation_id = "addFavorite"
)]
#[post("/{dishId}")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = authenticate_bearer(&state, &req).await?;
    let dish_id = parse_dish_id(&path)?;
    let view = state.favorites.add(&caller.id, dish_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "status": "Favourite added",
        "favorites": view,
    })))
}

/// Remove one dish reference.
#[utoipa::path(
    delete,
    path = "/favorites/{dishId}",
    params(("dishId" = String, Path, description = "Dish identifier")),
    responses(
        (status = 200, description = "Updated favourites"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "No record or no such entry")
    ),
    tags = ["favorites"],
    operation_id = "removeFavorite"
)]
#[delete("/{dishId}")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = authenticate_bearer(&state, &req).await?;
    let dish_id = parse_dish_id(&path)?;
    let view = state.favorites.remove(&caller.id, &dish_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "status": "Favourite removed",
        "favorites": view,
    })))
}
