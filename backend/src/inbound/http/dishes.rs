//! Dish catalogue API handlers.
//!
//! Reads are open to any authenticated caller; every mutation is
//! admin-gated. Dish-level admin operations deliberately bypass ownership,
//! unlike comment edits.

use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::domain::{require_admin, DishDraft, DishId, DishPatch, Error};
use crate::inbound::http::auth::authenticate_bearer;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

pub(crate) fn parse_dish_id(raw: &str) -> Result<DishId, Error> {
    raw.parse()
        .map_err(|_| Error::invalid_request("dish id is not a valid identifier"))
}

/// List the catalogue.
#[utoipa::path(
    get,
    path = "/dishes",
    responses(
        (status = 200, description = "Dishes with hydrated comments"),
        (status = 401, description = "Unauthenticated")
    ),
    tags = ["dishes"],
    operation_id = "listDishes"
)]
#[get("")]
pub async fn list_dishes(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    authenticate_bearer(&state, &req).await?;
    let dishes = state.catalogue.list().await?;
    Ok(HttpResponse::Ok().json(dishes))
}

/// Create a dish (admin only).
#[utoipa::path(
    post,
    path = "/dishes",
    request_body = DishDraft,
    responses(
        (status = 200, description = "Dish created"),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an administrator"),
        (status = 409, description = "Duplicate dish name")
    ),
    tags = ["dishes"],
    operation_id = "createDish"
)]
#[post("")]
pub async fn create_dish(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<DishDraft>,
) -> ApiResult<HttpResponse> {
    let caller = authenticate_bearer(&state, &req).await?;
    require_admin(&caller)?;
    let view = state.catalogue.create(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// The verb is not offered on the collection.
#[utoipa::path(
    put,
    path = "/dishes",
    responses((status = 405, description = "PUT is not supported on /dishes")),
    tags = ["dishes"],
    operation_id = "putDishesUnsupported"
)]
#[put("")]
pub async fn put_dishes_unsupported(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    authenticate_bearer(&state, &req).await?;
    Err(Error::method_not_allowed("PUT operation is not supported on /dishes").into())
}

/// Delete every dish (admin only).
#[utoipa::path(
    delete,
    path = "/dishes",
    responses(
        (status = 200, description = "Catalogue cleared"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an administrator")
    ),
    tags = ["dishes"],
    operation_id = "deleteAllDishes"
)]
#[delete("")]
pub async fn delete_all_dishes(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let caller = authenticate_bearer(&state, &req).await?;
    require_admin(&caller)?;
    state.catalogue.clear().await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "status": "All dishes have been deleted",
    })))
}

/// Fetch one dish with hydrated comments.
#[utoipa::path(
    get,
    path = "/dishes/{dishId}",
    params(("dishId" = String, Path, description = "Dish identifier")),
    responses(
        (status = 200, description = "The dish"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "No such dish")
    ),
    tags = ["dishes"],
    operation_id = "getDish"
)]
#[get("/{dishId}")]
pub async fn get_dish(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    authenticate_bearer(&state, &req).await?;
    let dish_id = parse_dish_id(&path)?;
    let view = state.catalogue.get(&dish_id).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// The verb is not offered on a single dish.
#[utoipa::path(
    post,
    path = "/dishes/{dishId}",
    params(("dishId" = String, Path, description = "Dish identifier")),
    responses((status = 405, description = "POST is not supported on /dishes/{dishId}")),
    tags = ["dishes"],
    operation_id = "postDishUnsupported"
)]
#[post("/{dishId}")]
pub async fn post_dish_unsupported(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    authenticate_bearer(&state, &req).await?;
    let raw = path.into_inner();
    Err(Error::method_not_allowed(format!(
        "POST operation is not supported on /dishes/{raw}"
    ))
    .into())
}

/// Update a dish (admin only); only fields present in the body change.
#[utoipa::path(
    put,
    path = "/dishes/{dishId}",
    params(("dishId" = String, Path, description = "Dish identifier")),
    request_body = DishPatch,
    responses(
        (status = 200, description = "Updated dish"),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "No such dish")
    ),
    tags = ["dishes"],
    operation_id = "updateDish"
)]
#[put("/{dishId}")]
pub async fn update_dish(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
    payload: web::Json<DishPatch>,
) -> ApiResult<HttpResponse> {
    let caller = authenticate_bearer(&state, &req).await?;
    require_admin(&caller)?;
    let dish_id = parse_dish_id(&path)?;
    let view = state.catalogue.update(&dish_id, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// Delete one dish (admin only).
#[utoipa::path(
    delete,
    path = "/dishes/{dishId}",
    params(("dishId" = String, Path, description = "Dish identifier")),
    responses(
        (status = 200, description = "Dish deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "No such dish")
    ),
    tags = ["dishes"],
    operation_id = "deleteDish"
)]
#[delete("/{dishId}")]
pub async fn delete_dish(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = authenticate_bearer(&state, &req).await?;
    require_admin(&caller)?;
    let dish_id = parse_dish_id(&path)?;
    state.catalogue.delete(&dish_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "status": "Dish deleted",
    })))
}
