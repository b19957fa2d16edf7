//! Public OpenAPI surface used by Swagger UI and tooling.

use utoipa::OpenApi;

use crate::inbound::http::{comments, dishes, favorites, users};

/// Aggregated OpenAPI document for the REST endpoints.
#[derive(OpenApi)]
#[openapi(
    paths(
        users::signup,
        users::login,
        users::logout,
        users::check_token,
        users::oauth_callback,
        dishes::list_dishes,
        dishes::create_dish,
        dishes::put_dishes_unsupported,
        dishes::delete_all_dishes,
        dishes::get_dish,
        dishes::post_dish_unsupported,
        dishes::update_dish,
        dishes::delete_dish,
        comments::list_comments,
        comments::add_comment,
        comments::delete_all_comments,
        comments::get_comment,
        comments::update_comment,
        comments::delete_comment,
        favorites::get_favorites,
        favorites::add_favorites_batch,
        favorites::put_favorites_unsupported,
        favorites::clear_favorites,
        favorites::probe_favorite,
        favorites::add_favorite,
        favorites::remove_favorite,
    ),
    components(schemas(
        users::SignupRequest,
        users::LoginRequest,
        crate::domain::DishDraft,
        crate::domain::DishPatch,
        crate::domain::CommentDraft,
        crate::domain::CommentPatch,
        crate::domain::DishView,
        crate::domain::CommentView,
        crate::domain::DishSummary,
        crate::domain::FavoritesView,
        crate::domain::PublicProfile,
        crate::domain::DishId,
        crate::domain::ErrorCode,
    )),
    tags(
        (name = "users", description = "Signup, login, sessions, tokens, and OAuth exchange"),
        (name = "dishes", description = "Dish catalogue"),
        (name = "comments", description = "Comments nested under a dish"),
        (name = "favorites", description = "Per-user favourites")
    )
)]
pub struct ApiDoc;
