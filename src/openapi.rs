//! OpenAPI documentation
//!
//! The document is generated from the `#[utoipa::path]` annotations on the
//! handlers and served as JSON at `/openapi.json`. `/swagger-ui` serves a
//! Swagger UI page that loads its assets from the jsDelivr CDN and points
//! at that document.

use axum::{Json, Router, response::Html, routing::get};
use utoipa::OpenApi;

use crate::dto::{
    AccessTokenResponse, CreateItemDto, CreateStoreDto, CreateTagDto, ItemResponse, ItemTagResponse,
    MessageResponse, StoreResponse, TagResponse, TokenPairResponse, UpdateItemDto, UpdateStoreDto,
    UpdateTagDto, UserCredentialsDto, UserResponse,
};
use crate::errors::{AuthErrorBody, ErrorBody};
use crate::handlers::{item_handlers, store_handlers, tag_handlers, user_handlers};
use crate::models::{Item, Store, Tag};

pub const OPENAPI_PATH: &str = "/openapi.json";
pub const SWAGGER_UI_PATH: &str = "/swagger-ui";
const SWAGGER_UI_CDN: &str = "https://cdn.jsdelivr.net/npm/swagger-ui-dist/";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stores REST API",
        version = "v1",
        description = "Stores, the items they sell and the tags that group them"
    ),
    tags(
        (name = "stores", description = "Store management"),
        (name = "items", description = "Items sold by stores"),
        (name = "tags", description = "Store-scoped tags and item links"),
        (name = "users", description = "Registration, login and token lifecycle")
    ),
    paths(
        store_handlers::list_stores_handler,
        store_handlers::create_store_handler,
        store_handlers::get_store_handler,
        store_handlers::update_store_handler,
        store_handlers::delete_store_handler,
        item_handlers::list_items_handler,
        item_handlers::create_item_handler,
        item_handlers::get_item_handler,
        item_handlers::update_item_handler,
        item_handlers::delete_item_handler,
        tag_handlers::list_tags_handler,
        tag_handlers::list_tags_in_store_handler,
        tag_handlers::create_tag_in_store_handler,
        tag_handlers::get_tag_handler,
        tag_handlers::update_tag_handler,
        tag_handlers::delete_tag_handler,
        tag_handlers::link_tag_to_item_handler,
        tag_handlers::unlink_tag_from_item_handler,
        user_handlers::register_handler,
        user_handlers::login_handler,
        user_handlers::refresh_handler,
        user_handlers::logout_handler,
        user_handlers::list_users_handler,
        user_handlers::get_user_handler,
        user_handlers::delete_user_handler
    ),
    components(schemas(
        Store, Item, Tag,
        CreateStoreDto, UpdateStoreDto, CreateItemDto, UpdateItemDto, CreateTagDto, UpdateTagDto,
        UserCredentialsDto,
        StoreResponse, ItemResponse, TagResponse, ItemTagResponse, UserResponse,
        MessageResponse, TokenPairResponse, AccessTokenResponse,
        ErrorBody, AuthErrorBody
    )),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the bearer JWT scheme referenced by the protected paths
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

fn swagger_ui_html() -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Stores REST API</title>
  <link rel="stylesheet" href="{cdn}swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="{cdn}swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {{
      window.ui = SwaggerUIBundle({{ url: "{doc_url}", dom_id: "#swagger-ui" }});
    }};
  </script>
</body>
</html>"##,
        cdn = SWAGGER_UI_CDN,
        doc_url = OPENAPI_PATH,
    )
}

/// Create OpenAPI documentation routes
///
/// Adds the following routes:
/// - `/openapi.json` - OpenAPI document
/// - `/swagger-ui` - Swagger UI page
pub fn docs_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let page = swagger_ui_html();

    Router::new()
        .route(OPENAPI_PATH, get(|| async { Json(ApiDoc::openapi()) }))
        .route(SWAGGER_UI_PATH, get(move || async move { Html(page) }))
}
