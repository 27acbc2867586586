use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{JwtError, TokenKeys};
use crate::config::AppConfig;
use crate::database::PostStore;
use crate::handlers::{comments, likes, posts, root};
use crate::middleware::jwt_auth_middleware;
use crate::services::PostService;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: TokenKeys,
    pub store: Arc<dyn PostStore>,
    pub posts: PostService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn PostStore>) -> Result<Self, JwtError> {
        let keys = TokenKeys::from_config(&config.security)?;
        Ok(Self {
            config: Arc::new(config),
            keys,
            posts: PostService::new(store.clone()),
            store,
        })
    }
}

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let request_logging = state.config.api.enable_request_logging;

    let router = Router::new()
        // Public
        .route("/", get(root::root))
        .route("/health", get(root::health))
        .merge(public_post_routes())
        .merge(protected_post_routes(state.clone()))
        .layer(cors);

    let router = if request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn public_post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(posts::list))
        .route("/posts/user/:user_id", get(posts::list_by_user))
        .route("/posts/:id", get(posts::get))
}

fn protected_post_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/posts", post(posts::create))
        .route("/posts/:id", put(posts::update).delete(posts::delete))
        .route("/posts/:id/like", post(likes::toggle))
        .route("/posts/:id/comment", post(comments::create))
        .route("/posts/:id/comment/:comment_id", delete(comments::delete))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
