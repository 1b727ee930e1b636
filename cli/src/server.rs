use std::sync::{Arc, Mutex};

use anyhow::Context;
use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use rand::Rng;
use serde::Deserialize;
use tower_http::limit::RequestBodyLimitLayer;

use ladle_core::db::Database;
use ladle_core::models::{NewRecipe, Recipe, placeholder_photo};

const BODY_LIMIT: usize = 1024 * 1024; // 1 MB — form posts only

#[derive(Clone)]
struct AppState {
    db: Arc<Mutex<Database>>,
}

// --- Request types ---

// Browsers omit unchecked fields entirely, so everything defaults to
// the empty string and presence checks happen in the handler.
#[derive(Deserialize)]
struct AddRecipeForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    ingredients: String,
    #[serde(default)]
    steps: String,
    #[serde(default)]
    photo: String,
}

// --- Views ---

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    recipes: Vec<Recipe>,
    picked: Option<Recipe>,
}

fn render_listing(recipes: Vec<Recipe>, picked: Option<Recipe>) -> Result<Html<String>, ApiError> {
    let html = IndexTemplate { recipes, picked }
        .render()
        .context("failed to render listing")?;
    Ok(Html(html))
}

/// 302 back to the listing, shared by every mutating route.
fn redirect_home() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

// --- Error handling ---

enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Internal(err) => {
                eprintln!("Internal server error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, message).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

// --- Middleware ---

async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    // Recipe photos point at arbitrary remote hosts, so img-src stays open.
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static(
            "default-src 'none'; img-src * data:; style-src 'unsafe-inline'; form-action 'self'",
        ),
    );
    response
}

// --- Handlers ---

async fn home(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let recipes = {
        let db = state
            .db
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        db.list_recipes().context("database error")?
    };
    render_listing(recipes, None)
}

async fn add_recipe(
    State(state): State<AppState>,
    Form(form): Form<AddRecipeForm>,
) -> Result<Response, ApiError> {
    if form.title.is_empty() {
        return Err(ApiError::BadRequest(
            "Error: Title is required".to_string(),
        ));
    }

    let photo = if form.photo.is_empty() {
        placeholder_photo(&form.title)
    } else {
        form.photo
    };

    let new_recipe = NewRecipe {
        title: form.title,
        photo,
        ingredients: form.ingredients,
        steps: form.steps,
    };

    {
        let db = state
            .db
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        db.insert_recipe(&new_recipe)
            .context("failed to insert recipe")?;
    }

    Ok(redirect_home())
}

async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let db = state
        .db
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    if db.delete_recipe(id).context("database error")? {
        Ok(redirect_home())
    } else {
        Err(ApiError::NotFound(format!("Recipe {id} not found")))
    }
}

async fn surprise(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let recipes = {
        let db = state
            .db
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        db.list_recipes().context("database error")?
    };

    let picked = if recipes.is_empty() {
        None
    } else {
        let index = rand::rng().random_range(0..recipes.len());
        Some(recipes[index].clone())
    };

    render_listing(recipes, picked)
}

// --- Router builder ---

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/add", post(add_recipe))
        .route("/delete/{id}", get(delete_recipe))
        .route("/surprise", get(surprise))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(middleware::from_fn(security_headers))
        .with_state(state)
}

// --- Server startup ---

pub async fn start_server(db: Database, port: u16, bind: &str) -> anyhow::Result<()> {
    let state = AppState {
        db: Arc::new(Mutex::new(db)),
    };

    let app = build_router(state);

    if bind != "127.0.0.1" && bind != "localhost" {
        eprintln!(
            "Warning: Listening on {bind}. Anyone on your network can add and delete recipes."
        );
    }

    let listener = tokio::net::TcpListener::bind(format!("{bind}:{port}")).await?;
    eprintln!("Listening on http://{bind}:{port}");
    axum::serve(listener, app).await?;

    Ok(())
}
