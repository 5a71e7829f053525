//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use shop_core::PageRequest;

use crate::db::{BlogRepository, ProductRepository};
use crate::filters;
use crate::middleware::Preferences;
use crate::routes::views::{PageContext, PostCardView, ProductCardView};
use crate::state::AppState;

/// Products shown in the "New arrivals" strip.
const FEATURED_PRODUCTS: u32 = 8;

/// Posts shown in the "From the blog" strip.
const RECENT_POSTS: u32 = 3;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub products: Vec<ProductCardView>,
    pub posts: Vec<PostCardView>,
}

/// Display the home page.
///
/// Either strip is left empty when its query fails.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>, prefs: Preferences) -> impl IntoResponse {
    let products = match ProductRepository::new(state.pool())
        .newest(prefs.language, FEATURED_PRODUCTS)
        .await
    {
        Ok(cards) => cards
            .into_iter()
            .map(|card| ProductCardView::new(card, prefs.currency))
            .collect(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load featured products");
            Vec::new()
        }
    };

    let page = PageRequest {
        page: 1,
        limit: RECENT_POSTS,
    };
    let posts = match BlogRepository::new(state.pool())
        .list_published(prefs.language, page)
        .await
    {
        Ok(list) => list
            .data
            .iter()
            .map(|post| PostCardView::new(post, prefs.language))
            .collect(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load recent posts");
            Vec::new()
        }
    };

    HomeTemplate {
        page: PageContext::new(prefs),
        products,
        posts,
    }
}
