/// A persisted recipe. `id` is assigned by the store, increases
/// monotonically, and is never reused after deletion.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub photo: String,
    pub ingredients: String,
    pub steps: String,
}

/// Fields for a recipe about to be stored. Validation (a non-empty
/// title, the photo fallback) happens at the caller; the store takes
/// these verbatim.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub title: String,
    pub photo: String,
    pub ingredients: String,
    pub steps: String,
}

const PLACEHOLDER_PHOTO_BASE: &str =
    "https://images.unsplash.com/photo-1504674900247-0877df9cc836?auto=format&fit=crop&w=800&q=60&";

/// Fallback image URL for recipes submitted without a photo.
///
/// A fixed stock-photo URL with the title appended as a trailing query
/// fragment — the same title always maps to the same URL. Not expected
/// to resolve to a title-specific image; it just has to be a stable,
/// displayable URL.
#[must_use]
pub fn placeholder_photo(title: &str) -> String {
    format!("{PLACEHOLDER_PHOTO_BASE}{title}")
}
