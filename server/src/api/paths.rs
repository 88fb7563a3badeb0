//! Route table. Every handler is mounted at exactly one of these.

pub const SIGNUP: &str = "/api/user/signup";
pub const SIGNIN: &str = "/api/user/signin";
pub const TOKEN_REFRESH: &str = "/api/user/token/refresh";
pub const PROFILE: &str = "/api/user/profile";
pub const CHANGE_PASSWORD: &str = "/api/user/change-password";
pub const DEACTIVATE: &str = "/api/user/deactivate";
pub const REACTIVATE: &str = "/api/user/reactivate";
pub const DELETE_ACCOUNT: &str = "/api/user/delete";
pub const PASSWORD_RESET: &str = "/api/user/password-reset";
pub const PASSWORD_RESET_CONFIRM: &str = "/api/user/password-reset/confirm";

pub const LIST: &str = "/api/list";
pub const TOP_RECIPES: &str = "/api/top-recipes";
pub const MY_RECIPES: &str = "/api/my-recipes";
pub const SAVED_RECIPES: &str = "/api/saved-recipes";
pub const RECIPE: &str = "/api/recipe/{id}";
pub const RECIPE_LIKE: &str = "/api/recipe/{id}/like";
pub const RECIPE_SAVE: &str = "/api/recipe/{id}/save";
pub const CREATE: &str = "/api/create";
pub const UPDATE: &str = "/api/{id}/update";
pub const DELETE: &str = "/api/{id}/delete";

pub const RECIPE_COMMENTS: &str = "/api/recipe/{id}/comments";
pub const COMMENT: &str = "/api/comments/{id}";

pub const FILTERS: &str = "/api/filters";
pub const OPTIONS: &str = "/api/options";
pub const REGIONS: &str = "/api/regions";
pub const REGION: &str = "/api/regions/{id}";
pub const SESSIONS: &str = "/api/sessions";
pub const SESSION: &str = "/api/sessions/{id}";
pub const CATEGORIES: &str = "/api/categories";
pub const CATEGORY: &str = "/api/categories/{id}";
pub const TYPES: &str = "/api/types";
pub const TYPE: &str = "/api/types/{id}";

pub const FEEDBACK: &str = "/api/feedback";

pub const PHOTOS: &str = "/api/photos";
pub const PHOTO: &str = "/api/photos/{id}";
pub const PHOTO_THUMBNAIL: &str = "/api/photos/{id}/thumbnail";

/// Fill the `{id}` segment of a route.
pub fn with_id(path: &str, id: impl std::fmt::Display) -> String {
    path.replace("{id}", &id.to_string())
}
