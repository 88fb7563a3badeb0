pub mod email;
pub mod error;
pub mod filters;
pub mod image;
pub mod password;
pub mod recipe;
pub mod reset_token;
pub mod taxonomy;
pub mod uid;

pub use error::{DraftError, PasswordPolicyError, ResetTokenError, TermNameError, UidError};
pub use filters::{ListParams, Ordering, RecipeFilter};
pub use recipe::{IngredientLine, PlannedIngredient, PlannedStep, StepInput};
pub use reset_token::{ResetTokenGenerator, TokenSubject};
pub use taxonomy::TermKind;
