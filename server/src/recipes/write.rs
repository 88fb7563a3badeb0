//! Creating, updating and deleting a recipe together with its ingredients,
//! steps and taxonomy links. Every entry point runs in one transaction.

use chrono::Utc;
use diesel::prelude::*;
use platter_core::recipe::{
    plan_ingredients, plan_steps, validate_description, validate_minutes, validate_servings,
    validate_title,
};
use platter_core::taxonomy::{normalize_name, normalize_names};
use platter_core::{DraftError, IngredientLine, PlannedIngredient, PlannedStep, StepInput, TermKind};
use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ApiError, FieldErrors};
use crate::models::{NewRecipe, NewRecipeIngredient, NewRecipeStep, RecipeChangeset};
use crate::schema::{photos, recipe_ingredients, recipe_steps, recipes};

use super::terms;

/// Payload for creating a recipe.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<Uuid>,
    /// Region name; created if it does not exist yet
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub session: Vec<String>,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default, rename = "type")]
    pub kind: Vec<String>,
    pub ingredients: Vec<IngredientLine>,
    #[serde(default)]
    pub steps: Vec<StepInput>,
    #[serde(default)]
    pub servings: Option<i32>,
    #[serde(default)]
    pub prep_time: Option<i32>,
    #[serde(default)]
    pub cook_time: Option<i32>,
    #[serde(default)]
    pub is_published: Option<bool>,
}

/// Payload for updating a recipe. Absent fields are left alone; a present
/// list replaces the stored one, and an empty list clears it. `image` and
/// `region` may be `null` to clear them.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub image: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub region: Option<Option<String>>,
    pub session: Option<Vec<String>>,
    pub category: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub kind: Option<Vec<String>>,
    pub ingredients: Option<Vec<IngredientLine>>,
    pub steps: Option<Vec<StepInput>>,
    pub servings: Option<i32>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub is_published: Option<bool>,
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field
/// (`None`, via `#[serde(default)]`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A validated create payload.
#[derive(Debug, Clone)]
pub struct PlannedRecipe {
    pub title: String,
    pub description: String,
    pub image: Option<Uuid>,
    pub region: Option<String>,
    pub sessions: Vec<String>,
    pub categories: Vec<String>,
    pub types: Vec<String>,
    pub ingredients: Vec<PlannedIngredient>,
    pub steps: Vec<PlannedStep>,
    pub servings: i32,
    pub prep_time: i32,
    pub cook_time: i32,
    pub is_published: bool,
}

/// A validated update payload.
#[derive(Debug, Clone, Default)]
pub struct PlannedChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<Option<Uuid>>,
    pub region: Option<Option<String>>,
    pub sessions: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    pub types: Option<Vec<String>>,
    pub ingredients: Option<Vec<PlannedIngredient>>,
    pub steps: Option<Vec<PlannedStep>>,
    pub servings: Option<i32>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub is_published: Option<bool>,
}

/// Accumulates field errors so one response can report all of them.
#[derive(Default)]
struct Collector(FieldErrors);

impl Collector {
    fn check<T>(&mut self, result: Result<T, DraftError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.0
                    .entry(err.field.to_string())
                    .or_default()
                    .push(err.message);
                None
            }
        }
    }

    fn finish<T>(self, value: T) -> Result<T, ApiError> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(ApiError::fields(self.0))
        }
    }
}

fn term_list(kind: TermKind, names: &[String]) -> Result<Vec<String>, DraftError> {
    normalize_names(kind, names).map_err(|e| DraftError::new(kind.field(), e.to_string()))
}

fn region_name(name: &str) -> Result<String, DraftError> {
    normalize_name(TermKind::Region, name).map_err(|e| DraftError::new("region", e.to_string()))
}

impl RecipeDraft {
    pub fn plan(&self) -> Result<PlannedRecipe, ApiError> {
        let mut c = Collector::default();

        let title = c.check(validate_title(&self.title));
        c.check(validate_description(&self.description));
        let region = match self.region.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => c.check(region_name(name)).map(Some),
            _ => Some(None),
        };
        let sessions = c.check(term_list(TermKind::Session, &self.session));
        let categories = c.check(term_list(TermKind::Category, &self.category));
        let types = c.check(term_list(TermKind::Type, &self.kind));
        let ingredients = c.check(plan_ingredients(&self.ingredients));
        let steps = c.check(plan_steps(&self.steps));
        let servings = self.servings.unwrap_or(1);
        c.check(validate_servings(servings));
        let prep_time = self.prep_time.unwrap_or(0);
        c.check(validate_minutes("prep_time", prep_time));
        let cook_time = self.cook_time.unwrap_or(0);
        c.check(validate_minutes("cook_time", cook_time));

        match (title, region, sessions, categories, types, ingredients, steps) {
            (
                Some(title),
                Some(region),
                Some(sessions),
                Some(categories),
                Some(types),
                Some(ingredients),
                Some(steps),
            ) => c.finish(PlannedRecipe {
                title,
                description: self.description.clone(),
                image: self.image,
                region,
                sessions,
                categories,
                types,
                ingredients,
                steps,
                servings,
                prep_time,
                cook_time,
                is_published: self.is_published.unwrap_or(true),
            }),
            _ => Err(ApiError::fields(c.0)),
        }
    }
}

impl RecipeChanges {
    pub fn plan(&self) -> Result<PlannedChanges, ApiError> {
        let mut c = Collector::default();
        let mut planned = PlannedChanges {
            image: self.image,
            servings: self.servings,
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            is_published: self.is_published,
            ..Default::default()
        };

        if let Some(title) = &self.title {
            planned.title = c.check(validate_title(title));
        }
        if let Some(description) = &self.description {
            if c.check(validate_description(description)).is_some() {
                planned.description = Some(description.clone());
            }
        }
        planned.region = match &self.region {
            None => None,
            Some(None) => Some(None),
            Some(Some(name)) if name.trim().is_empty() => Some(None),
            Some(Some(name)) => c.check(region_name(name)).map(Some),
        };
        if let Some(names) = &self.session {
            planned.sessions = c.check(term_list(TermKind::Session, names));
        }
        if let Some(names) = &self.category {
            planned.categories = c.check(term_list(TermKind::Category, names));
        }
        if let Some(names) = &self.kind {
            planned.types = c.check(term_list(TermKind::Type, names));
        }
        if let Some(lines) = &self.ingredients {
            planned.ingredients = c.check(plan_ingredients(lines));
        }
        if let Some(steps) = &self.steps {
            planned.steps = c.check(plan_steps(steps));
        }
        if let Some(servings) = self.servings {
            c.check(validate_servings(servings));
        }
        if let Some(minutes) = self.prep_time {
            c.check(validate_minutes("prep_time", minutes));
        }
        if let Some(minutes) = self.cook_time {
            c.check(validate_minutes("cook_time", minutes));
        }

        c.finish(planned)
    }
}

/// Every photo a payload references must have been uploaded by its author.
fn check_photo_owner(
    conn: &mut PgConnection,
    user_id: Uuid,
    field: &str,
    ids: &[Uuid],
) -> Result<(), ApiError> {
    let mut ids = ids.to_vec();
    ids.sort();
    ids.dedup();
    if ids.is_empty() {
        return Ok(());
    }
    let expected = ids.len();
    let owned: i64 = photos::table
        .filter(photos::id.eq_any(ids))
        .filter(photos::user_id.eq(user_id))
        .count()
        .get_result(conn)?;
    if owned as usize != expected {
        return Err(ApiError::field(field, "Unknown photo."));
    }
    Ok(())
}

fn step_photos(steps: &[PlannedStep]) -> Vec<Uuid> {
    steps.iter().filter_map(|s| s.image).collect()
}

fn insert_ingredients(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    lines: &[PlannedIngredient],
) -> QueryResult<()> {
    if lines.is_empty() {
        return Ok(());
    }
    let rows: Vec<NewRecipeIngredient> = lines
        .iter()
        .map(|line| NewRecipeIngredient {
            recipe_id,
            position: line.position,
            ingredient: &line.ingredient,
            quantity: &line.quantity,
        })
        .collect();
    diesel::insert_into(recipe_ingredients::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

fn insert_steps(conn: &mut PgConnection, recipe_id: Uuid, steps: &[PlannedStep]) -> QueryResult<()> {
    if steps.is_empty() {
        return Ok(());
    }
    let rows: Vec<NewRecipeStep> = steps
        .iter()
        .map(|step| NewRecipeStep {
            recipe_id,
            position: step.position,
            step_no: step.step_no,
            instruction: &step.instruction,
            timer: step.timer.as_deref(),
            image: step.image,
        })
        .collect();
    diesel::insert_into(recipe_steps::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

fn link_terms(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    kind: TermKind,
    names: &[String],
) -> QueryResult<()> {
    let ids = terms::resolve_all(conn, kind, names)?;
    terms::replace_links(conn, recipe_id, kind, &ids)
}

/// Create a recipe and everything hanging off it. Returns the new id.
pub fn create_recipe(
    conn: &mut PgConnection,
    author_id: Uuid,
    planned: &PlannedRecipe,
) -> Result<Uuid, ApiError> {
    conn.transaction::<_, ApiError, _>(|conn| {
        check_photo_owner(conn, author_id, "image", planned.image.as_slice())?;
        check_photo_owner(conn, author_id, "steps", &step_photos(&planned.steps))?;

        let region_id = planned
            .region
            .as_deref()
            .map(|name| terms::resolve(conn, TermKind::Region, name))
            .transpose()?;

        let recipe_id: Uuid = diesel::insert_into(recipes::table)
            .values(&NewRecipe {
                author_id,
                title: &planned.title,
                description: &planned.description,
                image: planned.image,
                region_id,
                is_published: planned.is_published,
                servings: planned.servings,
                prep_time: planned.prep_time,
                cook_time: planned.cook_time,
            })
            .returning(recipes::id)
            .get_result(conn)?;

        link_terms(conn, recipe_id, TermKind::Session, &planned.sessions)?;
        link_terms(conn, recipe_id, TermKind::Category, &planned.categories)?;
        link_terms(conn, recipe_id, TermKind::Type, &planned.types)?;
        insert_ingredients(conn, recipe_id, &planned.ingredients)?;
        insert_steps(conn, recipe_id, &planned.steps)?;

        Ok(recipe_id)
    })
}

/// Lock the recipe row and check that `user_id` wrote it.
fn lock_owned(conn: &mut PgConnection, recipe_id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
    let author_id: Option<Uuid> = recipes::table
        .find(recipe_id)
        .select(recipes::author_id)
        .for_update()
        .first(conn)
        .optional()?;
    match author_id {
        None => Err(ApiError::NotFound("Recipe not found".to_string())),
        Some(author) if author != user_id => Err(ApiError::Forbidden(
            "You do not have permission to edit this recipe".to_string(),
        )),
        Some(_) => Ok(()),
    }
}

/// Apply a validated update. Only the author may update.
pub fn update_recipe(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    user_id: Uuid,
    changes: &PlannedChanges,
) -> Result<(), ApiError> {
    conn.transaction::<_, ApiError, _>(|conn| {
        lock_owned(conn, recipe_id, user_id)?;

        if let Some(image) = changes.image {
            check_photo_owner(conn, user_id, "image", image.as_slice())?;
        }
        if let Some(steps) = &changes.steps {
            check_photo_owner(conn, user_id, "steps", &step_photos(steps))?;
        }

        let region_id = match &changes.region {
            None => None,
            Some(None) => Some(None),
            Some(Some(name)) => Some(Some(terms::resolve(conn, TermKind::Region, name)?)),
        };

        diesel::update(recipes::table.find(recipe_id))
            .set(&RecipeChangeset {
                title: changes.title.as_deref(),
                description: changes.description.as_deref(),
                image: changes.image,
                region_id,
                is_published: changes.is_published,
                servings: changes.servings,
                prep_time: changes.prep_time,
                cook_time: changes.cook_time,
                updated_at: Some(Utc::now()),
            })
            .execute(conn)?;

        if let Some(names) = &changes.sessions {
            link_terms(conn, recipe_id, TermKind::Session, names)?;
        }
        if let Some(names) = &changes.categories {
            link_terms(conn, recipe_id, TermKind::Category, names)?;
        }
        if let Some(names) = &changes.types {
            link_terms(conn, recipe_id, TermKind::Type, names)?;
        }
        if let Some(lines) = &changes.ingredients {
            diesel::delete(
                recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
            )
            .execute(conn)?;
            insert_ingredients(conn, recipe_id, lines)?;
        }
        if let Some(steps) = &changes.steps {
            diesel::delete(recipe_steps::table.filter(recipe_steps::recipe_id.eq(recipe_id)))
                .execute(conn)?;
            insert_steps(conn, recipe_id, steps)?;
        }

        Ok(())
    })
}

/// Delete a recipe. Children go with it through `ON DELETE CASCADE`.
pub fn delete_recipe(conn: &mut PgConnection, recipe_id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
    conn.transaction::<_, ApiError, _>(|conn| {
        lock_owned(conn, recipe_id, user_id)?;
        diesel::delete(recipes::table.find(recipe_id)).execute(conn)?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> RecipeDraft {
        serde_json::from_value(serde_json::json!({
            "title": "  Chana Masala ",
            "description": "Chickpeas in a spiced tomato gravy",
            "region": "Indian",
            "session": ["Lunch", "Dinner", "Lunch"],
            "type": ["Main"],
            "ingredients": [
                {"ingredient": "Chickpeas", "quantity": "2 cups"},
                {"ingredient": "Onion", "quantity": "1"}
            ],
            "steps": [
                {"instruction": "Soak chickpeas"},
                {"step_no": 5, "instruction": "Simmer", "timer": "20 min"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_draft_plan_normalizes() {
        let planned = draft().plan().unwrap();
        assert_eq!(planned.title, "Chana Masala");
        assert_eq!(planned.region.as_deref(), Some("Indian"));
        assert_eq!(planned.sessions, vec!["Lunch", "Dinner"]);
        assert_eq!(planned.types, vec!["Main"]);
        assert!(planned.categories.is_empty());
        assert_eq!(planned.steps[0].step_no, 1);
        assert_eq!(planned.steps[1].step_no, 5);
        assert_eq!(planned.servings, 1);
        assert!(planned.is_published);
    }

    #[test]
    fn test_draft_collects_every_field_error() {
        let mut bad = draft();
        bad.title = " ".into();
        bad.session = vec!["".into()];
        bad.servings = Some(0);
        let err = bad.plan().unwrap_err();
        match err {
            ApiError::Validation {
                fields: Some(fields),
                ..
            } => {
                assert!(fields.contains_key("title"));
                assert!(fields.contains_key("session"));
                assert!(fields.contains_key("servings"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_blank_region_means_none() {
        let mut d = draft();
        d.region = Some("   ".into());
        assert_eq!(d.plan().unwrap().region, None);
    }

    #[test]
    fn test_changes_distinguish_absent_null_and_empty() {
        let changes: RecipeChanges = serde_json::from_value(serde_json::json!({
            "image": null,
            "session": [],
        }))
        .unwrap();
        assert_eq!(changes.image, Some(None));
        assert_eq!(changes.region, None);
        let planned = changes.plan().unwrap();
        assert_eq!(planned.sessions, Some(vec![]));
        assert_eq!(planned.categories, None);
        assert_eq!(planned.ingredients, None);
    }

    #[test]
    fn test_changes_validate_present_fields_only() {
        let changes: RecipeChanges = serde_json::from_value(serde_json::json!({
            "title": "",
            "cook_time": -5,
        }))
        .unwrap();
        match changes.plan().unwrap_err() {
            ApiError::Validation {
                fields: Some(fields),
                ..
            } => {
                assert!(fields.contains_key("title"));
                assert!(fields.contains_key("cook_time"));
                assert_eq!(fields.len(), 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
