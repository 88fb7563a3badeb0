//! Validation and planning for the parts of a recipe payload that become
//! child rows: ingredient lines and ordered steps.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DraftError;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_INGREDIENT_LEN: usize = 100;
pub const MAX_QUANTITY_LEN: usize = 100;
pub const MAX_TIMER_LEN: usize = 50;

/// One `{ingredient, quantity}` pair as sent and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct IngredientLine {
    pub ingredient: String,
    pub quantity: String,
}

/// A step as sent by the client. `step_no` may be omitted, in which case
/// the step's 1-based position in the list is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StepInput {
    #[serde(default)]
    pub step_no: Option<i32>,
    pub instruction: String,
    #[serde(default)]
    pub timer: Option<String>,
    #[serde(default)]
    pub image: Option<Uuid>,
}

/// An ingredient ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedIngredient {
    pub position: i32,
    pub ingredient: String,
    pub quantity: String,
}

/// A step ready to insert. `position` records input order and breaks ties
/// between steps sharing a `step_no`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub position: i32,
    pub step_no: i32,
    pub instruction: String,
    pub timer: Option<String>,
    pub image: Option<Uuid>,
}

pub fn validate_title(title: &str) -> Result<String, DraftError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DraftError::new("title", "This field may not be blank."));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(DraftError::new(
            "title",
            format!("Ensure this field has no more than {MAX_TITLE_LEN} characters."),
        ));
    }
    Ok(title.to_string())
}

pub fn validate_description(description: &str) -> Result<(), DraftError> {
    if description.trim().is_empty() {
        return Err(DraftError::new("description", "This field may not be blank."));
    }
    Ok(())
}

pub fn validate_servings(servings: i32) -> Result<(), DraftError> {
    if servings < 1 {
        return Err(DraftError::new(
            "servings",
            "Ensure this value is greater than or equal to 1.",
        ));
    }
    Ok(())
}

/// Prep and cook times are minutes.
pub fn validate_minutes(field: &'static str, minutes: i32) -> Result<(), DraftError> {
    if minutes < 0 {
        return Err(DraftError::new(
            field,
            "Ensure this value is greater than or equal to 0.",
        ));
    }
    Ok(())
}

pub fn plan_ingredients(lines: &[IngredientLine]) -> Result<Vec<PlannedIngredient>, DraftError> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let ingredient = line.ingredient.trim();
            let quantity = line.quantity.trim();
            if ingredient.is_empty() {
                return Err(DraftError::new(
                    "ingredients",
                    format!("Ingredient {} has no name.", i + 1),
                ));
            }
            if quantity.is_empty() {
                return Err(DraftError::new(
                    "ingredients",
                    format!("Ingredient {} has no quantity.", i + 1),
                ));
            }
            if ingredient.chars().count() > MAX_INGREDIENT_LEN
                || quantity.chars().count() > MAX_QUANTITY_LEN
            {
                return Err(DraftError::new(
                    "ingredients",
                    format!("Ingredient {} is too long.", i + 1),
                ));
            }
            Ok(PlannedIngredient {
                position: i as i32,
                ingredient: ingredient.to_string(),
                quantity: quantity.to_string(),
            })
        })
        .collect()
}

pub fn plan_steps(steps: &[StepInput]) -> Result<Vec<PlannedStep>, DraftError> {
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let instruction = step.instruction.trim();
            if instruction.is_empty() {
                return Err(DraftError::new(
                    "steps",
                    format!("Step {} has no instruction.", i + 1),
                ));
            }
            let step_no = step.step_no.unwrap_or(i as i32 + 1);
            if step_no < 0 {
                return Err(DraftError::new(
                    "steps",
                    format!("Step {} has a negative step_no.", i + 1),
                ));
            }
            let timer = step
                .timer
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty());
            if timer.is_some_and(|t| t.chars().count() > MAX_TIMER_LEN) {
                return Err(DraftError::new(
                    "steps",
                    format!("Step {} timer is too long.", i + 1),
                ));
            }
            Ok(PlannedStep {
                position: i as i32,
                step_no,
                instruction: instruction.to_string(),
                timer: timer.map(str::to_string),
                image: step.image,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(no: Option<i32>, text: &str) -> StepInput {
        StepInput {
            step_no: no,
            instruction: text.to_string(),
            timer: None,
            image: None,
        }
    }

    #[test]
    fn test_missing_step_no_uses_position() {
        let planned = plan_steps(&[step(None, "Chop"), step(None, "Fry"), step(None, "Serve")])
            .unwrap();
        let nos: Vec<i32> = planned.iter().map(|s| s.step_no).collect();
        assert_eq!(nos, vec![1, 2, 3]);
    }

    #[test]
    fn test_explicit_step_no_kept_with_input_position() {
        let planned =
            plan_steps(&[step(Some(3), "Serve"), step(Some(1), "Chop"), step(Some(2), "c")])
                .unwrap();
        let keys: Vec<(i32, i32)> = planned.iter().map(|s| (s.step_no, s.position)).collect();
        assert_eq!(keys, vec![(3, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn test_blank_timer_dropped() {
        let mut input = step(None, "Bake");
        input.timer = Some("  ".into());
        let planned = plan_steps(&[input]).unwrap();
        assert_eq!(planned[0].timer, None);
    }

    #[test]
    fn test_blank_instruction_rejected() {
        let err = plan_steps(&[step(None, "ok"), step(None, " ")]).unwrap_err();
        assert_eq!(err.field, "steps");
        assert!(err.message.contains("Step 2"));
    }

    #[test]
    fn test_ingredients_trimmed_and_positioned() {
        let planned = plan_ingredients(&[
            IngredientLine {
                ingredient: " Rice ".into(),
                quantity: "2 cups".into(),
            },
            IngredientLine {
                ingredient: "Salt".into(),
                quantity: " pinch".into(),
            },
        ])
        .unwrap();
        assert_eq!(planned[0].ingredient, "Rice");
        assert_eq!(planned[1].quantity, "pinch");
        assert_eq!(planned[1].position, 1);
    }

    #[test]
    fn test_ingredient_without_quantity_rejected() {
        let err = plan_ingredients(&[IngredientLine {
            ingredient: "Salt".into(),
            quantity: "".into(),
        }])
        .unwrap_err();
        assert_eq!(err.field, "ingredients");
    }

    #[test]
    fn test_scalar_validation() {
        assert_eq!(validate_title("  Dal  ").unwrap(), "Dal");
        assert!(validate_title(" ").is_err());
        assert!(validate_title(&"t".repeat(201)).is_err());
        assert!(validate_servings(0).is_err());
        assert!(validate_minutes("prep_time", -1).is_err());
        assert!(validate_minutes("cook_time", 0).is_ok());
    }
}
