// ABOUTME: Field-level validation of recipe, registration and profile payloads
// ABOUTME: Collects every problem per field before the request is rejected
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Payload validation
//!
//! Request bodies deserialize into payload structs whose fields are all
//! optional, so a missing field is reported the same way as a malformed one.
//! Validators return the cleaned values or a [`ValidationErrors`] map keyed by
//! field name. Checks needing the database (unknown ids, taken usernames)
//! happen afterwards in the route handlers.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::media::DecodedImage;
use crate::constants::recipes::{
    MAX_COOKING_TIME, MAX_RECIPE_NAME_LENGTH, MIN_COOKING_TIME, MIN_INGREDIENT_AMOUNT,
};
use crate::constants::users::{
    MAX_EMAIL_LENGTH, MAX_FIRST_NAME_LENGTH, MAX_LAST_NAME_LENGTH, MAX_PASSWORD_LENGTH,
    MAX_USERNAME_LENGTH, MIN_PASSWORD_LENGTH, RESERVED_USERNAME, USERNAME_PATTERN,
};
use crate::errors::ValidationErrors;
use crate::models::{IngredientLine, UserUpdate};

const REQUIRED: &str = "This field is required.";

static USERNAME_REGEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(USERNAME_PATTERN).ok());

static EMAIL_REGEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

// ============================================================================
// Recipes
// ============================================================================

/// Whether a recipe payload creates or updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Every scalar field is required
    Create,
    /// Absent scalar fields keep their stored value
    Update,
}

/// Recipe body for create and update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipePayload {
    /// Dish name
    pub name: Option<String>,
    /// Preparation instructions
    pub text: Option<String>,
    /// Minutes
    pub cooking_time: Option<i64>,
    /// Base64 image data URI
    pub image: Option<String>,
    /// Ingredient ids with amounts
    pub ingredients: Option<Vec<IngredientLine>>,
    /// Tag ids
    pub tags: Option<Vec<i64>>,
}

/// Recipe payload that passed field validation
#[derive(Debug, Clone)]
pub struct ValidatedRecipe {
    /// Trimmed name
    pub name: Option<String>,
    /// Instructions
    pub text: Option<String>,
    /// Minutes
    pub cooking_time: Option<i64>,
    /// Decoded image, not yet stored
    pub image: Option<DecodedImage>,
    /// Ingredient lines, ids unique
    pub ingredients: Vec<IngredientLine>,
    /// Tag ids, unique
    pub tags: Vec<i64>,
}

/// Validate a recipe body
///
/// `max_amount` is the configured upper bound for a single ingredient amount.
///
/// # Errors
///
/// Returns every field problem found
pub fn validate_recipe(
    payload: &RecipePayload,
    mode: WriteMode,
    max_amount: i64,
) -> Result<ValidatedRecipe, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let required = mode == WriteMode::Create;

    let name = payload.name.as_deref().map(str::trim);
    match name {
        None if required => errors.add("name", REQUIRED),
        Some("") => errors.add("name", "Name must not be empty."),
        Some(n) if n.chars().count() > MAX_RECIPE_NAME_LENGTH => errors.add(
            "name",
            format!("Name must be at most {MAX_RECIPE_NAME_LENGTH} characters."),
        ),
        _ => {}
    }

    match payload.text.as_deref() {
        None if required => errors.add("text", REQUIRED),
        Some(t) if t.trim().is_empty() => errors.add("text", "Text must not be empty."),
        _ => {}
    }

    match payload.cooking_time {
        None if required => errors.add("cooking_time", REQUIRED),
        Some(minutes) if !(MIN_COOKING_TIME..=MAX_COOKING_TIME).contains(&minutes) => {
            errors.add(
                "cooking_time",
                format!("Cooking time must be between {MIN_COOKING_TIME} and {MAX_COOKING_TIME}."),
            );
        }
        _ => {}
    }

    let image = match payload.image.as_deref() {
        None if required => {
            errors.add("image", REQUIRED);
            None
        }
        None => None,
        Some(uri) => match DecodedImage::from_data_uri(uri) {
            Ok(image) => Some(image),
            Err(reason) => {
                errors.add("image", reason);
                None
            }
        },
    };

    let ingredients = payload.ingredients.clone().unwrap_or_default();
    match &payload.ingredients {
        None => errors.add("ingredients", REQUIRED),
        Some(lines) if lines.is_empty() => {
            errors.add("ingredients", "At least one ingredient is required.");
        }
        Some(lines) => {
            let mut seen = HashSet::new();
            if !lines.iter().all(|line| seen.insert(line.id)) {
                errors.add("ingredients", "Ingredients must not repeat.");
            }
            if lines
                .iter()
                .any(|line| !(MIN_INGREDIENT_AMOUNT..=max_amount).contains(&line.amount))
            {
                errors.add(
                    "ingredients",
                    format!("Amount must be between {MIN_INGREDIENT_AMOUNT} and {max_amount}."),
                );
            }
        }
    }

    let tags = payload.tags.clone().unwrap_or_default();
    match &payload.tags {
        None => errors.add("tags", REQUIRED),
        Some(ids) if ids.is_empty() => errors.add("tags", "At least one tag is required."),
        Some(ids) => {
            let mut seen = HashSet::new();
            if !ids.iter().all(|id| seen.insert(*id)) {
                errors.add("tags", "Tags must not repeat.");
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidatedRecipe {
        name: name.map(ToOwned::to_owned),
        text: payload.text.clone(),
        cooking_time: payload.cooking_time,
        image,
        ingredients,
        tags,
    })
}

// ============================================================================
// Users
// ============================================================================

/// Registration body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationPayload {
    /// Login email
    pub email: Option<String>,
    /// Public handle
    pub username: Option<String>,
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
    /// Raw password
    pub password: Option<String>,
}

/// Registration that passed field validation; the password is still raw
#[derive(Debug, Clone)]
pub struct ValidatedRegistration {
    /// Login email
    pub email: String,
    /// Public handle
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Raw password
    pub password: String,
}

/// Profile edit body for the current user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdatePayload {
    /// New login email
    pub email: Option<String>,
    /// New public handle
    pub username: Option<String>,
    /// New given name
    pub first_name: Option<String>,
    /// New family name
    pub last_name: Option<String>,
}

/// Validate a registration body
///
/// # Errors
///
/// Returns every field problem found
pub fn validate_registration(
    payload: &RegistrationPayload,
) -> Result<ValidatedRegistration, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let email = required_field(&mut errors, "email", payload.email.as_deref());
    let username = required_field(&mut errors, "username", payload.username.as_deref());
    let first_name = required_field(&mut errors, "first_name", payload.first_name.as_deref());
    let last_name = required_field(&mut errors, "last_name", payload.last_name.as_deref());
    let password = match payload.password.as_deref() {
        None | Some("") => {
            errors.add("password", REQUIRED);
            None
        }
        Some(password) => Some(password.to_owned()),
    };

    if let Some(email) = &email {
        check_email(&mut errors, email);
    }
    if let Some(username) = &username {
        check_username(&mut errors, username);
    }
    if let Some(first_name) = &first_name {
        check_name(&mut errors, "first_name", first_name, MAX_FIRST_NAME_LENGTH);
    }
    if let Some(last_name) = &last_name {
        check_name(&mut errors, "last_name", last_name, MAX_LAST_NAME_LENGTH);
    }
    if let Some(password) = &password {
        check_password(&mut errors, "password", password);
    }

    match (email, username, first_name, last_name, password) {
        (Some(email), Some(username), Some(first_name), Some(last_name), Some(password))
            if errors.is_empty() =>
        {
            Ok(ValidatedRegistration {
                email,
                username,
                first_name,
                last_name,
                password,
            })
        }
        _ => Err(errors),
    }
}

/// Validate a profile edit; absent fields stay unchanged
///
/// # Errors
///
/// Returns every field problem found
pub fn validate_profile_update(
    payload: &ProfileUpdatePayload,
) -> Result<UserUpdate, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let email = payload.email.as_deref().map(str::trim);
    let username = payload.username.as_deref().map(str::trim);
    let first_name = payload.first_name.as_deref().map(str::trim);
    let last_name = payload.last_name.as_deref().map(str::trim);

    if let Some(email) = email {
        check_email(&mut errors, email);
    }
    if let Some(username) = username {
        check_username(&mut errors, username);
    }
    if let Some(first_name) = first_name {
        check_name(&mut errors, "first_name", first_name, MAX_FIRST_NAME_LENGTH);
    }
    if let Some(last_name) = last_name {
        check_name(&mut errors, "last_name", last_name, MAX_LAST_NAME_LENGTH);
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(UserUpdate {
        email: email.map(ToOwned::to_owned),
        username: username.map(ToOwned::to_owned),
        first_name: first_name.map(ToOwned::to_owned),
        last_name: last_name.map(ToOwned::to_owned),
    })
}

/// Validate a new password on its own
///
/// # Errors
///
/// Returns the length problem under `new_password`
pub fn validate_new_password(password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_password(&mut errors, "new_password", password);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn required_field(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
) -> Option<String> {
    match value.map(str::trim) {
        None | Some("") => {
            errors.add(field, REQUIRED);
            None
        }
        Some(v) => Some(v.to_owned()),
    }
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if email.chars().count() > MAX_EMAIL_LENGTH {
        errors.add(
            "email",
            format!("Email must be at most {MAX_EMAIL_LENGTH} characters."),
        );
    } else if !EMAIL_REGEX.as_ref().is_some_and(|re| re.is_match(email)) {
        errors.add("email", "Enter a valid email address.");
    }
}

fn check_username(errors: &mut ValidationErrors, username: &str) {
    if username.chars().count() > MAX_USERNAME_LENGTH {
        errors.add(
            "username",
            format!("Username must be at most {MAX_USERNAME_LENGTH} characters."),
        );
    } else if !USERNAME_REGEX
        .as_ref()
        .is_some_and(|re| re.is_match(username))
    {
        errors.add(
            "username",
            "Username may contain only letters, digits and @/./+/-/_ characters.",
        );
    } else if username == RESERVED_USERNAME {
        errors.add(
            "username",
            format!("Username '{RESERVED_USERNAME}' is reserved."),
        );
    }
}

fn check_name(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    if value.is_empty() {
        errors.add(field, "This field may not be blank.");
    } else if value.chars().count() > max {
        errors.add(field, format!("Must be at most {max} characters."));
    }
}

fn check_password(errors: &mut ValidationErrors, field: &str, password: &str) {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            field,
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters."),
        );
    } else if password.len() > MAX_PASSWORD_LENGTH {
        errors.add(
            field,
            format!("Password must be at most {MAX_PASSWORD_LENGTH} bytes."),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    fn recipe_payload() -> RecipePayload {
        RecipePayload {
            name: Some("Borscht".to_owned()),
            text: Some("Boil everything.".to_owned()),
            cooking_time: Some(90),
            image: Some(PIXEL.to_owned()),
            ingredients: Some(vec![
                IngredientLine { id: 1, amount: 200 },
                IngredientLine { id: 2, amount: 1 },
            ]),
            tags: Some(vec![1, 2]),
        }
    }

    #[test]
    fn test_valid_recipe() {
        let recipe = validate_recipe(&recipe_payload(), WriteMode::Create, 32_000).unwrap();
        assert_eq!(recipe.name.as_deref(), Some("Borscht"));
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.image.unwrap().extension, "png");
    }

    #[test]
    fn test_duplicate_ingredients_rejected() {
        let mut payload = recipe_payload();
        payload.ingredients = Some(vec![
            IngredientLine { id: 1, amount: 10 },
            IngredientLine { id: 1, amount: 20 },
        ]);
        let errors = validate_recipe(&payload, WriteMode::Create, 32_000).unwrap_err();
        assert_eq!(errors.messages("ingredients"), ["Ingredients must not repeat."]);
    }

    #[test]
    fn test_amount_bounds() {
        let mut payload = recipe_payload();
        payload.ingredients = Some(vec![IngredientLine { id: 1, amount: 0 }]);
        assert!(validate_recipe(&payload, WriteMode::Create, 32_000)
            .unwrap_err()
            .has_field("ingredients"));

        payload.ingredients = Some(vec![IngredientLine { id: 1, amount: 1 }]);
        assert!(validate_recipe(&payload, WriteMode::Create, 32_000).is_ok());

        payload.ingredients = Some(vec![IngredientLine { id: 1, amount: 501 }]);
        assert!(validate_recipe(&payload, WriteMode::Create, 500).is_err());
    }

    #[test]
    fn test_duplicate_and_empty_tags_rejected() {
        let mut payload = recipe_payload();
        payload.tags = Some(vec![3, 3]);
        assert!(validate_recipe(&payload, WriteMode::Create, 32_000)
            .unwrap_err()
            .has_field("tags"));

        payload.tags = Some(Vec::new());
        assert!(validate_recipe(&payload, WriteMode::Update, 32_000)
            .unwrap_err()
            .has_field("tags"));
    }

    #[test]
    fn test_update_still_requires_associations() {
        let payload = RecipePayload {
            name: Some("Renamed".to_owned()),
            ..RecipePayload::default()
        };
        let errors = validate_recipe(&payload, WriteMode::Update, 32_000).unwrap_err();
        assert!(errors.has_field("ingredients"));
        assert!(errors.has_field("tags"));
        assert!(!errors.has_field("image"));
        assert!(!errors.has_field("cooking_time"));
    }

    #[test]
    fn test_create_collects_all_missing_fields() {
        let errors =
            validate_recipe(&RecipePayload::default(), WriteMode::Create, 32_000).unwrap_err();
        for field in ["name", "text", "cooking_time", "image", "ingredients", "tags"] {
            assert!(errors.has_field(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_cooking_time_and_image_checks() {
        let mut payload = recipe_payload();
        payload.cooking_time = Some(0);
        payload.image = Some("not-a-uri".to_owned());
        let errors = validate_recipe(&payload, WriteMode::Create, 32_000).unwrap_err();
        assert!(errors.has_field("cooking_time"));
        assert!(errors.has_field("image"));
    }

    fn registration() -> RegistrationPayload {
        RegistrationPayload {
            email: Some("cook@example.com".to_owned()),
            username: Some("cook.42".to_owned()),
            first_name: Some("Ada".to_owned()),
            last_name: Some("Lovelace".to_owned()),
            password: Some("s3cret-pass".to_owned()),
        }
    }

    #[test]
    fn test_valid_registration() {
        let user = validate_registration(&registration()).unwrap();
        assert_eq!(user.username, "cook.42");
    }

    #[test]
    fn test_registration_rejects_reserved_and_malformed() {
        let mut payload = registration();
        payload.username = Some("me".to_owned());
        payload.email = Some("not-an-email".to_owned());
        payload.password = Some("short".to_owned());
        let errors = validate_registration(&payload).unwrap_err();
        assert!(errors.has_field("username"));
        assert!(errors.has_field("email"));
        assert!(errors.has_field("password"));

        payload = registration();
        payload.username = Some("bad name!".to_owned());
        assert!(validate_registration(&payload)
            .unwrap_err()
            .has_field("username"));
    }

    #[test]
    fn test_registration_missing_fields() {
        let errors = validate_registration(&RegistrationPayload::default()).unwrap_err();
        assert_eq!(errors.messages("first_name"), [REQUIRED]);
        assert!(errors.has_field("password"));
    }

    #[test]
    fn test_profile_update() {
        let update = validate_profile_update(&ProfileUpdatePayload {
            first_name: Some(" Grace ".to_owned()),
            ..ProfileUpdatePayload::default()
        })
        .unwrap();
        assert_eq!(update.first_name.as_deref(), Some("Grace"));
        assert!(update.username.is_none());

        assert!(validate_profile_update(&ProfileUpdatePayload {
            username: Some("me".to_owned()),
            ..ProfileUpdatePayload::default()
        })
        .is_err());
    }

    #[test]
    fn test_new_password_length() {
        assert!(validate_new_password("longenough").is_ok());
        assert!(validate_new_password("short").is_err());
    }
}
