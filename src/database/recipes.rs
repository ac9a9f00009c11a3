// ABOUTME: Recipe storage with transactional association replacement and filtered listings
// ABOUTME: Annotates recipes with favorite and cart flags for the caller and loads tags, ingredients, authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::collections::HashMap;

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::info;

use super::{format_timestamp, parse_timestamp, placeholders, TagManager, TransactionGuard, UserManager};
use crate::errors::{AppError, AppResult};
use crate::models::{IngredientAmount, Recipe, RecipeChanges, RecipeDetail, RecipeFilter, Tag};
use crate::pagination::PageRequest;
use crate::services::short_link;

const RECIPE_COLUMNS: &str =
    "r.id, r.author_id, r.name, r.text, r.cooking_time, r.image, r.pub_date, r.short_link";

/// Positional argument for a dynamically built query
enum QueryArg {
    Id(i64),
    Text(String),
}

/// Recipe database operations
pub struct RecipeManager {
    pool: SqlitePool,
}

impl RecipeManager {
    /// Create a new recipe manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Create a recipe with its full ingredient and tag sets
    ///
    /// The recipe row, its short link and every association are written in
    /// one transaction.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` if a required field is absent or a referenced
    /// ingredient or tag vanished, or a database error
    pub async fn create_recipe(&self, author_id: i64, changes: &RecipeChanges) -> AppResult<i64> {
        let (Some(name), Some(text), Some(cooking_time), Some(image)) = (
            changes.name.as_deref(),
            changes.text.as_deref(),
            changes.cooking_time,
            changes.image.as_deref(),
        ) else {
            return Err(AppError::invalid_input(
                "name, text, cooking_time and image are required",
            ));
        };

        let mut guard = TransactionGuard::begin(&self.pool).await?;

        let recipe_id = sqlx::query(
            r"
            INSERT INTO recipes (author_id, name, text, cooking_time, image, pub_date)
            VALUES (?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(author_id)
        .bind(name)
        .bind(text)
        .bind(cooking_time)
        .bind(image)
        .bind(format_timestamp(Utc::now()))
        .execute(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipe: {e}")))?
        .last_insert_rowid();

        sqlx::query("UPDATE recipes SET short_link = ? WHERE id = ?")
            .bind(short_link::encode(recipe_id))
            .bind(recipe_id)
            .execute(guard.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to assign short link: {e}")))?;

        Self::replace_associations(guard.executor()?, recipe_id, changes).await?;
        guard.commit().await?;

        info!(recipe_id, author_id, "Recipe created");
        Ok(recipe_id)
    }

    /// Update scalar fields and replace the ingredient and tag sets
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the recipe is gone, `INVALID_INPUT` if
    /// a referenced ingredient or tag vanished, or a database error
    pub async fn update_recipe(&self, recipe_id: i64, changes: &RecipeChanges) -> AppResult<()> {
        let mut guard = TransactionGuard::begin(&self.pool).await?;

        let result = sqlx::query(
            r"
            UPDATE recipes
            SET name = COALESCE(?, name),
                text = COALESCE(?, text),
                cooking_time = COALESCE(?, cooking_time),
                image = COALESCE(?, image)
            WHERE id = ?
            ",
        )
        .bind(changes.name.as_deref())
        .bind(changes.text.as_deref())
        .bind(changes.cooking_time)
        .bind(changes.image.as_deref())
        .bind(recipe_id)
        .execute(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to update recipe: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Recipe {recipe_id}")));
        }

        Self::replace_associations(guard.executor()?, recipe_id, changes).await?;
        guard.commit().await?;

        info!(recipe_id, "Recipe updated");
        Ok(())
    }

    /// Clear then insert the full association sets
    async fn replace_associations(
        conn: &mut SqliteConnection,
        recipe_id: i64,
        changes: &RecipeChanges,
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = ?")
            .bind(recipe_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear recipe tags: {e}")))?;

        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?")
            .bind(recipe_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear recipe ingredients: {e}")))?;

        for tag_id in &changes.tags {
            sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES (?, ?)")
                .bind(recipe_id)
                .bind(tag_id)
                .execute(&mut *conn)
                .await
                .map_err(|e| Self::association_error(&e, "tag"))?;
        }

        for line in &changes.ingredients {
            sqlx::query(
                "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) VALUES (?, ?, ?)",
            )
            .bind(recipe_id)
            .bind(line.id)
            .bind(line.amount)
            .execute(&mut *conn)
            .await
            .map_err(|e| Self::association_error(&e, "ingredient"))?;
        }

        Ok(())
    }

    fn association_error(error: &sqlx::Error, kind: &str) -> AppError {
        match error.as_database_error() {
            Some(db) if db.is_foreign_key_violation() => {
                AppError::invalid_input(format!("Referenced {kind} does not exist"))
            }
            Some(db) if db.is_unique_violation() => {
                AppError::invalid_input(format!("Duplicate {kind} in recipe"))
            }
            _ => AppError::database(format!("Failed to attach {kind}: {error}")),
        }
    }

    /// Delete a recipe; associations and relations cascade
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete_recipe(&self, recipe_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(recipe_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Get the bare recipe row
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_recipe(&self, recipe_id: i64) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = ?"
        ))
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        row.map(|r| Self::row_to_recipe(&r)).transpose()
    }

    /// Resolve a short link code
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_recipe_by_short_link(&self, code: &str) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.short_link = ?"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to resolve short link: {e}")))?;

        row.map(|r| Self::row_to_recipe(&r)).transpose()
    }

    /// Get one recipe with associations, annotated for `viewer_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_detail(
        &self,
        recipe_id: i64,
        viewer_id: Option<i64>,
    ) -> AppResult<Option<RecipeDetail>> {
        let row = sqlx::query(&format!(
            r"
            SELECT {RECIPE_COLUMNS},
                   EXISTS (SELECT 1 FROM favorites fa WHERE fa.user_id = ? AND fa.recipe_id = r.id) AS is_favorited,
                   EXISTS (SELECT 1 FROM shopping_cart sc WHERE sc.user_id = ? AND sc.recipe_id = r.id) AS is_in_shopping_cart
            FROM recipes r
            WHERE r.id = ?
            "
        ))
        .bind(viewer_id)
        .bind(viewer_id)
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(self.hydrate(&[row], viewer_id).await?.pop())
    }

    /// List recipes newest first, filtered and annotated for `viewer_id`
    ///
    /// Returns the page of recipes and the total number of matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_details(
        &self,
        filter: &RecipeFilter,
        viewer_id: Option<i64>,
        page: PageRequest,
    ) -> AppResult<(Vec<RecipeDetail>, i64)> {
        let mut conditions = String::from(" WHERE 1=1");
        let mut args: Vec<QueryArg> = Vec::new();

        if !filter.tags.is_empty() {
            conditions.push_str(&format!(
                " AND EXISTS (SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id \
                 WHERE rt.recipe_id = r.id AND t.slug IN ({}))",
                placeholders(filter.tags.len())
            ));
            args.extend(filter.tags.iter().cloned().map(QueryArg::Text));
        }

        if !filter.authors.is_empty() {
            conditions.push_str(&format!(
                " AND r.author_id IN ({})",
                placeholders(filter.authors.len())
            ));
            args.extend(filter.authors.iter().copied().map(QueryArg::Id));
        }

        if let Some(viewer) = viewer_id {
            if filter.is_favorited {
                conditions.push_str(
                    " AND EXISTS (SELECT 1 FROM favorites fa WHERE fa.recipe_id = r.id AND fa.user_id = ?)",
                );
                args.push(QueryArg::Id(viewer));
            }
            if filter.is_in_shopping_cart {
                conditions.push_str(
                    " AND EXISTS (SELECT 1 FROM shopping_cart sc WHERE sc.recipe_id = r.id AND sc.user_id = ?)",
                );
                args.push(QueryArg::Id(viewer));
            }
        }

        let count_sql = format!("SELECT COUNT(*) FROM recipes r{conditions}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for arg in &args {
            count_query = match arg {
                QueryArg::Id(id) => count_query.bind(*id),
                QueryArg::Text(text) => count_query.bind(text.as_str()),
            };
        }
        let count = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count recipes: {e}")))?;

        let list_sql = format!(
            r"
            SELECT {RECIPE_COLUMNS},
                   EXISTS (SELECT 1 FROM favorites fa WHERE fa.user_id = ? AND fa.recipe_id = r.id) AS is_favorited,
                   EXISTS (SELECT 1 FROM shopping_cart sc WHERE sc.user_id = ? AND sc.recipe_id = r.id) AS is_in_shopping_cart
            FROM recipes r{conditions}
            ORDER BY r.pub_date DESC, r.id DESC
            LIMIT ? OFFSET ?
            "
        );
        let mut list_query = sqlx::query(&list_sql).bind(viewer_id).bind(viewer_id);
        for arg in &args {
            list_query = match arg {
                QueryArg::Id(id) => list_query.bind(*id),
                QueryArg::Text(text) => list_query.bind(text.as_str()),
            };
        }
        let rows = list_query
            .bind(page.sql_limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        Ok((self.hydrate(&rows, viewer_id).await?, count))
    }

    /// Newest recipes of one author, optionally truncated
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_by_author(&self, author_id: i64, limit: Option<i64>) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {RECIPE_COLUMNS}
            FROM recipes r
            WHERE r.author_id = ?
            ORDER BY r.pub_date DESC, r.id DESC
            LIMIT ?
            "
        ))
        .bind(author_id)
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list author recipes: {e}")))?;

        rows.iter().map(Self::row_to_recipe).collect()
    }

    /// Number of recipes an author published
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn count_by_author(&self, author_id: i64) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM recipes WHERE author_id = ?")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count author recipes: {e}")))
    }

    // ========================================================================
    // Hydration
    // ========================================================================

    /// Attach authors, tags and ingredients to annotated recipe rows
    async fn hydrate(
        &self,
        rows: &[SqliteRow],
        viewer_id: Option<i64>,
    ) -> AppResult<Vec<RecipeDetail>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let recipes = rows
            .iter()
            .map(Self::row_to_recipe)
            .collect::<AppResult<Vec<_>>>()?;
        let recipe_ids: Vec<i64> = recipes.iter().map(|r| r.id).collect();
        let mut author_ids: Vec<i64> = recipes.iter().map(|r| r.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let mut tags = self.load_tags(&recipe_ids).await?;
        let mut ingredients = self.load_ingredients(&recipe_ids).await?;
        let authors = UserManager::new(self.pool.clone())
            .get_profiles(&author_ids, viewer_id)
            .await?;

        recipes
            .into_iter()
            .zip(rows)
            .map(|(recipe, row)| {
                let author = authors.get(&recipe.author_id).cloned().ok_or_else(|| {
                    AppError::database(format!("Recipe {} has no author row", recipe.id))
                })?;
                Ok(RecipeDetail {
                    tags: tags.remove(&recipe.id).unwrap_or_default(),
                    ingredients: ingredients.remove(&recipe.id).unwrap_or_default(),
                    is_favorited: row.get("is_favorited"),
                    is_in_shopping_cart: row.get("is_in_shopping_cart"),
                    author,
                    recipe,
                })
            })
            .collect()
    }

    async fn load_tags(&self, recipe_ids: &[i64]) -> AppResult<HashMap<i64, Vec<Tag>>> {
        let sql = format!(
            r"
            SELECT rt.recipe_id, t.id, t.name, t.slug
            FROM recipe_tags rt
            JOIN tags t ON t.id = rt.tag_id
            WHERE rt.recipe_id IN ({})
            ORDER BY t.name
            ",
            placeholders(recipe_ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in recipe_ids {
            query = query.bind(id);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load recipe tags: {e}")))?;

        let mut by_recipe: HashMap<i64, Vec<Tag>> = HashMap::new();
        for row in &rows {
            by_recipe
                .entry(row.get("recipe_id"))
                .or_default()
                .push(TagManager::row_to_tag(row));
        }
        Ok(by_recipe)
    }

    async fn load_ingredients(
        &self,
        recipe_ids: &[i64],
    ) -> AppResult<HashMap<i64, Vec<IngredientAmount>>> {
        let sql = format!(
            r"
            SELECT ri.recipe_id, i.id, i.name, i.measurement_unit, ri.amount
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id IN ({})
            ORDER BY ri.id
            ",
            placeholders(recipe_ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in recipe_ids {
            query = query.bind(id);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load recipe ingredients: {e}")))?;

        let mut by_recipe: HashMap<i64, Vec<IngredientAmount>> = HashMap::new();
        for row in &rows {
            by_recipe
                .entry(row.get("recipe_id"))
                .or_default()
                .push(IngredientAmount {
                    id: row.get("id"),
                    name: row.get("name"),
                    measurement_unit: row.get("measurement_unit"),
                    amount: row.get("amount"),
                });
        }
        Ok(by_recipe)
    }

    fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
        let pub_date: String = row.get("pub_date");
        Ok(Recipe {
            id: row.get("id"),
            author_id: row.get("author_id"),
            name: row.get("name"),
            text: row.get("text"),
            cooking_time: row.get("cooking_time"),
            image: row.get("image"),
            pub_date: parse_timestamp(&pub_date)?,
            short_link: row.get("short_link"),
        })
    }
}
