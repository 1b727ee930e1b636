use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use crate::models::{NewRecipe, Recipe};

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    // AUTOINCREMENT keeps deleted ids from ever being reassigned.
    fn migrate(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS recipe (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    photo TEXT,
                    ingredients TEXT,
                    steps TEXT
                );

                PRAGMA user_version = 1;",
            )?;
        }

        Ok(())
    }

    fn recipe_from_row(row: &rusqlite::Row) -> rusqlite::Result<Recipe> {
        Ok(Recipe {
            id: row.get(0)?,
            title: row.get(1)?,
            photo: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            ingredients: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            steps: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        })
    }

    pub fn insert_recipe(&self, recipe: &NewRecipe) -> Result<Recipe> {
        self.conn.execute(
            "INSERT INTO recipe (title, photo, ingredients, steps) VALUES (?1, ?2, ?3, ?4)",
            params![
                recipe.title,
                recipe.photo,
                recipe.ingredients,
                recipe.steps,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_recipe_by_id(id)?
            .context("Recipe missing immediately after insert")
    }

    pub fn get_recipe_by_id(&self, id: i64) -> Result<Option<Recipe>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, photo, ingredients, steps FROM recipe WHERE id = ?1")?;
        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Self::recipe_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    /// All recipes, newest (highest id) first.
    pub fn list_recipes(&self) -> Result<Vec<Recipe>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, photo, ingredients, steps FROM recipe ORDER BY id DESC")?;
        let recipes = stmt
            .query_map([], Self::recipe_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(recipes)
    }

    pub fn delete_recipe(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM recipe WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewRecipe;

    fn sample_recipe() -> NewRecipe {
        NewRecipe {
            title: "Tomato Soup".to_string(),
            photo: "https://example.com/soup.jpg".to_string(),
            ingredients: "tomatoes\nwater\nsalt".to_string(),
            steps: "chop\nsimmer\nblend".to_string(),
        }
    }

    #[test]
    fn test_insert_and_get_recipe() {
        let db = Database::open_in_memory().unwrap();
        let recipe = db.insert_recipe(&sample_recipe()).unwrap();

        assert_eq!(recipe.title, "Tomato Soup");
        assert_eq!(recipe.photo, "https://example.com/soup.jpg");
        assert_eq!(recipe.ingredients, "tomatoes\nwater\nsalt");
        assert_eq!(recipe.steps, "chop\nsimmer\nblend");

        let fetched = db.get_recipe_by_id(recipe.id).unwrap().unwrap();
        assert_eq!(fetched.id, recipe.id);
        assert_eq!(fetched.title, "Tomato Soup");
    }

    #[test]
    fn test_get_missing_recipe_returns_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_recipe_by_id(42).unwrap().is_none());
    }

    #[test]
    fn test_ids_increase_monotonically() {
        let db = Database::open_in_memory().unwrap();
        let first = db.insert_recipe(&sample_recipe()).unwrap();
        let second = db.insert_recipe(&sample_recipe()).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_deleted_id_is_not_reused() {
        let db = Database::open_in_memory().unwrap();
        db.insert_recipe(&sample_recipe()).unwrap();
        let second = db.insert_recipe(&sample_recipe()).unwrap();
        assert!(db.delete_recipe(second.id).unwrap());

        let third = db.insert_recipe(&sample_recipe()).unwrap();
        assert!(third.id > second.id);
    }

    #[test]
    fn test_list_recipes_newest_first() {
        let db = Database::open_in_memory().unwrap();
        let first = db.insert_recipe(&sample_recipe()).unwrap();
        let second = db.insert_recipe(&sample_recipe()).unwrap();
        let third = db.insert_recipe(&sample_recipe()).unwrap();

        let listed = db.list_recipes().unwrap();
        let ids: Vec<i64> = listed.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[test]
    fn test_list_recipes_empty() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.list_recipes().unwrap().is_empty());
    }

    #[test]
    fn test_delete_recipe() {
        let db = Database::open_in_memory().unwrap();
        let recipe = db.insert_recipe(&sample_recipe()).unwrap();

        assert!(db.delete_recipe(recipe.id).unwrap());
        assert!(db.get_recipe_by_id(recipe.id).unwrap().is_none());
        // Deleting again should return false
        assert!(!db.delete_recipe(recipe.id).unwrap());
    }

    #[test]
    fn test_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes.db");

        {
            let db = Database::open(&path).unwrap();
            db.insert_recipe(&sample_recipe()).unwrap();
        }

        // Reopen runs migrate() again; existing data must survive.
        let db = Database::open(&path).unwrap();
        let listed = db.list_recipes().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Tomato Soup");
    }

    #[test]
    fn test_store_accepts_empty_optional_fields() {
        let db = Database::open_in_memory().unwrap();
        let recipe = db
            .insert_recipe(&NewRecipe {
                title: "Toast".to_string(),
                photo: String::new(),
                ingredients: String::new(),
                steps: String::new(),
            })
            .unwrap();

        assert_eq!(recipe.title, "Toast");
        assert_eq!(recipe.photo, "");
        assert_eq!(recipe.ingredients, "");
        assert_eq!(recipe.steps, "");
    }
}
