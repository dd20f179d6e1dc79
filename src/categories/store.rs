//! Persistence of the category collection in the preferences area

use anyhow::Result;
use tracing::{debug, warn};

use crate::categories::Category;
use crate::storage::Preferences;

/// Preferences key holding the serialized categories
pub const CATEGORIES_KEY: &str = "categories";

/// Loads and saves the whole category collection.
///
/// Holds no state between calls: every load rebuilds the records from the
/// stored document and every save replaces it.
#[derive(Debug, Clone)]
pub struct CategoryStore {
    prefs: Preferences,
}

impl CategoryStore {
    pub fn new(prefs: Preferences) -> Self {
        Self { prefs }
    }

    /// The saved categories, or an empty list if none were saved.
    ///
    /// A document that no longer parses is treated like a missing one.
    pub fn load_categories(&self) -> Result<Vec<Category>> {
        let Some(value) = self.prefs.get(CATEGORIES_KEY)? else {
            debug!("No categories saved yet");
            return Ok(Vec::new());
        };

        match serde_json::from_value::<Vec<Category>>(value) {
            Ok(categories) => Ok(categories),
            Err(e) => {
                warn!("Stored categories are unreadable, starting empty: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Replace the saved categories with `categories`
    pub fn save_categories(&self, categories: &[Category]) -> Result<()> {
        let value = serde_json::to_value(categories)?;
        self.prefs.set(CATEGORIES_KEY, value)?;
        debug!(count = categories.len(), "Saved categories");
        Ok(())
    }

    /// Append a category and save
    pub fn add_category(&self, category: Category) -> Result<Vec<Category>> {
        let mut categories = self.load_categories()?;
        categories.push(category);
        self.save_categories(&categories)?;
        Ok(categories)
    }

    /// Remove every category with the given title. Returns whether any matched.
    pub fn remove_category(&self, title: &str) -> Result<bool> {
        let mut categories = self.load_categories()?;
        let before = categories.len();
        categories.retain(|c| c.category_title != title);

        if categories.len() == before {
            return Ok(false);
        }

        self.save_categories(&categories)?;
        Ok(true)
    }

    /// Categories flagged for the home page, in saved order
    pub fn home_page_categories(&self) -> Result<Vec<Category>> {
        Ok(self
            .load_categories()?
            .into_iter()
            .filter(|c| c.display_on_home_page)
            .collect())
    }

    /// Forget all categories
    pub fn clear(&self) -> Result<()> {
        self.prefs.remove(CATEGORIES_KEY)?;
        Ok(())
    }
}
