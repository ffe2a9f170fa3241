//! Local state store
//!
//! Small JSON documents kept between runs: the last meal plan, the theme
//! preference and the grocery checklist. One file per key under the cache
//! directory. Writes go through a temporary file and a rename so a crash
//! never leaves a half-written document behind.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::grocery::GroceryChecklist;
use crate::models::{Theme, WeeklyMealPlan};

const MEAL_PLAN_KEY: &str = "meal_plan";
const THEME_KEY: &str = "theme";
const CHECKLIST_KEY: &str = "grocery_checklist";

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt cache entry {key}: {error}")]
    Serialization { key: String, error: String },
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Directory-backed key/value store for client state
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Open the store, creating its directory if needed
    pub fn open(dir: impl AsRef<Path>) -> CacheResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        let content = match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| CacheError::Serialization {
                key: key.to_string(),
                error: e.to_string(),
            })
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> CacheResult<()> {
        let json = serde_json::to_vec_pretty(value).map_err(|e| CacheError::Serialization {
            key: key.to_string(),
            error: e.to_string(),
        })?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;

        tracing::debug!(key = %key, "Cached local state");
        Ok(())
    }

    /// Remove a key; removing a missing key is not an error
    pub fn remove(&self, key: &str) -> CacheResult<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    // ============================================
    // Typed accessors
    // ============================================

    pub fn cached_meal_plan(&self) -> CacheResult<Option<WeeklyMealPlan>> {
        self.get(MEAL_PLAN_KEY)
    }

    pub fn cache_meal_plan(&self, plan: &WeeklyMealPlan) -> CacheResult<()> {
        self.set(MEAL_PLAN_KEY, plan)
    }

    pub fn clear_meal_plan(&self) -> CacheResult<()> {
        self.remove(MEAL_PLAN_KEY)
    }

    /// Stored theme, `Theme::System` when never set
    pub fn theme(&self) -> CacheResult<Theme> {
        Ok(self.get(THEME_KEY)?.unwrap_or_default())
    }

    pub fn set_theme(&self, theme: Theme) -> CacheResult<()> {
        self.set(THEME_KEY, &theme)
    }

    pub fn grocery_checklist(&self) -> CacheResult<GroceryChecklist> {
        Ok(self.get(CHECKLIST_KEY)?.unwrap_or_default())
    }

    pub fn save_grocery_checklist(&self, checklist: &GroceryChecklist) -> CacheResult<()> {
        self.set(CHECKLIST_KEY, checklist)
    }
}

/// Map a key to a safe file stem: anything outside `[A-Za-z0-9_-]` becomes `_`
fn sanitize_key(key: &str) -> String {
    let sanitized: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    if sanitized.is_empty() {
        "_".to_string()
    } else {
        sanitized
    }
}
