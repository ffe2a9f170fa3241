//! Grocery list aggregation
//!
//! Turns a week of planned meals into a shopping list: ingredients are
//! grouped by case-insensitive name, every meal/day/slot they appear in is
//! recorded, and the list is ordered by how often each one is needed.
//!
//! ```rust
//! use mealwise::grocery::aggregate_groceries;
//! use mealwise::models::{DayPlan, Meal, MealSlot, WeeklyMealPlan};
//!
//! let plan = WeeklyMealPlan::new(vec![
//!     DayPlan::new("Monday")
//!         .meal(MealSlot::Lunch, Meal::new("Jollof").with_ingredients(["Rice", "tomato"]))
//!         .meal(MealSlot::Dinner, Meal::new("Stew").with_ingredients(["Tomato"])),
//! ]);
//!
//! let list = aggregate_groceries(&plan);
//! assert_eq!(list[0].name, "Tomato");
//! assert_eq!(list[0].count, 2);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::models::{MealSlot, WeeklyMealPlan};
use crate::store::{CacheError, LocalStore};

/// Where an ingredient is used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroceryOccurrence {
    pub meal: String,
    pub day: String,
    pub slot: MealSlot,
}

/// One line of the shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryItem {
    /// Display name: the normalized key with its first letter capitalized
    pub name: String,
    pub count: usize,
    pub occurrences: Vec<GroceryOccurrence>,
}

impl GroceryItem {
    /// Normalized key this item was grouped under
    pub fn key(&self) -> String {
        normalize(&self.name)
    }
}

/// Grouping key for an ingredient name
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Aggregate a single weekly plan
pub fn aggregate_groceries(plan: &WeeklyMealPlan) -> Vec<GroceryItem> {
    aggregate_plans(std::slice::from_ref(plan))
}

/// Aggregate several plans as if they were one continuous schedule
///
/// Sorted by count, descending. Items with equal counts keep the order in
/// which they were first seen (plan order, then day, slot, ingredient).
pub fn aggregate_plans(plans: &[WeeklyMealPlan]) -> Vec<GroceryItem> {
    let mut items: Vec<GroceryItem> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    let meals = plans
        .iter()
        .flat_map(|plan| plan.days.iter())
        .flat_map(|day| day.meals.iter().map(move |(slot, meal)| (day, *slot, meal)));

    for (day, slot, meal) in meals {
        for ingredient in &meal.ingredients {
            let key = normalize(ingredient.name());
            if key.is_empty() {
                continue;
            }

            let occurrence = GroceryOccurrence {
                meal: meal.name.clone(),
                day: day.day.clone(),
                slot,
            };

            let pos = match index.entry(key) {
                Entry::Occupied(e) => *e.get(),
                Entry::Vacant(e) => {
                    items.push(GroceryItem {
                        name: capitalize(e.key()),
                        count: 0,
                        occurrences: Vec::new(),
                    });
                    *e.insert(items.len() - 1)
                }
            };

            let item = &mut items[pos];
            item.occurrences.push(occurrence);
            item.count = item.occurrences.len();
        }
    }

    // Stable sort keeps first-seen order among ties
    items.sort_by(|a, b| b.count.cmp(&a.count));
    items
}

/// Checked-off state of a grocery list, keyed by normalized name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroceryChecklist {
    #[serde(default)]
    checked: BTreeSet<String>,
}

impl GroceryChecklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip an item's checked state; returns the new state
    pub fn toggle(&mut self, name: &str) -> bool {
        let key = normalize(name);
        if self.checked.remove(&key) {
            false
        } else {
            self.checked.insert(key);
            true
        }
    }

    pub fn is_checked(&self, name: &str) -> bool {
        self.checked.contains(&normalize(name))
    }

    pub fn len(&self) -> usize {
        self.checked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }

    pub fn clear(&mut self) {
        self.checked.clear();
    }

    /// Forget checks for items no longer on the list
    pub fn retain_known(&mut self, items: &[GroceryItem]) {
        let known: BTreeSet<String> = items.iter().map(GroceryItem::key).collect();
        self.checked.retain(|k| known.contains(k));
    }
}

#[derive(Error, Debug)]
pub enum GroceryError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// How to build this week's list
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Fetch the plan even when one is cached
    pub refresh: bool,
    /// Clear the checklist before applying `toggle`
    pub reset: bool,
    /// Items whose checked state flips
    pub toggle: Vec<String>,
}

/// A grocery list together with the plan and checklist it came from
#[derive(Debug, Clone)]
pub struct GroceryList {
    pub plan: WeeklyMealPlan,
    pub items: Vec<GroceryItem>,
    pub checklist: GroceryChecklist,
    /// Whether the plan came from the backend rather than the cache
    pub fetched: bool,
}

/// Build the list from the cached plan, fetching and caching the current
/// plan when none is cached, the cache is unreadable, or `refresh` is set.
///
/// The checklist is updated, pruned to the items on the list and saved.
pub async fn prepare_list(
    client: &ApiClient,
    store: &LocalStore,
    options: &ListOptions,
) -> Result<GroceryList, GroceryError> {
    let cached = if options.refresh {
        None
    } else {
        store.cached_meal_plan().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ignoring unreadable cached meal plan");
            None
        })
    };

    let (plan, fetched) = match cached {
        Some(plan) => (plan, false),
        None => {
            let plan = client.meals().weekly_plan().await?;
            store.cache_meal_plan(&plan)?;
            (plan, true)
        }
    };

    let items = aggregate_groceries(&plan);

    let mut checklist = store.grocery_checklist().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring unreadable grocery checklist");
        GroceryChecklist::default()
    });
    if options.reset {
        checklist.clear();
    }
    for name in &options.toggle {
        checklist.toggle(name);
    }
    checklist.retain_known(&items);
    store.save_grocery_checklist(&checklist)?;

    tracing::debug!(items = items.len(), fetched, "Prepared grocery list");
    Ok(GroceryList {
        plan,
        items,
        checklist,
        fetched,
    })
}

/// Write the list as CSV: `name,count,meals`
///
/// `meals` lists each occurrence as `day slot: meal`, separated by `; `.
pub fn write_csv<W: Write>(items: &[GroceryItem], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["name", "count", "meals"])?;

    for item in items {
        let meals = item
            .occurrences
            .iter()
            .map(|o| format!("{} {}: {}", o.day, o.slot, o.meal))
            .collect::<Vec<_>>()
            .join("; ");
        let count = item.count.to_string();
        wtr.write_record([item.name.as_str(), count.as_str(), meals.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}
