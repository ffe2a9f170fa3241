use chrono::{DateTime, NaiveDate, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::de;

/// Time of day a planned meal belongs to; ordered as eaten
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snack,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snack => "snack",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ingredient line, sent either as a bare name or with quantity details
impl FromStr for MealSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Ok(MealSlot::Breakfast),
            "lunch" => Ok(MealSlot::Lunch),
            "dinner" => Ok(MealSlot::Dinner),
            "snack" | "snacks" => Ok(MealSlot::Snack),
            other => Err(format!("Unknown meal slot: {}", other)),
        }
    }
}

impl<'de> Deserialize<'de> for MealSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// Slot map of a day. Keys are matched like `MealSlot::from_str`; unknown
/// slots and `null` meals are skipped rather than failing the whole plan.
fn slot_map<'de, D>(deserializer: D) -> Result<BTreeMap<MealSlot, Meal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;

    let mut meals = BTreeMap::new();
    for (key, value) in raw.unwrap_or_default() {
        let Ok(slot) = key.parse::<MealSlot>() else {
            tracing::debug!(slot = %key, "Skipping unknown meal slot");
            continue;
        };
        if value.is_null() {
            continue;
        }
        let meal = serde_json::from_value(value).map_err(D::Error::custom)?;
        meals.insert(slot, meal);
    }
    Ok(meals)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ingredient {
    Name(String),
    Detailed {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "de::opt_amount")]
        quantity: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
}

impl Ingredient {
    pub fn name(&self) -> &str {
        match self {
            Ingredient::Name(name) => name,
            Ingredient::Detailed { name, .. } => name,
        }
    }
}

impl From<&str> for Ingredient {
    fn from(name: &str) -> Self {
        Ingredient::Name(name.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    #[serde(flatten, with = "de::opt_record_id")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub calories: Option<u32>,
    #[serde(default, alias = "estimatedCost", alias = "cost")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub ingredients: Vec<Ingredient>,
    #[serde(default, alias = "imageUrl", alias = "image")]
    pub image_url: Option<String>,
}

impl Meal {
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            description: None,
            calories: None,
            price: None,
            ingredients: Vec::new(),
            image_url: None,
        }
    }

    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Ingredient>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self
    }
}

/// One day of a weekly plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: String,
    #[serde(default, deserialize_with = "slot_map")]
    pub meals: BTreeMap<MealSlot, Meal>,
}

impl DayPlan {
    pub fn new(day: &str) -> Self {
        Self {
            day: day.to_string(),
            meals: BTreeMap::new(),
        }
    }

    pub fn meal(mut self, slot: MealSlot, meal: Meal) -> Self {
        self.meals.insert(slot, meal);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyMealPlan {
    #[serde(flatten, with = "de::opt_record_id")]
    pub id: Option<String>,
    #[serde(default, alias = "weekStart")]
    pub week_start: Option<NaiveDate>,
    #[serde(default, alias = "plan", deserialize_with = "de::null_default")]
    pub days: Vec<DayPlan>,
    #[serde(default, alias = "totalCost")]
    pub total_cost: Option<f64>,
    #[serde(default, alias = "generatedAt", alias = "createdAt")]
    pub generated_at: Option<DateTime<Utc>>,
}

impl WeeklyMealPlan {
    pub fn new(days: Vec<DayPlan>) -> Self {
        Self {
            id: None,
            week_start: None,
            days,
            total_cost: None,
            generated_at: None,
        }
    }

    pub fn meal_count(&self) -> usize {
        self.days.iter().map(|d| d.meals.len()).sum()
    }

    /// Sum of per-meal prices, for plans the backend did not total
    pub fn estimated_cost(&self) -> f64 {
        self.days
            .iter()
            .flat_map(|d| d.meals.values())
            .filter_map(|m| m.price)
            .sum()
    }
}
