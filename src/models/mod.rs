//! Backend DTOs
//!
//! Plain request and response types mirrored from the Mealwise backend's
//! JSON. The backend mixes camelCase and snake_case and uses Mongo-style
//! `_id` keys, so most fields carry aliases and defaults.

mod admin;
mod budget;
mod chat;
mod meal;
mod order;
mod product;
mod settings;
mod user;

pub use admin::AdminStats;
pub use budget::{Budget, BudgetSummary, BudgetUpdate};
pub use chat::{Conversation, Message};
pub use meal::{DayPlan, Ingredient, Meal, MealSlot, WeeklyMealPlan};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus, PaymentVerification};
pub use product::{NewProduct, Product, ProductQuery, ProductUpdate, DEFAULT_LOW_STOCK_THRESHOLD};
pub use settings::{
    BackupFrequency, BackupRecord, BackupSettings, PasswordChange, Preferences, Settings, Theme,
};
pub use user::{AuthResponse, LoginRequest, ProfileUpdate, RegisterRequest, Role, User};

/// Serde helpers shared by the DTOs
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Int(i64),
        Float(f64),
    }

    impl StringOrNumber {
        fn into_string(self) -> String {
            match self {
                StringOrNumber::String(s) => s,
                StringOrNumber::Int(i) => i.to_string(),
                StringOrNumber::Float(f) => f.to_string(),
            }
        }
    }

    /// Accept ids sent either as strings or as numbers
    pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        StringOrNumber::deserialize(deserializer).map(StringOrNumber::into_string)
    }

    pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(StringOrNumber::into_string))
    }

    /// Free-form amounts such as `2`, `0.5` or `"a pinch"`
    pub fn opt_amount<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        opt_id(deserializer)
    }

    /// Treat an explicit `null` the same as a missing field
    /// Record ids arrive as `id`, `_id` or both (Mongo documents with
    /// virtuals). Used with `#[serde(flatten, with = ...)]` so the two keys
    /// never collide; `id` wins when both are present. Serializes as `id`.
    pub mod record_id {
        use serde::de::Error;
        use serde::ser::SerializeMap;
        use serde::{Deserialize, Deserializer, Serializer};

        #[derive(Deserialize)]
        pub(super) struct Keys {
            #[serde(default, deserialize_with = "super::opt_id")]
            id: Option<String>,
            #[serde(default, rename = "_id", deserialize_with = "super::opt_id")]
            mongo_id: Option<String>,
        }

        impl Keys {
            pub(super) fn merged(self) -> Option<String> {
                self.id.or(self.mongo_id)
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
        where
            D: Deserializer<'de>,
        {
            Keys::deserialize(deserializer)?
                .merged()
                .ok_or_else(|| D::Error::missing_field("id"))
        }

        #[allow(clippy::ptr_arg)]
        pub fn serialize<S: Serializer>(id: &String, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry("id", id)?;
            map.end()
        }
    }

    /// Optional form of [`record_id`]; a missing id serializes as nothing
    pub mod opt_record_id {
        use serde::ser::SerializeMap;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Ok(super::record_id::Keys::deserialize(deserializer)?.merged())
        }

        pub fn serialize<S: Serializer>(id: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(usize::from(id.is_some())))?;
            if let Some(id) = id {
                map.serialize_entry("id", id)?;
            }
            map.end()
        }
    }

    pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}
