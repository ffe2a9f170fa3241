//! # Mealwise
//!
//! Client library for the Mealwise local-market meal planner and
//! marketplace. Customers plan meals and order from local sellers; sellers
//! manage listings and fulfil orders; admins oversee the platform. All of
//! the business logic lives on the backend, reached over its REST API.
//!
//! ## Modules
//!
//! - [`api`]: Typed, authenticated wrappers for every backend resource
//! - [`models`]: DTOs mirrored from the backend's JSON, plus the order lifecycle
//! - [`grocery`]: Weekly grocery list aggregation and checklist state
//! - [`store`]: Local JSON store for cached plans, theme and checklist
//! - [`config`]: TOML + environment configuration
//! - [`logging`]: `tracing` subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mealwise::{aggregate_groceries, ApiClient, Config, LocalStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let client = ApiClient::with_token(config.api.clone(), "jwt-from-login")?;
//!     let store = LocalStore::open(config.cache.path())?;
//!
//!     let plan = client.meals().weekly_plan().await?;
//!     store.cache_meal_plan(&plan)?;
//!
//!     for item in aggregate_groceries(&plan) {
//!         println!("{} x{}", item.name, item.count);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod grocery;
pub mod logging;
pub mod models;
pub mod store;

pub use api::{ApiClient, ApiError, ApiResult};

pub use config::{ApiConfig, CacheConfig, Config, ConfigError, LoggingConfig};

pub use grocery::{
    aggregate_groceries, aggregate_plans, prepare_list, GroceryChecklist, GroceryError, GroceryItem,
    GroceryList, GroceryOccurrence, ListOptions,
};

pub use models::{Order, OrderStatus, WeeklyMealPlan};

pub use store::{CacheError, LocalStore};
