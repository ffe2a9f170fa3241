//! Mealwise CLI
//!
//! Command-line front end for the Mealwise marketplace:
//! - Sign in and manage the profile
//! - Browse meals, listings and orders
//! - Generate meal plans and build the week's grocery list
//! - Seller and admin dashboards

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use mealwise::api::{Feedback, RecommendationRequest};
use mealwise::grocery::{
    prepare_list, write_csv, GroceryChecklist, GroceryError, GroceryItem, GroceryList, ListOptions,
};
use mealwise::logging::init_logging;
use mealwise::models::{
    BackupFrequency, BackupSettings, BudgetUpdate, LoginRequest, Message, NewOrder, NewOrderItem,
    NewProduct, Order, PasswordChange, Product, ProductQuery, ProductUpdate, ProfileUpdate,
    RegisterRequest, Role, Theme, User, WeeklyMealPlan,
};
use mealwise::{ApiClient, ApiError, Config, LocalStore};

#[derive(Parser)]
#[command(name = "mealwise")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Meal planning and local-market ordering")]
#[command(long_about = "Mealwise connects households with local sellers.\nPlan your week, build the grocery list, and order from the market.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend API URL (overrides config and MEALWISE_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token from `mealwise login`
    #[arg(long, env = "MEALWISE_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account
    Register {
        name: String,
        email: String,
        #[arg(long, env = "MEALWISE_PASSWORD", hide_env_values = true)]
        password: String,
        /// customer, seller or admin
        #[arg(long, default_value = "customer")]
        role: Role,
    },

    /// Sign in and print a token
    Login {
        email: String,
        #[arg(long, env = "MEALWISE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Show the signed-in profile, or update it
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },

    /// Meal catalog and weekly plan
    Meals {
        #[command(subcommand)]
        command: MealsCommand,
    },

    /// Marketplace listings
    Products {
        #[command(subcommand)]
        command: ProductsCommand,
    },

    /// Orders and their status
    Orders {
        #[command(subcommand)]
        command: OrdersCommand,
    },

    /// Grocery budget
    Budget {
        #[command(subcommand)]
        command: BudgetCommand,
    },

    /// Messages with sellers and customers
    Chat {
        #[command(subcommand)]
        command: ChatCommand,
    },

    /// Dietary preferences
    Preferences {
        #[command(subcommand)]
        command: PreferencesCommand,
    },

    /// Account settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },

    /// Generate a meal plan recommendation
    Recommend {
        /// Number of days to plan
        #[arg(short, long, default_value = "7")]
        days: u32,
        /// Show the current recommendation instead of generating one
        #[arg(long)]
        current: bool,
        /// List past recommendations
        #[arg(long, conflicts_with = "current")]
        history: bool,
        /// Rate a past recommendation (1-5) instead of generating one
        #[arg(long, value_names = ["ID", "RATING"], num_args = 2)]
        rate: Option<Vec<String>>,
    },

    /// Build the grocery list from the cached (or current) meal plan
    Groceries {
        /// Fetch the plan from the backend even if one is cached
        #[arg(long)]
        refresh: bool,
        /// Toggle an item on the checklist (repeatable)
        #[arg(long)]
        check: Vec<String>,
        /// Clear the checklist
        #[arg(long)]
        reset: bool,
        /// Also write the list as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Backup schedule (admin)
    Backup {
        #[command(subcommand)]
        command: BackupCommand,
    },

    /// Platform administration
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },

    /// Check that the backend is reachable
    Health,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum MealsCommand {
    List,
    Show { id: String },
    /// Current weekly plan (also refreshes the local cache)
    Plan,
}

#[derive(Subcommand)]
pub enum ProductsCommand {
    List {
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        seller: Option<String>,
    },
    Show { id: String },
    /// Create a listing (seller)
    Add {
        name: String,
        price: f64,
        stock: u32,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        low_stock_threshold: Option<u32>,
    },
    /// Update a listing's price or stock (seller)
    Update {
        id: String,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        stock: Option<u32>,
    },
    /// Your own listings (seller)
    Mine,
    /// Your listings that need restocking (seller)
    LowStock,
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    List {
        /// Orders received as a seller
        #[arg(long)]
        seller: bool,
    },
    Show { id: String },
    /// Place an order: PRODUCT_ID[:QTY]...
    Place {
        #[arg(required = true)]
        items: Vec<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Move an order to its next status (seller)
    Advance { id: String },
    Cancel { id: String },
    Archive { id: String },
    /// Verify a payment reference
    Verify { id: String, reference: String },
}

#[derive(Subcommand)]
pub enum BudgetCommand {
    Show,
    Set {
        limit: f64,
        #[arg(long)]
        currency: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ChatCommand {
    List,
    /// Show a conversation and mark it read
    Read { id: String },
    Send {
        id: String,
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Start a conversation with a user
    Start { participant: String },
}

#[derive(Subcommand)]
pub enum PreferencesCommand {
    Show,
    Set {
        /// Dietary restriction (repeatable; replaces the list)
        #[arg(long)]
        diet: Vec<String>,
        /// Allergy (repeatable; replaces the list)
        #[arg(long)]
        allergy: Vec<String>,
        /// Cuisine (repeatable; replaces the list)
        #[arg(long)]
        cuisine: Vec<String>,
        #[arg(long)]
        calories: Option<u32>,
        #[arg(long)]
        household: Option<u32>,
        #[arg(long)]
        budget_per_meal: Option<f64>,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    Show,
    /// Set the theme locally and, when signed in, on the account
    Theme { theme: Theme },
    /// Change the account password
    Password {
        #[arg(long, env = "MEALWISE_PASSWORD", hide_env_values = true)]
        current: String,
        #[arg(long, env = "MEALWISE_NEW_PASSWORD", hide_env_values = true)]
        new: String,
    },
}

#[derive(Subcommand)]
pub enum BackupCommand {
    Show,
    Set {
        #[arg(long)]
        enabled: Option<bool>,
        #[arg(long)]
        frequency: Option<BackupFrequency>,
        #[arg(long)]
        retention_days: Option<u32>,
    },
    Run,
    History,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    Stats,
    Users,
    Orders,
    Suspend { id: String },
    Reinstate { id: String },
    DeleteUser { id: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Warning: {}", e);
    }

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "Command failed");
            eprintln!("Error: {:#}", e);
            if needs_sign_in(&e) {
                eprintln!();
                eprintln!("Sign in first:");
                eprintln!("  export MEALWISE_TOKEN=$(mealwise login <email>)");
            }
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.url = url.trim_end_matches('/').to_string();
    }
    Ok(config)
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let client = match &cli.token {
        Some(token) => ApiClient::with_token(config.api.clone(), token.clone())?,
        None => ApiClient::new(config.api.clone())?,
    };
    let format = cli.format;

    match cli.command {
        Commands::Register {
            name,
            email,
            password,
            role,
        } => {
            let response = client
                .auth()
                .register(&RegisterRequest {
                    name,
                    email,
                    password,
                    role,
                })
                .await?;
            eprintln!("Registered {} as {}", response.user.email, response.user.role);
            println!("{}", response.token);
        }

        Commands::Login { email, password } => {
            let response = client.auth().login(&LoginRequest { email, password }).await?;
            eprintln!("Signed in as {} ({})", response.user.email, response.user.role);
            println!("{}", response.token);
        }

        Commands::Profile {
            name,
            phone,
            address,
        } => {
            let update = ProfileUpdate {
                name,
                phone,
                address,
            };
            let user = if update.name.is_none() && update.phone.is_none() && update.address.is_none() {
                client.auth().profile().await?
            } else {
                client.auth().update_profile(&update).await?
            };
            emit(format, &user, |u| {
                println!("Name:    {}", u.name);
                println!("Email:   {}", u.email);
                println!("Role:    {}", u.role);
                if let Some(phone) = &u.phone {
                    println!("Phone:   {}", phone);
                }
                if let Some(address) = &u.address {
                    println!("Address: {}", address);
                }
            })?;
        }

        Commands::Meals { command } => match command {
            MealsCommand::List => {
                let meals = client.meals().list().await?;
                emit(format, &meals, |meals| {
                    if meals.is_empty() {
                        println!("No meals found.");
                        return;
                    }
                    println!("{:<28} {:<10} {:<10} {}", "Name", "Calories", "Price", "ID");
                    println!("{}", "-".repeat(64));
                    for meal in meals {
                        println!(
                            "{:<28} {:<10} {:<10} {}",
                            truncate(&meal.name, 28),
                            meal.calories.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()),
                            meal.price.map(money).unwrap_or_else(|| "-".to_string()),
                            meal.id.as_deref().unwrap_or("-")
                        );
                    }
                })?;
            }
            MealsCommand::Show { id } => {
                let meal = client.meals().get(&id).await?;
                emit(format, &meal, |meal| {
                    println!("{}", meal.name);
                    if let Some(description) = &meal.description {
                        println!("{}", description);
                    }
                    println!();
                    println!("Ingredients:");
                    for ingredient in &meal.ingredients {
                        println!("  - {}", ingredient.name());
                    }
                })?;
            }
            MealsCommand::Plan => {
                let plan = client.meals().weekly_plan().await?;
                cache_plan(&config, &plan);
                emit(format, &plan, print_plan)?;
            }
        },

        Commands::Products { command } => match command {
            ProductsCommand::List {
                category,
                search,
                seller,
            } => {
                let query = ProductQuery {
                    category,
                    search,
                    seller,
                    ..Default::default()
                };
                let products = client.products().list(&query).await?;
                emit(format, &products, |p| print_products(p))?;
            }
            ProductsCommand::Show { id } => {
                let product = client.products().get(&id).await?;
                emit(format, &product, |p| {
                    println!("{} ({})", p.name, p.id);
                    println!("Price: {}{}", money(p.price), p.unit.as_deref().map(|u| format!(" / {}", u)).unwrap_or_default());
                    println!("Stock: {}{}", p.stock, if p.is_low_stock() { " (low)" } else { "" });
                    if !p.description.is_empty() {
                        println!();
                        println!("{}", p.description);
                    }
                })?;
            }
            ProductsCommand::Add {
                name,
                price,
                stock,
                description,
                unit,
                category,
                low_stock_threshold,
            } => {
                if !(price.is_finite() && price >= 0.0) {
                    bail!("Price must be a non-negative number");
                }
                let product = client
                    .products()
                    .create(&NewProduct {
                        name,
                        description,
                        price,
                        stock,
                        unit,
                        category,
                        image_url: None,
                        low_stock_threshold,
                    })
                    .await?;
                emit(format, &product, |p| println!("Listed {} ({})", p.name, p.id))?;
            }
            ProductsCommand::Update { id, price, stock } => {
                if price.is_none() && stock.is_none() {
                    bail!("Nothing to update; pass --price or --stock");
                }
                let product = client
                    .products()
                    .update(
                        &id,
                        &ProductUpdate {
                            price,
                            stock,
                            ..Default::default()
                        },
                    )
                    .await?;
                emit(format, &product, |p| {
                    println!("{}: {} at {}", p.name, p.stock, money(p.price))
                })?;
            }
            ProductsCommand::Mine => {
                let products = client.products().mine().await?;
                emit(format, &products, |p| print_products(p))?;
            }
            ProductsCommand::LowStock => {
                let products = client.products().low_stock().await?;
                emit(format, &products, |p| {
                    if p.is_empty() {
                        println!("All listings are well stocked.");
                    } else {
                        print_products(p);
                    }
                })?;
            }
            ProductsCommand::Delete { id } => {
                client.products().delete(&id).await?;
                println!("Deleted product {}", id);
            }
        },

        Commands::Orders { command } => match command {
            OrdersCommand::List { seller } => {
                let orders = if seller {
                    client.orders().seller_orders().await?
                } else {
                    client.orders().mine().await?
                };
                emit(format, &orders, |o| print_orders(o))?;
            }
            OrdersCommand::Show { id } => {
                let order = client.orders().get(&id).await?;
                emit(format, &order, print_order)?;
            }
            OrdersCommand::Place {
                items,
                address,
                notes,
            } => {
                let items = items
                    .iter()
                    .map(|s| parse_order_item(s))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                let order = client
                    .orders()
                    .place(&NewOrder {
                        items,
                        delivery_address: address,
                        notes,
                    })
                    .await?;
                emit(format, &order, print_order)?;
            }
            OrdersCommand::Advance { id } => {
                let order = client.orders().get(&id).await?;
                let updated = client.orders().advance(&order).await?;
                emit(format, &updated, |u| {
                    println!("Order {}: {} -> {}", u.id, order.status, u.status)
                })?;
            }
            OrdersCommand::Cancel { id } => {
                let order = client.orders().get(&id).await?;
                let updated = client.orders().cancel(&order).await?;
                emit(format, &updated, |u| println!("Order {}: {}", u.id, u.status))?;
            }
            OrdersCommand::Archive { id } => {
                let order = client.orders().get(&id).await?;
                let updated = client.orders().archive(&order).await?;
                emit(format, &updated, |u| println!("Order {}: {}", u.id, u.status))?;
            }
            OrdersCommand::Verify { id, reference } => {
                let result = client.orders().verify_payment(&id, &reference).await?;
                emit(format, &result, |r| {
                    if r.verified {
                        println!("Payment verified for order {}", id);
                    } else {
                        println!(
                            "Payment not verified ({})",
                            r.status.as_deref().unwrap_or("unknown")
                        );
                    }
                })?;
            }
        },

        Commands::Budget { command } => {
            let budget = match command {
                BudgetCommand::Show => client.budget().get().await?,
                BudgetCommand::Set { limit, currency } => {
                    if !(limit.is_finite() && limit >= 0.0) {
                        bail!("Budget limit must be a non-negative number");
                    }
                    client
                        .budget()
                        .set(&BudgetUpdate {
                            weekly_limit: limit,
                            currency,
                        })
                        .await?
                }
            };
            emit(format, &budget, |b| {
                let summary = b.summary();
                println!("Limit:     {} {} ({})", money(b.weekly_limit), b.currency, b.period);
                println!("Spent:     {} {}", money(b.spent), b.currency);
                println!("Remaining: {} {}", money(summary.remaining), b.currency);
                println!(
                    "Used:      {:.0}%{}",
                    summary.percent_used,
                    if summary.over_budget { " (over budget)" } else { "" }
                );
            })?;
        }

        Commands::Chat { command } => match command {
            ChatCommand::List => {
                let conversations = client.chat().conversations().await?;
                emit(format, &conversations, |cs| {
                    if cs.is_empty() {
                        println!("No conversations yet.");
                        return;
                    }
                    println!("{:<26} {:<8} {}", "ID", "Unread", "Last message");
                    println!("{}", "-".repeat(70));
                    for c in cs {
                        println!(
                            "{:<26} {:<8} {}",
                            c.id,
                            c.unread_count,
                            truncate(c.last_message.as_deref().unwrap_or("-"), 36)
                        );
                    }
                })?;
            }
            ChatCommand::Read { id } => {
                let messages = client.chat().messages(&id).await?;
                client.chat().mark_read(&id).await?;
                emit(format, &messages, |m| print_messages(m))?;
            }
            ChatCommand::Send { id, text } => {
                let message = client.chat().send(&id, &text.join(" ")).await?;
                emit(format, &message, |m| println!("Sent ({})", m.id))?;
            }
            ChatCommand::Start { participant } => {
                let conversation = client.chat().start(&participant).await?;
                emit(format, &conversation, |c| println!("Conversation {}", c.id))?;
            }
        },

        Commands::Preferences { command } => {
            let prefs = match command {
                PreferencesCommand::Show => client.preferences().get().await?,
                PreferencesCommand::Set {
                    diet,
                    allergy,
                    cuisine,
                    calories,
                    household,
                    budget_per_meal,
                } => {
                    let mut prefs = client.preferences().get().await?;
                    if !diet.is_empty() {
                        prefs.dietary_restrictions = diet;
                    }
                    if !allergy.is_empty() {
                        prefs.allergies = allergy;
                    }
                    if !cuisine.is_empty() {
                        prefs.cuisines = cuisine;
                    }
                    prefs.calorie_target = calories.or(prefs.calorie_target);
                    prefs.household_size = household.or(prefs.household_size);
                    prefs.budget_per_meal = budget_per_meal.or(prefs.budget_per_meal);
                    client.preferences().update(&prefs).await?
                }
            };
            emit(format, &prefs, |p| {
                println!("Diet:       {}", list_or_dash(&p.dietary_restrictions));
                println!("Allergies:  {}", list_or_dash(&p.allergies));
                println!("Cuisines:   {}", list_or_dash(&p.cuisines));
                println!("Calories:   {}", p.calorie_target.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()));
                println!("Household:  {}", p.household_size.map(|h| h.to_string()).unwrap_or_else(|| "-".to_string()));
                println!("Per meal:   {}", p.budget_per_meal.map(money).unwrap_or_else(|| "-".to_string()));
            })?;
        }

        Commands::Settings { command } => match command {
            SettingsCommand::Show => {
                let settings = client.settings().get().await?;
                emit(format, &settings, |s| {
                    println!("Theme:         {}", s.theme);
                    println!("Notifications: {}", if s.notifications_enabled { "on" } else { "off" });
                    println!("Language:      {}", s.language);
                })?;
            }
            SettingsCommand::Theme { theme } => {
                let store = open_store(&config)?;
                store.set_theme(theme)?;

                if client.is_authenticated().await {
                    let mut settings = client.settings().get().await?;
                    settings.theme = theme;
                    client.settings().update(&settings).await?;
                    println!("Theme set to {}", theme);
                } else {
                    println!("Theme set to {} (local only; sign in to sync)", theme);
                }
            }
            SettingsCommand::Password { current, new } => {
                if new.len() < 6 {
                    bail!("New password must be at least 6 characters");
                }
                client
                    .settings()
                    .change_password(&PasswordChange {
                        current_password: current,
                        new_password: new,
                    })
                    .await?;
                println!("Password changed");
            }
        },

        Commands::Recommend {
            days,
            current,
            history,
            rate,
        } => {
            if history {
                let records = client.recommendations().history().await?;
                emit(format, &records, |records| {
                    if records.is_empty() {
                        println!("No recommendations yet.");
                        return;
                    }
                    println!("{:<26} {:<18} {:<7} {}", "ID", "Created", "Meals", "Rating");
                    println!("{}", "-".repeat(62));
                    for r in records {
                        println!(
                            "{:<26} {:<18} {:<7} {}",
                            r.id,
                            r.created_at.map(|t| t.format("%Y-%m-%d %H:%M").to_string()).unwrap_or_else(|| "-".to_string()),
                            r.plan.as_ref().map_or(0, WeeklyMealPlan::meal_count),
                            r.rating.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string())
                        );
                    }
                })?;
                return Ok(());
            }

            if let Some(rate) = rate {
                let [id, rating] = rate.as_slice() else {
                    bail!("--rate takes an ID and a rating");
                };
                let rating: u8 = rating
                    .parse()
                    .ok()
                    .filter(|r| (1..=5).contains(r))
                    .context("Rating must be between 1 and 5")?;
                client
                    .recommendations()
                    .feedback(id, &Feedback { rating, comment: None })
                    .await?;
                println!("Thanks for the feedback");
                return Ok(());
            }

            let plan = if current {
                client.recommendations().current().await?
            } else {
                if !(1..=14).contains(&days) {
                    bail!("Days must be between 1 and 14");
                }
                client
                    .recommendations()
                    .generate(&RecommendationRequest {
                        days,
                        preferences: None,
                    })
                    .await?
            };
            cache_plan(&config, &plan);
            emit(format, &plan, print_plan)?;
        }

        Commands::Groceries {
            refresh,
            check,
            reset,
            csv,
        } => {
            let store = open_store(&config)?;
            let list = prepare_list(
                &client,
                &store,
                &ListOptions {
                    refresh,
                    reset,
                    toggle: check,
                },
            )
            .await?;
            let GroceryList {
                items, checklist, ..
            } = list;

            if let Some(path) = &csv {
                let file = std::fs::File::create(path)
                    .with_context(|| format!("Cannot create {:?}", path))?;
                write_csv(&items, file)?;
                eprintln!("Wrote {} items to {:?}", items.len(), path);
            }

            emit(format, &items, |items| print_groceries(items, &checklist))?;
        }

        Commands::Backup { command } => match command {
            BackupCommand::Show => {
                let settings = client.backup().settings().await?;
                emit(format, &settings, print_backup_settings)?;
            }
            BackupCommand::Set {
                enabled,
                frequency,
                retention_days,
            } => {
                let mut settings = client.backup().settings().await?;
                if let Some(enabled) = enabled {
                    settings.enabled = enabled;
                }
                if let Some(frequency) = frequency {
                    settings.frequency = frequency;
                }
                if let Some(days) = retention_days {
                    settings.retention_days = days;
                }
                let saved = client.backup().update(&settings).await?;
                emit(format, &saved, print_backup_settings)?;
            }
            BackupCommand::Run => {
                let record = client.backup().run_now().await?;
                emit(format, &record, |r| println!("Backup {} {}", r.id, r.status))?;
            }
            BackupCommand::History => {
                let records = client.backup().history().await?;
                emit(format, &records, |records| {
                    println!("{:<26} {:<18} {:<12} {}", "ID", "Created", "Size", "Status");
                    println!("{}", "-".repeat(70));
                    for r in records {
                        println!(
                            "{:<26} {:<18} {:<12} {}",
                            r.id,
                            r.created_at.map(|t| t.format("%Y-%m-%d %H:%M").to_string()).unwrap_or_else(|| "-".to_string()),
                            r.size_bytes.map(format_bytes).unwrap_or_else(|| "-".to_string()),
                            r.status
                        );
                    }
                })?;
            }
        },

        Commands::Admin { command } => match command {
            AdminCommand::Stats => {
                let stats = client.admin().stats().await?;
                emit(format, &stats, |s| {
                    println!("Users:          {}", s.total_users);
                    println!("Sellers:        {}", s.total_sellers);
                    println!("Orders:         {}", s.total_orders);
                    println!("Pending orders: {}", s.pending_orders);
                    println!("Revenue:        {}", money(s.total_revenue));
                })?;
            }
            AdminCommand::Users => {
                let users = client.admin().users().await?;
                emit(format, &users, |u| print_users(u))?;
            }
            AdminCommand::Orders => {
                let orders = client.admin().orders().await?;
                emit(format, &orders, |o| print_orders(o))?;
            }
            AdminCommand::Suspend { id } => {
                let user = client.admin().set_user_active(&id, false).await?;
                emit(format, &user, |u| println!("Suspended {}", u.email))?;
            }
            AdminCommand::Reinstate { id } => {
                let user = client.admin().set_user_active(&id, true).await?;
                emit(format, &user, |u| println!("Reinstated {}", u.email))?;
            }
            AdminCommand::DeleteUser { id } => {
                client.admin().delete_user(&id).await?;
                println!("Deleted user {}", id);
            }
        },

        Commands::Health => match client.health().await {
            Ok(()) => println!("Backend at {} is up", client.base_url()),
            Err(e) => {
                eprintln!("Cannot reach the Mealwise backend at {}", client.base_url());
                return Err(e.into());
            }
        },

        Commands::Config { output } => {
            let content = mealwise::config::generate_default_config();
            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

// ============================================
// Helpers
// ============================================

fn needs_sign_in(e: &anyhow::Error) -> bool {
    match (e.downcast_ref::<ApiError>(), e.downcast_ref::<GroceryError>()) {
        (Some(api), _) | (_, Some(GroceryError::Api(api))) => api.is_auth(),
        _ => false,
    }
}

fn open_store(config: &Config) -> anyhow::Result<LocalStore> {
    let dir = config.cache.path();
    LocalStore::open(&dir).with_context(|| format!("Cannot open cache directory {:?}", dir))
}

/// Cache a fetched plan; a failed cache write is logged, not fatal
fn cache_plan(config: &Config, plan: &WeeklyMealPlan) {
    let result = open_store(config).and_then(|store| Ok(store.cache_meal_plan(plan)?));
    if let Err(e) = result {
        tracing::warn!(error = %format!("{:#}", e), "Could not cache meal plan");
    }
}

fn emit<T: Serialize + ?Sized>(format: OutputFormat, value: &T, table: impl FnOnce(&T)) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Table => table(value),
    }
    Ok(())
}

fn parse_order_item(s: &str) -> anyhow::Result<NewOrderItem> {
    let (product_id, quantity) = match s.rsplit_once(':') {
        Some((id, qty)) => {
            let qty: u32 = qty
                .parse()
                .with_context(|| format!("Invalid quantity in {:?}", s))?;
            (id, qty)
        }
        None => (s, 1),
    };
    if product_id.is_empty() || quantity == 0 {
        bail!("Invalid order item {:?}; expected PRODUCT_ID[:QTY]", s);
    }
    Ok(NewOrderItem {
        product_id: product_id.to_string(),
        quantity,
    })
}

fn money(value: f64) -> String {
    format!("{:.2}", value)
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let cut: String = s.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

fn list_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

fn print_plan(plan: &WeeklyMealPlan) {
    if plan.days.is_empty() {
        println!("No meals planned.");
        return;
    }
    for day in &plan.days {
        println!("{}", day.day);
        for (slot, meal) in &day.meals {
            let price = meal.price.map(|p| format!("  ({})", money(p))).unwrap_or_default();
            println!("  {:<10} {}{}", slot, meal.name, price);
        }
    }
    let total = plan.total_cost.unwrap_or_else(|| plan.estimated_cost());
    if total > 0.0 {
        println!();
        println!("Estimated cost: {}", money(total));
    }
}

fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("No products found.");
        return;
    }
    println!("{:<26} {:<24} {:<10} {:<8} {}", "ID", "Name", "Price", "Stock", "Category");
    println!("{}", "-".repeat(80));
    for p in products {
        println!(
            "{:<26} {:<24} {:<10} {:<8} {}",
            p.id,
            truncate(&p.name, 24),
            money(p.price),
            if p.is_low_stock() { format!("{}!", p.stock) } else { p.stock.to_string() },
            p.category.as_deref().unwrap_or("-")
        );
    }
}

fn print_orders(orders: &[Order]) {
    if orders.is_empty() {
        println!("No orders yet.");
        return;
    }
    println!("{:<26} {:<11} {:<7} {:<10} {}", "ID", "Status", "Items", "Total", "Placed");
    println!("{}", "-".repeat(76));
    for o in orders {
        println!(
            "{:<26} {:<11} {:<7} {:<10} {}",
            o.id,
            o.status.label(),
            o.items.len(),
            money(if o.total > 0.0 { o.total } else { o.computed_total() }),
            o.created_at.map(|t| t.format("%Y-%m-%d %H:%M").to_string()).unwrap_or_else(|| "-".to_string())
        );
    }
}

fn print_order(order: &Order) {
    println!("Order {} - {}", order.id, order.status);
    for item in &order.items {
        println!(
            "  {:<24} x{:<4} {}",
            item.name.as_deref().unwrap_or(&item.product_id),
            item.quantity,
            money(item.price * f64::from(item.quantity))
        );
    }
    let total = if order.total > 0.0 { order.total } else { order.computed_total() };
    println!("Total: {}", money(total));
    if let Some(payment) = &order.payment_status {
        println!("Payment: {}", payment);
    }
    if let Some(next) = order.status.next() {
        println!("Next: {}", next);
    }
}

fn print_messages(messages: &[Message]) {
    if messages.is_empty() {
        println!("No messages.");
        return;
    }
    for m in messages {
        let when = m
            .created_at
            .map(|t| t.format("%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("[{}] {}: {}", when, m.sender_id, m.content);
    }
}

fn print_users(users: &[User]) {
    println!("{:<26} {:<28} {:<9} {}", "ID", "Email", "Role", "Active");
    println!("{}", "-".repeat(72));
    for u in users {
        println!(
            "{:<26} {:<28} {:<9} {}",
            u.id,
            truncate(&u.email, 28),
            u.role,
            if u.active { "yes" } else { "no" }
        );
    }
}

fn print_backup_settings(s: &BackupSettings) {
    println!("Enabled:   {}", if s.enabled { "yes" } else { "no" });
    println!("Frequency: {}", s.frequency);
    println!("Retention: {} days", s.retention_days);
    println!(
        "Last run:  {}",
        s.last_backup_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string())
    );
}

fn print_groceries(items: &[GroceryItem], checklist: &GroceryChecklist) {
    if items.is_empty() {
        println!("The meal plan has no ingredients.");
        return;
    }
    for item in items {
        let mark = if checklist.is_checked(&item.name) { "x" } else { " " };
        let days: Vec<&str> = item.occurrences.iter().map(|o| o.day.as_str()).collect();
        let mut unique_days = days.clone();
        unique_days.dedup();
        println!("[{}] {:<24} x{:<3} {}", mark, truncate(&item.name, 24), item.count, unique_days.join(", "));
    }
    println!();
    println!("{} of {} items checked", checklist.len(), items.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order_item() {
        let item = parse_order_item("p1:3").unwrap();
        assert_eq!(item.product_id, "p1");
        assert_eq!(item.quantity, 3);

        assert_eq!(parse_order_item("p2").unwrap().quantity, 1);
        assert!(parse_order_item("p3:0").is_err());
        assert!(parse_order_item("p4:many").is_err());
        assert!(parse_order_item(":2").is_err());
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(money(3.0), "3.00");
        assert_eq!(truncate("Groundnut soup", 8), "Groundn…");
        assert_eq!(truncate("Rice", 8), "Rice");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(list_or_dash(&[]), "-");
    }

    #[test]
    fn test_json_format_skips_table_output() {
        let order: Order =
            serde_json::from_value(serde_json::json!({"_id": "o1", "status": "cancelled"})).unwrap();
        emit(OutputFormat::Json, &order, |_| panic!("table printed in json mode")).unwrap();

        let mut printed = false;
        emit(OutputFormat::Table, &order, |o| printed = o.id == "o1").unwrap();
        assert!(printed);
    }

    #[test]
    fn test_sign_in_hint_sees_wrapped_errors() {
        assert!(needs_sign_in(&anyhow::Error::from(ApiError::NotAuthenticated)));
        assert!(needs_sign_in(&anyhow::Error::from(GroceryError::Api(
            ApiError::Unauthorized("expired".to_string())
        ))));
        assert!(!needs_sign_in(&anyhow::Error::from(ApiError::RateLimited)));
        assert!(!needs_sign_in(&anyhow::anyhow!("disk full")));
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["mealwise", "--format", "json", "orders", "place", "p1:2", "p2"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Orders { command: OrdersCommand::Place { ref items, .. } } if items.len() == 2));

        let cli = Cli::try_parse_from(["mealwise", "settings", "theme", "dark"]).unwrap();
        assert!(matches!(cli.command, Commands::Settings { command: SettingsCommand::Theme { theme: Theme::Dark } }));

        assert!(Cli::try_parse_from(["mealwise", "settings", "theme", "sepia"]).is_err());
    }
}
