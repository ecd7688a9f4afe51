//! # Seed Data Generator
//!
//! Populates a store with sample stock for manual testing.
//!
//! ## Usage
//! ```bash
//! # Generate 200 items (default)
//! cargo run -p stockroom-sync --bin seed
//!
//! # Generate custom amount
//! cargo run -p stockroom-sync --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p stockroom-sync --bin seed -- --db ./data/stockroom.db
//! ```
//!
//! ## Generated Items
//! Perishable goods across a few departments, created through the engine
//! so ids, validation and persistence follow the normal path:
//! - Names repeat across lots (the same product in several batches)
//! - Quantities 0 - 40, so some lines are sold out
//! - Prices $0.99 - $9.98
//! - Expiration dates from 10 days ago to 7 weeks out, so some are spoiled

use std::env;
use std::sync::Arc;

use chrono::{Days, Local, NaiveDate};
use stockroom_core::{summarize, Money, SignalMode};
use stockroom_db::{Database, DbConfig};
use stockroom_sync::{init_tracing, EngineOptions, InventoryEngine, NoOpView};

/// Departments and the products stocked in each.
const DEPARTMENTS: &[(&str, &[&str])] = &[
    ("Dairy", &["Milk", "Oat Milk", "Yogurt", "Butter", "Cheddar", "Cream"]),
    ("Bakery", &["Sourdough", "Bagels", "Croissants", "Rye Bread"]),
    ("Produce", &["Bananas", "Apples", "Spinach", "Tomatoes", "Avocados"]),
    ("Meat", &["Chicken Breast", "Ground Beef", "Salmon Fillet"]),
    ("Deli", &["Hummus", "Potato Salad", "Sliced Turkey"]),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./stockroom_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stockroom Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of items to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./stockroom_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Stockroom Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Items:    {}", count);
    println!();

    let db = Database::open(DbConfig::new(&db_path)).await?;
    let repo = db.items();

    let existing = repo.count().await?;
    if existing > 0 {
        println!("Database already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut engine =
        InventoryEngine::load(Arc::new(repo), Arc::new(NoOpView), EngineOptions::default()).await?;

    let today = Local::now().date_naive();
    let products: Vec<&str> = DEPARTMENTS
        .iter()
        .flat_map(|(_, names)| names.iter().copied())
        .collect();

    let start = std::time::Instant::now();
    let mut generated = 0;

    for seed in 0..count {
        let name = products[seed % products.len()];
        let (quantity, price, expires) = generate_lot(seed, today);

        if let Err(e) = engine.create(name, quantity, price, expires) {
            eprintln!("Failed to create {}: {}", name, e);
            continue;
        }
        generated += 1;
    }

    engine.flush().await?;
    let stats = engine.persist_stats();

    let elapsed = start.elapsed();
    println!("Generated {} items in {:?}", generated, elapsed);
    println!(
        "Store writes: {} completed, {} failed",
        stats.completed(),
        stats.failed()
    );

    let summary = engine.summary();
    println!();
    println!("Summary");
    println!("  Total quantity: {}", summary.total_quantity);
    println!("  Total value:    {}", summary.total_value);
    println!("  Unique names:   {}", summary.unique_name_count);
    println!(
        "  Spoiled lots:   {}",
        summarize(&engine.snapshot(), today, SignalMode::Accumulate).spoilage_count
    );

    db.close().await;

    println!();
    println!("Seed complete!");

    Ok(())
}

/// Generates quantity, price and expiration for one lot.
fn generate_lot(seed: usize, today: NaiveDate) -> (i64, Money, NaiveDate) {
    let quantity = (seed % 41) as i64;
    let price = Money::from_cents(99 + ((seed * 17) % 900) as i64);

    // -10 .. +49 days around today
    let offset = (seed * 7) % 60;
    let expires = if offset < 10 {
        today.checked_sub_days(Days::new((10 - offset) as u64))
    } else {
        today.checked_add_days(Days::new((offset - 10) as u64))
    }
    .unwrap_or(today);

    (quantity, price, expires)
}
