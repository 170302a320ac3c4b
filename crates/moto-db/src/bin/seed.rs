//! # Seed Data Generator
//!
//! Populates the database with demo listings for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./motomarket_dev.db
//! cargo run -p moto-db --bin seed
//!
//! # Specify database path and admin password
//! cargo run -p moto-db --bin seed -- --db ./data/motomarket.db --password s3cret-pass
//! ```
//!
//! ## Generated Data
//! - An admin account (`admin@motomarket.co`) and a seller account
//!   (`vendedor@motomarket.co`), both with the given password
//! - Approved motorcycles for sale across common local brands
//! - Approved rentals with daily prices
//! - One listing of each kind left `pending` for the moderation queue

use std::env;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use moto_core::{ModerationStatus, Money, MotorcycleInput, RentalInput, Role};
use moto_db::{Database, DbConfig, NewUser};

/// (brand, model, year, price in pesos, mileage km)
const MOTORCYCLES: &[(&str, &str, i64, i64, i64)] = &[
    ("Yamaha", "FZ 2.0", 2021, 8_500_000, 18_000),
    ("Yamaha", "XTZ 150", 2022, 11_200_000, 9_500),
    ("Honda", "CB 190R", 2020, 7_900_000, 25_000),
    ("Honda", "XR 150L", 2023, 10_400_000, 4_200),
    ("Suzuki", "Gixxer 150", 2021, 7_300_000, 21_000),
    ("Bajaj", "Pulsar NS 200", 2022, 9_800_000, 12_000),
    ("AKT", "NKD 125", 2023, 4_600_000, 3_000),
    ("KTM", "Duke 200", 2020, 12_500_000, 30_000),
    ("TVS", "Apache RTR 160", 2022, 8_100_000, 14_500),
    ("Hero", "Eco Deluxe", 2023, 3_900_000, 1_500),
];

/// (brand, model, year, price per day)
const RENTALS: &[(&str, &str, i64, i64)] = &[
    ("Honda", "XR 150L", 2023, 90_000),
    ("Yamaha", "BWS 125", 2022, 70_000),
    ("Suzuki", "DR 150", 2022, 85_000),
    ("AKT", "Dynamic 125", 2023, 55_000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./motomarket_dev.db");
    let mut password = String::from("motomarket123");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--password" | "-p" => {
                if i + 1 < args.len() {
                    password = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("MotoMarket Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>          Database file path (default: ./motomarket_dev.db)");
                println!("  -p, --password <PASS>    Password for the demo accounts (default: motomarket123)");
                println!("  -h, --help               Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🏍  MotoMarket Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.users().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} users", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let password_hash = hash(&password)?;

    let admin = db
        .users()
        .create(NewUser {
            name: "Administrador".to_string(),
            email: "admin@motomarket.co".to_string(),
            password_hash: password_hash.clone(),
            phone: Some("3000000000".to_string()),
            role: Role::Admin,
        })
        .await?;

    let seller = db
        .users()
        .create(NewUser {
            name: "Vendedor Demo".to_string(),
            email: "vendedor@motomarket.co".to_string(),
            password_hash,
            phone: Some("3001112233".to_string()),
            role: Role::User,
        })
        .await?;

    println!("✓ Created users {} and {}", admin.email, seller.email);

    let motorcycles = db.motorcycles();
    for (idx, (brand, model, year, price, mileage)) in MOTORCYCLES.iter().enumerate() {
        let moto = motorcycles
            .create(
                &seller.id,
                &MotorcycleInput {
                    name: format!("{brand} {model} {year}"),
                    brand: brand.to_string(),
                    model: model.to_string(),
                    year: *year,
                    price: Money::from_pesos(*price),
                    mileage_km: *mileage,
                    description: Some(format!("{brand} {model}, papeles al día, {mileage} km.")),
                    image_url: None,
                },
            )
            .await?;

        // Leave the last one in the moderation queue.
        if idx + 1 < MOTORCYCLES.len() {
            motorcycles
                .set_status(&moto.id, ModerationStatus::Approved)
                .await?;
        }
    }

    println!("✓ Created {} motorcycles", MOTORCYCLES.len());

    let rentals = db.rentals();
    for (idx, (brand, model, year, per_day)) in RENTALS.iter().enumerate() {
        let rental = rentals
            .create(
                &seller.id,
                &RentalInput {
                    name: format!("{brand} {model}"),
                    brand: brand.to_string(),
                    model: model.to_string(),
                    year: *year,
                    price_per_day: Money::from_pesos(*per_day),
                    description: Some(format!("Alquiler por día, {}", Money::from_pesos(*per_day))),
                    image_url: None,
                },
            )
            .await?;

        if idx + 1 < RENTALS.len() {
            rentals
                .set_status(&rental.id, ModerationStatus::Approved)
                .await?;
        }
    }

    println!("✓ Created {} rentals", RENTALS.len());

    println!();
    println!("✓ Seed complete. Log in as admin@motomarket.co");

    db.close().await;
    Ok(())
}

fn hash(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}
