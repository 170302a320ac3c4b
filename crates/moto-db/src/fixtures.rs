//! Test fixtures shared by the repository tests.

use moto_core::{ModerationStatus, Money, Motorcycle, MotorcycleInput, Rental, RentalInput, Role, User};

use crate::pool::{Database, DbConfig};
use crate::repository::user::NewUser;

pub async fn test_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

pub async fn user(db: &Database, email: &str) -> User {
    db.users()
        .create(NewUser {
            name: email.split('@').next().unwrap_or("user").to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$test".to_string(),
            phone: Some("3001234567".to_string()),
            role: Role::User,
        })
        .await
        .unwrap()
}

pub fn moto_input(brand: &str, price: i64) -> MotorcycleInput {
    MotorcycleInput {
        name: format!("{brand} 2022"),
        brand: brand.to_string(),
        model: "Street".to_string(),
        year: 2022,
        price: Money::from_pesos(price),
        mileage_km: 10_000,
        description: Some("Papeles al día".to_string()),
        image_url: None,
    }
}

pub fn rental_input(per_day: i64) -> RentalInput {
    RentalInput {
        name: "Honda XR150L".to_string(),
        brand: "Honda".to_string(),
        model: "XR150L".to_string(),
        year: 2023,
        price_per_day: Money::from_pesos(per_day),
        description: None,
        image_url: None,
    }
}

pub async fn approved_motorcycle(db: &Database, seller_id: &str, brand: &str, price: i64) -> Motorcycle {
    let moto = db
        .motorcycles()
        .create(seller_id, &moto_input(brand, price))
        .await
        .unwrap();
    db.motorcycles()
        .set_status(&moto.id, ModerationStatus::Approved)
        .await
        .unwrap()
}

pub async fn approved_rental(db: &Database, owner_id: &str, per_day: i64) -> Rental {
    let rental = db
        .rentals()
        .create(owner_id, &rental_input(per_day))
        .await
        .unwrap();
    db.rentals()
        .set_status(&rental.id, ModerationStatus::Approved)
        .await
        .unwrap()
}
