//! Common test utilities

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use rust_decimal_macros::dec;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use trip_admin_stats::domain::{Activity, City, Role, Trip, TripActivity, TripStop, User};
use trip_admin_stats::MemoryStatsStore;

pub fn city(id: &str, name: &str, country: &str) -> City {
    City {
        id: id.to_string(),
        name: name.to_string(),
        country: country.to_string(),
        cost_index: 7,
        popularity: 80,
        image_url: Some(format!("https://img.example.com/{}.jpg", id)),
    }
}

pub fn activity(id: &str, name: &str, category: &str) -> Activity {
    Activity {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        cost: dec!(45.00),
        duration: 120,
        image_url: None,
    }
}

pub fn user(id: &str, created_at: DateTime<Utc>) -> User {
    User {
        id: id.to_string(),
        email: format!("{}@example.com", id),
        name: id.to_uppercase(),
        role: Role::User,
        created_at,
    }
}

/// Store with paris×5, rome×5, nyc×2 stops; nyc has no city row.
/// Trips: two created a day ago, one 40 days ago.
pub fn seeded_store(now: DateTime<Utc>) -> MemoryStatsStore {
    let mut stops = Vec::new();
    for (city_id, n) in [("paris", 5), ("rome", 5), ("nyc", 2)] {
        for i in 0..n {
            stops.push(TripStop {
                trip_id: format!("trip-{}", i),
                city_id: city_id.to_string(),
            });
        }
    }

    let trips = vec![
        Trip {
            id: "trip-0".to_string(),
            owner_id: "alice".to_string(),
            created_at: now - Duration::days(1),
        },
        Trip {
            id: "trip-1".to_string(),
            owner_id: "alice".to_string(),
            created_at: now - Duration::days(1),
        },
        Trip {
            id: "trip-2".to_string(),
            owner_id: "bob".to_string(),
            created_at: now - Duration::days(40),
        },
    ];

    MemoryStatsStore::new()
        .with_users(vec![
            user("alice", now - Duration::days(60)),
            user("bob", now - Duration::days(45)),
        ])
        .with_trips(trips)
        .with_cities(vec![city("paris", "Paris", "France"), city("rome", "Rome", "Italy")])
        .with_activities(vec![
            activity("louvre", "Louvre Museum", "culture"),
            activity("colosseum", "Colosseum Tour", "history"),
        ])
        .with_trip_stops(stops)
        .with_trip_activities(vec![
            TripActivity {
                trip_id: "trip-0".to_string(),
                activity_id: "colosseum".to_string(),
            },
            TripActivity {
                trip_id: "trip-1".to_string(),
                activity_id: "colosseum".to_string(),
            },
            TripActivity {
                trip_id: "trip-1".to_string(),
                activity_id: "louvre".to_string(),
            },
        ])
}

/// Setup test database - truncate tables and seed test data
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    let mut tx = pool.begin().await.expect("Failed to begin transaction");

    sqlx::query("TRUNCATE TABLE trip_activities, trip_stops, trips, activities, cities, users CASCADE")
        .execute(&mut *tx)
        .await
        .expect("Failed to clean up DB");

    sqlx::query(
        r#"
        INSERT INTO users (id, email, name, role, created_at) VALUES
            ('alice', 'alice@example.com', 'Alice', 'admin', NOW() - INTERVAL '60 days'),
            ('bob', 'bob@example.com', 'Bob', 'user', NOW() - INTERVAL '45 days')
        "#,
    )
    .execute(&mut *tx)
    .await
    .expect("Failed to seed users");

    sqlx::query(
        r#"
        INSERT INTO trips (id, owner_id, created_at) VALUES
            ('trip-0', 'alice', NOW() - INTERVAL '1 day'),
            ('trip-1', 'alice', NOW() - INTERVAL '1 day'),
            ('trip-2', 'bob', NOW() - INTERVAL '40 days')
        "#,
    )
    .execute(&mut *tx)
    .await
    .expect("Failed to seed trips");

    sqlx::query(
        r#"
        INSERT INTO cities (id, name, country, cost_index, popularity) VALUES
            ('paris', 'Paris', 'France', 8, 95),
            ('rome', 'Rome', 'Italy', 6, 90)
        "#,
    )
    .execute(&mut *tx)
    .await
    .expect("Failed to seed cities");

    sqlx::query(
        r#"
        INSERT INTO trip_stops (trip_id, city_id) VALUES
            ('trip-0', 'paris'), ('trip-1', 'paris'), ('trip-2', 'paris'),
            ('trip-0', 'rome'),
            ('trip-1', 'nyc'), ('trip-2', 'nyc')
        "#,
    )
    .execute(&mut *tx)
    .await
    .expect("Failed to seed trip stops");

    tx.commit().await.expect("Failed to commit transaction");

    pool
}
