#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use finman_database::Database;
use finman_domain::{BudgetPlan, Transaction, User};

pub fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).single().expect("valid date")
}

pub fn user(username: &str) -> User {
    User {
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        password: "$2b$12$hash".to_owned(),
        first_name: "Test".to_owned(),
        last_name: username.to_owned(),
        date_registered: at(1),
        last_login: at(2),
    }
}

pub fn transaction(uuid: &str, username: &str, amount: f64) -> Transaction {
    Transaction {
        uuid: uuid.to_owned(),
        username: username.to_owned(),
        kind: "expense".to_owned(),
        amount,
        category: "food".to_owned(),
        date: at(5),
        description: "groceries".to_owned(),
        is_recurring: "false".to_owned(),
        frequency: String::new(),
    }
}

pub fn budget_plan(uuid: &str, username: &str, limit: f64) -> BudgetPlan {
    BudgetPlan {
        uuid: uuid.to_owned(),
        username: username.to_owned(),
        category: "food".to_owned(),
        budget_limit: limit,
        start_date: at(1),
        end_date: at(31),
    }
}

/// Fresh in-memory database with the finman schema applied.
/// # Panics
/// * If the embedded engine cannot start.
pub async fn memory_db() -> Database {
    Database::builder()
        .url("mem://")
        .session("finman_test", "financeManagerDB")
        .init()
        .await
        .expect("connect to mem://")
}
