//! Database seeder for Finbook development and testing.
//!
//! Seeds a demo user with two accounts, category budgets for the
//! current month, a savings goal and a small transaction history.
//!
//! Usage: cargo run --bin seeder

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use finbook_core::account::{Account, AccountService, NewAccount};
use finbook_core::budget::{BudgetService, NewBudget};
use finbook_core::goal::{Goal, GoalService, NewGoal};
use finbook_core::transaction::{NewTransaction, TransactionKind, TransactionService};
use finbook_core::user::{NewUser, User, UserRepository, UserService};
use finbook_db::{
    MongoAccountRepository, MongoBudgetRepository, MongoGoalRepository,
    MongoTransactionRepository, MongoUserRepository,
};
use finbook_shared::AppConfig;
use finbook_shared::types::UserId;

/// Demo user email (consistent for all seeds).
const DEMO_EMAIL: &str = "demo@finbook.dev";

struct Seeder {
    users: UserService,
    accounts: AccountService,
    budgets: Arc<BudgetService>,
    goals: Arc<GoalService>,
    transactions: TransactionService,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().expect("Failed to load configuration");

    println!("Connecting to MongoDB...");
    let db = finbook_db::connect(&config.mongo)
        .await
        .expect("Failed to connect to MongoDB");
    finbook_db::ensure_indexes(&db)
        .await
        .expect("Failed to ensure indexes");

    let user_repo = Arc::new(MongoUserRepository::new(&db));
    let account_repo = Arc::new(MongoAccountRepository::new(&db));
    let budgets = Arc::new(BudgetService::new(Arc::new(MongoBudgetRepository::new(
        &db,
    ))));
    let goals = Arc::new(GoalService::new(
        Arc::new(MongoGoalRepository::new(&db)),
        account_repo.clone(),
    ));
    let seeder = Seeder {
        users: UserService::new(user_repo.clone()),
        accounts: AccountService::new(account_repo.clone(), user_repo.clone()),
        budgets: budgets.clone(),
        goals: goals.clone(),
        transactions: TransactionService::new(
            Arc::new(MongoTransactionRepository::new(&db)),
            user_repo.clone(),
            account_repo,
            budgets,
            goals,
        ),
    };

    // Check if the demo user already exists
    if user_repo
        .find_by_email(DEMO_EMAIL)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo user already exists, skipping...");
        return;
    }

    println!("Seeding demo user...");
    let user = seed_demo_user(&seeder).await;

    println!("Seeding accounts...");
    let (checking, savings) = seed_accounts(&seeder, user.id).await;

    println!("Seeding budgets...");
    seed_budgets(&seeder, user.id).await;

    println!("Seeding savings goal...");
    let goal = seed_goal(&seeder, &savings).await;

    println!("Seeding transactions...");
    seed_transactions(&seeder, &checking, &goal).await;

    println!("Seeding complete!");
}

fn money(raw: &str) -> Decimal {
    Decimal::from_str(raw).unwrap()
}

/// Noon UTC on the given day, so seeded events sort stably.
fn at_noon(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
}

/// First and last day of the current calendar month.
fn current_month() -> (NaiveDate, NaiveDate) {
    let today = Utc::now().date_naive();
    let start = today.with_day(1).unwrap();
    let next_month = if start.month() == 12 {
        NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
    };
    (start, next_month.unwrap().pred_opt().unwrap())
}

async fn seed_demo_user(seeder: &Seeder) -> User {
    let user = seeder
        .users
        .create(NewUser {
            email: DEMO_EMAIL.to_string(),
            name: "Demo User".to_string(),
        })
        .await
        .expect("Failed to create demo user");
    println!("  Created demo user: {DEMO_EMAIL}");
    user
}

async fn seed_accounts(seeder: &Seeder, user_id: UserId) -> (Account, Account) {
    let checking = seeder
        .accounts
        .create(NewAccount {
            user_id,
            name: "Checking".to_string(),
            initial_balance: Decimal::ZERO,
        })
        .await
        .expect("Failed to create checking account");

    let savings = seeder
        .accounts
        .create(NewAccount {
            user_id,
            name: "Savings".to_string(),
            initial_balance: money("1000.00"),
        })
        .await
        .expect("Failed to create savings account");

    println!("  Created accounts: Checking, Savings");
    (checking, savings)
}

async fn seed_budgets(seeder: &Seeder, user_id: UserId) {
    let (start, end) = current_month();
    let limits = [
        ("food", "600.00"),
        ("transport", "150.00"),
        ("entertainment", "200.00"),
    ];

    for (category, limit) in limits {
        seeder
            .budgets
            .create(NewBudget {
                user_id,
                category: category.to_string(),
                period_start: start,
                period_end: end,
                limit_amount: money(limit),
            })
            .await
            .expect("Failed to create budget");
    }
    println!("  Created {} budgets for {start} - {end}", limits.len());
}

async fn seed_goal(seeder: &Seeder, savings: &Account) -> Goal {
    let goal = seeder
        .goals
        .create(NewGoal {
            user_id: savings.user_id,
            account_id: savings.id,
            name: "Vacation Fund".to_string(),
            target_amount: money("1500.00"),
            initial_amount: Decimal::ZERO,
            lock_funds: true,
        })
        .await
        .expect("Failed to create savings goal");
    println!("  Created goal: Vacation Fund");
    goal
}

async fn seed_transactions(seeder: &Seeder, checking: &Account, goal: &Goal) {
    let (start, _) = current_month();
    let user_id = checking.user_id;

    // Salary first, so the later outflows have funds to draw on.
    seeder
        .transactions
        .create(NewTransaction {
            user_id,
            account_id: checking.id,
            amount: money("2500.00"),
            kind: TransactionKind::Income,
            category: None,
            goal_id: None,
            description: "Monthly salary".to_string(),
            tags: vec!["salary".to_string()],
            date: Some(at_noon(start)),
        })
        .await
        .expect("Failed to post salary");

    let expenses = [
        ("85.40", "food", vec!["groceries", "weekly"], 2, "Groceries"),
        ("45.00", "transport", vec!["fuel"], 4, "Fuel"),
        ("62.15", "food", vec!["groceries", "weekly"], 9, "Groceries"),
        ("54.30", "food", vec!["restaurant"], 11, "Dinner out"),
        ("36.00", "entertainment", vec!["cinema"], 13, "Movie night"),
    ];
    for (amount, category, tags, day_offset, description) in expenses {
        seeder
            .transactions
            .create(NewTransaction {
                user_id,
                account_id: checking.id,
                amount: money(amount),
                kind: TransactionKind::Expense,
                category: Some(category.to_string()),
                goal_id: None,
                description: description.to_string(),
                tags: tags.into_iter().map(ToString::to_string).collect(),
                date: Some(at_noon(start + chrono::Duration::days(day_offset))),
            })
            .await
            .expect("Failed to post expense");
    }

    // Move some money toward savings.
    seeder
        .transactions
        .create(NewTransaction {
            user_id,
            account_id: checking.id,
            amount: money("300.00"),
            kind: TransactionKind::Transfer,
            category: None,
            goal_id: None,
            description: "Transfer to savings".to_string(),
            tags: Vec::new(),
            date: Some(at_noon(start + chrono::Duration::days(14))),
        })
        .await
        .expect("Failed to post transfer");

    // Contribute to the vacation fund from the goal's own account.
    seeder
        .transactions
        .create(NewTransaction {
            user_id,
            account_id: goal.account_id,
            amount: money("250.00"),
            kind: TransactionKind::Expense,
            category: None,
            goal_id: Some(goal.id),
            description: "Vacation fund contribution".to_string(),
            tags: vec!["savings".to_string()],
            date: Some(at_noon(start + chrono::Duration::days(15))),
        })
        .await
        .expect("Failed to post goal contribution");

    println!("  Posted 8 transactions");
}
