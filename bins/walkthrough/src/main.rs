//! Walkthrough of the userlog data-access layer.
//!
//! Synchronizes the schema, then:
//! - builds a user, saves it, renames it and saves again
//! - creates a second user with two logs
//! - runs a transactional unit that creates and updates a third user
//! - prints logs with their users, one log with only the user's email,
//!   every user, and the users named "pedro"
//!
//! Usage: cargo run --bin walkthrough

use sea_orm::DatabaseConnection;
use serde_json::to_string;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use userlog_core::{NewLog, NewUser, UserChanges};
use userlog_db::{
    DataError, LogFilter, LogRepository, UserAttribute, UserFilter, UserInclude,
    UserRepository, connect, disconnect, in_transaction, sync,
};
use userlog_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "walkthrough=info,userlog_db=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let db = connect(&config.database).await?;
    sync(&db, config.database.sync).await?;

    if let Err(err) = seed(&db).await {
        let code = err
            .downcast_ref::<DataError>()
            .map_or("UNKNOWN", DataError::error_code);
        error!(code, error = %err, "Seeding stopped");
    }

    print_users(&db).await?;

    disconnect(db).await?;
    Ok(())
}

fn user(name: &str, surname: &str, email: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        surname: Some(surname.to_string()),
        email: Some(email.to_string()),
    }
}

async fn seed(db: &DatabaseConnection) -> anyhow::Result<()> {
    let users = UserRepository::new(db);
    let logs = LogRepository::new(db);

    let mut ana = users.build(user("Ana", "Castillo", "ana@gmail.com"));
    users.save(&mut ana).await?;
    ana.set_name("Juan");
    let renamed = users.save(&mut ana).await?;
    info!(user_id = renamed.id, name = %renamed.name, "User renamed");

    let pedro = users.create(user("Pedro", "Perez", "pedro@gmail.com")).await?;
    for text in ["login 1", "login 2"] {
        logs.create(NewLog {
            log: Some(text.to_string()),
            user_id: Some(pedro.id),
        })
        .await?;
    }

    let unit = in_transaction(db, |txn| {
        Box::pin(async move {
            let users = UserRepository::new(txn);
            let mut juan = users.build(user("Juan", "Lopez", "juan@example.com"));
            users.save(&mut juan).await?;
            users
                .update(
                    &mut juan,
                    UserChanges {
                        surname: Some(Some("Lopez Vega".to_string())),
                        ..UserChanges::default()
                    },
                )
                .await
        })
    })
    .await;
    match unit {
        Ok(juan) => info!(user_id = juan.id, "Transaction completed"),
        Err(err) => error!(code = err.error_code(), error = %err, "Transaction failed"),
    }

    for row in logs
        .find_all_with_user(&LogFilter::default(), &UserInclude::all())
        .await?
    {
        println!("logs => {}", to_string(&row)?);
    }

    if let Some(row) = logs
        .find_one_with_user(
            &LogFilter::by_id(1),
            &UserInclude::only([UserAttribute::Email]),
        )
        .await?
    {
        println!("log => {}", to_string(&row)?);
    }

    Ok(())
}

async fn print_users(db: &DatabaseConnection) -> anyhow::Result<()> {
    let users = UserRepository::new(db);

    for user in users.find_all(&UserFilter::default()).await? {
        println!("{}", to_string(&user)?);
    }

    for user in users.find_all(&UserFilter::by_name("pedro")).await? {
        println!("{}", to_string(&user)?);
    }

    Ok(())
}
