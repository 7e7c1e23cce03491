use anyhow::{Context, Result};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

/// Seed the admin database: default role, protected admin user and the
/// system settings singleton. Safe to run repeatedly.
#[derive(Parser)]
#[command(name = "seed")]
#[command(about = "Seed the admin database with the default role, admin user and settings")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Database URL; falls back to DATABASE_URL")]
    database_url: Option<String>,
}

// bcrypt of 'password123'; hashing itself is out of scope here
const ADMIN_PASSWORD_HASH: &str = "$2b$10$EpRnTzVlqHNP0.fUbXUwSOyuiXe/QLSUG6xNekdHgTGmrpHEfIoxm";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Seeding failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let url = cli
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .context("DATABASE_URL is not set")?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .context("failed to connect to database")?;

    let role_id = seed_admin_role(&pool).await?;
    seed_admin_user(&pool, role_id).await?;
    seed_system_settings(&pool).await?;

    println!("Seed data created");
    pool.close().await;
    Ok(())
}

async fn seed_admin_role(pool: &PgPool) -> Result<Uuid> {
    // Upsert keyed on slug so reruns reuse the existing role id
    let role_id: Uuid = sqlx::query_scalar(
        "INSERT INTO user_roles (id, slug, name, description, is_protected, is_default, created_at) \
         VALUES ($1, 'admin', 'Administrator', 'System Administrator', TRUE, FALSE, NOW()) \
         ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name \
         RETURNING id",
    )
    .bind(Uuid::new_v4())
    .fetch_one(pool)
    .await
    .context("failed to seed admin role")?;

    Ok(role_id)
}

async fn seed_admin_user(pool: &PgPool, role_id: Uuid) -> Result<()> {
    sqlx::query(
        "INSERT INTO users \
         (id, email, password, name, role_id, status, is_protected, is_trashed, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, 'ACTIVE', TRUE, FALSE, NOW(), NOW()) \
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(Uuid::new_v4())
    .bind("admin@example.com")
    .bind(ADMIN_PASSWORD_HASH)
    .bind("System Admin")
    .bind(role_id)
    .execute(pool)
    .await
    .context("failed to seed admin user")?;

    Ok(())
}

async fn seed_system_settings(pool: &PgPool) -> Result<()> {
    // Singleton row: insert only when the table is empty
    sqlx::query(
        "INSERT INTO system_settings \
         (id, name, support_email, language, timezone, currency, created_at, updated_at) \
         SELECT $1, 'Admin', 'support@example.com', 'en', 'UTC', 'USD', NOW(), NOW() \
         WHERE NOT EXISTS (SELECT 1 FROM system_settings)",
    )
    .bind(Uuid::new_v4())
    .execute(pool)
    .await
    .context("failed to seed system settings")?;

    Ok(())
}
