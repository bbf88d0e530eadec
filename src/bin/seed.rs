use adapter::{database::connect_database_with, repository::user::UserRepositoryImpl};
use anyhow::{Context, Result};
use kernel::{
    model::{role::Role, user::event::CreateUser},
    repository::user::UserRepository,
};
use shared::config::{AppConfig, SeedConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let app_config = AppConfig::new()?;
    let seed = SeedConfig::new();

    let pool = connect_database_with(&app_config.database);
    pool.migrate()
        .await
        .context("failed to apply database migrations")?;
    let users = UserRepositoryImpl::new(pool);

    let accounts = [
        ("Administrator", seed.admin_email, seed.admin_password, Role::Admin),
        ("Lab Staff", seed.staff_email, seed.staff_password, Role::Staff),
    ];
    for (name, email, password, role) in accounts {
        let email = email.trim().to_lowercase();
        let event = CreateUser::new(name.into(), email.clone(), password, role, false);
        let created = users
            .create_if_absent(event)
            .await
            .with_context(|| format!("failed to seed {email}"))?;
        if created {
            tracing::info!(%email, role = role.as_ref(), "account seeded");
        } else {
            tracing::info!(%email, "account already exists, left untouched");
        }
    }

    Ok(())
}
