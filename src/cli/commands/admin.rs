//! Grant or revoke admin rights

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_set_admin(config: &Config, username: &str, is_admin: bool) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    if !store.set_user_admin(username, is_admin).await? {
        anyhow::bail!("User '{username}' not found");
    }

    if is_admin {
        println!("✓ {username} is now an admin");
    } else {
        println!("✓ {username} is no longer an admin");
    }
    tracing::info!(username, is_admin, "Admin flag changed");

    Ok(())
}
