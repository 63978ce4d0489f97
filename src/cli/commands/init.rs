use crate::config::{Config, TOKEN_SECRET_ENV};

pub fn cmd_init() -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("Created config.toml");
        println!("Set {TOKEN_SECRET_ENV} (or security.token_secret) before running `marquee serve`.");
    } else {
        println!("config.toml already exists, leaving it untouched");
    }
    Ok(())
}
