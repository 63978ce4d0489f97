mod admin;
mod init;

pub use admin::cmd_set_admin;
pub use init::cmd_init;
