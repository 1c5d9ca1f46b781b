//! Subcommand implementations

pub mod migrate;
pub mod serve;

/// Fallback when neither `--database-url` nor `DATABASE_URL` is given
pub const DEFAULT_DATABASE_URL: &str = "sqlite://listkeep.db";
