//! The sole responsibility of this crate is to expose the statically imported sql migrations for the
//! extensible fields tables.
pub static EXTENSIBLE_FIELDS_MIGRATIONS: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
