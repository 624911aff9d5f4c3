//! Outbound adapters - implementations of domain ports

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::ExtensibleFieldsPgStorage;
