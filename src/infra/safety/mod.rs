// Implementations of the AlertStore port.

pub mod in_memory;
pub mod sqlite_alert_store;

// Re-export for convenience
pub use in_memory::InMemoryAlertStore;
pub use sqlite_alert_store::SqliteAlertStore;
