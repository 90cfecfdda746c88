// Safety alerting for the Bewust Bestaan community platform.
//
// **Architecture Overview:**
// - `core/` = Business logic (scanner, issuer, moderation) and the storage port
// - `infra/` = Implementations of core traits (in-memory, SQLite)
// - `web/` = HTTP adapters (content intake, admin alert endpoints)

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with several mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
pub mod core;
#[path = "infra/infra_layer.rs"]
pub mod infra;
#[path = "web/web_layer.rs"]
pub mod web;

pub mod config;
