// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "safety/mod.rs"]
pub mod safety;
