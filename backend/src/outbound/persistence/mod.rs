//! In-memory document-store adapters.
//!
//! Each collection lives behind a single async `RwLock`, and every
//! conditional mutation (duplicate-favourite check, comment removal, lazy
//! record creation) runs entirely under the write guard. That makes the
//! check-then-write of each operation atomic with respect to concurrent
//! requests, which is what closes the read-modify-write race on shared
//! records: of two concurrent identical adds, exactly one observes the
//! other's write.

mod memory_credential_store;
mod memory_dish_store;
mod memory_favorites_store;
mod memory_session_store;

pub use memory_credential_store::MemoryCredentialStore;
pub use memory_dish_store::MemoryDishStore;
pub use memory_favorites_store::MemoryFavoritesStore;
pub use memory_session_store::MemorySessionStore;
