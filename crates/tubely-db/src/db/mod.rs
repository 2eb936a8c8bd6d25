//! Video metadata repositories.
//
// Contract shared by every backend
mod store;
//
// Postgres (sqlx)
mod video;
//
// Process-local map, used when no database is configured and in tests
mod memory;

pub use memory::InMemoryVideoRepository;
pub use store::VideoStore;
pub use video::PgVideoRepository;
