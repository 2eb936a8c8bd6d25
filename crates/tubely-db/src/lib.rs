//! Tubely Database Library
//!
//! Metadata store for video records: the `VideoStore` contract, a Postgres
//! implementation and an in-process implementation for development and tests.

pub mod db;

pub use db::{InMemoryVideoRepository, PgVideoRepository, VideoStore};
