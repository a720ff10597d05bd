// src/db.rs

pub mod backend;
pub use backend::RecordBackend;
pub mod pg_repo;
pub use pg_repo::PgBackend;
pub mod snapshot_repo;
pub use snapshot_repo::SnapshotBackend;
