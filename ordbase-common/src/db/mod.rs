//! Database access shared by ordbase services

pub mod init;

pub use init::{init_database_pool, init_tables};
