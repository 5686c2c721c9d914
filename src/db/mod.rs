// src/db/mod.rs
//
// Database module
//
// Provides:
// - Connection pooling
// - Schema migrations
// - Sample catalog seeding

pub mod connection;
pub mod migrations;
pub mod seed;

pub use connection::{
    create_connection_pool, create_test_connection, get_database_path, register_functions,
    ConnectionPool, PooledConn, UNICODE_LOWER,
};

pub use migrations::{
    get_database_stats, initialize_database, verify_database_integrity, DatabaseStats,
};

pub use seed::{populate_sample_catalog, sample_catalog};
