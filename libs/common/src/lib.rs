//! Shared infrastructure for the CS Fantasy Shop backend
//!
//! This crate provides the pieces every binary needs: the PostgreSQL
//! connection pool backing the shop's relational state, the Redis pool
//! backing refresh-token validity, and the infrastructure error types.

pub mod cache;
pub mod database;
pub mod error;
