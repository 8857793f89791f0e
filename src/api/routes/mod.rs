//! API route handlers
//!
//! Each module contains handlers for a group of related endpoints.

pub mod events;
pub mod health;
pub mod moods;
pub mod tasks;
pub mod users;
