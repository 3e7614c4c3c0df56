//! Data types used by the wizard, split by where they travel.
//!
//! - [`common`]: enumerations shared by the API and the database.
//! - [`db`]: records as stored in MongoDB.
//! - [`api`]: request bodies and view models sent over HTTP.
//! - [`mongodb`]: helpers for working with the database itself.

pub mod api;
pub mod common;
pub mod db;
pub mod mongodb;
