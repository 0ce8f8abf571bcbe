//! Route modules for the JSON Convert server

pub mod convert;
pub mod health;
