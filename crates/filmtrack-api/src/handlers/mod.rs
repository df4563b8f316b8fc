//! HTTP handlers for the film collection service

pub mod films;
pub mod health;
