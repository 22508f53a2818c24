//! Shared types for the rolodex service: domain projections and the
//! request/response surface.

pub mod api;
pub mod models;
