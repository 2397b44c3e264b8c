//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Owner-scoped handlers take an [`AuthUser`](crate::middleware::auth::AuthUser)
//! and pass its id to every repository call, so a user can never see or
//! change another user's rows.

pub mod auth;
pub mod city;
pub mod quests;
pub mod reflections;
pub mod skills;
pub mod users;
