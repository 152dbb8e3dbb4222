//! Route handlers organized by resource

pub mod boards;
pub mod cards;
pub mod health;
pub mod lists;
pub mod metrics;
pub mod users;
