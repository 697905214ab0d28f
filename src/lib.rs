//! Election-results analytics: load a constituency table, filter it, and
//! summarise it for a dashboard.

pub mod color;
pub mod config;
pub mod data;
pub mod export;
pub mod state;
pub mod view;
