//! # UI Module
//!
//! Presentational panels of the dashboard. Each panel is a plain function
//! from borrowed dashboard data to an iced `Element`; none of them hold state.
//!
//! - `header`: title, subtitle and the Refresh button
//! - `live_video`: annotated frame and the Pause/Resume button
//! - `stats_panel`: stat cards and the two charts
//! - `tables`: detection and item-type detail tables
//! - `footer`: copyright line
//! - `styles`: Shared styling utilities

pub mod footer;
pub mod header;
pub mod live_video;
pub mod stats_panel;
pub mod styles;
pub mod tables;
