//! # streetfood - street-food price data preparation
//!
//! Loads a CSV of street-food price records, repairs known defects, derives
//! summary columns and builds the aggregated tables a pricing dashboard binds
//! its charts to. Rendering is left to the caller: every output is a plain
//! serde-serializable value.
//!
//! ## Quick Start
//!
//! ```no_run
//! use streetfood::config::PrepConfig;
//! use streetfood::dashboard::Dashboard;
//! use streetfood::prep::CountrySelection;
//! use std::path::Path;
//!
//! # fn example() -> streetfood::error::Result<()> {
//! let config = PrepConfig::default();
//! let dashboard = Dashboard::from_path(Path::new("street_food.csv"), &config)?;
//!
//! for country in dashboard.country_options() {
//!     println!("{country}");
//! }
//!
//! let view = dashboard.view(&CountrySelection::from("Lebanon"))?;
//! println!("{:?}", view.global_average_price);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`prep`]: loader, cleaner, derivation engine, filter and aggregator
//! - [`dashboard`]: per-selection views with memoized global aggregates
//! - [`config`]: JSON configuration with environment overrides
//! - [`error`]: error types
//! - [`logging`]: `tracing` subscriber setup

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod prep;
