pub mod account;
pub mod catalog;
pub mod content;
pub mod context;
pub mod runner;
pub mod scenario_model;
pub mod storefront;
