//! Resilient element location and interaction.
//!
//! A [`locator_model::Target`] names a UI element and lists locator
//! candidates in priority order. [`resolver`] finds the first candidate
//! present, [`action`] performs an interaction with a script-driven fallback,
//! [`overlay`] clears consent banners, and [`outcome_text`] reads the banners
//! a form submission leaves behind.

pub mod action;
pub mod locator_model;
pub mod outcome_text;
pub mod overlay;
pub mod resolver;
