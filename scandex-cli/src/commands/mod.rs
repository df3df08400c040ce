//! Command handlers

pub mod index;
