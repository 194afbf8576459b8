//! Core types shared across snapmark facilities
//!
//! This crate holds the vocabulary used by both the error and logging
//! facilities, so that every crate in the workspace emits the same field
//! keys and event names:
//!
//! - **Schema constants**: canonical field keys and event names

pub mod schema;
