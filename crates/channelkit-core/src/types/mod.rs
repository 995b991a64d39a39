//! Core type definitions.

pub mod capability;
pub mod content;
pub mod data;
pub mod endpoint;
pub mod message;
pub mod validation;
