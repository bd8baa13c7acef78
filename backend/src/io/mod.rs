//! # IO Module
//!
//! Interface layer between HTTP clients and the booking domain. Translates
//! requests into service calls and domain errors into status codes with a
//! JSON `{error}` body.

pub mod rest;

pub use rest::*;
