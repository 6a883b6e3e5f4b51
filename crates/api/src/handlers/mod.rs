//! Request handlers.
//!
//! Handlers stay thin: they parse the request, resolve the caller, and
//! delegate to [`crate::lifecycle`] or the repositories, mapping errors
//! via [`crate::error::AppError`].

pub mod auth;
pub mod designs;
