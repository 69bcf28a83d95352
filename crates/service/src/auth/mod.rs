//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login and token decoding live here; the HTTP cookie and
//! header handling stays in `server`.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::{AuthConfig, AuthService};
