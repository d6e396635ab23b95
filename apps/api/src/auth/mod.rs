//! Identity & token service: registration, password login, Google sign-in and
//! 24h bearer sessions. Gates the ATS endpoints through `AuthedUser`.

pub mod extractors;
pub mod google;
pub mod handlers;
pub mod models;
pub mod password;
pub mod postgres;
pub mod service;
pub mod store;

pub use extractors::AuthedUser;
pub use service::AuthService;
