//! Authentication: registration, login, token refresh, logout and profile.

pub mod controller;
pub mod router;
pub mod service;
