//! Galaxy API client and authentication.
//!
//! This module provides the [`GalaxyClient`] for talking to a Galaxy server,
//! along with authentication types ([`Auth`], [`AuthType`]).

mod auth;
mod galaxy;

pub use auth::{Auth, AuthType};
pub use galaxy::GalaxyClient;
