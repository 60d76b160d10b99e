//! Core value types for the Canopy client.

mod credential;
mod request;
mod response;

pub use credential::{Credential, IssuedToken, ServiceAccountKey};
pub use request::CanopyRequest;
pub use response::CanopyResponse;
