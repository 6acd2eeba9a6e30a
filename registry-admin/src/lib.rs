//! Client-side synchronization for the academic records REST API: students,
//! institutions, provinces and cities kept in step with the server through a
//! load, edit, submit and reload cycle.

pub mod config;
pub mod error;
pub mod http_client;
pub mod models;
pub mod registry;
pub mod session;

pub use config::{ConfigError, RegistryConfig};
pub use error::{ErrorClass, FieldError, RemoteError, SubmitError, ValidationError};
pub use http_client::HttpBackend;
pub use models::{City, Entity, EntityId, Institution, Person, Province, Student};
pub use session::{CurrentUser, Session, SessionError, SessionStore};
