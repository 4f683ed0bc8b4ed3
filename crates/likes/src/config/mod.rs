mod loader;
mod schema;

pub use loader::{load_from_file, load_from_str, validate, ConfigError};
pub use schema::{AdmissionMode, DuplicateLikePolicy, LikesConfig};
