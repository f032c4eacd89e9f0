//! Shared models

mod path_key;

pub use path_key::CanonicalPath;
