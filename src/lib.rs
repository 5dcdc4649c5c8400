//! Task configuration loading for monorepo builds.
//!
//! Applications declare tasks in `.app.toml` or `.app.yaml` files. Tasks may
//! reference shared Input and Output definitions, and applications may
//! reference shared task groups, all defined in include files. Loading an
//! application resolves those references and validates the result.

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod fs;
pub mod include_store;
pub mod loader;
pub mod logging;
pub mod model;
pub mod repository;
pub mod resolve;
pub mod validation;

pub use error::{Error, ErrorCode, Namespace, Result};
pub use include_store::{IncludeStore, IncludeStoreBuilder};
pub use loader::AppLoader;
pub use repository::Repository;
pub use validation::ValidationError;
