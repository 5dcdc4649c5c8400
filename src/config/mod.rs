//! Tool settings.
//!
//! Consolidates settings from four tiers with field-by-field YAML merging:
//! 1. **Defaults** - Built into the binary
//! 2. **Repository** - `.monobuild.yaml`, found in the working directory or a parent
//! 3. **User** - `~/.monobuild/config.yaml`
//! 4. **Environment** - `MONOBUILD_*` variables
//!
//! ## Environment Variables
//! - `MONOBUILD_CONFIG_PATH` - Explicit settings file (replaces the repository and user tiers)
//! - `MONOBUILD_USER_DIR` - User settings dir (default: `~/.monobuild`)
//! - `MONOBUILD_PARALLELISM` - Maximum number of app configs loaded at the same time
//! - `MONOBUILD_TASK_MODE` - `single` or `multiple`
//! - `MONOBUILD_SEARCH_DEPTH` - Directory depth searched for app configs

mod loader;
mod merge;
mod types;

pub use loader::{SettingsLoader, SettingsPaths};
pub use merge::{deep_merge, deep_merge_all};
pub use types::*;
