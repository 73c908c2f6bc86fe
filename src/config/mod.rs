//! Configuration management for bxconfig.
//!
//! This module holds the persisted CLI session configuration shared by the
//! CLI and its plugins.
//!
//! # Overview
//!
//! - [`BxConfigRepository`] - thread-safe typed getters and setters, lazily
//!   loaded on first use and saved on every write
//! - [`BxConfigData`] / [`RawDocument`] - the typed schema and the untyped view
//!   that carries keys this version does not know
//! - [`Persistor`] - storage capability ([`DiskPersistor`], [`MemoryPersistor`])
//! - [`paths`] - well-known file locations
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use bxconfig::config::{paths, BxConfigRepository};
//! use bxconfig::domain::fatal_error_handler;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = BxConfigRepository::from_path(paths::config_file_path()?, fatal_error_handler());
//!
//! println!("Region: {}", repo.region().name);
//! println!("Cloud: {}", repo.cloud_name());
//! repo.set_locale("en_US");
//! # Ok(())
//! # }
//! ```
//!
//! # File Format
//!
//! ```json
//! {
//!   "ConsoleEndpoint": "https://cloud.ibm.com",
//!   "Region": "us-south",
//!   "RegionID": "ibm:yp:us-south",
//!   "RegionType": "public",
//!   "IAMEndpoint": "https://iam.cloud.ibm.com",
//!   "IAMToken": "",
//!   "IAMRefreshToken": "",
//!   "Account": { "GUID": "", "Name": "", "Owner": "" },
//!   "ResourceGroup": { "GUID": "", "Name": "", "Default": false, "QuotaID": "" },
//!   "PluginRepos": [],
//!   "Locale": "",
//!   "Trace": "",
//!   "ColorEnabled": "",
//!   "HTTPTimeout": 0,
//!   "CLIInfoEndpoint": "",
//!   "CheckCLIVersionDisabled": false,
//!   "UsageStatsDisabled": false
//! }
//! ```

pub mod document;
pub mod paths;
pub mod persistor;
pub mod repository;
pub mod secret;

// Re-export commonly used types
pub use document::{BxConfigData, RawDocument};
pub use persistor::{DataInterface, DiskPersistor, MemoryPersistor, Persistor};
pub use repository::BxConfigRepository;
pub use secret::{secret_string, SecretString, SecretValue};
