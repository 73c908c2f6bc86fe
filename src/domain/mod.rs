//! Domain models and types for bxconfig.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Session models** ([`Region`], [`Account`], [`ResourceGroup`], [`PluginRepo`])
//! - **Token claims** ([`IamTokenInfo`]) decoded from the IAM access token
//! - **Error types** ([`SdkError`], [`DownloadError`]) and the [`ErrorHandler`] callback
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! Fallible operations return [`Result<T, SdkError>`]. Repository accessors are
//! infallible; their load/save failures go to an [`ErrorHandler`]:
//!
//! ```rust
//! use bxconfig::domain::{logging_error_handler, ErrorHandler};
//!
//! let handler: ErrorHandler = logging_error_handler();
//! ```

pub mod errors;
pub mod models;
pub mod result;
pub mod token;

// Re-export commonly used types for convenience
pub use errors::{
    fatal_error_handler, logging_error_handler, DownloadError, ErrorHandler, SdkError,
};
pub use models::{cloud_name, Account, PluginRepo, Region, ResourceGroup};
pub use result::Result;
pub use token::{AccountsInfo, IamTokenInfo};
