// bxconfig - shared CLI configuration
// Copyright (c) 2025 Bxconfig Contributors
// Licensed under the MIT License

//! # bxconfig - shared CLI configuration
//!
//! bxconfig owns the JSON configuration file shared by a cloud CLI and its
//! plugins: region, IAM tokens, account, resource group, plugin
//! repositories and user preferences.
//!
//! ## Overview
//!
//! This library provides:
//! - **A thread-safe repository** over the configuration document, loaded
//!   lazily on first access and written back after every change
//! - **Preservation of unknown fields** so that keys written by other tools
//!   survive a save
//! - **Token introspection** of the IAM access token claims
//! - **Plugin bootstrap** with per-plugin configuration files
//! - **A file downloader** for plugin binaries
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Repository, document model and persistence
//! - [`domain`] - Session models, token claims and error types
//! - [`downloader`] - HTTP file downloads
//! - [`plugin`] - Plugin bootstrap and plugin configuration
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bxconfig::config::{paths, BxConfigRepository};
//! use bxconfig::domain::{fatal_error_handler, Region};
//!
//! # fn main() -> bxconfig::domain::Result<()> {
//! let repo = BxConfigRepository::from_path(paths::config_file_path()?, fatal_error_handler());
//!
//! repo.set_region(Region::new("ibm:yp:us-south", "us-south", "public"));
//! assert_eq!(repo.cloud_name(), "bluemix");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Accessors on the repository never fail. A failed load or save is passed
//! to the [`domain::ErrorHandler`] given at construction, and the in-memory
//! change stays in place. Other operations return [`domain::Result`].

pub mod cli;
pub mod config;
pub mod domain;
pub mod downloader;
pub mod logging;
pub mod plugin;
