//! Kernel utilities shared by formwork applications.
//! Keep this crate lightweight: it only turns files and strings into domain values.
//!
//! ## Config loading
//! ```rust,no_run
//! use formwork_kernel::config::load_config;
//! use formwork_kernel::domain::config::CliConfig;
//!
//! let cfg: CliConfig = load_config(None).unwrap_or_default();
//! ```
//!
//! ## Documents
//! ```rust
//! use formwork_kernel::document::read_object;
//!
//! let input = read_object(r#"{ "title": "Synchronicity" }"#).unwrap();
//! assert_eq!(input["title"], "Synchronicity");
//! ```
pub mod config;
pub mod document;

pub use formwork_domain as domain;
