//! # ganttgen-host
//!
//! The call surface shared by the CLI and desktop shells: an options bag in,
//! a result bag out, with progress reported on a side channel.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ganttgen_host::{generate, GenerateOptions};
//!
//! let options = GenerateOptions::new("plan.xlsx").palette("reds").png(true);
//! let result = generate(&options, &mut |update| {
//!     println!("{:>3}% {:?}", update.progress, update.stage);
//! })?;
//!
//! println!("{}", result.html_path.display());
//! for warning in &result.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! # Ok::<(), ganttgen_host::GenerateError>(())
//! ```

pub mod config;
pub mod paths;
pub mod pipeline;

pub use config::{Config, ConfigError, ExportConfig, CONFIG_ENV, CONFIG_FILE_NAME};
pub use paths::{clean_path, is_valid_path};
pub use pipeline::{
    generate, generate_with, GenerateError, GenerateOptions, GenerateResult, ProgressStage,
    ProgressUpdate,
};
