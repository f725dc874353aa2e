//!
//! Traits Module
//!
//! Strategy traits used throughout the grading pipeline for extensibility and
//! testing.
//!
//! - [`fetcher`]: Cloning a remote repository into the working directory.
//! - [`installer`]: Installing a project's declared dependencies.
//! - [`runner`]: Executing the project's test suite.
//! - [`reviewer`]: LLM-backed code-quality review.
//! - [`notifier`]: Progress events published to interested collaborators.
//!
//! Implement these traits to substitute a phase (a fake reviewer in tests,
//! a different package manager, a different test-runner family) without
//! touching the orchestrator.

pub mod fetcher;
pub mod installer;
pub mod notifier;
pub mod reviewer;
pub mod runner;

pub use fetcher::Fetcher;
pub use installer::Installer;
pub use notifier::{NotificationChannel, NullChannel};
pub use reviewer::{ReviewInput, Reviewer};
pub use runner::TestRunner;
