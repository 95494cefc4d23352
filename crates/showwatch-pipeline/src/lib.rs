//! Match-and-report pipeline.
//!
//! One run fetches the venue listing, matches it against the alias table,
//! renders a report and hands it to a notification channel. Every per-run
//! failure is folded into the returned [`RunOutcome`].

pub mod outcome;
pub mod pipeline;
pub mod seen;
pub mod setup;
pub mod source;

pub use outcome::{RunOutcome, RunStatus};
pub use pipeline::Pipeline;
pub use seen::{JsonFileStore, NotifiedStore, SeenStoreError};
pub use setup::{from_app_config, SetupError};
pub use source::ShowSource;
