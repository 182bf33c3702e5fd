//! Engine error taxonomy.
//!
//! None of these errors is fatal once the engine runs: callers log them and
//! carry on with the next key event or frame.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    /// The current host has no site profile; the engine stays disabled.
    #[error("No configuration found for host: \"{host}\". Engine will not run.")]
    ConfigurationMissing { host: String },

    /// A configured locator matched nothing at the moment of use.
    #[error("\"{action}\" not found with selector: \"{locator}\"")]
    SelectorNotFound { action: String, locator: String },

    /// The action has no locator configured for the current host.
    #[error("No selector configured for \"{action}\" on {host}.")]
    UnconfiguredAction { action: String, host: String },
}
