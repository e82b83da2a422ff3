//! Generic error handling utilities
//!
//! Lets the CLI report failures at the right level of detail regardless of
//! which layer produced them (configuration, discovery or loading).

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)`; when it returns `false`, `user_message()` returns `None`.
///
/// Examples of user-actionable errors:
/// - an invalid plugin name pattern
/// - a missing or malformed configuration file
/// - a plugin that failed to load (the operator installed it and must fix it)
/// - a package manager that is missing, failing or too slow
///
/// Examples of system errors:
/// - a registry query that was interrupted or returned garbage
pub trait ContextualError: std::error::Error {
    /// Returns true if this error carries a message meant for the operator
    fn is_user_actionable(&self) -> bool;

    /// Returns the operator-facing message for user-actionable errors
    fn user_message(&self) -> Option<String>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// User-actionable errors are logged with their own message, system errors
/// with the supplied operation context. Full detail always goes to the debug
/// level.
///
/// # Examples
/// ```rust,no_run
/// # use plugseek::core::error_handling::log_error_with_context;
/// # use plugseek::plugin::api::NameMatcher;
/// if let Err(e) = NameMatcher::new("(unclosed") {
///     // Logs: "FATAL: invalid plugin name pattern '(unclosed': ..."
///     log_error_with_context(&e, "Plugin discovery");
/// }
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => log::error!("FATAL: {}", user_msg),
        _ => log::error!("FATAL: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
