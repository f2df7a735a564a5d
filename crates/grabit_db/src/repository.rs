//! Repository factory trait
//!
//! Lets callers build repositories without knowing which backend type sits
//! behind them.

/// A trait for database repository factories
///
/// Generic over the repository type and the input it is built from.
pub trait RepositoryFactory<R, C> {
    /// Create a new repository instance
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration or client for the repository
    fn create_repository(&self, config: C) -> R;
}
