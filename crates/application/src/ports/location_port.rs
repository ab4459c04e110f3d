//! User location port

use async_trait::async_trait;
use domain::Coordinate;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for acquiring the user's current position
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LocationPort: Send + Sync {
    /// Current position of the user
    ///
    /// Fails with [`ApplicationError::LocationUnavailable`] when permission is
    /// denied, the capability is missing, or no fix is available.
    async fn current_location(&self) -> Result<Coordinate, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn LocationPort>();
    }
}
