//! Random user identifier allocation.

use std::sync::Mutex;

use rand::RngCore;
use rand::rngs::OsRng;
use uuid::Builder;

use crate::domain::UserId;
use crate::domain::ports::{UserIdAllocationError, UserIdGenerator};

/// Allocates version 4 UUIDs from a random source.
///
/// Defaults to the operating system's entropy source. Reading entropy may
/// fail, in which case allocation fails rather than falling back to a
/// weaker source.
///
/// # Examples
/// ```
/// use users_backend::domain::ports::UserIdGenerator;
/// use users_backend::outbound::ids::RandomUserIdGenerator;
///
/// let id = RandomUserIdGenerator::new().allocate().expect("entropy available");
/// assert_eq!(id.as_ref().len(), 36);
/// ```
pub struct RandomUserIdGenerator<R = OsRng> {
    rng: Mutex<R>,
}

impl RandomUserIdGenerator<OsRng> {
    /// Generator backed by [`OsRng`].
    pub fn new() -> Self {
        Self::with_rng(OsRng)
    }
}

impl Default for RandomUserIdGenerator<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> RandomUserIdGenerator<R> {
    /// Generator backed by a caller-provided random source.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl<R: RngCore + Send> UserIdGenerator for RandomUserIdGenerator<R> {
    fn allocate(&self) -> Result<UserId, UserIdAllocationError> {
        let mut bytes = [0_u8; 16];
        self.rng
            .lock()
            .map_err(|_| UserIdAllocationError::entropy("random source lock poisoned"))?
            .try_fill_bytes(&mut bytes)
            .map_err(|err| UserIdAllocationError::entropy(err.to_string()))?;
        let uuid = Builder::from_random_bytes(bytes).into_uuid();
        Ok(UserId::from_uuid(uuid))
    }
}
