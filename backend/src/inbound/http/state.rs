//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{UserCommand, UserQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// User creation use-case.
    pub users_command: Arc<dyn UserCommand>,
    /// User lookup use-case.
    pub users_query: Arc<dyn UserQuery>,
}

impl HttpState {
    /// Construct state from the user ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use users_backend::domain::UserService;
    /// use users_backend::inbound::http::state::HttpState;
    /// use users_backend::outbound::document_store::InMemoryDocumentStore;
    /// use users_backend::outbound::ids::RandomUserIdGenerator;
    /// use users_backend::outbound::persistence::DocumentUserRepository;
    ///
    /// let repository = DocumentUserRepository::new(Arc::new(InMemoryDocumentStore::new()));
    /// let service = Arc::new(UserService::new(
    ///     Arc::new(repository),
    ///     Arc::new(RandomUserIdGenerator::new()),
    /// ));
    /// let state = HttpState::new(service.clone(), service);
    /// let _query = state.users_query.clone();
    /// ```
    pub fn new(users_command: Arc<dyn UserCommand>, users_query: Arc<dyn UserQuery>) -> Self {
        Self {
            users_command,
            users_query,
        }
    }
}
