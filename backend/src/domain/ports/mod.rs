//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports ([`UserRepository`], [`UserIdGenerator`]) describe what the
//! domain needs from infrastructure. Driving ports ([`UserCommand`],
//! [`UserQuery`]) are the use-cases inbound adapters call. Driven ports
//! expose strongly typed errors so adapters map their failures into
//! predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod user_command;
mod user_id_generator;
mod user_query;
mod user_repository;

#[cfg(test)]
pub use user_command::MockUserCommand;
pub use user_command::UserCommand;
#[cfg(test)]
pub use user_id_generator::MockUserIdGenerator;
pub use user_id_generator::{UserIdAllocationError, UserIdGenerator};
#[cfg(test)]
pub use user_query::MockUserQuery;
pub use user_query::UserQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
