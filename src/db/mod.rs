pub mod memory;
pub mod postgres;
pub mod repository;

pub use memory::InMemoryUserRepository;
pub use postgres::{create_pool, run_migrations, PgUserRepository};
pub use repository::UserRepository;

#[cfg(test)]
pub use repository::MockUserRepository;
