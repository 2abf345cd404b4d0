//! In-memory adapters for tests and local development.

mod in_memory_exercise_store;
mod in_memory_subscriber_repository;

pub use in_memory_exercise_store::InMemoryExerciseStore;
pub use in_memory_subscriber_repository::InMemorySubscriberRepository;
