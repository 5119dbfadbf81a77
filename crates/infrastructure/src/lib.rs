//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod console_messenger;
mod in_memory_container_store;
mod in_memory_template_repository;
mod in_memory_workflow_repository;
mod postgres_template_repository;
mod system_clock;

pub use console_messenger::ConsoleMessenger;
pub use in_memory_container_store::InMemoryContainerStore;
pub use in_memory_template_repository::InMemoryTemplateRepository;
pub use in_memory_workflow_repository::InMemoryWorkflowRepository;
pub use postgres_template_repository::PostgresTemplateRepository;
pub use system_clock::SystemClock;
