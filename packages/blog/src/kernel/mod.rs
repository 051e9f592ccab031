// Kernel - infrastructure shared by the blog activities and the worker

pub mod deps;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use deps::{BlogDeps, PgPublicationStore};
pub use scheduled_tasks::start_scheduler;
pub use test_dependencies::MockPublicationStore;
pub use traits::BasePublicationStore;
