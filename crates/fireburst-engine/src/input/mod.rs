pub mod gesture;
pub mod mailbox;
pub mod mapping;
pub mod queue;
