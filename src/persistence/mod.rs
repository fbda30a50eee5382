//! Persistence layer - single writer for the task list
//!
//! The persistence actor receives save commands from the App layer,
//! writes them in order, and sends back results.

pub mod actor;

pub use actor::PersistenceActor;
