pub mod mongo;
pub mod search;
