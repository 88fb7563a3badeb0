pub mod read;
pub mod social;
pub mod terms;
pub mod write;
