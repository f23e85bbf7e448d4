pub mod forum;
pub mod import;
pub mod problem;
pub mod shared;
