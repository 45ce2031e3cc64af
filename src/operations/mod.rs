pub mod boolean;
pub mod offset;
pub mod repair;
