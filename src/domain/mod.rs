pub mod business;
pub mod session;
