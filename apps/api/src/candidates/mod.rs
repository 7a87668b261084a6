pub mod handlers;
pub mod upload;
