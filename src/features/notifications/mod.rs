pub mod dtos;
pub mod services;

pub use services::EmailComposer;
