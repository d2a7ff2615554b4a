mod geocoding_handler;

pub use geocoding_handler::*;
