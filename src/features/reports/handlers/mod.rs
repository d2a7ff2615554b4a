mod report_handler;
mod submission_handler;

pub use report_handler::*;
pub use submission_handler::*;
