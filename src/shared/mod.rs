pub mod constants;
pub mod templates;
#[cfg(test)]
pub mod test_helpers;
pub mod time;
pub mod types;
pub mod validation;
