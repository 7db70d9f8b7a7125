pub mod backup;
pub mod commands;
pub mod context;
pub mod credential;
pub mod error;
pub mod paths;
pub mod provider;
pub mod status;
pub mod store;
pub mod switch;
pub mod token;
pub mod ui;

#[cfg(test)]
pub mod test_utils;
