pub mod core;
pub mod error;
pub mod main;

#[cfg(test)]
pub(crate) mod tests;
