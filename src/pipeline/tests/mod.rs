mod core_test;
pub mod fixture;
