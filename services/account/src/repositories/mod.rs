//! Storage implementations of the account service

pub mod account;

pub use account::AccountRepository;
