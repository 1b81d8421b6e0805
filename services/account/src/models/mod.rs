//! Account service models

pub mod account;

pub use account::{
    Account, AccountDetails, AccountProfile, AccountUpdate, LoginRequest, RegisterRequest,
    TokenResponse, UpdateRequest,
};
