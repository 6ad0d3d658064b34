//! External service integrations.

pub mod hr_login;

pub use hr_login::{HrLoginService, HttpHrLoginClient, LoginError};
