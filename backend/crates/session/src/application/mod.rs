pub mod authenticate;
pub mod config;
pub mod issue_otp;
