//! Staff accounts, their hospital assignments and password-reset tokens.

pub mod account;
pub mod assignment;
pub mod reset_token;

pub use account::StaffAccount;
pub use assignment::StaffAssignment;
pub use reset_token::PasswordResetToken;
