mod errors;
mod hasher;

pub use errors::PasswordError;
pub use hasher::HashScheme;
pub use hasher::PasswordHasher;
