mod claims;
mod errors;
mod keyring;

pub use claims::Claims;
pub use errors::TokenError;
pub use keyring::Keyring;
pub use keyring::TokenAlgorithm;
