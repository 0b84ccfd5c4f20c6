mod credentials;
mod token;

pub use credentials::ClientCredentials;
pub use token::{AccessToken, TokenCell, TokenResponse};
