// Authentication module
// Rotates the refresh token and keeps the persisted copy current

mod refresh;
mod rotator;
mod store;
mod types;

pub use rotator::TokenRotator;
pub use store::{Seeded, TokenStore};
pub use types::{Credentials, TokenPair};
