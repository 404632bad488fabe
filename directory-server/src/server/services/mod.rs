pub mod business_store;
pub mod token_signer;

pub use business_store::{BusinessStore, StoreError};
pub use token_signer::{TokenError, TokenSigner};
