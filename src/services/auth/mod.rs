pub mod credential;
pub mod factory;
pub mod identity;

pub use credential::{CredentialCodec, CredentialError, CredentialSettings};
pub use factory::build_credential_codec;
pub use identity::IdentityContext;
