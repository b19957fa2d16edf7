//! Outbound adapter for the external OAuth identity provider.

mod http_identity_provider;

pub use http_identity_provider::HttpIdentityProvider;
