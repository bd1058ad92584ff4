pub mod oauth;
pub mod password;
pub mod session;

pub use oauth::{OAuthClient, ProviderUser};
pub use session::SessionKeys;
