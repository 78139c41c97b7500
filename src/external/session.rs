use std::env;

use crate::error::Error;

// supplies the fetch credential and the identity of the logged-in user;
// the handshake that produced them happens outside this crate
pub trait SessionProvider: Send + Sync {
    fn web_id(&self) -> &str;

    fn storage_root(&self) -> &str;

    // None once the credential is missing or expired; callers surface that
    // as an unauthorized condition, never a crash
    fn access_token(&self) -> Option<String>;
}

#[derive(Clone, Debug)]
pub struct EnvSession {
    web_id: String,
    storage_root: String,
    token: Option<String>,
}

impl EnvSession {
    pub fn from_env() -> Result<Self, Error> {
        let web_id = env::var("POD_WEB_ID")?;
        let storage_root = env::var("POD_STORAGE_ROOT")?;
        let token = env::var("POD_ACCESS_TOKEN").ok();

        Ok(Self {
            web_id,
            storage_root,
            token,
        })
    }
}

impl SessionProvider for EnvSession {
    fn web_id(&self) -> &str {
        &self.web_id
    }

    fn storage_root(&self) -> &str {
        &self.storage_root
    }

    fn access_token(&self) -> Option<String> {
        self.token.clone()
    }
}
