//! Browser Session Storage
//!
//! Persists the auth session in `localStorage` so a reload keeps the user
//! signed in.

use supatodo_core::auth::{AuthError, AuthResult};
use supatodo_core::domain::Session;
use supatodo_core::supabase::SessionStorage;
use tracing::warn;

pub const SESSION_KEY: &str = "supatodo.auth.session";

/// `localStorage`-backed [`SessionStorage`].
///
/// Holds no JS handles; the storage object is looked up on every call.
pub struct BrowserSessionStorage {
    key: &'static str,
}

impl Default for BrowserSessionStorage {
    fn default() -> Self {
        Self { key: SESSION_KEY }
    }
}

fn local_storage() -> AuthResult<web_sys::Storage> {
    web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .ok_or_else(|| AuthError::Storage("localStorage is unavailable".to_string()))
}

fn js_error(err: wasm_bindgen::JsValue) -> AuthError {
    AuthError::Storage(format!("{err:?}"))
}

impl SessionStorage for BrowserSessionStorage {
    fn load(&self) -> AuthResult<Option<Session>> {
        let Some(raw) = local_storage()?.get_item(self.key).map_err(js_error)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                warn!(error = %err, "discarding unreadable stored session");
                self.clear()?;
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> AuthResult<()> {
        let raw = serde_json::to_string(session).map_err(|e| AuthError::Storage(e.to_string()))?;
        local_storage()?.set_item(self.key, &raw).map_err(js_error)
    }

    fn clear(&self) -> AuthResult<()> {
        local_storage()?.remove_item(self.key).map_err(js_error)
    }
}
