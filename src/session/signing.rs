//! Session keys are `{session_id}.{tag}`, where `tag` is the hex HMAC-SHA256
//! of the id under `SessionConfig::secret_key`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::SecretString;

type HmacSha256 = Hmac<Sha256>;

fn keyed_mac(session_id: &str, secret: &SecretString) -> HmacSha256 {
    #[allow(clippy::expect_used)]
    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .expect("HMAC takes keys of any length");
    mac.update(session_id.as_bytes());
    mac
}

pub fn sign_session_id(session_id: &str, secret: &SecretString) -> String {
    let tag = keyed_mac(session_id, secret).finalize().into_bytes();
    format!("{session_id}.{}", hex::encode(tag))
}

/// The session id inside `session_key`, if its tag checks out.
pub fn verify_session_key(session_key: &str, secret: &SecretString) -> Option<String> {
    let (session_id, tag_hex) = session_key.rsplit_once('.')?;
    let tag = hex::decode(tag_hex).ok()?;

    // verify_slice compares in constant time and rejects truncated tags
    if keyed_mac(session_id, secret).verify_slice(&tag).is_ok() {
        return Some(session_id.to_owned());
    }

    log::warn!(
        target: "onboard::session",
        "msg=\"session key rejected\", id_prefix=\"{}\"",
        session_id.chars().take(6).collect::<String>()
    );
    None
}
