//! Credential callbacks for remote fetches
//!
//! Tries, in order: libgit2 defaults, the SSH agent, keys in `~/.ssh/`,
//! git credential helpers and finally anonymous plaintext credentials.

use git2::{Cred, CredentialType, Error, ErrorClass, ErrorCode, RemoteCallbacks};

const SSH_KEYS: &[&str] = &["id_ed25519", "id_rsa", "id_ecdsa"];

fn auth_error(message: &str) -> Error {
    Error::new(ErrorCode::Auth, ErrorClass::Http, message)
}

fn anonymous() -> Option<Cred> {
    ["git", "anonymous"]
        .iter()
        .find_map(|user| Cred::userpass_plaintext(user, "").ok())
}

fn ssh_key_from_disk(username: &str) -> Result<Cred, Error> {
    let ssh_dir = dirs::home_dir().unwrap_or_default().join(".ssh");

    SSH_KEYS
        .iter()
        .map(|key| (ssh_dir.join(key), ssh_dir.join(format!("{key}.pub"))))
        .filter(|(private, _)| private.exists())
        .find_map(|(private, public)| {
            let public = public.exists().then_some(public.as_path());
            Cred::ssh_key(username, public, &private, None).ok()
        })
        .ok_or_else(|| auth_error("no usable SSH key found"))
}

fn user_pass(url: &str, username: Option<&str>) -> Result<Cred, Error> {
    let config = git2::Config::open_default().or_else(|_| git2::Config::new())?;

    if let Ok(cred) = Cred::credential_helper(&config, url, username) {
        return Ok(cred);
    }

    username
        .and_then(|user| Cred::userpass_plaintext(user, "").ok())
        .or_else(anonymous)
        .ok_or_else(|| auth_error("authentication failed"))
}

/// Install credential lookup on `callbacks`
pub fn setup_auth_callbacks(callbacks: &mut RemoteCallbacks<'_>) {
    callbacks.credentials(|url, username, allowed| {
        if allowed.contains(CredentialType::DEFAULT) {
            return Cred::default();
        }

        if allowed.contains(CredentialType::SSH_KEY) {
            return match username {
                Some(user) => Cred::ssh_key_from_agent(user).or_else(|_| ssh_key_from_disk(user)),
                None => anonymous().ok_or_else(|| auth_error("authentication failed")),
            };
        }

        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            return user_pass(url, username);
        }

        Err(auth_error("no supported credential type"))
    });
}
