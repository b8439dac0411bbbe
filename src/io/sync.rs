use crate::model::settings::Settings;

/// Error type for remote sync
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("sync is not configured (set sync_endpoint and sync_key)")]
    Disabled,
    #[error("sync endpoint rejected the credential (HTTP {0})")]
    Auth(u16),
    #[error("sync endpoint returned HTTP {0}")]
    Http(u16),
    #[error("sync request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Resolve the sync endpoint and its credential. The sync credential is
/// its own secret: reusing the completion-API key here would hand one
/// service's credential to an unrelated backend. An absent `sync_key`
/// means sync stays off even when the endpoint is set.
pub fn sync_config(settings: &Settings) -> Result<(&str, &str), SyncError> {
    let endpoint = settings.sync_endpoint.as_deref().ok_or(SyncError::Disabled)?;
    let key = settings
        .sync_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or(SyncError::Disabled)?;
    Ok((endpoint, key))
}

/// Upload the sealed blob. The payload is already armored by the vault;
/// the transport never sees plaintext.
pub fn push_blob(settings: &Settings, sealed: &[u8]) -> Result<(), SyncError> {
    let (endpoint, key) = sync_config(settings)?;
    let response = reqwest::blocking::Client::new()
        .post(endpoint)
        .bearer_auth(key)
        .body(sealed.to_vec())
        .send()?;
    check_status(response.status().as_u16())
}

/// Download the sealed blob
pub fn pull_blob(settings: &Settings) -> Result<Vec<u8>, SyncError> {
    let (endpoint, key) = sync_config(settings)?;
    let response = reqwest::blocking::Client::new()
        .get(endpoint)
        .bearer_auth(key)
        .send()?;
    check_status(response.status().as_u16())?;
    Ok(response.bytes()?.to_vec())
}

fn check_status(status: u16) -> Result<(), SyncError> {
    match status {
        200..=299 => Ok(()),
        401 | 403 => Err(SyncError::Auth(status)),
        other => Err(SyncError::Http(other)),
    }
}
