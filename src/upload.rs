use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::BoothConfig;
use crate::error::BoothError;

const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const UPLOAD_ENDPOINT: &str =
    "https://www.googleapis.com/upload/drive/v3/files?uploadType=multipart";
const MULTIPART_BOUNDARY: &str = "framebooth-multipart-boundary";

/// Google OAuth client secrets file, "installed" or "web" flavor
#[derive(Debug, Deserialize)]
struct ClientSecrets {
    installed: Option<ClientConfig>,
    web: Option<ClientConfig>,
}

#[derive(Debug, Clone, Deserialize)]
struct ClientConfig {
    client_id: String,
    client_secret: String,
}

/// Externally provisioned token cache; the consent flow that produced the
/// refresh token is out of scope here, we only refresh access tokens.
#[derive(Debug, Serialize, Deserialize)]
struct TokenCache {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Locates the OAuth client secrets file
///
/// Falls back to the lexically last `client_secret_*.json` in the base
/// directory when the canonical name is absent, matching how Google's
/// console names downloaded credentials.
pub fn resolve_client_secrets(preferred: &Path, base_dir: &Path) -> Result<PathBuf, BoothError> {
    if preferred.exists() {
        return Ok(preferred.to_path_buf());
    }

    let mut alternates: Vec<PathBuf> = fs::read_dir(base_dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| {
                    p.file_name()
                        .and_then(|n| n.to_str())
                        .map(|n| n.starts_with("client_secret_") && n.ends_with(".json"))
                        .unwrap_or(false)
                })
                .collect()
        })
        .unwrap_or_default();
    alternates.sort();

    match alternates.pop() {
        Some(alt) => {
            info!("using alternate OAuth client file {}", alt.display());
            Ok(alt)
        }
        None => Err(BoothError::MissingClientSecrets(preferred.to_path_buf())),
    }
}

/// Thin adapter over the Google Drive v3 upload API
///
/// Uploads a local file, makes it world-readable, and returns the embed
/// URL the kiosk encodes into the QR code. All failures surface as
/// `BoothError::Upload`; callers treat them as non-fatal since the
/// composite already exists locally.
pub struct DriveUploader {
    client: ClientConfig,
    credentials_path: PathBuf,
}

impl DriveUploader {
    pub fn new(config: &BoothConfig) -> Result<Self, BoothError> {
        let secrets_path = resolve_client_secrets(&config.client_secrets, &config.base_dir)?;
        let raw = fs::read_to_string(&secrets_path)?;
        let secrets: ClientSecrets = serde_json::from_str(&raw)?;
        let client = secrets.installed.or(secrets.web).ok_or_else(|| {
            BoothError::Upload(format!(
                "{} has no installed/web client section",
                secrets_path.display()
            ))
        })?;
        Ok(DriveUploader {
            client,
            credentials_path: config.credentials.clone(),
        })
    }

    /// Uploads the file and returns its public embed URL.
    pub fn upload(&self, local: &Path) -> Result<String, BoothError> {
        let token = self.refresh_access_token()?;
        let bytes = fs::read(local)?;
        let name = local
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "frame.png".to_string());

        let body = multipart_body(&name, &bytes)?;
        let mut response = ureq::post(UPLOAD_ENDPOINT)
            .header("Authorization", format!("Bearer {}", token))
            .header(
                "Content-Type",
                format!("multipart/related; boundary={}", MULTIPART_BOUNDARY),
            )
            .send(&body[..])
            .map_err(|e| BoothError::Upload(format!("upload request failed: {}", e)))?;

        let created: serde_json::Value = response
            .body_mut()
            .read_json()
            .map_err(|e| BoothError::Upload(format!("unreadable upload response: {}", e)))?;
        let file_id = created
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| BoothError::Upload("upload response carries no file id".to_string()))?;

        self.share_publicly(&token, file_id)?;
        info!("uploaded {} as Drive file {}", name, file_id);
        Ok(format!(
            "https://drive.google.com/uc?export=view&id={}",
            file_id
        ))
    }

    /// Exchanges the cached refresh token for a fresh access token and
    /// writes the updated cache back.
    fn refresh_access_token(&self) -> Result<String, BoothError> {
        let raw = fs::read_to_string(&self.credentials_path).map_err(|e| {
            BoothError::Upload(format!(
                "token cache {} unreadable: {}",
                self.credentials_path.display(),
                e
            ))
        })?;
        let mut cache: TokenCache = serde_json::from_str(&raw).map_err(|e| {
            BoothError::Upload(format!(
                "token cache {} is malformed: {}",
                self.credentials_path.display(),
                e
            ))
        })?;

        let mut response = ureq::post(TOKEN_ENDPOINT)
            .send_form([
                ("client_id", self.client.client_id.as_str()),
                ("client_secret", self.client.client_secret.as_str()),
                ("refresh_token", cache.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .map_err(|e| BoothError::Upload(format!("token refresh failed: {}", e)))?;
        let token: TokenResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| BoothError::Upload(format!("unreadable token response: {}", e)))?;

        cache.access_token = Some(token.access_token.clone());
        match serde_json::to_string_pretty(&cache) {
            Ok(serialized) => {
                if let Err(e) = fs::write(&self.credentials_path, serialized) {
                    warn!(
                        "could not update token cache {}: {}",
                        self.credentials_path.display(),
                        e
                    );
                }
            }
            Err(e) => warn!("could not serialize token cache: {}", e),
        }

        Ok(token.access_token)
    }

    fn share_publicly(&self, token: &str, file_id: &str) -> Result<(), BoothError> {
        let url = format!(
            "https://www.googleapis.com/drive/v3/files/{}/permissions",
            file_id
        );
        ureq::post(url)
            .header("Authorization", format!("Bearer {}", token))
            .send_json(json!({"role": "reader", "type": "anyone"}))
            .map_err(|e| BoothError::Upload(format!("permission request failed: {}", e)))?;
        Ok(())
    }
}

/// Drive `multipart/related` body: JSON metadata part then the raw bytes.
fn multipart_body(name: &str, bytes: &[u8]) -> Result<Vec<u8>, BoothError> {
    let metadata = serde_json::to_string(&json!({ "name": name }))?;
    let mut body = Vec::with_capacity(bytes.len() + metadata.len() + 256);
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{m}\r\n--{b}\r\nContent-Type: image/png\r\n\r\n",
            b = MULTIPART_BOUNDARY,
            m = metadata
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());
    Ok(body)
}
