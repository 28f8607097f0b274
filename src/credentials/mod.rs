//! Credential providers
//!
//! Credentials are three named secrets (alias, identifier, password). They
//! are read once per run and never written anywhere.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{CredentialSource, CredentialsConfig};
use crate::models::Credentials;
use crate::utils::error::CredentialError;

/// Source of the login credentials for a run
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Provider name used in logs
    fn name(&self) -> &str;

    /// Retrieve the credential triplet
    async fn credentials(&self) -> Result<Credentials, CredentialError>;
}

#[async_trait]
impl<P: CredentialProvider + ?Sized> CredentialProvider for Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn credentials(&self) -> Result<Credentials, CredentialError> {
        (**self).credentials().await
    }
}

/// Names of the three secrets
#[derive(Debug, Clone)]
pub struct SecretNames {
    pub alias: String,
    pub identifier: String,
    pub password: String,
}

impl From<&CredentialsConfig> for SecretNames {
    fn from(config: &CredentialsConfig) -> Self {
        Self {
            alias: config.alias_secret.clone(),
            identifier: config.identifier_secret.clone(),
            password: config.password_secret.clone(),
        }
    }
}

fn non_empty(name: &str, value: String) -> Result<String, CredentialError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(CredentialError::Empty(name.to_string()));
    }
    Ok(value)
}

/// Reads secrets from environment variables
///
/// `padel-dni` is looked up as `PADEL_DNI`.
#[derive(Debug, Clone)]
pub struct EnvCredentialProvider {
    names: SecretNames,
}

impl EnvCredentialProvider {
    pub fn new(names: SecretNames) -> Self {
        Self { names }
    }

    /// Environment variable holding a named secret
    pub fn var_name(secret: &str) -> String {
        secret.replace('-', "_").to_uppercase()
    }

    fn read(&self, secret: &str) -> Result<String, CredentialError> {
        let value = std::env::var(Self::var_name(secret))
            .map_err(|_| CredentialError::Missing(secret.to_string()))?;
        non_empty(secret, value)
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    fn name(&self) -> &str {
        "env"
    }

    async fn credentials(&self) -> Result<Credentials, CredentialError> {
        Ok(Credentials::new(
            self.read(&self.names.alias)?,
            self.read(&self.names.identifier)?,
            self.read(&self.names.password)?,
        ))
    }
}

/// Reads secrets from files named after them, as mounted by secret managers
#[derive(Debug, Clone)]
pub struct FileCredentialProvider {
    dir: PathBuf,
    names: SecretNames,
}

impl FileCredentialProvider {
    pub fn new(dir: impl Into<PathBuf>, names: SecretNames) -> Self {
        Self {
            dir: dir.into(),
            names,
        }
    }

    async fn read(&self, secret: &str) -> Result<String, CredentialError> {
        let path = self.dir.join(secret);
        let value = match tokio::fs::read_to_string(&path).await {
            Ok(value) => value,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CredentialError::Missing(secret.to_string()))
            }
            Err(e) => {
                return Err(CredentialError::Unreadable {
                    name: secret.to_string(),
                    source: e,
                })
            }
        };
        non_empty(secret, value)
    }
}

#[async_trait]
impl CredentialProvider for FileCredentialProvider {
    fn name(&self) -> &str {
        "files"
    }

    async fn credentials(&self) -> Result<Credentials, CredentialError> {
        Ok(Credentials::new(
            self.read(&self.names.alias).await?,
            self.read(&self.names.identifier).await?,
            self.read(&self.names.password).await?,
        ))
    }
}

/// Fixed credentials, for local runs and tests
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credentials: Credentials,
}

impl StaticCredentialProvider {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn credentials(&self) -> Result<Credentials, CredentialError> {
        Ok(self.credentials.clone())
    }
}

/// Build the provider selected by configuration
pub fn provider_from_config(config: &CredentialsConfig) -> Arc<dyn CredentialProvider> {
    let names = SecretNames::from(config);
    match config.source {
        CredentialSource::Env => Arc::new(EnvCredentialProvider::new(names)),
        CredentialSource::Files => {
            Arc::new(FileCredentialProvider::new(config.secrets_dir.clone(), names))
        }
    }
}
