use crate::error::KadminError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use std::fmt;
use zeroize::Zeroizing;

/// Administrator identity and authentication material for the KDC.
#[derive(Clone, Default)]
pub struct AdministratorCredentials {
    pub principal: Option<String>,
    pub password: Option<Zeroizing<String>>,
    pub keytab: Option<Zeroizing<Vec<u8>>>,
}

/// Authentication mode derived from [`AdministratorCredentials`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAuth<'a> {
    /// No principal: drive `kadmin.local` against the local database.
    Local,
    Password { principal: &'a str, password: &'a str },
    Keytab { principal: &'a str, keytab: &'a [u8] },
    /// Principal only: kadmin falls back to the caller's ticket cache.
    TicketCache { principal: &'a str },
}

#[derive(Deserialize)]
struct CredentialDocument {
    principal: Option<String>,
    #[serde(default)]
    password: Option<String>,
    /// Base64-encoded keytab content.
    #[serde(default)]
    keytab: Option<String>,
}

impl AdministratorCredentials {
    pub fn local() -> Self {
        Self::default()
    }

    pub fn with_password(principal: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            principal: Some(principal.into()),
            password: Some(Zeroizing::new(password.into())),
            keytab: None,
        }
    }

    pub fn with_keytab(principal: impl Into<String>, keytab: Vec<u8>) -> Self {
        Self {
            principal: Some(principal.into()),
            password: None,
            keytab: Some(Zeroizing::new(keytab)),
        }
    }

    /// Parse a JSON credential document: `{"principal", "password", "keytab"}`.
    pub fn from_json(json: &str) -> Result<Self, KadminError> {
        let doc: CredentialDocument = serde_json::from_str(json)
            .map_err(|e| {
                KadminError::InvalidArgument(format!("malformed credential document: {}", e))
            })?;
        let password = doc.password.map(Zeroizing::new);
        let keytab = match doc.keytab.map(Zeroizing::new) {
            Some(encoded) if !encoded.trim().is_empty() => {
                let bytes = STANDARD.decode(encoded.trim().as_bytes()).map_err(|e| {
                    KadminError::InvalidArgument(format!("keytab is not valid base64: {}", e))
                })?;
                Some(Zeroizing::new(bytes))
            }
            _ => None,
        };
        Ok(Self {
            principal: doc.principal,
            password,
            keytab,
        })
    }

    /// Keytab wins over password when both are present.
    pub fn auth(&self) -> AdminAuth<'_> {
        let principal = match self.principal.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => return AdminAuth::Local,
        };
        if let Some(keytab) = self.keytab.as_deref().filter(|k| !k.is_empty()) {
            return AdminAuth::Keytab { principal, keytab };
        }
        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            return AdminAuth::Password { principal, password };
        }
        AdminAuth::TicketCache { principal }
    }

    pub fn is_local(&self) -> bool {
        matches!(self.auth(), AdminAuth::Local)
    }
}

impl fmt::Debug for AdministratorCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdministratorCredentials")
            .field("principal", &self.principal)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("keytab", &self.keytab.as_ref().map(|k| format!("<{} bytes>", k.len())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_principal_is_local() {
        assert_eq!(AdministratorCredentials::local().auth(), AdminAuth::Local);
        let creds = AdministratorCredentials {
            principal: Some(String::new()),
            password: Some(Zeroizing::new("pw".into())),
            keytab: None,
        };
        assert_eq!(creds.auth(), AdminAuth::Local);
    }

    #[test]
    fn test_keytab_wins_over_password() {
        let mut creds = AdministratorCredentials::with_password("admin/admin", "secret");
        creds.keytab = Some(Zeroizing::new(vec![5, 2]));
        assert_eq!(
            creds.auth(),
            AdminAuth::Keytab {
                principal: "admin/admin",
                keytab: &[5, 2]
            }
        );
    }

    #[test]
    fn test_empty_keytab_falls_back_to_password() {
        let mut creds = AdministratorCredentials::with_password("admin/admin", "secret");
        creds.keytab = Some(Zeroizing::new(Vec::new()));
        assert_eq!(
            creds.auth(),
            AdminAuth::Password {
                principal: "admin/admin",
                password: "secret"
            }
        );
    }

    #[test]
    fn test_principal_only_uses_ticket_cache() {
        let creds = AdministratorCredentials {
            principal: Some("admin/admin".into()),
            ..Default::default()
        };
        assert_eq!(creds.auth(), AdminAuth::TicketCache { principal: "admin/admin" });
    }

    #[test]
    fn test_from_json_decodes_keytab() {
        let creds = AdministratorCredentials::from_json(
            r#"{"principal":"admin/admin@EXAMPLE.COM","keytab":"BQI="}"#,
        )
        .unwrap();
        assert_eq!(creds.keytab.as_deref().map(|k| k.as_slice()), Some(&[5u8, 2][..]));
    }

    #[test]
    fn test_from_json_rejects_bad_base64() {
        let err = AdministratorCredentials::from_json(r#"{"principal":"a","keytab":"***"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("base64"));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let creds = AdministratorCredentials::with_password("admin/admin", "hunter2");
        let text = format!("{:?}", creds);
        assert!(!text.contains("hunter2"));
        assert!(text.contains("<redacted>"));
    }
}
