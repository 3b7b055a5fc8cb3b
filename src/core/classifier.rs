//! Map kadmin diagnostic text to an [`ErrorKind`].

use crate::error::ErrorKind;

/// Evaluated top to bottom; the first matching substring decides the kind.
pub const RULES: &[(&str, ErrorKind)] = &[
    // Did admin credentials fail?
    (
        "Client not found in Kerberos database",
        ErrorKind::AdminAuthentication,
    ),
    (
        "Incorrect password while initializing",
        ErrorKind::AdminAuthentication,
    ),
    // Did we fail to reach the KDC?
    ("Cannot contact any KDC", ErrorKind::KdcConnection),
    (
        "Cannot resolve network address for admin server in requested realm while initializing kadmin interface",
        ErrorKind::KdcConnection,
    ),
    // Is the realm unusable?
    (
        "Missing parameters in krb5.conf required for kadmin client",
        ErrorKind::Realm,
    ),
    (
        "Cannot find KDC for requested realm while initializing kadmin interface",
        ErrorKind::Realm,
    ),
];

pub fn classify(stderr: Option<&str>) -> ErrorKind {
    let stderr = stderr.unwrap_or("");
    RULES
        .iter()
        .find(|(pattern, _)| stderr.contains(pattern))
        .map(|(_, kind)| *kind)
        .unwrap_or(ErrorKind::GenericOperation)
}
