#![cfg(unix)]

use kadmin_vault::{
    AdministratorCredentials, ErrorKind, Executor, KadminError, PrincipalManager, ShellResult,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A tiny in-memory KDC that answers the four kadmin queries.
#[derive(Default)]
struct FakeKdc {
    principals: RefCell<HashMap<String, u32>>,
    calls: RefCell<Vec<Vec<String>>>,
    keytabs_seen: RefCell<Vec<PathBuf>>,
    fail_with: RefCell<Option<String>>,
}

impl FakeKdc {
    fn reply(&self, query: &str) -> ShellResult {
        let words: Vec<&str> = query.split(' ').collect();
        let mut principals = self.principals.borrow_mut();
        match words.as_slice() {
            ["get_principal", p] => match principals.get(*p) {
                Some(kvno) => ShellResult::success(format!(
                    "Principal: {}\nNumber of keys: 1\nKey: vno {}, aes256-cts-hmac-sha1-96\nAttributes:\nPolicy: [none]\n",
                    p, kvno
                )),
                None => ShellResult::success(format!(
                    "get_principal: Principal does not exist while retrieving \"{}\".\n",
                    p
                )),
            },
            ["add_principal", "-pw", _, p] => {
                principals.insert(p.to_string(), 1);
                ShellResult::success(format!("Principal \"{}\" created.\n", p))
            }
            ["change_password", "-pw", _, p] => {
                if let Some(kvno) = principals.get_mut(*p) {
                    *kvno += 1;
                }
                ShellResult::success(format!("Password for \"{}\" changed.\n", p))
            }
            ["delete_principal", "-force", p] => {
                if principals.remove(*p).is_some() {
                    ShellResult::success(format!("Principal \"{}\" deleted.\n", p))
                } else {
                    ShellResult::success(
                        "delete_principal: Principal does not exist while deleting principal\n",
                    )
                }
            }
            _ => ShellResult::failure(1, "unknown request"),
        }
    }
}

impl Executor for FakeKdc {
    fn execute(&self, argv: &[String]) -> Result<ShellResult, KadminError> {
        self.calls.borrow_mut().push(argv.to_vec());
        if let Some(t) = argv.iter().position(|a| a == "-t") {
            let path = PathBuf::from(&argv[t + 1]);
            assert!(path.exists(), "keytab must exist while kadmin runs");
            self.keytabs_seen.borrow_mut().push(path);
        }
        if let Some(stderr) = self.fail_with.borrow().clone() {
            return Ok(ShellResult::failure(1, stderr));
        }
        let query = argv.last().cloned().unwrap_or_default();
        Ok(self.reply(&query))
    }
}

fn tools_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in ["kadmin", "kadmin.local"] {
        let path = dir.path().join(name);
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    dir
}

fn configuration(dir: &Path) -> HashMap<String, String> {
    HashMap::from([
        ("executable_search_paths".to_string(), dir.display().to_string()),
        (
            "encryption_types".to_string(),
            "aes256-cts-hmac-sha1-96 aes128-cts-hmac-sha1-96".to_string(),
        ),
    ])
}

#[test]
fn principal_lifecycle_round_trip() {
    let tools = tools_dir();
    let kdc = FakeKdc::default();
    let mut manager = PrincipalManager::new(&kdc);
    manager
        .open(
            AdministratorCredentials::with_password("admin/admin@EXAMPLE.COM", "adminpw"),
            Some("EXAMPLE.COM"),
            Some(&configuration(tools.path())),
        )
        .unwrap();

    let principal = "svc/host@EXAMPLE.COM";
    assert!(!manager.principal_exists(principal).unwrap());
    assert_eq!(manager.create_principal(principal, "pw123", false).unwrap(), 1);
    assert!(manager.principal_exists(principal).unwrap());
    assert_eq!(manager.set_principal_password(principal, "pw456").unwrap(), 2);
    assert_eq!(manager.key_number(principal).unwrap(), 2);
    assert!(manager.remove_principal(principal).unwrap());
    assert!(!manager.remove_principal(principal).unwrap());
    assert!(!manager.principal_exists(principal).unwrap());

    manager.close();
    assert_eq!(
        manager.principal_exists(principal).unwrap_err().kind(),
        ErrorKind::NotOpen
    );
}

#[test]
fn keytab_mode_stages_and_removes_files() {
    let tools = tools_dir();
    let kdc = FakeKdc::default();
    let mut manager = PrincipalManager::new(&kdc);
    let mut credentials =
        AdministratorCredentials::with_keytab("admin/admin@EXAMPLE.COM", vec![5, 2, 0, 0]);
    credentials.password = Some("ignored".to_string().into());
    manager
        .open(credentials, Some("EXAMPLE.COM"), Some(&configuration(tools.path())))
        .unwrap();

    manager.create_principal("a@EXAMPLE.COM", "pw", true).unwrap();
    kdc.fail_with.replace(Some("kadmin: Cannot contact any KDC for realm 'EXAMPLE.COM'".into()));
    let err = manager.principal_exists("a@EXAMPLE.COM").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KdcConnection);

    let seen = kdc.keytabs_seen.borrow();
    assert_eq!(seen.len(), 3);
    let unique: HashSet<&PathBuf> = seen.iter().collect();
    assert_eq!(unique.len(), 3);
    assert!(seen.iter().all(|p| !p.exists()));
    assert!(kdc
        .calls
        .borrow()
        .iter()
        .all(|argv| !argv.iter().any(|a| a == "-w" || a == "ignored")));
}

#[test]
fn failures_never_leak_admin_password() {
    let tools = tools_dir();
    let kdc = FakeKdc::default();
    kdc.fail_with
        .replace(Some("kadmin: Incorrect password while initializing kadmin interface".into()));
    let mut manager = PrincipalManager::new(&kdc);
    manager
        .open(
            AdministratorCredentials::with_password("admin/admin@EXAMPLE.COM", "secretvalue"),
            None,
            Some(&configuration(tools.path())),
        )
        .unwrap();

    let err = manager.create_principal("b@EXAMPLE.COM", "newsecret", false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AdminAuthentication);
    let text = err.to_string();
    assert!(text.contains("-w ********"));
    assert!(!text.contains("secretvalue"));
    assert!(!text.contains("newsecret"));
}

#[test]
fn local_mode_uses_kadmin_local() {
    let tools = tools_dir();
    let kdc = FakeKdc::default();
    let mut manager = PrincipalManager::new(&kdc);
    manager
        .open(
            AdministratorCredentials::local(),
            Some("EXAMPLE.COM"),
            Some(&configuration(tools.path())),
        )
        .unwrap();
    manager.principal_exists("c@EXAMPLE.COM").unwrap();

    let calls = kdc.calls.borrow();
    let argv = &calls[0];
    assert_eq!(PathBuf::from(&argv[0]), tools.path().join("kadmin.local"));
    assert!(!argv.iter().any(|a| a == "-p" || a == "-w"));
    assert_eq!(argv[1..], ["-r", "EXAMPLE.COM", "-q", "get_principal c@EXAMPLE.COM"]);
}
