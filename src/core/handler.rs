//! Principal lifecycle against an MIT KDC via kadmin.
//!
//! The manager starts closed. `open` captures credentials and configuration
//! and resolves the admin tools; every principal operation requires it to be
//! open and fails with [`KadminError::NotOpen`] otherwise, before any process
//! is spawned.

use crate::constants;
use crate::core::{invoker::KadminInvoker, key_number, staging};
use crate::error::{Diagnostic, KadminError};
use crate::models::credential::AdministratorCredentials;
use crate::models::handler_config::HandlerConfig;
use crate::models::shell_result::ShellResult;
use crate::util::exec::{Executor, ProcessExecutor};
use crate::util::resolver::ExecutableResolver;
use std::collections::HashMap;
use tracing::{debug, info};

struct OpenState {
    credentials: AdministratorCredentials,
    config: HandlerConfig,
}

pub struct PrincipalManager<E = ProcessExecutor> {
    invoker: KadminInvoker<E>,
    state: Option<OpenState>,
}

impl PrincipalManager<ProcessExecutor> {
    pub fn with_process_executor() -> Self {
        Self::new(ProcessExecutor)
    }
}

impl<E: Executor> PrincipalManager<E> {
    pub fn new(executor: E) -> Self {
        Self {
            invoker: KadminInvoker::new(executor),
            state: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    pub fn config(&self) -> Option<&HandlerConfig> {
        self.state.as_ref().map(|s| &s.config)
    }

    pub fn executor(&self) -> &E {
        self.invoker.executor()
    }

    /// Capture credentials and configuration, resolve the admin tools, and open.
    ///
    /// The tool needed by the credential mode must resolve; the other one is
    /// cached when found and left unset otherwise.
    pub fn open(
        &mut self,
        credentials: AdministratorCredentials,
        realm: Option<&str>,
        configuration: Option<&HashMap<String, String>>,
    ) -> Result<(), KadminError> {
        let mut config = HandlerConfig::from_map(realm, configuration);
        let resolver = ExecutableResolver::new(config.executable_search_paths.clone());

        let (required, optional) = if credentials.is_local() {
            (constants::KADMIN_LOCAL, constants::KADMIN)
        } else {
            (constants::KADMIN, constants::KADMIN_LOCAL)
        };
        let required_path = resolver.resolve(required)?;
        let optional_path = match resolver.resolve(optional) {
            Ok(path) => Some(path),
            Err(e) => {
                debug!(error = %e, "optional admin tool not resolved");
                None
            }
        };
        let (kadmin, kadmin_local) = if credentials.is_local() {
            (optional_path, Some(required_path))
        } else {
            (Some(required_path), optional_path)
        };
        config.admin_tool_path = kadmin;
        config.admin_tool_local_path = kadmin_local;

        info!(
            realm = config.default_realm.as_deref().unwrap_or("-"),
            admin = credentials.principal.as_deref().unwrap_or("(local)"),
            "opened kadmin handler"
        );
        self.state = Some(OpenState {
            credentials,
            config,
        });
        Ok(())
    }

    /// Discard configuration and credentials. Safe to call when already closed.
    pub fn close(&mut self) {
        if self.state.take().is_some() {
            debug!("closed kadmin handler");
        }
        staging::purge_deferred();
    }

    pub fn principal_exists(&self, principal: &str) -> Result<bool, KadminError> {
        let state = self.open_state()?;
        if principal.is_empty() {
            return Ok(false);
        }
        let result = self.invoke(state, &format!("get_principal {}", principal))?;
        let needle = format!("Principal: {}", principal);
        Ok(result.stdout.as_deref().is_some_and(|out| out.contains(&needle)))
    }

    /// Create `principal` and return its key number. `is_service` does not
    /// change the query yet.
    pub fn create_principal(
        &self,
        principal: &str,
        password: &str,
        is_service: bool,
    ) -> Result<u32, KadminError> {
        let state = self.open_state()?;
        require("create principal", "principal", principal)?;
        require("create principal", "password", password)?;

        debug!(principal, service = is_service, "creating principal");
        let query = format!("add_principal -pw {} {}", password, principal);
        let result = self.invoke(state, &query)?;

        let expected = format!("Principal \"{}\" created", principal);
        let created = result.stdout.as_deref().is_some_and(|out| out.contains(&expected));
        if created {
            self.key_number_in(state, principal)
        } else {
            Err(KadminError::operation(
                format!("failed to create principal {}", principal),
                diagnostic_of(&result),
            ))
        }
    }

    /// Change the password of `principal` and return the new key number.
    ///
    /// Unlike creation, the `change_password` output is not inspected: a
    /// successful exit is taken as success.
    pub fn set_principal_password(
        &self,
        principal: &str,
        password: &str,
    ) -> Result<u32, KadminError> {
        let state = self.open_state()?;
        require("set password", "principal", principal)?;
        require("set password", "password", password)?;

        let query = format!("change_password -pw {} {}", password, principal);
        self.invoke(state, &query)?;
        self.key_number_in(state, principal)
    }

    /// Delete `principal`. Any output lacking "Principal does not exist" counts
    /// as a deletion.
    pub fn remove_principal(&self, principal: &str) -> Result<bool, KadminError> {
        let state = self.open_state()?;
        require("remove principal", "principal", principal)?;

        let result = self.invoke(state, &format!("delete_principal -force {}", principal))?;
        Ok(result
            .stdout
            .as_deref()
            .is_some_and(|out| !out.contains("Principal does not exist")))
    }

    /// Current key version number of `principal`.
    pub fn key_number(&self, principal: &str) -> Result<u32, KadminError> {
        let state = self.open_state()?;
        require("get key number", "principal", principal)?;
        self.key_number_in(state, principal)
    }

    fn key_number_in(&self, state: &OpenState, principal: &str) -> Result<u32, KadminError> {
        let result = self.invoke(state, &format!("get_principal {}", principal))?;
        key_number::from_result(principal, &result)
    }

    fn invoke(&self, state: &OpenState, query: &str) -> Result<ShellResult, KadminError> {
        self.invoker.invoke(&state.config, &state.credentials, query)
    }

    fn open_state(&self) -> Result<&OpenState, KadminError> {
        self.state.as_ref().ok_or(KadminError::NotOpen)
    }
}

impl<E> Drop for PrincipalManager<E> {
    fn drop(&mut self) {
        staging::purge_deferred();
    }
}

fn require(action: &str, what: &str, value: &str) -> Result<(), KadminError> {
    if value.is_empty() {
        return Err(KadminError::InvalidArgument(format!(
            "failed to {} - no {} specified",
            action, what
        )));
    }
    Ok(())
}

fn diagnostic_of(result: &ShellResult) -> Diagnostic {
    Diagnostic {
        command: None,
        exit_code: Some(result.exit_code),
        stdout: result.stdout.clone(),
        stderr: result.stderr.clone(),
    }
}
