//! One kadmin round trip: build, execute, release, classify.

use crate::core::{classifier, command};
use crate::error::{Diagnostic, ErrorKind, KadminError};
use crate::models::credential::AdministratorCredentials;
use crate::models::handler_config::HandlerConfig;
use crate::models::shell_result::ShellResult;
use crate::util::exec::Executor;
use tracing::{debug, warn};

pub struct KadminInvoker<E> {
    executor: E,
}

impl<E: Executor> KadminInvoker<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Run `query` through kadmin. Non-zero exit becomes a classified error.
    pub fn invoke(
        &self,
        config: &HandlerConfig,
        credentials: &AdministratorCredentials,
        query: &str,
    ) -> Result<ShellResult, KadminError> {
        if query.is_empty() {
            return Err(KadminError::InvalidArgument("missing kadmin query".into()));
        }

        let command = command::build(config, credentials, query)?;
        let redacted = command.redacted();
        let outcome = self.executor.execute(command.argv());
        // The staged keytab, if any, must not outlive this call.
        command.release();
        let result = outcome?;

        if result.is_successful() {
            debug!(command = %redacted, "kadmin succeeded");
            return Ok(result);
        }

        let exit_code = result.exit_code;
        let stderr = result.stderr.clone().unwrap_or_default();
        let diagnostic = Diagnostic {
            command: Some(redacted),
            exit_code: Some(result.exit_code),
            stdout: result.stdout,
            stderr: result.stderr,
        };
        warn!("failed to execute kadmin:{}", diagnostic);

        let kind = classifier::classify(Some(&stderr));
        let message = match kind {
            ErrorKind::GenericOperation => {
                "unexpected error condition executing the kadmin command".to_string()
            }
            // stderr is carried once, by the diagnostic
            _ => format!("kadmin exited with code {}", exit_code),
        };
        Err(KadminError::classified(kind, message, diagnostic))
    }
}
