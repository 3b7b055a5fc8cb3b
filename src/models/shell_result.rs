/// Captured outcome of one admin-tool process run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellResult {
    pub exit_code: i32,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

impl ShellResult {
    pub fn new(exit_code: i32, stdout: Option<String>, stderr: Option<String>) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
        }
    }

    pub fn success(stdout: impl Into<String>) -> Self {
        Self::new(0, Some(stdout.into()), Some(String::new()))
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::new(exit_code, Some(String::new()), Some(stderr.into()))
    }

    pub fn is_successful(&self) -> bool {
        self.exit_code == 0
    }
}
