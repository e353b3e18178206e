use crate::error::ShellError;

/// Status every context starts with until a handler settles it.
pub const FAILURE: i32 = 1;
pub const SUCCESS: i32 = 0;

/// Per-segment record of arguments, captured output and status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    pub command_name: String,
    /// `args[0]` is the command name.
    pub args: Vec<String>,
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self {
            command_name: String::new(),
            args: Vec::new(),
            status: FAILURE,
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

impl ExecutionContext {
    /// Builds a context for one segment. An empty segment yields an empty name.
    pub fn new(args: Vec<String>) -> Self {
        Self {
            command_name: args.first().cloned().unwrap_or_default(),
            args,
            ..Self::default()
        }
    }

    /// Arguments after the command name.
    pub fn operands(&self) -> &[String] {
        self.args.get(1..).unwrap_or_default()
    }

    pub fn succeed(&mut self, stdout: impl Into<String>) {
        self.status = SUCCESS;
        self.stdout = stdout.into();
    }

    pub fn fail(&mut self, err: &ShellError) {
        self.status = FAILURE;
        self.stderr = err.to_string();
    }

    /// Settles the context from a handler result.
    pub fn settle(&mut self, result: Result<String, ShellError>) {
        match result {
            Ok(out) => self.succeed(out),
            Err(e) => self.fail(&e),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == SUCCESS
    }
}
