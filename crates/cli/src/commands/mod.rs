pub mod config;
pub mod render;
pub mod shell;

use serde::Serialize;

/// What a subcommand prints to stdout and the process exit code.
///
/// Exit codes: 0 success, 2 configuration failure, 3 I/O or serialization failure.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct FailurePayload<'a> {
    command: &'a str,
    status: &'static str,
    error_class: &'a str,
    message: String,
}

impl CommandResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload =
            FailurePayload { command, status: "error", error_class, message: message.into() };
        let output = serde_json::to_string(&payload).unwrap_or_else(|error| {
            format!(
                "{{\"command\":\"{command}\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":{:?}}}",
                error.to_string()
            )
        });
        Self { exit_code, output }
    }
}
