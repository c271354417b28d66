use crate::config::GeneratorConfig;
use crate::error::ServiceError;
use crate::generator::TextGenerator;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;
use tracing::debug;

/// Runs an external program per request: prompt on stdin, text on stdout.
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
    credential_env: String,
}

impl CommandGenerator {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        credential_env: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            credential_env: credential_env.into(),
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        let (program, args) = match config.command.split_first() {
            Some((program, args)) => (program.clone(), args.to_vec()),
            None => (String::new(), Vec::new()),
        };
        Self::new(program, args, config.credential_env.clone())
    }

    fn check_credential(&self) -> Result<(), ServiceError> {
        match std::env::var(&self.credential_env) {
            Ok(value) if !value.trim().is_empty() => Ok(()),
            _ => Err(ServiceError::MissingCredential(self.credential_env.clone())),
        }
    }
}

impl TextGenerator for CommandGenerator {
    fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        self.check_credential()?;
        if self.program.is_empty() {
            return Err(ServiceError::NotConfigured);
        }

        debug!(program = %self.program, prompt_len = prompt.len(), "running text generator");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| ServiceError::Failed(format!("{}: {}", self.program, err)))?;

        // The prompt is fed from a second thread while stdout drains here;
        // a program that echoes as it reads would otherwise fill both pipes.
        let stdin = child.stdin.take();
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(prompt.as_bytes()),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (written, output)
        });

        let output = output.map_err(|err| ServiceError::Failed(err.to_string()))?;
        match written {
            // The program may exit without reading its whole input.
            Err(err) if err.kind() != io::ErrorKind::BrokenPipe => {
                return Err(ServiceError::Failed(err.to_string()));
            }
            _ => {}
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.lines().next().unwrap_or("").trim();
            return Err(ServiceError::Failed(format!(
                "{} exited with {}{}",
                self.program,
                output.status,
                if detail.is_empty() {
                    String::new()
                } else {
                    format!(": {detail}")
                }
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(ServiceError::EmptyResponse);
        }
        Ok(text)
    }
}
