use std::io::{self, Write};
use std::process::{Command, Stdio};

use anyhow::{anyhow, Context, Result};

/// Handle on the cluster, driven through the `kubectl` binary of the current kubeconfig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kubectl {
    program: String,
}

impl Default for Kubectl {
    fn default() -> Self {
        Self::new("kubectl")
    }
}

impl Kubectl {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn base_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.stdin(Stdio::null());
        command
    }

    pub fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        tracing::debug!(program = %self.program, args = %args.join(" "), "running kubectl");
        let output = self
            .base_command()
            .args(args)
            .output()
            .with_context(|| format!("failed launching {} {}", self.program, args.join(" ")))?;
        if !output.status.success() {
            return Err(anyhow!(
                "{} {} failed: {}",
                self.program,
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        Ok(output.stdout)
    }

    pub fn run_with_stdin(&self, args: &[&str], input: &[u8]) -> Result<Vec<u8>> {
        tracing::debug!(
            program = %self.program,
            args = %args.join(" "),
            bytes = input.len(),
            "running kubectl with stdin"
        );
        let mut child = self
            .base_command()
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed launching {} {}", self.program, args.join(" ")))?;

        // Feed stdin from its own thread so stdout and stderr keep draining; a child that
        // exits early must still be reaped and its stderr reported.
        let stdin = child.stdin.take();
        let (output, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(input),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (output, written)
        });

        let output = output
            .with_context(|| format!("failed waiting for {} {}", self.program, args.join(" ")))?;
        if !output.status.success() {
            return Err(anyhow!(
                "{} {} failed ({}): {}",
                self.program,
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        // A successful child may stop reading before the end of the input.
        match written {
            Err(err) if err.kind() != io::ErrorKind::BrokenPipe => {
                Err(err).with_context(|| format!("failed writing input to {}", self.program))
            }
            _ => Ok(output.stdout),
        }
    }
}
