use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use monodiff::errors::{MonodiffError, Result};
use monodiff::exec::{CommandOutput, CommandRunner};

/// One recorded call to [`FakeCommandRunner::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone)]
enum Scripted {
    Output(CommandOutput),
    SpawnError(String),
}

/// A fake process runner that:
/// - records every invocation
/// - answers with scripted output per program, in order
/// - answers unscripted calls with an empty, successful output.
#[derive(Debug, Clone, Default)]
pub struct FakeCommandRunner {
    invocations: Arc<Mutex<Vec<Invocation>>>,
    scripts: Arc<Mutex<HashMap<String, VecDeque<Scripted>>>>,
}

impl FakeCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an output for the next call to `program`.
    pub fn respond(self, program: &str, output: CommandOutput) -> Self {
        self.push(program, Scripted::Output(output));
        self
    }

    /// Make the next call to `program` fail to spawn.
    pub fn fail_to_spawn(self, program: &str, reason: &str) -> Self {
        self.push(program, Scripted::SpawnError(reason.to_string()));
        self
    }

    /// Queue stdout for the next shell call, i.e. the diff command.
    pub fn with_diff_output(self, stdout: &str) -> Self {
        let (shell, _) = monodiff::exec::shell_command("");
        self.respond(&shell, CommandOutput::success(stdout))
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    /// Invocations of `program` only.
    pub fn calls_to(&self, program: &str) -> Vec<Invocation> {
        self.invocations()
            .into_iter()
            .filter(|i| i.program == program)
            .collect()
    }

    fn push(&self, program: &str, scripted: Scripted) {
        let mut scripts = self.scripts.lock().unwrap();
        scripts
            .entry(program.to_string())
            .or_default()
            .push_back(scripted);
    }
}

impl CommandRunner for FakeCommandRunner {
    fn run<'a>(
        &'a self,
        program: &'a str,
        args: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + Send + 'a>> {
        Box::pin(async move {
            self.invocations.lock().unwrap().push(Invocation {
                program: program.to_string(),
                args: args.to_vec(),
            });

            let next = self
                .scripts
                .lock()
                .unwrap()
                .get_mut(program)
                .and_then(VecDeque::pop_front);

            match next {
                Some(Scripted::Output(output)) => Ok(output),
                Some(Scripted::SpawnError(reason)) => {
                    Err(MonodiffError::Other(anyhow::anyhow!(reason)))
                }
                None => Ok(CommandOutput::success("")),
            }
        })
    }
}
