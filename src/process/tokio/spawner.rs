use std::{process::Stdio, sync::Arc};

use tokio::{process::Command, sync::mpsc};

use crate::{
    helper::tracing::MaybeInstrument,
    process::{
        config::{SpawnConfig, StreamSource},
        error::SpawnError,
        event::ProcessEvent,
        tokio::{
            context::ProcessContext,
            handle::ProcessHandle,
            handler::{output::monitor_output, wait::monitor_exit},
            transport::StdoutStream,
        },
    },
};

/// Builds the program and its arguments from the command line.
///
/// The line is split with shell word rules and the first word is searched in
/// `PATH`.
#[cfg(not(windows))]
fn base_command(line: &str) -> Result<Command, SpawnError> {
    use crate::process::command::{CommandLineError, parse_command_line};

    let argv = parse_command_line(line)?;
    let Some((program, args)) = argv.split_first() else {
        return Err(SpawnError::InvalidCommand(CommandLineError::Empty));
    };
    let mut cmd = Command::new(program);
    cmd.args(args);
    Ok(cmd)
}

/// Builds a `%COMSPEC% /c <line>` command so batch files and shell builtins
/// work, without opening a console window.
#[cfg(windows)]
fn base_command(line: &str) -> Result<Command, SpawnError> {
    use windows::Win32::System::Threading::{CREATE_NEW_PROCESS_GROUP, CREATE_NO_WINDOW};

    use crate::process::command::check_command_line;

    check_command_line(line)?;
    let shell = std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string());
    let mut cmd = Command::new(shell);
    cmd.arg("/c").raw_arg(line);
    cmd.creation_flags(CREATE_NEW_PROCESS_GROUP.0 | CREATE_NO_WINDOW.0);
    Ok(cmd)
}

/// Configures a `tokio::process::Command` from the spawn configuration.
///
/// All three standard streams are piped. An explicit environment replaces
/// the inherited one.
pub(crate) fn setup_command(config: &SpawnConfig) -> Result<Command, SpawnError> {
    let mut cmd = base_command(&config.command)?;

    cmd.kill_on_drop(true);

    if let Some(dir) = &config.working_dir {
        cmd.current_dir(dir);
    }

    if config.env.is_some() {
        cmd.env_clear();
        cmd.envs(config.env_pairs());
    }

    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    Ok(cmd)
}

impl ProcessHandle {
    /// Spawns the configured command with piped standard streams.
    ///
    /// The exit monitor is always started; output monitors only for the
    /// streams enabled with [`SpawnConfig::monitor_stdout`] and
    /// [`SpawnConfig::monitor_stderr`]. Events for this process are sent to
    /// `event_tx`.
    ///
    /// The receiver must be drained while monitored streams produce output.
    /// A full channel pauses the output monitor, which in turn leaves the
    /// child blocked on its pipe until events are received again.
    ///
    /// # Errors
    ///
    /// Returns [`SpawnError`] if the configuration or command line is invalid,
    /// or if the OS fails to create the process. Nothing is left running and no
    /// event is sent in that case.
    pub async fn spawn(
        config: SpawnConfig,
        event_tx: mpsc::Sender<ProcessEvent>,
    ) -> Result<Self, SpawnError> {
        if let Err(e) = config.validate() {
            #[cfg(feature = "tracing")]
            tracing::error!(error = %e, "Invalid spawn configuration");
            return Err(e);
        }

        let mut cmd = setup_command(&config)?;
        let mut child = cmd.spawn().map_err(|e| {
            #[cfg(feature = "tracing")]
            tracing::error!(error = %e, command = %config.command, "Failed to spawn child process");
            SpawnError::Spawn(e.to_string())
        })?;

        // `child` is killed on drop, so early returns below leave nothing behind
        let Some(process_id) = child.id() else {
            return Err(SpawnError::Spawn("Failed to get process id".to_string()));
        };
        let stdin = child.stdin.take();
        let Some(stdout) = child.stdout.take() else {
            return Err(SpawnError::Spawn(
                "Failed to take stdout of child process".to_string(),
            ));
        };
        let Some(stderr) = child.stderr.take() else {
            return Err(SpawnError::Spawn(
                "Failed to take stderr of child process".to_string(),
            ));
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            pid = process_id,
            monitor_stdout = config.monitor_stdout,
            monitor_stderr = config.monitor_stderr,
            "Child process spawned"
        );

        let (stdout_stream, stdout_monitor) = if config.monitor_stdout {
            (StdoutStream::streaming(), Some(stdout))
        } else {
            (StdoutStream::manual(stdout, config.read_chunk_size), None)
        };
        let (stderr_slot, stderr_monitor) = if config.monitor_stderr {
            (None, Some(stderr))
        } else {
            (Some(stderr), None)
        };
        let monitors = usize::from(stdout_monitor.is_some()) + usize::from(stderr_monitor.is_some());

        let shared_context = Arc::new(ProcessContext::new(
            config,
            process_id,
            event_tx,
            stdin,
            stdout_stream,
            stderr_slot,
        ));
        shared_context.set_active_monitors(monitors);

        {
            let mut registrations = shared_context.registrations();
            if let Some(pipe) = stdout_monitor {
                let monitor = monitor_output(shared_context.clone(), pipe, StreamSource::Stdout)
                    .maybe_instrument("stdout", process_id);
                registrations.stdout = Some(tokio::spawn(monitor).abort_handle());
            }
            if let Some(pipe) = stderr_monitor {
                let monitor = monitor_output(shared_context.clone(), pipe, StreamSource::Stderr)
                    .maybe_instrument("stderr", process_id);
                registrations.stderr = Some(tokio::spawn(monitor).abort_handle());
            }
            let monitor =
                monitor_exit(shared_context.clone(), child).maybe_instrument("exit", process_id);
            registrations.exit = Some(tokio::spawn(monitor).abort_handle());
        }

        Ok(ProcessHandle::from_context(shared_context))
    }
}
