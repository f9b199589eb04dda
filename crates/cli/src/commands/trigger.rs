//! `trigger` command implementation.

use anyhow::Result;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tracing::info;

use crate::cli::{TriggerArgs, TriggerSignal};
use crate::error::CliError;

impl From<TriggerSignal> for Signal {
    fn from(signal: TriggerSignal) -> Self {
        match signal {
            TriggerSignal::Usr1 => Signal::SIGUSR1,
            TriggerSignal::Usr2 => Signal::SIGUSR2,
        }
    }
}

/// Execute the `trigger` command
pub fn run_trigger(args: &TriggerArgs) -> Result<()> {
    if args.pid <= 0 {
        return Err(CliError::invalid_pid(args.pid).into());
    }

    let sig = Signal::from(args.signal);
    signal::kill(Pid::from_raw(args.pid), sig)
        .map_err(|e| CliError::signal_delivery(sig.as_str(), args.pid, e.desc()))?;

    info!(pid = args.pid, signal = %sig, "Trigger sent");
    println!("sent {} to {}", sig, args.pid);
    Ok(())
}
