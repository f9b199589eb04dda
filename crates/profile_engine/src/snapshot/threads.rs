//! OS threads of the current process, read from procfs

use std::backtrace::Backtrace;
use std::fs;
use std::io::{self, Write};

const TASK_DIR: &str = "/proc/self/task";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ThreadInfo {
    pub tid: u32,
    pub name: String,
    pub state: char,
    pub wchan: Option<String>,
}

pub(crate) fn write_profile<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    let threads = list_threads()?;

    writeln!(out, "threads profile: total {}", threads.len())?;
    super::write_timestamp(out)?;

    for thread in &threads {
        writeln!(out)?;
        writeln!(
            out,
            "thread {} [{}]: {}",
            thread.tid,
            state_name(thread.state),
            thread.name
        )?;
        if let Some(wchan) = &thread.wchan {
            writeln!(out, "    waiting in {wchan}")?;
        }
    }

    writeln!(out)?;
    writeln!(out, "capturing thread backtrace:")?;
    writeln!(out, "{}", Backtrace::force_capture())
}

pub(crate) fn list_threads() -> io::Result<Vec<ThreadInfo>> {
    let mut threads = Vec::new();

    for entry in fs::read_dir(TASK_DIR)? {
        let entry = entry?;
        let Some(tid) = entry.file_name().to_str().and_then(|s| s.parse().ok()) else {
            continue;
        };
        let dir = entry.path();

        // The thread may exit between listing and reading
        let Ok(stat) = fs::read_to_string(dir.join("stat")) else {
            continue;
        };
        let Some((name, state)) = parse_stat(&stat) else {
            continue;
        };
        let wchan = fs::read_to_string(dir.join("wchan"))
            .ok()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty() && w != "0");

        threads.push(ThreadInfo {
            tid,
            name,
            state,
            wchan,
        });
    }

    threads.sort_by_key(|t| t.tid);
    Ok(threads)
}

/// Name and state from a `stat` line; the name may itself contain parentheses
fn parse_stat(stat: &str) -> Option<(String, char)> {
    let open = stat.find('(')?;
    let close = stat.rfind(')')?;
    let name = stat.get(open + 1..close)?.to_string();
    let state = stat.get(close + 1..)?.trim_start().chars().next()?;
    Some((name, state))
}

fn state_name(state: char) -> &'static str {
    match state {
        'R' => "running",
        'S' => "sleeping",
        'D' => "disk sleep",
        'Z' => "zombie",
        'T' => "stopped",
        't' => "tracing stop",
        'X' => "dead",
        'I' => "idle",
        _ => "unknown",
    }
}
