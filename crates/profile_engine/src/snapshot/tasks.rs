//! tokio runtime snapshot

use std::io::{self, Write};

use tokio::runtime::Handle;

pub(crate) fn write_profile<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    let handle = Handle::try_current().map_err(io::Error::other)?;
    let metrics = handle.metrics();

    writeln!(
        out,
        "tasks profile: flavor={:?} workers={} alive={} global_queue={}",
        handle.runtime_flavor(),
        metrics.num_workers(),
        metrics.num_alive_tasks(),
        metrics.global_queue_depth()
    )?;
    super::write_timestamp(out)
}
