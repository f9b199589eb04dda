//! jemalloc heap statistics
//!
//! Reads jemalloc's own counters. The figures only describe the process heap
//! when jemalloc is the global allocator; the header says which case applies.

use std::ffi::{c_char, c_void, CStr};
use std::io::{self, Write};
use std::{mem, ptr};

use tikv_jemalloc_sys as jemalloc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct HeapStats {
    pub allocated: usize,
    pub active: usize,
    pub resident: usize,
    pub mapped: usize,
    pub retained: usize,
}

/// Block allocated through the global allocator by `global_allocator_is_jemalloc`
const DETECT_ALLOCATION: usize = 4 << 20;

pub(crate) fn write_profile<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    let global = global_allocator_is_jemalloc()?;
    let stats = read_stats()?;
    writeln!(
        out,
        "heap profile: allocated={} active={} resident={} mapped={} retained={} allocator={}",
        stats.allocated,
        stats.active,
        stats.resident,
        stats.mapped,
        stats.retained,
        if global { "jemalloc" } else { "unknown" }
    )?;
    super::write_timestamp(out)?;
    if !global {
        writeln!(
            out,
            "# jemalloc is not the global allocator; figures cover jemalloc arenas only"
        )?;
    }
    writeln!(out)?;
    out.write_all(&stats_dump())
}

pub(crate) fn read_stats() -> io::Result<HeapStats> {
    // mallctl also initialises jemalloc, which malloc_stats_print relies on
    refresh_epoch()?;
    Ok(HeapStats {
        allocated: read_usize(c"stats.allocated")?,
        active: read_usize(c"stats.active")?,
        resident: read_usize(c"stats.resident")?,
        mapped: read_usize(c"stats.mapped")?,
        retained: read_usize(c"stats.retained")?,
    })
}

/// Whether allocations made through the global allocator land in jemalloc
///
/// Allocates a large block and checks that `stats.allocated` grew by at least
/// half of it. Large blocks bypass the thread cache, so the growth is visible
/// after the next epoch.
pub(crate) fn global_allocator_is_jemalloc() -> io::Result<bool> {
    let before = read_stats()?.allocated;
    let block = std::hint::black_box(vec![0u8; DETECT_ALLOCATION]);
    let after = read_stats()?.allocated;
    drop(block);
    Ok(after.saturating_sub(before) >= DETECT_ALLOCATION / 2)
}

/// Cached statistics are only updated when the epoch advances
fn refresh_epoch() -> io::Result<()> {
    let mut current: u64 = 0;
    let mut len = mem::size_of::<u64>();
    let mut next: u64 = 1;
    // SAFETY: the name is NUL-terminated; oldp/newp point to live u64s whose
    // size matches the lengths passed.
    let rc = unsafe {
        jemalloc::mallctl(
            c"epoch".as_ptr(),
            (&mut current as *mut u64).cast(),
            &mut len,
            (&mut next as *mut u64).cast(),
            mem::size_of::<u64>(),
        )
    };
    mallctl_result(rc)
}

fn read_usize(name: &CStr) -> io::Result<usize> {
    let mut value: usize = 0;
    let mut len = mem::size_of::<usize>();
    // SAFETY: the name is NUL-terminated; oldp points to a live usize of the
    // advertised size and no new value is written.
    let rc = unsafe {
        jemalloc::mallctl(
            name.as_ptr(),
            (&mut value as *mut usize).cast(),
            &mut len,
            ptr::null_mut(),
            0,
        )
    };
    mallctl_result(rc)?;
    Ok(value)
}

fn mallctl_result(rc: i32) -> io::Result<()> {
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::from_raw_os_error(rc))
    }
}

fn stats_dump() -> Vec<u8> {
    let mut dump = Vec::new();
    // SAFETY: `collect` only dereferences `cbopaque`, which points to `dump`
    // for the duration of this call.
    unsafe {
        jemalloc::malloc_stats_print(
            Some(collect),
            (&mut dump as *mut Vec<u8>).cast(),
            ptr::null(),
        );
    }
    dump
}

unsafe extern "C" fn collect(opaque: *mut c_void, message: *const c_char) {
    if opaque.is_null() || message.is_null() {
        return;
    }
    // SAFETY: opaque is the Vec passed by stats_dump; message is a
    // NUL-terminated string owned by jemalloc for this call.
    let (dump, message) = unsafe { (&mut *opaque.cast::<Vec<u8>>(), CStr::from_ptr(message)) };
    dump.extend_from_slice(message.to_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_are_consistent() {
        let stats = read_stats().unwrap();
        assert!(stats.active >= stats.allocated);
        assert!(stats.mapped >= stats.active);
    }

    #[test]
    fn test_profile_has_header_and_dump() {
        let mut out = Vec::new();
        write_profile(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.starts_with("heap profile: allocated="));
        assert!(text.contains("jemalloc"));
    }

    // Unit test binaries run on the system allocator
    #[test]
    fn test_foreign_global_allocator_is_flagged() {
        assert!(!global_allocator_is_jemalloc().unwrap());

        let mut out = Vec::new();
        write_profile(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        let header = text.lines().next().unwrap();
        assert!(header.ends_with(" allocator=unknown"));
        assert!(text.contains("figures cover jemalloc arenas only"));
    }
}
