//! # Integration Tests
//!
//! Cross-crate end-to-end tests.
//!
//! Covers:
//! - Custom sink factories and engines driven by a channel source
//! - The real engine writing point-in-time profiles to files
//! - Continuous CPU capture lifecycle
//! - OS signal delivery through `sigprof::install`

#[cfg(test)]
mod support {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::thread;
    use std::time::{Duration, Instant};

    pub fn files_in(dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        files.sort();
        files
    }

    /// Poll `check` every 10ms until it holds or `timeout` passes
    pub fn wait_for(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if check() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(10));
        }
    }
}

#[cfg(test)]
mod channel_tests {
    use std::io::Write;
    use std::sync::Arc;

    use contracts::{
        CaptureFailure, CaptureOutcome, CaptureRequest, ContractError, OutputMode, ProfileEngine,
        ProfileMap, Signal, Sink,
    };
    use dispatcher::{DispatcherBuilder, DispatcherConfig, MemorySinkFactory};
    use tokio::sync::mpsc;

    /// Writes `test <profile>\n`
    struct MarkerEngine;

    impl ProfileEngine for MarkerEngine {
        fn capture(
            &self,
            request: &CaptureRequest,
            mut sink: Box<dyn Sink>,
        ) -> Result<CaptureOutcome, CaptureFailure> {
            let marker = format!("test {}\n", request.profile);
            match sink.write_all(marker.as_bytes()) {
                Ok(()) => Ok(CaptureOutcome::Written {
                    sink,
                    bytes: marker.len() as u64,
                }),
                Err(e) => Err(CaptureFailure::new(
                    ContractError::profile_write(&request.profile, e.to_string()),
                    sink,
                )),
            }
        }
    }

    /// Two triggers, four names, a custom output mode and an ignored signal
    #[tokio::test]
    async fn test_custom_factory_and_engine() {
        let config = DispatcherConfig {
            profiles: ProfileMap::new(
                vec!["foo".to_string(), "bar".to_string()],
                vec!["baz".to_string(), "quux".to_string()],
            ),
            output: OutputMode::Other("orange".to_string()),
            ..Default::default()
        };
        let factory = Arc::new(MemorySinkFactory::new());
        let (tx, rx) = mpsc::channel(1);
        let dispatcher = DispatcherBuilder::new(config, Arc::new(MarkerEngine))
            .sink_factory(factory.clone())
            .build(rx);
        let metrics = dispatcher.metrics();
        let worker = dispatcher.spawn();

        tx.send(Signal::User1).await.unwrap();
        tx.send(Signal::User2).await.unwrap();
        tx.send(Signal::Other(28)).await.unwrap();
        drop(tx);
        worker.await.unwrap();

        let captures = factory.captures();
        assert_eq!(captures.len(), 4);
        for (capture, name) in captures.iter().zip(["foo", "bar", "baz", "quux"]) {
            assert_eq!(capture.profile, name);
            assert_eq!(capture.mode, OutputMode::Other("orange".to_string()));
            assert_eq!(capture.buffer.text(), format!("test {name}\n"));
            assert_eq!(capture.buffer.closes(), 1);
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.signals, 3);
        assert_eq!(snapshot.ignored_signals, 1);
        assert_eq!(snapshot.successes, 4);
    }
}

#[cfg(test)]
mod runtime_tests {
    use std::fs;
    use std::sync::Arc;
    use std::time::Duration;

    use contracts::{OutputMode, ProfileMap, Signal};
    use dispatcher::{DispatcherBuilder, DispatcherConfig, MemorySinkFactory};
    use pprof::ProfilerGuard;
    use profile_engine::RuntimeProfiler;
    use tokio::sync::mpsc;

    use crate::support::{files_in, wait_for};

    fn file_config(usr1: &str, usr2: &str, dir: &std::path::Path) -> DispatcherConfig {
        DispatcherConfig {
            profiles: ProfileMap::new(vec![usr1.to_string()], vec![usr2.to_string()]),
            output: OutputMode::File,
            output_dir: dir.to_path_buf(),
            cpu_duration: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_interleaved_threads_and_heap_files() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::channel(1);
        let dispatcher = DispatcherBuilder::new(
            file_config("threads", "heap", dir.path()),
            Arc::new(RuntimeProfiler::default()),
        )
        .build(rx);
        let metrics = dispatcher.metrics();
        let worker = dispatcher.spawn();

        for _ in 0..100 {
            tx.send(Signal::User1).await.unwrap();
            tx.send(Signal::User2).await.unwrap();
        }
        drop(tx);
        worker.await.unwrap();

        let files = files_in(dir.path());
        assert_eq!(files.len(), 200);

        let (mut threads, mut heap) = (0, 0);
        for path in &files {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            let content = fs::read(path).unwrap();
            if content.starts_with(b"threads profile:") {
                assert!(name.contains(".threads.prof."), "{name}");
                threads += 1;
            } else if content.starts_with(b"heap profile:") {
                assert!(name.contains(".heap.prof."), "{name}");
                heap += 1;
            }
        }
        assert_eq!((threads, heap), (100, 100));
        assert_eq!(metrics.failures(), 0);
    }

    #[tokio::test]
    async fn test_unknown_profile_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::channel(1);
        let dispatcher = DispatcherBuilder::new(
            file_config("nope", "heap", dir.path()),
            Arc::new(RuntimeProfiler::default()),
        )
        .build(rx);
        let metrics = dispatcher.metrics();
        let worker = dispatcher.spawn();

        tx.send(Signal::User1).await.unwrap();
        drop(tx);
        worker.await.unwrap();

        assert!(files_in(dir.path()).is_empty());
        assert_eq!(metrics.failures(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_tasks_profile_inside_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::channel(1);
        let dispatcher = DispatcherBuilder::new(
            file_config("tasks", "heap", dir.path()),
            Arc::new(RuntimeProfiler::default()),
        )
        .build(rx);
        let worker = dispatcher.spawn();

        tx.send(Signal::User1).await.unwrap();
        drop(tx);
        worker.await.unwrap();

        let files = files_in(dir.path());
        assert_eq!(files.len(), 1);
        let content = fs::read_to_string(&files[0]).unwrap();
        assert!(content.starts_with("tasks profile: flavor=MultiThread workers=2"));
    }

    /// A zero-length cpu capture completes and releases the profiler
    #[tokio::test]
    async fn test_cpu_capture_completes_and_releases() {
        let factory = Arc::new(MemorySinkFactory::new());
        let config = DispatcherConfig {
            profiles: ProfileMap::new(vec!["cpu".to_string()], vec!["heap".to_string()]),
            cpu_duration: Duration::ZERO,
            ..Default::default()
        };
        let (tx, rx) = mpsc::channel(1);
        let dispatcher = DispatcherBuilder::new(config, Arc::new(RuntimeProfiler::default()))
            .sink_factory(factory.clone())
            .build(rx);
        let metrics = dispatcher.metrics();
        let worker = dispatcher.spawn();

        tx.send(Signal::User1).await.unwrap();
        drop(tx);
        worker.await.unwrap();
        assert_eq!(metrics.continuous_starts(), 1);

        // Independent start, retried with bounded backoff
        let mut backoff = Duration::from_millis(10);
        let mut guard = None;
        for _ in 0..10 {
            match ProfilerGuard::new(100) {
                Ok(g) => {
                    guard = Some(g);
                    break;
                }
                Err(_) => {
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(Duration::from_secs(1));
                }
            }
        }
        assert!(guard.is_some(), "profiler still busy");
        drop(guard);

        let captures = factory.captures();
        assert_eq!(captures.len(), 1);
        let buffer = captures[0].buffer.clone();
        assert!(wait_for(Duration::from_secs(10), || buffer.closes() == 1));
        assert!(!buffer.contents().is_empty());
        assert_eq!(buffer.closes(), 1);
    }
}

#[cfg(test)]
mod install_tests {
    use std::fs;
    use std::time::Duration;

    use nix::sys::signal::{raise, Signal};
    use sigprof::{OutputMode, SigprofConfig};

    use crate::support::files_in;

    #[tokio::test]
    async fn test_os_signal_writes_profile() {
        let dir = tempfile::tempdir().unwrap();
        let config = SigprofConfig {
            usr1: vec!["threads".to_string()],
            usr2: vec!["heap".to_string()],
            output: OutputMode::File,
            output_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let handle = sigprof::install(config).unwrap();

        raise(Signal::SIGUSR1).unwrap();

        let mut written = false;
        for _ in 0..500 {
            if handle.metrics().successes() >= 1 {
                written = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.shutdown().await;
        assert!(written, "no capture after SIGUSR1");

        let files = files_in(dir.path());
        assert_eq!(files.len(), 1);
        assert!(fs::read_to_string(&files[0])
            .unwrap()
            .starts_with("threads profile:"));
    }

    #[tokio::test]
    async fn test_env_config_reaches_dispatcher() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("sigprof.toml");
        fs::write(&file, "usr1 = [\"heap\"]\noutput = \"stderr\"\n").unwrap();

        let config = config_loader::ConfigLoader::from_vars([
            ("SIGPROF_CONFIG", file.display().to_string()),
            ("SIGPROF_USR2", "threads, cpu".to_string()),
        ])
        .unwrap();
        let dispatcher_config = dispatcher::DispatcherConfig::from(&config);

        assert_eq!(
            dispatcher_config.profiles.profiles_for(contracts::Signal::User1),
            ["heap"]
        );
        assert_eq!(
            dispatcher_config.profiles.profiles_for(contracts::Signal::User2),
            ["threads", "cpu"]
        );
        assert_eq!(dispatcher_config.output, OutputMode::Stderr);
    }
}
