//! Asynchronous detection worker.
//!
//! Decouples an interactive caller from pipeline latency: the worker owns a
//! message loop on a tokio task, executes each run inside `spawn_blocking`
//! (the pipeline is CPU-bound and synchronous), and reports the outcome
//! through a completion callback. Runs are processed one at a time in arrival
//! order.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::error;

use super::{run_detection, DetectionError, DetectionOutcome};
use crate::config::DetectionConfig;

/// Messages understood by the worker loop.
#[derive(Debug)]
pub enum WorkerMessage {
    Run {
        directory: PathBuf,
        config: DetectionConfig,
    },
    Exit,
}

type Callback = Arc<dyn Fn(Result<DetectionOutcome, DetectionError>) + Send + Sync>;

/// Handle to a detection worker task.
#[derive(Debug)]
pub struct DetectionWorker {
    task_handle: Option<JoinHandle<()>>,
    tx: UnboundedSender<WorkerMessage>,
}

impl DetectionWorker {
    /// Spawn the worker. The callback is invoked once per completed run.
    pub fn new<C>(callback: C) -> Self
    where
        C: Fn(Result<DetectionOutcome, DetectionError>) + Send + Sync + 'static,
    {
        let callback: Callback = Arc::new(callback);
        let (tx, rx) = unbounded_channel::<WorkerMessage>();
        let task_handle = tokio::spawn(worker_loop(rx, callback));

        Self {
            task_handle: Some(task_handle),
            tx,
        }
    }

    /// Queue one detection run.
    pub fn run(&self, directory: impl Into<PathBuf>, config: DetectionConfig) {
        self.send(WorkerMessage::Run {
            directory: directory.into(),
            config,
        });
    }

    /// Stop the worker loop. Queued runs ahead of the exit still execute.
    pub fn exit(&mut self) {
        self.send(WorkerMessage::Exit);
        self.task_handle.take();
    }

    fn send(&self, msg: WorkerMessage) {
        if self.tx.send(msg).is_err() {
            error!("detection worker channel closed; message dropped");
        }
    }
}

impl Drop for DetectionWorker {
    fn drop(&mut self) {
        if self.task_handle.is_some() {
            error!("DetectionWorker dropped while still running; call exit() first");
        }
    }
}

async fn worker_loop(mut rx: UnboundedReceiver<WorkerMessage>, callback: Callback) {
    while let Some(msg) = rx.recv().await {
        match msg {
            WorkerMessage::Exit => break,
            WorkerMessage::Run { directory, config } => {
                let task =
                    tokio::task::spawn_blocking(move || run_detection(&directory, &config));
                match task.await {
                    Ok(result) => callback(result),
                    Err(join_error) => {
                        error!(error = %join_error, "detection task failed to complete");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::mpsc;

    use super::*;
    use crate::testing::{frame_with_dots, write_frame_sequence};

    #[tokio::test(flavor = "multi_thread")]
    async fn test_worker_reports_completion() {
        let dir = tempfile::tempdir().unwrap();
        let frames_dir = dir.path().join("frames");
        fs::create_dir(&frames_dir).unwrap();
        write_frame_sequence(
            &frames_dir,
            &[
                frame_with_dots(100, 100, &[(10, 10, 200)]),
                frame_with_dots(100, 100, &[(50, 50, 200)]),
                frame_with_dots(100, 100, &[(90, 90, 200)]),
            ],
        )
        .unwrap();
        let config = DetectionConfig {
            denoise_radius: 0,
            output_dir: dir.path().join("out"),
            ..Default::default()
        };

        let (tx, rx) = mpsc::channel();
        let mut worker = DetectionWorker::new(move |result| {
            tx.send(result.map(|outcome| matches!(outcome, DetectionOutcome::Success(_))))
                .unwrap();
        });

        worker.run(&frames_dir, config);
        let completed = tokio::task::spawn_blocking(move || rx.recv().unwrap())
            .await
            .unwrap();
        assert!(completed.unwrap(), "expected a successful run");
        worker.exit();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_worker_processes_runs_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty");
        fs::create_dir(&empty).unwrap();
        let config = DetectionConfig {
            output_dir: dir.path().join("out"),
            ..Default::default()
        };

        let (tx, rx) = mpsc::channel();
        let mut worker = DetectionWorker::new(move |result| {
            tx.send(matches!(result, Ok(DetectionOutcome::NoFrames))).unwrap();
        });

        worker.run(&empty, config.clone());
        worker.run(&empty, config);
        let results = tokio::task::spawn_blocking(move || {
            vec![rx.recv().unwrap(), rx.recv().unwrap()]
        })
        .await
        .unwrap();
        assert_eq!(results, vec![true, true]);
        worker.exit();
    }
}
