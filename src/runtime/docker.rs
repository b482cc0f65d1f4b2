// Docker runtime backed by the docker CLI
#![allow(dead_code)]

use crate::runtime::client::{ContainerRuntime, ProgressStream};
use crate::runtime::error::{Result, RuntimeError};
use crate::runtime::types::{ContainerHandle, ImageRef, ProgressEvent, RunSpec};
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use std::process::{Output, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader, Lines};
use tokio::process::{ChildStdout, Command};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Talks to the default local Docker endpoint through the `docker` binary
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: String,
}

impl DockerCli {
    pub fn new() -> Self {
        Self {
            binary: "docker".to_string(),
        }
    }

    async fn docker(&self, args: &[&str]) -> Result<Output> {
        debug!(binary = %self.binary, args = ?args, "invoking container runtime");

        Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| RuntimeError::Unavailable(format!("{}: {}", self.binary, e)))
    }

    async fn container_op(
        &self,
        op: &'static str,
        args: &[&str],
        handle: &ContainerHandle,
    ) -> Result<Output> {
        let output = self.docker(args).await?;
        if output.status.success() {
            return Ok(output);
        }
        Err(RuntimeError::Operation {
            op,
            id: handle.to_string(),
            detail: stderr_text(&output),
        })
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

fn is_missing(output: &Output) -> bool {
    stderr_text(output).to_lowercase().contains("no such")
}

/// Interleave `docker logs --timestamps` output of both streams by time and
/// strip the stamps. Lines with equal stamps keep stdout first.
fn merge_timestamped(stdout: &str, stderr: &str) -> String {
    let mut lines: Vec<(String, &str)> = stdout
        .split_inclusive('\n')
        .chain(stderr.split_inclusive('\n'))
        .map(split_stamp)
        .collect();
    lines.sort_by(|a, b| a.0.cmp(&b.0));
    lines.into_iter().map(|(_, text)| text).collect()
}

/// Split `<RFC 3339 stamp> <text>` into a sortable key and the text
fn split_stamp(line: &str) -> (String, &str) {
    match line.split_once(' ') {
        Some((stamp, text)) if is_stamp(stamp) => (stamp_key(stamp), text),
        _ => {
            // An empty log line is written as a bare stamp
            let bare = line.trim_end_matches('\n');
            if is_stamp(bare) {
                (stamp_key(bare), &line[bare.len()..])
            } else {
                (String::new(), line)
            }
        }
    }
}

fn is_stamp(text: &str) -> bool {
    text.len() >= 20 && text.as_bytes()[..4].iter().all(u8::is_ascii_digit) && text.contains('T')
}

/// Fixed-width key: fractional seconds padded to nanoseconds
fn stamp_key(stamp: &str) -> String {
    let stamp = stamp.trim_end_matches('Z');
    match stamp.split_once('.') {
        Some((secs, fraction)) => {
            let digits: String = fraction.chars().take_while(|c| c.is_ascii_digit()).collect();
            format!("{}.{:0<9}", secs, digits)
        }
        None => format!("{}.{:0<9}", stamp, ""),
    }
}

/// State carried between items of the pull stream
enum PullState {
    Reading {
        lines: Lines<BufReader<ChildStdout>>,
        child: tokio::process::Child,
        stderr: Option<JoinHandle<String>>,
        image: String,
    },
    Done,
}

#[async_trait]
impl ContainerRuntime for DockerCli {
    async fn image_present(&self, image: &ImageRef) -> Result<bool> {
        let output = self
            .docker(&["image", "inspect", &image.reference()])
            .await?;

        if output.status.success() {
            return Ok(true);
        }
        if is_missing(&output) {
            return Ok(false);
        }
        Err(RuntimeError::Unavailable(stderr_text(&output)))
    }

    async fn pull_image(&self, image: &ImageRef) -> Result<ProgressStream> {
        let reference = image.reference();
        info!(image = %reference, "pulling image");

        let mut child = Command::new(&self.binary)
            .args(["pull", &reference])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RuntimeError::Unavailable(format!("{}: {}", self.binary, e)))?;

        let stdout = child.stdout.take().ok_or_else(|| RuntimeError::PullFailed {
            image: reference.clone(),
            detail: "pull output not captured".to_string(),
        })?;

        // Drained alongside stdout so a chatty stderr cannot stall the pull.
        let stderr = child.stderr.take().map(|mut pipe| {
            tokio::spawn(async move {
                let mut text = String::new();
                pipe.read_to_string(&mut text).await.ok();
                text
            })
        });

        let state = PullState::Reading {
            lines: BufReader::new(stdout).lines(),
            child,
            stderr,
            image: reference,
        };

        let events = stream::unfold(state, |state| async move {
            let PullState::Reading {
                mut lines,
                mut child,
                stderr,
                image,
            } = state
            else {
                return None;
            };

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if let Some(event) = ProgressEvent::parse_line(&line) {
                            let next = PullState::Reading {
                                lines,
                                child,
                                stderr,
                                image,
                            };
                            return Some((Ok(event), next));
                        }
                    }
                    Ok(None) => {
                        let stderr = match stderr {
                            Some(task) => task.await.unwrap_or_default(),
                            None => String::new(),
                        };
                        return match child.wait().await {
                            Ok(status) if status.success() => None,
                            Ok(status) => {
                                let detail = if stderr.trim().is_empty() {
                                    format!("docker pull exited with {}", status)
                                } else {
                                    stderr.trim().to_string()
                                };
                                Some((Err(RuntimeError::PullFailed { image, detail }), PullState::Done))
                            }
                            Err(e) => Some((
                                Err(RuntimeError::PullFailed {
                                    image,
                                    detail: e.to_string(),
                                }),
                                PullState::Done,
                            )),
                        };
                    }
                    Err(e) => {
                        return Some((
                            Err(RuntimeError::PullFailed {
                                image,
                                detail: e.to_string(),
                            }),
                            PullState::Done,
                        ));
                    }
                }
            }
        });

        Ok(events.boxed())
    }

    async fn run(&self, spec: &RunSpec) -> Result<ContainerHandle> {
        let image = spec.image.reference();
        let volumes: Vec<String> = spec.mounts.iter().map(|m| m.to_volume_arg()).collect();

        let mut args: Vec<&str> = vec!["run", "-d"];
        for volume in &volumes {
            args.push("-v");
            args.push(volume);
        }
        args.push("-w");
        args.push(&spec.working_dir);
        args.push(&image);
        args.extend(spec.command.iter().map(String::as_str));

        let output = self.docker(&args).await?;
        if !output.status.success() {
            return Err(RuntimeError::RunFailed {
                image,
                detail: stderr_text(&output),
            });
        }

        let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if id.is_empty() {
            return Err(RuntimeError::RunFailed {
                image,
                detail: "runtime returned no container id".to_string(),
            });
        }

        let handle = ContainerHandle::new(id);
        debug!(container = %handle, image = %image, "container started");
        Ok(handle)
    }

    async fn wait(&self, handle: &ContainerHandle) -> Result<i64> {
        let output = self
            .container_op("wait", &["wait", handle.id()], handle)
            .await?;

        let text = String::from_utf8_lossy(&output.stdout);
        text.trim()
            .parse::<i64>()
            .map_err(|e| RuntimeError::Operation {
                op: "wait",
                id: handle.to_string(),
                detail: format!("unexpected exit status '{}': {}", text.trim(), e),
            })
    }

    async fn logs(&self, handle: &ContainerHandle) -> Result<String> {
        // The CLI splits the two streams; timestamps put them back in order.
        let output = self
            .container_op("logs", &["logs", "--timestamps", handle.id()], handle)
            .await?;

        Ok(merge_timestamped(
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
        ))
    }

    async fn kill(&self, handle: &ContainerHandle) -> Result<()> {
        self.container_op("kill", &["kill", handle.id()], handle)
            .await
            .map(|_| ())
    }

    async fn remove(&self, handle: ContainerHandle) -> Result<()> {
        let output = self.docker(&["rm", "-f", handle.id()]).await?;
        if output.status.success() || is_missing(&output) {
            debug!(container = %handle, "container removed");
            return Ok(());
        }
        Err(RuntimeError::Operation {
            op: "remove",
            id: handle.to_string(),
            detail: stderr_text(&output),
        })
    }
}
