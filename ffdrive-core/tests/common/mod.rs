// ffdrive-core/tests/common/mod.rs
//
// Shared fixtures for the integration tests: a scripted `ToolInvoker` that
// records every command line and plays back canned results.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use ffdrive_core::command::{NULL_OUTPUT, escape};
use ffdrive_core::{CoreResult, ToolInvoker, ToolOutput};

pub const PROBE_OUTPUT: &str = "\
ffmpeg version 6.1 Copyright (c) 2000-2023 the FFmpeg developers
Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'clip.mp4':
  Metadata:
    creation_time   : 2021-06-15T08:30:45.000000Z
  Duration: 00:01:30.500, start: 0.000000, bitrate: 1200 kb/s
  Stream #0:0(und): Video: h264 (High), yuv420p, 1920x1080, 1000 kb/s, 29.97 fps, 29.97 tbr
  Stream #0:1(und): Audio: aac (LC), 48000 Hz, stereo, fltp, 192 kb/s
At least one output file must be specified
";

pub const FAKE_MEDIA: &[u8] = b"fake media bytes";

/// One canned result.
#[derive(Debug, Clone)]
pub struct Step {
    pub diagnostics: String,
    pub exit_code: Option<i32>,
    /// Write `FAKE_MEDIA` to the command's output path.
    pub write_output: bool,
}

impl Step {
    pub fn probe() -> Self {
        Self {
            diagnostics: PROBE_OUTPUT.to_string(),
            exit_code: Some(1),
            write_output: false,
        }
    }

    pub fn success() -> Self {
        Self {
            diagnostics: "video:1kB audio:0kB".to_string(),
            exit_code: Some(0),
            write_output: true,
        }
    }

    pub fn failure(diagnostics: &str) -> Self {
        Self {
            diagnostics: diagnostics.to_string(),
            exit_code: Some(1),
            write_output: false,
        }
    }

    /// Fails after writing part of the output.
    pub fn partial_failure(diagnostics: &str) -> Self {
        Self {
            diagnostics: diagnostics.to_string(),
            exit_code: Some(1),
            write_output: true,
        }
    }

    pub fn silent_success() -> Self {
        Self {
            diagnostics: String::new(),
            exit_code: Some(0),
            write_output: false,
        }
    }
}

/// Plays back queued steps in order, then `Step::success()` forever.
#[derive(Default)]
pub struct ScriptedInvoker {
    steps: RefCell<VecDeque<Step>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedInvoker {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: RefCell::new(steps.into_iter().collect()),
            calls: RefCell::default(),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl ToolInvoker for ScriptedInvoker {
    fn invoke(&self, command_line: &str, _working_dir: Option<&Path>) -> CoreResult<ToolOutput> {
        self.calls.borrow_mut().push(command_line.to_string());
        let step = self
            .steps
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(Step::success);

        if step.write_output {
            let args = escape::split(command_line)?;
            if let Some(output) = args.last().filter(|arg| arg.as_str() != NULL_OUTPUT) {
                fs::write(output, FAKE_MEDIA)?;
            }
        }

        Ok(ToolOutput {
            diagnostics: step.diagnostics,
            exit_code: step.exit_code,
        })
    }
}

/// Writes a small stand-in source file into `dir`.
pub fn source_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"original source").unwrap();
    path
}

/// Files left directly inside `dir`.
pub fn entries(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect()
}
