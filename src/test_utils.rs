//! Test utilities shared across test modules
//!
//! Fakes for every collaborator in [`Context`], plus a harness that owns them
//! inside a temporary config directory.

use chrono::{DateTime, TimeZone, Utc};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fs;
use tempfile::TempDir;

use crate::context::{Clock, Context, EnvSource, Prompter};
use crate::error::Result;
use crate::paths::Paths;
use crate::store::{Config, Env};
use crate::ui::Sink;

/// Create a Paths struct rooted at `<temp>/.claude`
pub fn setup_test_paths(temp_dir: &TempDir) -> Paths {
    Paths::from_config_dir(temp_dir.path().join(".claude"))
}

#[derive(Default)]
pub struct MapEnv(pub HashMap<String, String>);

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

/// Replays queued answers; panics if asked more than scripted
#[derive(Default)]
pub struct ScriptedPrompter {
    pub secrets: RefCell<VecDeque<Option<String>>>,
    pub confirms: RefCell<VecDeque<Result<bool>>>,
    pub asked: RefCell<Vec<String>>,
}

impl Prompter for ScriptedPrompter {
    fn secret(&self, message: &str) -> Result<Option<String>> {
        self.asked.borrow_mut().push(message.to_string());
        Ok(self
            .secrets
            .borrow_mut()
            .pop_front()
            .expect("unexpected secret prompt"))
    }

    fn confirm(&self, message: &str) -> Result<bool> {
        self.asked.borrow_mut().push(message.to_string());
        self.confirms
            .borrow_mut()
            .pop_front()
            .expect("unexpected confirm prompt")
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Ok,
    Info,
    Warn,
}

/// Collects sink output for assertions
#[derive(Default)]
pub struct RecordingSink {
    pub lines: RefCell<Vec<(Level, String)>>,
}

impl RecordingSink {
    pub fn has(&self, level: Level, needle: &str) -> bool {
        self.lines
            .borrow()
            .iter()
            .any(|(l, msg)| *l == level && msg.contains(needle))
    }
}

impl Sink for RecordingSink {
    fn ok(&self, msg: &str) {
        self.lines.borrow_mut().push((Level::Ok, msg.to_string()));
    }

    fn info(&self, msg: &str) {
        self.lines.borrow_mut().push((Level::Info, msg.to_string()));
    }

    fn warn(&self, msg: &str) {
        self.lines.borrow_mut().push((Level::Warn, msg.to_string()));
    }
}

/// Temp config dir plus fake collaborators
pub struct Harness {
    pub temp_dir: TempDir,
    pub paths: Paths,
    pub env: MapEnv,
    pub prompter: ScriptedPrompter,
    pub clock: FixedClock,
    pub sink: RecordingSink,
}

impl Harness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        Self {
            temp_dir,
            paths,
            env: MapEnv::default(),
            prompter: ScriptedPrompter::default(),
            clock: FixedClock(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()),
            sink: RecordingSink::default(),
        }
    }

    pub fn ctx(&self) -> Context<'_> {
        Context {
            paths: &self.paths,
            env: &self.env,
            prompter: &self.prompter,
            clock: &self.clock,
            sink: &self.sink,
            version: "2.1.0",
        }
    }

    pub fn set_env(&mut self, name: &str, value: &str) {
        self.env.0.insert(name.to_string(), value.to_string());
    }

    pub fn queue_secret(&self, answer: Option<&str>) {
        self.prompter
            .secrets
            .borrow_mut()
            .push_back(answer.map(str::to_string));
    }

    pub fn queue_confirm(&self, answer: bool) {
        self.prompter.confirms.borrow_mut().push_back(Ok(answer));
    }

    /// Make the next confirm prompt fail, as a closed terminal would
    pub fn queue_confirm_error(&self, message: &str) {
        self.prompter
            .confirms
            .borrow_mut()
            .push_back(Err(crate::error::Error::Prompt {
                message: message.to_string(),
            }));
    }

    pub fn write_settings(&self, json: &str) {
        fs::create_dir_all(&self.paths.config_dir).unwrap();
        fs::write(&self.paths.settings_file, json).unwrap();
    }

    pub fn read_settings(&self) -> String {
        fs::read_to_string(&self.paths.settings_file).unwrap()
    }

    pub fn settings(&self) -> Config {
        crate::store::load_config(&self.paths.settings_file).unwrap()
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

pub fn env_of(pairs: &[(&str, &str)]) -> Env {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
