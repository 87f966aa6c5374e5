use std::sync::Mutex;

use crate::importer::application::ports::outgoing::{
    ImportLog, ImportLogError, ImportProgress, LogLevelControl, LogLevelError,
};

#[derive(Default)]
pub struct MemoryLog {
    pub lines: Vec<String>,
    pub finished: bool,
}

impl ImportLog for MemoryLog {
    fn write_line(&mut self, line: &str) -> Result<(), ImportLogError> {
        self.lines.push(line.to_string());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ImportLogError> {
        self.finished = true;
        Ok(())
    }
}

#[derive(Default)]
pub struct CountingProgress {
    pub advanced: usize,
    pub finished: bool,
}

impl ImportProgress for CountingProgress {
    fn advance(&mut self) {
        self.advanced += 1;
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

/// Log filter stand-in that records every directive it was given.
pub struct FakeLogLevel {
    current: Mutex<String>,
    pub history: Mutex<Vec<String>>,
}

impl FakeLogLevel {
    pub fn new(directive: &str) -> Self {
        Self {
            current: Mutex::new(directive.to_string()),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn directive(&self) -> String {
        self.current.lock().unwrap().clone()
    }
}

impl LogLevelControl for FakeLogLevel {
    fn current(&self) -> Result<String, LogLevelError> {
        Ok(self.directive())
    }

    fn set(&self, directive: &str) -> Result<(), LogLevelError> {
        *self.current.lock().unwrap() = directive.to_string();
        self.history.lock().unwrap().push(directive.to_string());
        Ok(())
    }
}
