//! Progress reporting hooks
//!
//! The round state tells a reporter about each newly found word and about
//! the end of the round. Reporters are fire-and-forget: they return
//! nothing and must not fail the round.

use crate::stats::RoundRecord;

pub trait ProgressReporter {
    /// A player found a word
    fn word_found(&mut self, player: &str, word: &str, points: u32);

    /// The round ended, by completion, timeout or giving up
    fn round_finished(&mut self, record: &RoundRecord);
}

/// Reporter that discards everything
#[derive(Debug, Default)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn word_found(&mut self, _player: &str, _word: &str, _points: u32) {}

    fn round_finished(&mut self, _record: &RoundRecord) {}
}

/// Reporter that keeps every notification in memory (tests)
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct RecordingReporter {
    pub found: std::rc::Rc<std::cell::RefCell<Vec<(String, String, u32)>>>,
    pub finished: std::rc::Rc<std::cell::RefCell<Vec<RoundRecord>>>,
}

#[cfg(test)]
impl ProgressReporter for RecordingReporter {
    fn word_found(&mut self, player: &str, word: &str, points: u32) {
        self.found
            .borrow_mut()
            .push((player.to_string(), word.to_string(), points));
    }

    fn round_finished(&mut self, record: &RoundRecord) {
        self.finished.borrow_mut().push(record.clone());
    }
}
