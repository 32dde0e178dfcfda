use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use paprika_bot::domain::PriceInfo;
use paprika_bot::error::{Error, Result};
use paprika_bot::port::TickerFeed;

/// Ticker feed that plays back a fixed sequence of responses.
///
/// Each fetch pops the next step; once the script is exhausted every fetch
/// fails.
#[derive(Default)]
pub struct ScriptedFeed {
    steps: Mutex<VecDeque<Option<Vec<PriceInfo>>>>,
    fetches: Mutex<usize>,
}

impl ScriptedFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_ok(self, entries: Vec<PriceInfo>) -> Self {
        self.steps.lock().push_back(Some(entries));
        self
    }

    pub fn then_fail(self) -> Self {
        self.steps.lock().push_back(None);
        self
    }

    pub fn fetches(&self) -> usize {
        *self.fetches.lock()
    }
}

#[async_trait]
impl TickerFeed for ScriptedFeed {
    async fn fetch_tickers(&self) -> Result<Vec<PriceInfo>> {
        *self.fetches.lock() += 1;
        match self.steps.lock().pop_front() {
            Some(Some(entries)) => Ok(entries),
            Some(None) | None => Err(Error::Connection("scripted fetch failure".into())),
        }
    }
}
