//! Scripted channel for testing the poller without hardware.
//!
//! Exchanges are queued ahead of time; each `transceive` call records the
//! request it was given and plays back the next scripted response (or a
//! timeout). Shared interior state lets a test keep inspecting the channel
//! after handing a clone to the poller.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::bus::Channel;
use crate::error::ChannelError;

/// One scripted exchange: `None` simulates a silent bus (timeout).
#[derive(Debug, Clone)]
pub enum MockExchange {
    Respond(Vec<u8>),
    Silence,
}

#[derive(Clone, Default)]
pub struct MockChannel {
    exchanges: Arc<Mutex<VecDeque<MockExchange>>>,
    requests: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for the next unanswered exchange.
    pub fn push_response(&self, response: &[u8]) {
        self.exchanges
            .lock()
            .unwrap()
            .push_back(MockExchange::Respond(response.to_vec()));
    }

    /// Queues a silent exchange (nothing arrives before the timeout).
    pub fn push_silence(&self) {
        self.exchanges
            .lock()
            .unwrap()
            .push_back(MockExchange::Silence);
    }

    /// Every request written so far, in order.
    pub fn requests(&self) -> Vec<Vec<u8>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn pending_exchanges(&self) -> usize {
        self.exchanges.lock().unwrap().len()
    }
}

#[async_trait]
impl Channel for MockChannel {
    async fn transceive(
        &mut self,
        request: &[u8],
        max_len: usize,
        _timeout: Duration,
    ) -> Result<Vec<u8>, ChannelError> {
        self.requests.lock().unwrap().push(request.to_vec());

        let next = self.exchanges.lock().unwrap().pop_front();
        match next {
            Some(MockExchange::Respond(mut response)) => {
                response.truncate(max_len);
                if response.is_empty() {
                    Err(ChannelError::NoResponse)
                } else {
                    Ok(response)
                }
            }
            Some(MockExchange::Silence) | None => Err(ChannelError::NoResponse),
        }
    }
}
