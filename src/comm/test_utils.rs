use heapless::Vec;

use super::alarm::Alarm;
use super::clock::Clock;
use super::handler::{Reply, RequestHandler};
use super::scratch::Request;
use crate::consts::SCRATCH_LEN;
use crate::types::message_id::MessageId;

/// Alarm that is due exactly when the test says so.
#[derive(Debug, Default)]
pub struct ManualAlarm {
    pub due: bool,
}

impl ManualAlarm {
    pub fn due() -> Self {
        ManualAlarm { due: true }
    }
}

impl Alarm for ManualAlarm {
    async fn fired(&mut self) {
        if !self.due {
            core::future::pending::<()>().await
        }
    }

    fn take_due(&mut self) -> bool {
        core::mem::take(&mut self.due)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}

/// Handler remembering how it was called, optionally answering with a
/// parameter value.
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: usize,
    pub last_len: Option<usize>,
    pub last_payload: Vec<u8, SCRATCH_LEN>,
    pub reply: Option<u8>,
}

impl Recorder {
    pub fn replying(value: u8) -> Self {
        Recorder {
            reply: Some(value),
            ..Default::default()
        }
    }
}

impl RequestHandler for Recorder {
    fn handle<'s>(&mut self, request: Request<'s>) -> Reply<'s> {
        self.calls += 1;
        self.last_len = Some(request.len());
        self.last_payload.clear();
        let _ = self.last_payload.extend_from_slice(request.payload());
        match self.reply {
            Some(value) => request.reply_as(MessageId::ParamValue, &value).map(Some),
            None => Ok(None),
        }
    }
}

/// Route `log` output to the test harness, at most once per process.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
