use crate::endpoint::Endpoint;
use crate::error::ClientError;
use crate::types::{EndpointResponse, LogEntry, Minutes, PracticePayload, ResetRequest};
use std::io;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    PostLog(PracticePayload),
    FetchLogs(Option<String>),
    Beacon(PracticePayload),
    Reset(ResetRequest),
}

#[derive(Debug, Clone)]
pub enum Reply {
    Json(EndpointResponse),
    /// Body that is not JSON, like an opaque cross-origin response.
    Garbled,
    Unreachable,
}

impl Reply {
    fn into_result(self) -> Result<EndpointResponse, ClientError> {
        match self {
            Reply::Json(response) => Ok(response),
            Reply::Garbled => Err(serde_json::from_str::<EndpointResponse>("<html>").unwrap_err().into()),
            Reply::Unreachable => Err(unreachable_error()),
        }
    }
}

fn unreachable_error() -> ClientError {
    io::Error::new(io::ErrorKind::ConnectionRefused, "endpoint unreachable").into()
}

/// Scripted endpoint that records every call it receives.
pub struct FakeEndpoint {
    pub reply: Reply,
    pub one_way_reachable: bool,
    /// Yield once inside `post_log` so overlapping submissions can be observed.
    pub yield_on_post: bool,
    calls: Mutex<Vec<Call>>,
}

impl FakeEndpoint {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            one_way_reachable: true,
            yield_on_post: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(response: EndpointResponse) -> Self {
        Self::new(Reply::Json(response))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Endpoint for FakeEndpoint {
    async fn post_log(&self, payload: &PracticePayload) -> Result<EndpointResponse, ClientError> {
        self.record(Call::PostLog(payload.clone()));
        if self.yield_on_post {
            tokio::task::yield_now().await;
        }
        self.reply.clone().into_result()
    }

    async fn fetch_logs(&self, name: Option<&str>) -> Result<EndpointResponse, ClientError> {
        self.record(Call::FetchLogs(name.map(str::to_string)));
        self.reply.clone().into_result()
    }

    async fn beacon_log(&self, payload: &PracticePayload) -> Result<(), ClientError> {
        self.record(Call::Beacon(payload.clone()));
        if self.one_way_reachable {
            Ok(())
        } else {
            Err(unreachable_error())
        }
    }

    async fn reset_season(&self, request: &ResetRequest) -> Result<(), ClientError> {
        self.record(Call::Reset(request.clone()));
        if self.one_way_reachable {
            Ok(())
        } else {
            Err(unreachable_error())
        }
    }
}

pub fn entry(name: &str, event: &str, minutes: &str, notes: Option<&str>, timestamp: &str) -> LogEntry {
    LogEntry {
        name: name.to_string(),
        event: event.to_string(),
        minutes: Minutes::new(minutes),
        notes: notes.map(str::to_string),
        timestamp: timestamp.to_string(),
    }
}
