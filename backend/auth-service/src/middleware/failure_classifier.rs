//! Failure classification for inbound RPCs
//!
//! Every handler runs inside [`guard`], which decides what the client sees:
//!
//! - a panic is caught at the call boundary and becomes `Status::internal`
//! - `Unauthenticated` passes through unchanged
//! - any other error becomes `Status::internal` with a generic message; the
//!   original code and message are only logged

use futures_util::FutureExt;
use std::any::Any;
use std::backtrace::Backtrace;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tonic::{Code, Response, Status};
use tracing::{error, warn};

pub const INTERNAL_MESSAGE: &str = "internal server error";

/// Run an RPC body with panic containment and error classification.
pub async fn guard<T, E, F>(rpc: &'static str, handler: F) -> Result<Response<T>, Status>
where
    F: Future<Output = Result<Response<T>, E>>,
    E: Into<Status>,
{
    match AssertUnwindSafe(handler).catch_unwind().await {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(err)) => Err(classify(rpc, err.into())),
        Err(payload) => {
            error!(
                event = "rpc_panic",
                rpc,
                panic = %panic_message(payload.as_ref()),
                "Recovered from panic in RPC handler"
            );
            Err(Status::internal(INTERNAL_MESSAGE))
        }
    }
}

/// Map a handler error to the status the client receives.
pub fn classify(rpc: &str, status: Status) -> Status {
    if status.code() == Code::Unauthenticated {
        warn!(event = "rpc_unauthenticated", rpc, message = %status.message(), "Authentication failed");
        return status;
    }

    error!(
        event = "rpc_failed",
        rpc,
        code = ?status.code(),
        message = %status.message(),
        "RPC failed"
    );
    Status::internal(INTERNAL_MESSAGE)
}

/// Log every panic with its location and a backtrace before unwinding.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());

        error!(
            event = "panic",
            location = %location,
            panic = %panic_message(info.payload()),
            backtrace = %Backtrace::force_capture(),
            "Panic"
        );
    }));
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
