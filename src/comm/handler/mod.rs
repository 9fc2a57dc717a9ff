//! Receive-side message handlers.
//!
//! Status and time reference are handled by the task itself. Commands,
//! parameter and log requests are application business, plugged in as
//! [`RequestHandler`]s through a [`RouteTable`].

use super::scratch::{Outgoing, Request};
use crate::errors::CommError;
use crate::types::message_id::MessageId;

pub mod status;
pub mod time_reference;

/// What a handler produces: nothing, or an encoded reply to be sent.
pub type Reply<'s> = Result<Option<Outgoing<'s>>, CommError>;

/// Something that can process one kind of request.
///
/// This is intentionally NOT async, a handler must not hold up the event
/// loop. Work that takes time belongs in another task.
pub trait RequestHandler {
    fn handle<'s>(&mut self, request: Request<'s>) -> Reply<'s>;
}

/// Accepts any request and does nothing with it.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ignore;

impl RequestHandler for Ignore {
    fn handle<'s>(&mut self, request: Request<'s>) -> Reply<'s> {
        trace!(
            "[comm] Ignoring {:?} request of {} bytes",
            request.id(),
            request.len()
        );
        Ok(None)
    }
}

/// Routes the application-level requests to their handlers.
pub trait RouteTable {
    /// Handle a `Command`, `ParamRequest`, `ParamSet` or `LogRequest`.
    /// Any other kind is reported as unhandled.
    fn route<'s>(&mut self, request: Request<'s>) -> Reply<'s>;
}

/// One handler per application-level request kind.
#[derive(Debug, Default, Clone)]
pub struct Routes<C = Ignore, PR = Ignore, PS = Ignore, L = Ignore> {
    pub command: C,
    pub param_request: PR,
    pub param_set: PS,
    pub log_request: L,
}

impl Routes {
    /// Routes that ignore every request.
    pub const fn new() -> Self {
        Routes {
            command: Ignore,
            param_request: Ignore,
            param_set: Ignore,
            log_request: Ignore,
        }
    }
}

impl<C, PR, PS, L> Routes<C, PR, PS, L> {
    pub fn command<H: RequestHandler>(self, handler: H) -> Routes<H, PR, PS, L> {
        Routes {
            command: handler,
            param_request: self.param_request,
            param_set: self.param_set,
            log_request: self.log_request,
        }
    }

    pub fn param_request<H: RequestHandler>(self, handler: H) -> Routes<C, H, PS, L> {
        Routes {
            command: self.command,
            param_request: handler,
            param_set: self.param_set,
            log_request: self.log_request,
        }
    }

    pub fn param_set<H: RequestHandler>(self, handler: H) -> Routes<C, PR, H, L> {
        Routes {
            command: self.command,
            param_request: self.param_request,
            param_set: handler,
            log_request: self.log_request,
        }
    }

    pub fn log_request<H: RequestHandler>(self, handler: H) -> Routes<C, PR, PS, H> {
        Routes {
            command: self.command,
            param_request: self.param_request,
            param_set: self.param_set,
            log_request: handler,
        }
    }
}

impl<C, PR, PS, L> RouteTable for Routes<C, PR, PS, L>
where
    C: RequestHandler,
    PR: RequestHandler,
    PS: RequestHandler,
    L: RequestHandler,
{
    fn route<'s>(&mut self, request: Request<'s>) -> Reply<'s> {
        match request.id() {
            MessageId::Command => self.command.handle(request),
            MessageId::ParamRequest => self.param_request.handle(request),
            MessageId::ParamSet => self.param_set.handle(request),
            MessageId::LogRequest => self.log_request.handle(request),
            id @ (MessageId::Status | MessageId::TimeReference | MessageId::ParamValue) => {
                Err(CommError::Unhandled { id: id.into() })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::scratch::Scratch;
    use crate::comm::test_utils::Recorder;

    #[test]
    fn ignore_accepts_empty_and_garbage() {
        let mut scratch: Scratch = Scratch::new();
        assert_eq!(Ignore.handle(scratch.request(MessageId::Command, 0)), Ok(None));

        scratch.fresh().fill(0xFF);
        assert_eq!(
            Ignore.handle(scratch.request(MessageId::LogRequest, 200)),
            Ok(None)
        );
    }

    #[test]
    fn each_kind_reaches_its_own_handler() {
        let mut routes = Routes::new()
            .param_set(Recorder::default())
            .log_request(Recorder::replying(3));
        let mut scratch: Scratch = Scratch::new();

        assert_eq!(routes.route(scratch.request(MessageId::ParamSet, 4)), Ok(None));
        let reply = routes
            .route(scratch.request(MessageId::LogRequest, 1))
            .unwrap()
            .unwrap();
        assert_eq!(reply.id(), MessageId::ParamValue);

        assert_eq!(routes.param_set.calls, 1);
        assert_eq!(routes.param_set.last_len, Some(4));
        assert_eq!(routes.log_request.calls, 1);
    }

    #[test]
    fn non_request_kinds_are_unhandled() {
        let mut routes = Routes::new();
        let mut scratch: Scratch = Scratch::new();

        assert_eq!(
            routes.route(scratch.request(MessageId::Status, 0)),
            Err(CommError::Unhandled { id: 0 })
        );
    }
}
