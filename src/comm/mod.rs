//! The communication task.
//!
//! One cooperative task owns the link to the host. It wakes on the
//! heartbeat alarm, on inbound traffic, or on a stop request, and services
//! everything that is pending in one turn: the heartbeat status first, then
//! at most one received frame. Every message in either direction passes
//! through the task's single [`Scratch`] buffer.

use embassy_futures::select::select3;
use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::consts::SCRATCH_LEN;
use crate::errors::{CommError, Severity};
use crate::sync::shutdown::Shutdown;
use crate::transport::{Received, Transport};
use crate::types::config::CommConfig;
use crate::types::message_id::MessageId;

pub mod alarm;
pub mod alerts;
pub mod clock;
pub mod handler;
pub mod scratch;

#[cfg(test)]
pub(crate) mod test_utils;

use alarm::{Alarm, Periodic};
use alerts::{AlertSink, CommStats};
use clock::{Clock, SystemClock};
use handler::time_reference::{self, DirectOffset, TimeSync};
use handler::{status, Reply, RouteTable, Routes};
use scratch::Scratch;

/// What a single dispatch is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// The heartbeat alarm expired
    Heartbeat,
    /// A frame was copied into the scratch buffer
    Frame(Received),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pending(u8);

bitflags::bitflags! {
    /// Sources found pending when the task wakes up.
    impl Pending: u8 {
        const HEARTBEAT = 1 << 0;
        const STOP = 1 << 1;
    }
}

/// Selects and runs the handler for an event. Holds everything handlers
/// need, apart from the buffer, which is lent per event.
struct Dispatcher<R, S, C> {
    config: CommConfig,
    routes: R,
    sync: S,
    clock: C,
}

impl<R: RouteTable, S: TimeSync, C: Clock> Dispatcher<R, S, C> {
    fn process<'s, const N: usize>(&mut self, scratch: &'s mut Scratch<N>, event: Event) -> Reply<'s> {
        let (raw_id, len) = match event {
            Event::Heartbeat => {
                return status::broadcast(scratch, self.config.unit_id, &self.clock).map(Some);
            }
            Event::Frame(Received { id, len }) => (id, len),
        };

        let Some(id) = MessageId::from_raw(raw_id) else {
            return Err(CommError::Unhandled { id: raw_id });
        };

        let request = scratch.request(id, len);
        match id {
            MessageId::Status | MessageId::ParamValue => Err(CommError::Unhandled { id: raw_id }),
            MessageId::TimeReference => time_reference::respond(
                request,
                self.config.unit_id,
                &self.clock,
                &mut self.sync,
            )
            .map(Some),
            MessageId::Command
            | MessageId::ParamRequest
            | MessageId::ParamSet
            | MessageId::LogRequest => self.routes.route(request),
        }
    }
}

/// The communication task, generic over the link to the host and its
/// pluggable policies.
pub struct CommTask<
    T,
    R = Routes,
    A = CommStats,
    S = DirectOffset,
    C = SystemClock,
    const N: usize = SCRATCH_LEN,
> {
    transport: T,
    alerts: A,
    scratch: Scratch<N>,
    dispatcher: Dispatcher<R, S, C>,
}

impl<T: Transport> CommTask<T> {
    /// A task ignoring every request, counting alerts in [`CommStats`].
    pub fn new(config: CommConfig, transport: T) -> Self {
        CommTask {
            transport,
            alerts: CommStats::new(),
            scratch: Scratch::new(),
            dispatcher: Dispatcher {
                config,
                routes: Routes::new(),
                sync: DirectOffset,
                clock: SystemClock,
            },
        }
    }
}

impl<T, R, A, S, C, const N: usize> CommTask<T, R, A, S, C, N> {
    pub fn with_routes<R2: RouteTable>(self, routes: R2) -> CommTask<T, R2, A, S, C, N> {
        let Dispatcher {
            config,
            sync,
            clock,
            ..
        } = self.dispatcher;
        CommTask {
            transport: self.transport,
            alerts: self.alerts,
            scratch: self.scratch,
            dispatcher: Dispatcher {
                config,
                routes,
                sync,
                clock,
            },
        }
    }

    pub fn with_alerts<A2: AlertSink>(self, alerts: A2) -> CommTask<T, R, A2, S, C, N> {
        CommTask {
            transport: self.transport,
            alerts,
            scratch: self.scratch,
            dispatcher: self.dispatcher,
        }
    }

    pub fn with_time_sync<S2: TimeSync>(self, sync: S2) -> CommTask<T, R, A, S2, C, N> {
        let Dispatcher {
            config,
            routes,
            clock,
            ..
        } = self.dispatcher;
        CommTask {
            transport: self.transport,
            alerts: self.alerts,
            scratch: self.scratch,
            dispatcher: Dispatcher {
                config,
                routes,
                sync,
                clock,
            },
        }
    }

    pub fn with_clock<C2: Clock>(self, clock: C2) -> CommTask<T, R, A, S, C2, N> {
        let Dispatcher {
            config,
            routes,
            sync,
            ..
        } = self.dispatcher;
        CommTask {
            transport: self.transport,
            alerts: self.alerts,
            scratch: self.scratch,
            dispatcher: Dispatcher {
                config,
                routes,
                sync,
                clock,
            },
        }
    }

    /// Use a scratch buffer of `M` bytes instead of [`SCRATCH_LEN`].
    pub fn with_scratch<const M: usize>(self) -> CommTask<T, R, A, S, C, M> {
        CommTask {
            transport: self.transport,
            alerts: self.alerts,
            scratch: Scratch::new(),
            dispatcher: self.dispatcher,
        }
    }

    pub fn alerts(&self) -> &A {
        &self.alerts
    }

    pub fn routes(&self) -> &R {
        &self.dispatcher.routes
    }

    pub fn time_sync(&self) -> &S {
        &self.dispatcher.sync
    }

    pub fn config(&self) -> &CommConfig {
        &self.dispatcher.config
    }
}

impl<T, R, A, S, C, const N: usize> CommTask<T, R, A, S, C, N>
where
    T: Transport,
    R: RouteTable,
    A: AlertSink,
    S: TimeSync,
    C: Clock,
{
    /// Arm the heartbeat with the configured period and service the link
    /// until `stop` is requested.
    pub async fn start<M: RawMutex>(&mut self, stop: &Shutdown<M>) {
        let period = self.dispatcher.config.heartbeat_period();
        info!(
            "[comm] Starting, heartbeat every {} ms",
            period.as_millis()
        );

        let mut alarm = Periodic::arm(period);
        self.run(&mut alarm, stop).await;
    }

    /// Service the link using `alarm` as the heartbeat source.
    ///
    /// Returns after the first turn that starts with a stop requested. A
    /// turn in progress is always completed.
    pub async fn run<M: RawMutex>(&mut self, alarm: &mut impl Alarm, stop: &Shutdown<M>) {
        loop {
            select3(alarm.fired(), self.transport.ready(), stop.wait()).await;

            let mut pending = Pending::empty();
            pending.set(Pending::HEARTBEAT, alarm.take_due());
            pending.set(Pending::STOP, stop.is_requested());

            self.turn(pending).await;

            if pending.contains(Pending::STOP) {
                info!("[comm] Stop requested, exiting");
                break;
            }
        }
    }

    async fn turn(&mut self, pending: Pending) {
        if pending.contains(Pending::HEARTBEAT) {
            self.dispatch(Event::Heartbeat).await;
        }

        if let Some(received) = self.transport.try_receive(self.scratch.fresh()) {
            trace!(
                "[comm] Received frame {} of {} bytes",
                received.id,
                received.len
            );
            self.dispatch(Event::Frame(received)).await;
        }
    }

    async fn dispatch(&mut self, event: Event) {
        let outgoing = match self.dispatcher.process(&mut self.scratch, event) {
            Ok(Some(outgoing)) => outgoing,
            Ok(None) => return,
            Err(error) => return raise(&mut self.alerts, error),
        };

        let id = outgoing.id();
        if let Err(err) = self.transport.send(id.into(), outgoing.payload()).await {
            raise(&mut self.alerts, CommError::Send { id, err });
        }
    }
}

fn raise(alerts: &mut impl AlertSink, error: CommError) {
    match error.severity() {
        Severity::Alert => warn!("[comm] {}", error),
        Severity::Unhandled => debug!("[comm] {}", error),
    }
    alerts.raise(&error);
}
