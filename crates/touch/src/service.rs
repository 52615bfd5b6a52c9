//! Input pipeline glue: forwards touch events to the application.
//!
//! # Architecture
//!
//! A [`Channel`] carries events from the touch task to the application.
//! [`TouchInput`] wraps the channel receiver on the consumer side.
//!
//! [`run_touch_loop`] owns the driver and the controller's interrupt line:
//! it waits for the line to fall, polls the driver once, and pushes every
//! DOWN / MOVE / UP into the channel. NONE records stay inside the driver.
//!
//! # Overflow handling
//!
//! Events are sent with [`try_send_event`]. If the consumer stalls and the
//! channel fills, new events are dropped rather than blocking the touch
//! task, so the controller keeps being serviced.
//!
//! [`Channel`]: embassy_sync::channel::Channel

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Receiver, Sender};
use embedded_hal_async::digital::Wait;
use platform::{TouchDevice, TouchEvent, TouchEventKind};

/// Depth for the application's touch event channel.
///
/// Two full frames of a ten-finger panel.
pub const CHANNEL_DEPTH: usize = 20;

// ---------------------------------------------------------------------------
// TouchInput — consumer
// ---------------------------------------------------------------------------

/// Consumer side of the touch event channel
pub struct TouchInput<'a, M: RawMutex, const N: usize> {
    rx: Receiver<'a, M, TouchEvent, N>,
}

impl<'a, M: RawMutex, const N: usize> TouchInput<'a, M, N> {
    /// Wrap a channel receiver
    pub fn new(rx: Receiver<'a, M, TouchEvent, N>) -> Self {
        Self { rx }
    }

    /// Wait for the next touch event
    pub async fn wait_for_event(&mut self) -> TouchEvent {
        self.rx.receive().await
    }

    /// Next queued event, if any
    pub fn poll_event(&mut self) -> Option<TouchEvent> {
        self.rx.try_receive().ok() // ok: TryReceiveError::Empty maps to None; channel never closes
    }
}

// ---------------------------------------------------------------------------
// Non-blocking send helper
// ---------------------------------------------------------------------------

/// Attempt to send a [`TouchEvent`] without blocking.
///
/// Returns `true` if the event was enqueued, `false` if the channel was full
/// and the event was dropped.
pub fn try_send_event<M: RawMutex, const N: usize>(
    tx: &Sender<'_, M, TouchEvent, N>,
    event: TouchEvent,
) -> bool {
    tx.try_send(event).is_ok()
}

// ---------------------------------------------------------------------------
// Touch task
// ---------------------------------------------------------------------------

/// Poll `device` once and forward its events.
///
/// Returns how many events were enqueued. A failed poll forwards nothing.
pub async fn service_once<T, M, const N: usize>(
    device: &mut T,
    tx: &Sender<'_, M, TouchEvent, N>,
) -> Result<usize, T::Error>
where
    T: TouchDevice,
    M: RawMutex,
{
    let report = device.poll().await?;
    let mut sent = 0usize;
    for event in report
        .events
        .iter()
        .filter(|e| e.kind != TouchEventKind::None)
    {
        if try_send_event(tx, *event) {
            sent = sent.saturating_add(1);
        } else {
            warn!("touch channel full, dropped slot {} event", event.slot);
        }
    }
    Ok(sent)
}

/// Interrupt-driven touch loop. Never returns.
///
/// `irq` is the controller's active-low interrupt line. Poll errors are
/// logged by the driver and skipped here; the next interrupt retries.
pub async fn run_touch_loop<T, P, M, const N: usize>(
    mut device: T,
    mut irq: P,
    tx: Sender<'_, M, TouchEvent, N>,
) -> !
where
    T: TouchDevice,
    P: Wait,
    M: RawMutex,
{
    loop {
        if irq.wait_for_falling_edge().await.is_err() {
            // Line unusable: poll anyway, but let other tasks run first.
            warn!("touch interrupt wait failed");
            embassy_futures::yield_now().await;
        }
        match service_once(&mut device, &tx).await {
            Ok(n) => debug!("touch poll forwarded {} events", n),
            Err(_) => debug!("touch poll failed"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_sync::channel::Channel;
    use platform::mocks::MockTouchDevice;
    use platform::{PanelConfig, TouchReport};

    fn event(slot: u8, kind: TouchEventKind) -> TouchEvent {
        TouchEvent {
            slot,
            kind,
            x: 1,
            y: 2,
            width: 3,
            timestamp: 4,
            track_id: slot,
        }
    }

    fn report(events: &[TouchEvent]) -> TouchReport {
        let mut r = TouchReport::default();
        for e in events {
            r.events.push(*e).unwrap();
        }
        r
    }

    #[tokio::test]
    async fn forwards_contacts_and_skips_none() {
        let ch: Channel<NoopRawMutex, TouchEvent, 4> = Channel::new();
        let mut dev = MockTouchDevice::new(PanelConfig::default().info());
        dev.push_report(report(&[
            event(0, TouchEventKind::Up),
            event(1, TouchEventKind::None),
            event(2, TouchEventKind::Down),
        ]));

        let sent = service_once(&mut dev, &ch.sender()).await.unwrap();
        assert_eq!(sent, 2);

        let mut input = TouchInput::new(ch.receiver());
        assert_eq!(input.poll_event().unwrap().kind, TouchEventKind::Up);
        assert_eq!(input.wait_for_event().await.kind, TouchEventKind::Down);
        assert!(input.poll_event().is_none());
    }

    #[tokio::test]
    async fn full_channel_drops_without_blocking() {
        let ch: Channel<NoopRawMutex, TouchEvent, 1> = Channel::new();
        let mut dev = MockTouchDevice::new(PanelConfig::default().info());
        dev.push_report(report(&[
            event(0, TouchEventKind::Down),
            event(1, TouchEventKind::Down),
        ]));

        let sent = service_once(&mut dev, &ch.sender()).await.unwrap();
        assert_eq!(sent, 1);
        assert_eq!(ch.try_receive().unwrap().slot, 0);
    }

    /// Interrupt line that fires `n` falling edges, then stays quiet.
    struct EdgeScript(u32);

    impl EdgeScript {
        async fn edge(&mut self) -> Result<(), core::convert::Infallible> {
            if self.0 == 0 {
                core::future::pending::<()>().await;
            }
            self.0 = self.0.saturating_sub(1);
            Ok(())
        }
    }

    impl embedded_hal::digital::ErrorType for EdgeScript {
        type Error = core::convert::Infallible;
    }

    impl Wait for EdgeScript {
        async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
            self.edge().await
        }
        async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
            self.edge().await
        }
        async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
            self.edge().await
        }
        async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
            self.edge().await
        }
        async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
            self.edge().await
        }
    }

    #[tokio::test]
    async fn loop_polls_once_per_interrupt() {
        use embassy_futures::select::{select, Either};

        let ch: Channel<NoopRawMutex, TouchEvent, 4> = Channel::new();
        let mut dev = MockTouchDevice::new(PanelConfig::default().info());
        dev.push_report(report(&[event(0, TouchEventKind::Down)]));
        dev.push_report(report(&[event(0, TouchEventKind::Up)]));

        let received = select(
            run_touch_loop(dev, EdgeScript(2), ch.sender()),
            async { (ch.receive().await, ch.receive().await) },
        )
        .await;
        let (first, second) = match received {
            Either::First(never) => never,
            Either::Second(pair) => pair,
        };
        assert_eq!(first.kind, TouchEventKind::Down);
        assert_eq!(second.kind, TouchEventKind::Up);
        assert!(ch.try_receive().is_err());
    }

    #[test]
    fn try_send_reports_overflow() {
        let ch: Channel<NoopRawMutex, TouchEvent, 1> = Channel::new();
        let tx = ch.sender();
        assert!(try_send_event(&tx, event(0, TouchEventKind::Down)));
        assert!(!try_send_event(&tx, event(0, TouchEventKind::Move)));
    }
}
