use anyhow::Result;
use flume::{Receiver, Sender};

pub use crate::{
    controller::{Bounds, Controller, InteractionState, Snapshot},
    distribution::{Distribution, TokenProbability},
    error::TuningError,
    event::{Direction, Event, Key, Target},
    sampler::{adjust, select, AdjustedTokenProbability, RankedTokenProbability},
};

pub mod controller;
pub mod distribution;
pub mod error;
pub mod event;
pub mod sampler;
pub mod view;

#[derive(Debug, Clone)]
pub enum ThreadRequest {
    /// Apply one input event, optionally replying with the resulting snapshot.
    Event {
        event: Event,
        sender: Option<Sender<Snapshot>>,
    },
    /// Get the current snapshot.
    Snapshot(Sender<Snapshot>),
    /// Receive the current snapshot now and a fresh one after every state change.
    Subscribe(Sender<Snapshot>),
}

/// Owns the only [`Controller`] of a session and applies requests strictly one at a time.
///
/// Returns once every sender of `receiver` is dropped.
pub async fn tuning_route(
    receiver: Receiver<ThreadRequest>,
    distribution: Distribution,
) -> Result<()> {
    let mut controller = Controller::new(distribution);
    let mut subscribers: Vec<Sender<Snapshot>> = vec![];
    log::info!(
        "tuning core started with {} tokens",
        controller.distribution().len()
    );

    loop {
        let Ok(request) = receiver.recv_async().await else {
            log::info!("core exit");
            break Ok(());
        };

        match request {
            ThreadRequest::Event { event, sender } => {
                let before = *controller.state();
                let snapshot = controller.handle_event(event);
                if snapshot.state != before {
                    subscribers.retain(|subscriber| subscriber.send(snapshot.clone()).is_ok());
                }
                if let Some(sender) = sender {
                    let _ = sender.send(snapshot.clone());
                }
            }
            ThreadRequest::Snapshot(sender) => {
                let _ = sender.send(controller.snapshot().clone());
            }
            ThreadRequest::Subscribe(sender) => {
                if sender.send(controller.snapshot().clone()).is_ok() {
                    subscribers.push(sender);
                    log::debug!("{} subscribers", subscribers.len());
                }
            }
        }
    }
}

/// Round-trip an event through the core and wait for its snapshot.
pub async fn send_event(
    sender: &Sender<ThreadRequest>,
    event: Event,
) -> Result<Snapshot, TuningError> {
    let (snapshot_sender, snapshot_receiver) = flume::bounded(1);
    sender
        .send(ThreadRequest::Event {
            event,
            sender: Some(snapshot_sender),
        })
        .map_err(|_| TuningError::Closed)?;
    snapshot_receiver
        .recv_async()
        .await
        .map_err(|_| TuningError::Closed)
}

pub async fn request_snapshot(sender: &Sender<ThreadRequest>) -> Result<Snapshot, TuningError> {
    let (snapshot_sender, snapshot_receiver) = flume::bounded(1);
    sender
        .send(ThreadRequest::Snapshot(snapshot_sender))
        .map_err(|_| TuningError::Closed)?;
    snapshot_receiver
        .recv_async()
        .await
        .map_err(|_| TuningError::Closed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn() -> (Sender<ThreadRequest>, tokio::task::JoinHandle<Result<()>>) {
        let (sender, receiver) = flume::unbounded();
        let handle = tokio::spawn(tuning_route(receiver, Distribution::leaves()));
        (sender, handle)
    }

    #[tokio::test]
    async fn events_are_applied_in_order() {
        let (sender, _) = spawn();
        for _ in 0..3 {
            let _ = sender.send(ThreadRequest::Event {
                event: Key::ArrowLeft.into(),
                sender: None,
            });
        }
        let snapshot = send_event(&sender, Key::Tab.into()).await.unwrap();
        assert!((snapshot.state.temperature - 0.7).abs() < 1e-9);
        assert_eq!(snapshot.state.active_target, Target::TopP);

        let snapshot = request_snapshot(&sender).await.unwrap();
        assert_eq!(snapshot.state.active_target, Target::TopP);
    }

    #[tokio::test]
    async fn subscribers_see_every_change() {
        let (sender, _) = spawn();
        let (subscriber, updates) = flume::unbounded();
        sender.send(ThreadRequest::Subscribe(subscriber)).unwrap();

        send_event(&sender, Key::ArrowLeft.into()).await.unwrap();
        send_event(&sender, Key::Other("Enter".into()).into()).await.unwrap();
        send_event(
            &sender,
            Event::SliderDrag {
                target: Target::TopP,
                value: 0.5,
            },
        )
        .await
        .unwrap();

        let values = updates
            .drain()
            .map(|snapshot| (snapshot.state.temperature, snapshot.state.top_p))
            .collect::<Vec<_>>();
        assert_eq!(values, [(1.0, 0.9), (0.9, 0.9), (0.9, 0.5)]);
    }

    #[tokio::test]
    async fn exits_when_senders_drop() {
        let (sender, handle) = spawn();
        drop(sender);
        assert!(handle.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn closed_core_is_reported() {
        let (sender, receiver) = flume::unbounded();
        drop(receiver);
        assert_eq!(request_snapshot(&sender).await, Err(TuningError::Closed));
    }
}
