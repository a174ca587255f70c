//! Daemon start, readiness gating, supervision and stop.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::config::ReadinessConfig;
use crate::health::port::check_port_listening;
use crate::host::{Effects, HostError, SubcontainerHandle};
use crate::lifecycle::daemon::DaemonSpec;
use crate::lifecycle::shutdown::StopListener;
use crate::lifecycle::state::{LifecycleEvent, LifecycleMachine, LifecycleState, TransitionError};
use crate::messages;
use crate::observability::metrics;

/// Error type for lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("subcontainer launch failed: {0}")]
    Launch(#[source] HostError),

    #[error("subcontainer exited before becoming ready")]
    Exited,

    /// Readiness timed out; the message is the fixed failure text.
    #[error("{message}")]
    ReadinessFailed { message: String },

    #[error("host error: {0}")]
    Host(#[from] HostError),
}

/// Runs one daemon through `Stopped → Starting → Ready → Stopped`.
///
/// Holds no state across restarts: a new orchestrator is built for every
/// package start.
pub struct Orchestrator {
    effects: Arc<dyn Effects>,
    daemon: DaemonSpec,
    readiness: ReadinessConfig,
    machine: LifecycleMachine,
    subcontainer: Option<SubcontainerHandle>,
}

impl Orchestrator {
    pub fn new(effects: Arc<dyn Effects>, daemon: DaemonSpec, readiness: ReadinessConfig) -> Self {
        Self {
            effects,
            daemon,
            readiness,
            machine: LifecycleMachine::new(),
            subcontainer: None,
        }
    }

    pub fn state(&self) -> &LifecycleState {
        self.machine.state()
    }

    pub fn daemon(&self) -> &DaemonSpec {
        &self.daemon
    }

    pub fn subcontainer(&self) -> Option<&SubcontainerHandle> {
        self.subcontainer.as_ref()
    }

    /// Launch the subcontainer and wait for it to become ready.
    ///
    /// Returns `Ready`, or `Stopped` if a stop was requested first. Launch
    /// failure, early exit and readiness timeout end in `Failed` with the
    /// subcontainer torn down; nothing is retried.
    pub async fn start(
        &mut self,
        stop: &mut StopListener,
    ) -> Result<LifecycleState, LifecycleError> {
        self.machine.apply(LifecycleEvent::Launch)?;
        tracing::info!(
            daemon = %self.daemon.name,
            image = %self.daemon.image,
            "{}",
            messages::STARTING
        );

        let handle = match self.effects.launch_subcontainer(&self.daemon).await {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!(
                    daemon = %self.daemon.name,
                    error = %e,
                    "Subcontainer launch failed"
                );
                self.machine.apply(LifecycleEvent::LaunchFailed(e.to_string()))?;
                return Err(LifecycleError::Launch(e));
            }
        };
        tracing::info!(subcontainer = %handle.id, "Subcontainer launched");
        self.subcontainer = Some(handle.clone());

        let probe = self.daemon.ready.probe.clone();
        let deadline = Instant::now() + self.readiness.timeout();
        let mut ticker = self.ticker();

        loop {
            tokio::select! {
                biased;
                _ = stop.stopped() => {
                    tracing::info!(daemon = %self.daemon.name, "Stop requested while starting");
                    self.stop().await?;
                    return Ok(self.state().clone());
                }
                _ = ticker.tick() => {
                    if !self.effects.subcontainer_running(&handle).await {
                        return self.fail(LifecycleEvent::Exited, LifecycleError::Exited).await;
                    }

                    let result = check_port_listening(
                        self.effects.as_ref(),
                        &handle,
                        &probe,
                        self.readiness.probe_timeout(),
                    )
                    .await;

                    if result.is_success() {
                        // The port may belong to a process that just died.
                        if !self.effects.subcontainer_running(&handle).await {
                            return self.fail(LifecycleEvent::Exited, LifecycleError::Exited).await;
                        }
                        self.machine.apply(LifecycleEvent::ProbePassed)?;
                        metrics::set_ready(true);
                        tracing::info!(daemon = %self.daemon.name, "{}", result.message);
                        return Ok(LifecycleState::Ready);
                    }

                    if Instant::now() >= deadline {
                        let message = probe.error_message.to_string();
                        tracing::error!(
                            daemon = %self.daemon.name,
                            timeout_secs = self.readiness.timeout_secs,
                            "{}", message
                        );
                        return self
                            .fail(
                                LifecycleEvent::ProbeTimedOut(message.clone()),
                                LifecycleError::ReadinessFailed { message },
                            )
                            .await;
                    }

                    tracing::debug!(port = probe.port, status = ?result.result, "Not ready yet");
                }
            }
        }
    }

    /// Watch a ready daemon until it is stopped or exits.
    pub async fn supervise(
        &mut self,
        stop: &mut StopListener,
    ) -> Result<LifecycleState, LifecycleError> {
        let Some(handle) = self.subcontainer.clone() else {
            return Err(TransitionError {
                from: self.state().clone(),
                event: LifecycleEvent::Stop,
            }
            .into());
        };

        let mut ticker = self.ticker();

        loop {
            tokio::select! {
                biased;
                _ = stop.stopped() => {
                    self.stop().await?;
                    return Ok(self.state().clone());
                }
                _ = ticker.tick() => {
                    if !self.effects.subcontainer_running(&handle).await {
                        tracing::warn!(
                            daemon = %self.daemon.name,
                            subcontainer = %handle.id,
                            "Daemon exited"
                        );
                        self.subcontainer = None;
                        self.machine.apply(LifecycleEvent::Exited)?;
                        metrics::set_ready(false);
                        return Ok(self.state().clone());
                    }
                }
            }
        }
    }

    /// Tear down the subcontainer, whatever the current state.
    ///
    /// The machine reaches `Stopped` even when the host fails to tear the
    /// subcontainer down; that failure is returned afterwards.
    pub async fn stop(&mut self) -> Result<(), LifecycleError> {
        let teardown = match self.subcontainer.take() {
            Some(handle) => {
                tracing::info!(
                    daemon = %self.daemon.name,
                    subcontainer = %handle.id,
                    "Stopping subcontainer"
                );
                self.effects.stop_subcontainer(&handle).await.inspect_err(|e| {
                    tracing::warn!(
                        subcontainer = %handle.id,
                        error = %e,
                        "Subcontainer teardown failed"
                    );
                })
            }
            None => Ok(()),
        };
        if *self.state() != LifecycleState::Stopped {
            self.machine.apply(LifecycleEvent::Stop)?;
        }
        metrics::set_ready(false);
        teardown?;
        Ok(())
    }

    // tokio rejects a zero period.
    fn ticker(&self) -> Interval {
        let period = self.readiness.poll_interval().max(Duration::from_millis(1));
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }

    async fn fail(
        &mut self,
        event: LifecycleEvent,
        error: LifecycleError,
    ) -> Result<LifecycleState, LifecycleError> {
        self.machine.apply(event)?;
        if let Some(handle) = self.subcontainer.take() {
            if let Err(e) = self.effects.stop_subcontainer(&handle).await {
                tracing::warn!(
                    subcontainer = %handle.id,
                    error = %e,
                    "Teardown after failed start did not complete"
                );
            }
        }
        Err(error)
    }
}
