// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives one job from WAITING to a terminal status.
//!
//! Construction acquires everything the job needs: a build host from the
//! configured builder, a connected transport, a provisioned package
//! environment. Construction failures finalize the job themselves, so a
//! runner that exists is always runnable. `run()` then walks the stage
//! graph and guarantees a terminal status plus exactly one host release
//! and transport close on every exit path.
//!
//! The runner exclusively owns its host and transport for the job's
//! lifetime; neither is ever reused for another job.

use crate::config::EngineConfig;
use crate::context::EngineContext;
use crate::error::RunnerError;
use rig_core::{CancellationToken, Clock, JobDefinition, JobId, JobStatus, Stage, SystemClock};
use rig_plugins::action::{action_name, ActionContext};
use rig_plugins::builder::{BuildHost, Builder, BuilderArgs};
use rig_plugins::notifier::Notifier;
use rig_plugins::registry::Registry;
use rig_plugins::transport::{Transport, TransportArgs};
use std::sync::Arc;

/// Executes one job on its own exclusively-owned build host.
pub struct Runner<C: Clock = SystemClock> {
    job_id: JobId,
    job: JobDefinition,
    notifier: Arc<dyn Notifier>,
    registry: Arc<Registry>,
    config: EngineConfig,
    cancel: CancellationToken,
    clock: C,
    builder: Box<dyn Builder>,
    host: BuildHost,
    transport: Arc<dyn Transport>,
    released: bool,
}

impl<C: Clock> std::fmt::Debug for Runner<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("job_id", &self.job_id)
            .field("host", &self.host)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

impl Runner<SystemClock> {
    /// Parse the job payload and acquire the job's resources.
    ///
    /// On any failure the job is finalized as `FAILED` with an end
    /// timestamp, partially acquired resources are released, and the
    /// error propagates; the job never reaches [`run`](Runner::run).
    pub async fn new(
        job_id: JobId,
        payload: &str,
        notifier: Arc<dyn Notifier>,
        context: &EngineContext,
        cancel: CancellationToken,
    ) -> Result<Self, RunnerError> {
        Self::with_clock(job_id, payload, notifier, context, cancel, SystemClock).await
    }
}

impl<C: Clock> Runner<C> {
    /// As [`Runner::new`], with an explicit clock for the end timestamp.
    pub async fn with_clock(
        job_id: JobId,
        payload: &str,
        notifier: Arc<dyn Notifier>,
        context: &EngineContext,
        cancel: CancellationToken,
        clock: C,
    ) -> Result<Self, RunnerError> {
        let job = match JobDefinition::parse(payload) {
            Ok(job) => job,
            Err(e) => {
                let e = RunnerError::from(e);
                tracing::error!(job_id = %job_id, error = %e, "rejecting job");
                finalize_failed(notifier.as_ref(), &clock).await;
                return Err(e);
            }
        };

        notifier.set_status(JobStatus::Waiting).await;

        let registry = Arc::clone(&context.registry);
        let config = context.config.clone();

        let (builder, host, transport) =
            match acquire(&job, &notifier, &registry, &config).await {
                Ok(resources) => resources,
                Err(e) => {
                    tracing::error!(job_id = %job_id, error = %e, "failed to set up job");
                    finalize_failed(notifier.as_ref(), &clock).await;
                    return Err(e);
                }
            };

        tracing::info!(job_id = %job_id, host = %host.hostname, "job resources acquired");

        Ok(Self {
            job_id,
            job,
            notifier,
            registry,
            config,
            cancel,
            clock,
            builder,
            host,
            transport,
            released: false,
        })
    }

    /// The build host this job runs on.
    pub fn host(&self) -> &BuildHost {
        &self.host
    }

    /// Walk the stage graph to a terminal status.
    ///
    /// Expected outcomes (`SUCCEEDED`, or `FAILED` via the graph) return
    /// `Ok`; fatal errors return `Err` after the job is finalized as
    /// `FAILED`. Either way the host is released and the transport
    /// closed exactly once.
    pub async fn run(mut self) -> Result<JobStatus, RunnerError> {
        self.notifier.set_status(JobStatus::Started).await;

        let outcome = self.execute_stages().await;
        let status = match &outcome {
            Ok(true) => JobStatus::Succeeded,
            Ok(false) | Err(_) => JobStatus::Failed,
        };
        if let Err(e) = &outcome {
            tracing::error!(
                job_id = %self.job_id,
                host = %self.host.hostname,
                error = %e,
                "job failed"
            );
        }

        self.notifier.set_status(status).await;
        self.notifier.set_ended(self.clock.epoch_ms()).await;
        self.release().await;

        outcome.map(|_| status)
    }

    /// Stage loop. `Ok(true)` if the graph completed without any stage
    /// failing; `Ok(false)` once a failure branch ran to completion.
    async fn execute_stages(&self) -> Result<bool, RunnerError> {
        let mut failing = false;
        let mut transitions: u32 = 0;
        let mut cursor: Option<String> = self.job.entry_stage().map(str::to_string);

        while let Some(stage_id) = cursor {
            transitions += 1;
            if transitions > self.config.max_stage_transitions {
                return Err(RunnerError::Configuration(format!(
                    "stage transition limit of {} exceeded at stage {}",
                    self.config.max_stage_transitions, stage_id
                )));
            }

            let raw = self.job.stages.get(&stage_id).ok_or_else(|| {
                RunnerError::Configuration(format!("unknown stage: {}", stage_id))
            })?;
            let stage = Stage::parse(raw)?;

            tracing::info!(job_id = %self.job_id, stage = %stage_id, "running stage");
            let (success, exit_code) = self.run_stage(&stage).await?;

            if success {
                cursor = stage.on_success;
            } else {
                tracing::warn!(
                    job_id = %self.job_id,
                    stage = %stage_id,
                    exit_code,
                    "stage failed"
                );
                // Sticky: a later successful compensating stage does not
                // clear the failure.
                failing = true;
                self.notifier.set_status(JobStatus::Failing).await;
                cursor = stage.on_failure;
            }
        }

        Ok(!failing)
    }

    /// Run one stage's steps in order. A failing step aborts the rest of
    /// the stage and reports its exit code; a stage with no steps
    /// trivially succeeds with code 0.
    async fn run_stage(&self, stage: &Stage) -> Result<(bool, i32), RunnerError> {
        let mut ctx = ActionContext::new();

        for step in &stage.steps {
            if self.cancel.is_cancelled() {
                return Err(RunnerError::Cancelled);
            }

            let name = action_name(&step.action)?;
            let factory = self.registry.find_action(&name).ok_or_else(|| {
                RunnerError::Configuration(format!("unknown action: {}", name))
            })?;
            let mut action = factory.create(&step.action)?;

            action.prepare(Arc::clone(&self.transport), &mut ctx).await?;
            let result = action.perform(self.notifier.as_ref()).await?;
            if !result.success {
                return Ok((false, result.exit_code));
            }
        }

        Ok((true, 0))
    }

    async fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.transport.close().await;
        self.builder
            .release(Some(self.transport.as_ref()), &self.host)
            .await;
    }
}

/// Resource acquisition, steps 3 through 5 of construction. Anything
/// acquired before a failure is released here; status finalization is
/// the caller's.
async fn acquire(
    job: &JobDefinition,
    notifier: &Arc<dyn Notifier>,
    registry: &Arc<Registry>,
    config: &EngineConfig,
) -> Result<(Box<dyn Builder>, BuildHost, Arc<dyn Transport>), RunnerError> {
    let factory = registry.find_builder(&config.builder).ok_or_else(|| {
        RunnerError::ResourceAcquisition(format!("no builder plugin: {}", config.builder))
    })?;
    let builder = factory.create(BuilderArgs {
        os: job.environment.os.clone(),
        config: config.plugins.clone(),
        registry: Arc::clone(registry),
    })?;

    let host = builder.get().await?;

    let transport = match connect(&host, notifier, registry, config).await {
        Ok(transport) => transport,
        Err(e) => {
            builder.release(None, &host).await;
            return Err(e);
        }
    };

    if let Err(e) = builder
        .prepare(transport.as_ref(), &host, &job.environment)
        .await
    {
        transport.close().await;
        builder.release(Some(transport.as_ref()), &host).await;
        return Err(e.into());
    }

    Ok((builder, host, transport))
}

/// Resolve and connect a transport for the host. The host lists
/// transport names by descending preference; the first registered name
/// wins.
async fn connect(
    host: &BuildHost,
    notifier: &Arc<dyn Notifier>,
    registry: &Arc<Registry>,
    config: &EngineConfig,
) -> Result<Arc<dyn Transport>, RunnerError> {
    let factory = host
        .transports
        .iter()
        .find_map(|name| registry.find_transport(name))
        .ok_or_else(|| {
            RunnerError::ResourceAcquisition(format!(
                "no compatible transport for host {}",
                host.hostname
            ))
        })?;

    let transport = factory
        .create(TransportArgs {
            host,
            log: Arc::clone(notifier),
            config: &config.plugins,
        })
        .await?;
    Ok(transport)
}

async fn finalize_failed(notifier: &dyn Notifier, clock: &impl Clock) {
    notifier.set_status(JobStatus::Failed).await;
    notifier.set_ended(clock.epoch_ms()).await;
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
