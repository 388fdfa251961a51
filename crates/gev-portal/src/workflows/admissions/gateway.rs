use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::domain::{ApplicationId, ApplicationPayload, SubmissionReceipt, SubmittedApplication};
use super::repository::ApplicationRepository;
use super::service::AdmissionsService;
use crate::workflows::catalog::Institution;

/// Failures the portal can see from the admissions collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Application ID not found. Please check the ID and try again.")]
    NotFound,
    #[error("{0}")]
    Unavailable(String),
}

/// The three operations the portal consumes; transport is up to the implementor.
pub trait AdmissionsGateway: Send + Sync {
    fn fetch_institutions(
        &self,
    ) -> impl Future<Output = Result<Vec<Institution>, GatewayError>> + Send;

    fn submit_application(
        &self,
        payload: ApplicationPayload,
    ) -> impl Future<Output = Result<SubmissionReceipt, GatewayError>> + Send;

    fn application_status(
        &self,
        application_id: &ApplicationId,
    ) -> impl Future<Output = Result<SubmittedApplication, GatewayError>> + Send;
}

/// Artificial response delays, mirroring a remote backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatewayLatency {
    pub catalog: Duration,
    pub submit: Duration,
    pub lookup: Duration,
}

impl GatewayLatency {
    pub fn simulated() -> Self {
        Self {
            catalog: Duration::from_millis(1500),
            submit: Duration::from_millis(500),
            lookup: Duration::from_millis(1000),
        }
    }
}

/// In-process gateway backed directly by an [`AdmissionsService`].
pub struct LocalGateway<R> {
    service: Arc<AdmissionsService<R>>,
    latency: GatewayLatency,
}

impl<R> LocalGateway<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(service: Arc<AdmissionsService<R>>) -> Self {
        Self::with_latency(service, GatewayLatency::default())
    }

    pub fn with_latency(service: Arc<AdmissionsService<R>>, latency: GatewayLatency) -> Self {
        Self { service, latency }
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

impl<R> AdmissionsGateway for LocalGateway<R>
where
    R: ApplicationRepository + 'static,
{
    async fn fetch_institutions(&self) -> Result<Vec<Institution>, GatewayError> {
        pause(self.latency.catalog).await;
        Ok(self.service.institutions())
    }

    async fn submit_application(
        &self,
        payload: ApplicationPayload,
    ) -> Result<SubmissionReceipt, GatewayError> {
        let record = self
            .service
            .submit(payload)
            .map_err(|err| GatewayError::Unavailable(err.to_string()))?;
        pause(self.latency.submit).await;
        Ok(SubmissionReceipt {
            application_id: record.application_id,
        })
    }

    async fn application_status(
        &self,
        application_id: &ApplicationId,
    ) -> Result<SubmittedApplication, GatewayError> {
        pause(self.latency.lookup).await;
        self.service.get(application_id).map_err(|err| {
            if err.is_not_found() {
                GatewayError::NotFound
            } else {
                GatewayError::Unavailable(err.to_string())
            }
        })
    }
}
