//! Simulated review progression for submitted applications.
//!
//! A policy decides which status updates follow a submission and when; timer
//! tasks deliver them over a channel to a single writer that appends them to the
//! repository, so history order always matches delivery order.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::seq::IndexedRandom;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::domain::{ApplicationId, ApplicationStatus, StatusUpdate};
use super::repository::ApplicationRepository;

pub(crate) const SUBMITTED_NOTES: &str =
    "Your application has been successfully received. An advisor will be assigned to your case shortly.";
const UNDER_REVIEW_NOTES: &str = "Your application is now under review by our admissions team. This process typically takes 3-5 business days.";
const ACCEPTED_NOTES: &str = "Congratulations! Your application has been accepted. Please check your email for the official offer letter and next steps.";
const REJECTED_NOTES: &str = "We regret to inform you that after careful consideration, we are unable to offer you a place at this time. We wish you the best in your future endeavors.";
const ACTION_REQUIRED_NOTES: &str = "We require additional information. Please upload a certified copy of your academic transcripts to the portal.";

/// Status update due a fixed delay after submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledUpdate {
    pub after: Duration,
    pub status: ApplicationStatus,
    pub notes: String,
}

pub trait StatusProgressionPolicy: Send + Sync {
    fn schedule(&self, application_id: &ApplicationId) -> Vec<ScheduledUpdate>;
}

/// One "Under Review" update, then one terminal outcome picked uniformly at random.
#[derive(Debug, Clone)]
pub struct SimulatedReviewPolicy {
    review_delay: Duration,
    decision_delay: Duration,
}

impl SimulatedReviewPolicy {
    pub fn new(review_delay: Duration, decision_delay: Duration) -> Self {
        Self {
            review_delay,
            decision_delay: decision_delay.max(review_delay),
        }
    }
}

impl Default for SimulatedReviewPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(15), Duration::from_secs(30))
    }
}

impl StatusProgressionPolicy for SimulatedReviewPolicy {
    fn schedule(&self, _application_id: &ApplicationId) -> Vec<ScheduledUpdate> {
        let outcomes = ApplicationStatus::terminal();
        let decision = outcomes
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(ApplicationStatus::ActionRequired);

        vec![
            ScheduledUpdate {
                after: self.review_delay,
                status: ApplicationStatus::UnderReview,
                notes: UNDER_REVIEW_NOTES.to_string(),
            },
            ScheduledUpdate {
                after: self.decision_delay,
                status: decision,
                notes: decision_notes(decision).to_string(),
            },
        ]
    }
}

fn decision_notes(status: ApplicationStatus) -> &'static str {
    match status {
        ApplicationStatus::Accepted => ACCEPTED_NOTES,
        ApplicationStatus::Rejected => REJECTED_NOTES,
        ApplicationStatus::ActionRequired => ACTION_REQUIRED_NOTES,
        ApplicationStatus::Submitted => SUBMITTED_NOTES,
        ApplicationStatus::UnderReview => UNDER_REVIEW_NOTES,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    pub application_id: ApplicationId,
    pub update: StatusUpdate,
}

/// Runs progression timers and the writer task that records their events.
pub struct StatusProgression {
    policy: Arc<dyn StatusProgressionPolicy>,
    events: mpsc::UnboundedSender<StatusEvent>,
    writer: JoinHandle<()>,
}

impl StatusProgression {
    /// Starts the writer task. Must be called inside a tokio runtime.
    pub fn spawn<R>(policy: Arc<dyn StatusProgressionPolicy>, repository: Arc<R>) -> Self
    where
        R: ApplicationRepository + 'static,
    {
        let (events, mut receiver) = mpsc::unbounded_channel::<StatusEvent>();

        let writer = tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                let status = event.update.status;
                match repository.append_status(&event.application_id, event.update) {
                    Ok(()) => info!(
                        application_id = %event.application_id,
                        %status,
                        "application status updated"
                    ),
                    Err(err) => warn!(
                        application_id = %event.application_id,
                        %status,
                        error = %err,
                        "dropping status update"
                    ),
                }
            }
            debug!("status progression writer stopped");
        });

        Self {
            policy,
            events,
            writer,
        }
    }

    /// Schedules the policy's updates for a freshly stored application.
    pub fn start(&self, application_id: ApplicationId) -> JoinHandle<()> {
        let mut schedule = self.policy.schedule(&application_id);
        schedule.sort_by_key(|update| update.after);
        let events = self.events.clone();
        let started = Instant::now();

        tokio::spawn(async move {
            for scheduled in schedule {
                tokio::time::sleep_until(started + scheduled.after).await;
                let event = StatusEvent {
                    application_id: application_id.clone(),
                    update: StatusUpdate {
                        timestamp: Utc::now(),
                        status: scheduled.status,
                        notes: scheduled.notes,
                    },
                };
                if events.send(event).is_err() {
                    debug!(%application_id, "status writer gone; abandoning schedule");
                    break;
                }
            }
        })
    }
}

impl Drop for StatusProgression {
    fn drop(&mut self) {
        self.writer.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_policy_schedules_review_then_terminal_outcome() {
        let policy = SimulatedReviewPolicy::default();
        let schedule = policy.schedule(&ApplicationId("GEV-1".to_string()));

        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[0].status, ApplicationStatus::UnderReview);
        assert_eq!(schedule[0].after, Duration::from_secs(15));
        assert!(ApplicationStatus::terminal().contains(&schedule[1].status));
        assert_eq!(schedule[1].after, Duration::from_secs(30));
        assert!(!schedule[1].notes.is_empty());
    }

    #[test]
    fn decision_never_precedes_review() {
        let policy = SimulatedReviewPolicy::new(Duration::from_secs(10), Duration::from_secs(2));
        let schedule = policy.schedule(&ApplicationId("GEV-2".to_string()));
        assert!(schedule[1].after >= schedule[0].after);
    }

    #[test]
    fn every_terminal_outcome_is_reachable() {
        let policy = SimulatedReviewPolicy::default();
        let id = ApplicationId("GEV-3".to_string());
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(policy.schedule(&id)[1].status);
        }
        assert_eq!(seen.len(), 3);
    }
}
