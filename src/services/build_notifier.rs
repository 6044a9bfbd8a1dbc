//! Post-build step that reports a finished build to a ChatWork room.

use std::sync::Arc;

use crate::config::Settings;
use crate::error::AppResult;
use crate::external::ReqwestTransport;
use crate::models::{BuildOutcome, NotificationConfig};
use crate::services::notifications::ChatWorkNotifier;
use crate::services::template;

/// Renders the configured template for a build and posts it.
///
/// Holds everything it needs up front so `perform` cannot fail.
#[derive(Clone)]
pub struct BuildNotifier {
    config: NotificationConfig,
    host_base_url: String,
    notifier: ChatWorkNotifier,
}

impl BuildNotifier {
    pub fn new(
        config: NotificationConfig,
        host_base_url: impl Into<String>,
        notifier: ChatWorkNotifier,
    ) -> Self {
        Self {
            config,
            host_base_url: host_base_url.into(),
            notifier,
        }
    }

    /// Wires a notifier backed by a real HTTP client
    pub fn from_settings(settings: &Settings) -> AppResult<Self> {
        let transport = ReqwestTransport::new(&settings.http)?;
        let notifier = ChatWorkNotifier::new(Arc::new(transport), &settings.notifier.api_base_url)?;

        Ok(Self::new(
            settings.notifier.notification_config(),
            settings.ci.base_url.clone(),
            notifier,
        ))
    }

    pub fn config(&self) -> &NotificationConfig {
        &self.config
    }

    /// The message that `perform` would send for `outcome`
    pub fn render(&self, outcome: &BuildOutcome) -> String {
        template::render(&self.config.message_template, outcome, &self.host_base_url)
    }

    /// Renders and sends the notification.
    ///
    /// Always returns `true`: a failed delivery is logged and never fails the
    /// build.
    pub async fn perform(&self, outcome: &BuildOutcome) -> bool {
        let message = self.render(outcome);

        tracing::debug!(
            project = %outcome.project_name,
            number = outcome.build_number,
            result = %outcome.result,
            "Notifying ChatWork of build result"
        );

        self.notifier.notify(&self.config, &message).await;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BuildResult, ChangeEntry, Culprit};
    use crate::services::notifications::tests::{
        Behavior, Failure, FakeTransport, count_errors, test_config,
    };
    use crate::services::notifications::DEFAULT_API_BASE_URL;

    fn outcome() -> BuildOutcome {
        BuildOutcome {
            result: BuildResult::Failure,
            project_name: "demo".to_string(),
            build_number: 42,
            build_url: "job/demo/42/".to_string(),
            culprits: vec![Culprit::new("Alice"), Culprit::new("Bob")],
            change_entries: vec![ChangeEntry::new("alice", "fix parser")],
        }
    }

    fn build_notifier(transport: Arc<FakeTransport>, template: &str) -> BuildNotifier {
        let mut config = test_config();
        config.message_template = template.to_string();
        let notifier = ChatWorkNotifier::new(transport, DEFAULT_API_BASE_URL).unwrap();
        BuildNotifier::new(config, "https://ci.example.com/", notifier)
    }

    #[test]
    fn test_render_uses_host_base_url() {
        let notifier = build_notifier(Arc::new(FakeTransport::succeeding()), "${url}");
        assert_eq!(
            notifier.render(&outcome()),
            "https://ci.example.com/job/demo/42/"
        );
    }

    #[test]
    fn test_render_full_template() {
        let notifier = build_notifier(
            Arc::new(FakeTransport::succeeding()),
            "${project} #${number} ${result} by ${user}\n${changeSet}",
        );
        assert_eq!(
            notifier.render(&outcome()),
            "demo #42 FAILURE by Alice Bob \nalice : fix parser\n"
        );
    }

    #[tokio::test]
    async fn test_perform_posts_rendered_message() {
        let transport = Arc::new(FakeTransport::succeeding());
        let notifier = build_notifier(Arc::clone(&transport), "${project} ${result}");

        assert!(notifier.perform(&outcome()).await);

        let requests = transport.recorded();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].body, "body=demo+FAILURE");
    }

    #[tokio::test]
    async fn test_perform_returns_true_when_delivery_fails() {
        for behavior in [
            Behavior::FailOpen(Failure::Refused),
            Behavior::FailSend(Failure::Timeout),
            Behavior::Respond {
                status: 500,
                body: Vec::new(),
            },
        ] {
            let transport = Arc::new(FakeTransport::new(behavior));
            let notifier = build_notifier(Arc::clone(&transport), "${result}");

            let (succeeded, errors) = count_errors(notifier.perform(&outcome())).await;

            assert!(succeeded);
            assert_eq!(errors, 1);
            assert_eq!(transport.stats.opened(), transport.stats.released());
        }
    }

    #[tokio::test]
    async fn test_perform_without_room_is_skipped() {
        let transport = Arc::new(FakeTransport::succeeding());
        let mut notifier = build_notifier(Arc::clone(&transport), "${result}");
        notifier.config.room_id = String::new();

        assert!(notifier.perform(&outcome()).await);
        assert_eq!(transport.stats.opened(), 0);
    }

    #[tokio::test]
    async fn test_from_settings() {
        let mut settings = Settings::default();
        settings.notifier.room_id = "777".to_string();
        settings.ci.base_url = "https://ci.example.com/".to_string();

        let notifier = BuildNotifier::from_settings(&settings).unwrap();
        assert_eq!(notifier.config().room_id, "777");
        assert_eq!(
            notifier.render(&outcome()),
            "demo #42 FAILURE\nhttps://ci.example.com/job/demo/42/\nalice : fix parser\n"
        );
    }

    #[tokio::test]
    async fn test_from_settings_rejects_bad_api_base_url() {
        let mut settings = Settings::default();
        settings.notifier.api_base_url = "mailto:ops@example.com".to_string();
        assert!(BuildNotifier::from_settings(&settings).is_err());
    }
}
