//! Background job scheduler.
//!
//! Hosts that idle out inactive processes are kept warm by a repeated GET
//! against the service's own public URL (`ZAMARANK_KEEPALIVE_URL`). Without
//! that URL no jobs are registered.

use std::time::Duration;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use zamarank_core::AppConfig;

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process. Dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    config: &AppConfig,
    http: reqwest::Client,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    match config.keepalive_url.clone() {
        Some(url) => {
            let interval = Duration::from_secs(config.keepalive_interval_secs);
            register_keepalive_job(&scheduler, http, url, interval).await?;
        }
        None => tracing::info!("ZAMARANK_KEEPALIVE_URL not set; keep-alive ping disabled"),
    }

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register a repeated keep-alive ping every `interval`.
async fn register_keepalive_job(
    scheduler: &JobScheduler,
    http: reqwest::Client,
    url: String,
    interval: Duration,
) -> Result<(), JobSchedulerError> {
    tracing::info!(
        url = %url,
        interval_secs = interval.as_secs(),
        "scheduler: registering keep-alive ping"
    );

    let job = Job::new_repeated_async(interval, move |_uuid, _lock| {
        let http = http.clone();
        let url = url.clone();

        Box::pin(async move {
            ping(&http, &url).await;
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Sends one keep-alive GET. Returns whether the target answered with a
/// success status; failures are logged and otherwise ignored.
pub(crate) async fn ping(http: &reqwest::Client, url: &str) -> bool {
    match http.get(url).send().await {
        Ok(response) if response.status().is_success() => {
            tracing::debug!(url, status = response.status().as_u16(), "keep-alive ping ok");
            true
        }
        Ok(response) => {
            tracing::warn!(
                url,
                status = response.status().as_u16(),
                "keep-alive ping returned non-success status"
            );
            false
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "keep-alive ping failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn ping_reports_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        assert!(ping(&reqwest::Client::new(), &server.uri()).await);
    }

    #[tokio::test]
    async fn ping_reports_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(!ping(&reqwest::Client::new(), &server.uri()).await);
    }

    #[tokio::test]
    async fn ping_survives_unreachable_target() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        assert!(!ping(&reqwest::Client::new(), &format!("http://{addr}")).await);
    }
}
