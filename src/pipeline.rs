// Run pipeline - executes the eight stages of a posting run in strict
// order. Any stage failure writes one diagnostic line to the run log and
// aborts the remaining stages; there are no retries and no recovery.

use std::io::Write;
use std::time::Instant;

use chrono::Utc;

use crate::api::{AccessCredentials, SocialApi};
use crate::auth::PinPrompt;
use crate::config::RunConfig;
use crate::errors::{AppError, AppResult};
use crate::images::{self, IndexPicker};
use crate::run_log::RunLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Aborted,
}

/// Everything a run needs, threaded explicitly through the stages instead
/// of living in process-wide state. Constructing the context performs the
/// log-init stage: it appends the separator line and captures the replay
/// offset.
pub struct RunContext<'a> {
    config: &'a RunConfig,
    api: &'a dyn SocialApi,
    pin_prompt: &'a dyn PinPrompt,
    picker: &'a mut dyn IndexPicker,
    log: RunLog,
    started: Instant,
}

impl<'a> RunContext<'a> {
    pub fn new(
        config: &'a RunConfig,
        api: &'a dyn SocialApi,
        pin_prompt: &'a dyn PinPrompt,
        picker: &'a mut dyn IndexPicker,
    ) -> AppResult<Self> {
        let log = RunLog::open(&config.log_file)?;

        Ok(Self {
            config,
            api,
            pin_prompt,
            picker,
            log,
            started: Instant::now(),
        })
    }
}

/// Runs the pipeline to completion or to its first failure.
///
/// Returns `Aborted` when a stage failed and its diagnostic line was
/// written; `Err` is reserved for infrastructure failures such as an
/// unwritable log file. The replay and duration lines are produced only on
/// the success path.
pub async fn run(ctx: &mut RunContext<'_>, console: &mut dyn Write) -> AppResult<RunOutcome> {
    ctx.log
        .append(&Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string())?;

    // Config validation: the first missing field wins.
    if let Err(e) = ctx.config.validate() {
        log::error!("Configuration invalid: {}", e);
        return abort(&ctx.log, &config_abort_line(&e));
    }

    // Authentication: direct credentials, or the interactive PIN flow.
    let credentials = match authenticate(ctx).await {
        Ok(credentials) => credentials,
        Err(e) => {
            log::error!("Authentication failed: {}", e);
            return abort(&ctx.log, "Could not obtain access credentials.");
        }
    };

    // Identity check: a network failure and a blank identity are reported
    // the same way.
    let account = match ctx.api.verify_credentials(&credentials).await {
        Ok(account) if !account.id.trim().is_empty() => account,
        Ok(_) => {
            log::error!("Verification returned a blank account id");
            return abort(&ctx.log, "Failed to authenticate.");
        }
        Err(e) => {
            log::error!("Verification failed: {}", e);
            return abort(&ctx.log, "Failed to authenticate.");
        }
    };
    ctx.log.append(&format!(
        "Authenticated as user: {} - {}",
        account.name, account.id
    ))?;

    // Image selection.
    let image = match images::select_random_image(&ctx.config.image_directory, &mut *ctx.picker) {
        Ok(image) => image,
        Err(e) => {
            log::error!("Image selection failed: {}", e);
            return abort(
                &ctx.log,
                "Could not find any images in the specified directory.",
            );
        }
    };
    ctx.log
        .append(&format!("Selected image: {}", image.path.display()))?;

    // Media upload: the whole file is read into memory and submitted once.
    let bytes = match tokio::fs::read(&image.path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("Failed to read {}: {}", image.path.display(), e);
            return abort(&ctx.log, "Image did not upload successfully, aborting.");
        }
    };
    let media = match ctx.api.upload_media(&credentials, bytes).await {
        Ok(media) if media.is_usable() => media,
        Ok(media) => {
            log::error!(
                "Upload response not usable (uploaded: {}, ready: {})",
                media.uploaded,
                media.ready_to_use
            );
            return abort(&ctx.log, "Image did not upload successfully, aborting.");
        }
        Err(e) => {
            log::error!("Upload failed: {}", e);
            return abort(&ctx.log, "Image did not upload successfully, aborting.");
        }
    };

    // Post: the status text is the image's last-modified timestamp.
    let status = match ctx
        .api
        .publish_status(&credentials, &image.status_text(), &media.media_id)
        .await
    {
        Ok(status) if !status.id.trim().is_empty() => status,
        Ok(_) => {
            log::error!("Publish returned a blank status id");
            return abort(&ctx.log, "Tweet did not publish successfully.");
        }
        Err(e) => {
            log::error!("Publish failed: {}", e);
            return abort(&ctx.log, "Tweet did not publish successfully.");
        }
    };
    ctx.log.append(&format!("Tweet published: {}", status.id))?;
    ctx.log.append("Application execution completed!")?;

    // Finalization: duration line, then replay this run's lines.
    let elapsed_ms = ctx.started.elapsed().as_millis();
    ctx.log
        .append(&format!("Application duration: {}", elapsed_ms))?;
    ctx.log.replay(console)?;

    Ok(RunOutcome::Completed)
}

async fn authenticate(ctx: &RunContext<'_>) -> AppResult<AccessCredentials> {
    if ctx.config.has_access_credentials() {
        return Ok(AccessCredentials {
            token: ctx.config.access_token.clone(),
            secret: ctx.config.access_token_secret.clone(),
        });
    }

    ctx.log
        .append("Invalid or missing access credentials. Authenticating with PIN.")?;

    let request = ctx.api.request_authentication().await?;
    ctx.log.append("Please enter the pin code.")?;
    let pin = ctx.pin_prompt.obtain_pin(&request.authorization_url)?;

    ctx.api.exchange_pin(&request, &pin).await
}

fn abort(log: &RunLog, line: &str) -> AppResult<RunOutcome> {
    log.append(line)?;
    Ok(RunOutcome::Aborted)
}

fn config_abort_line(error: &AppError) -> String {
    match error {
        AppError::Config { field } => format!("No {} specified.", field),
        other => other.to_string(),
    }
}
