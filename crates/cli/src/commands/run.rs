use anyhow::{Context, Result};
use autodelete_core::{Clock, Settings, SystemClock};
use autodelete_service::{DeletionScheduler, ServiceError};
use autodelete_storage::Storage;
use autodelete_telegram::{Message, MessageLog, TelegramClient, UpdatePoller};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::ensure_db_dir;

pub(crate) async fn run(db_override: Option<PathBuf>) -> Result<()> {
    let mut settings = Settings::from_env()?;
    if let Some(db_path) = db_override {
        settings.db_path = db_path;
    }
    ensure_db_dir(&settings.db_path)?;
    let storage = Arc::new(Storage::with_pool_size(&settings.db_path, settings.db_pool_size)?);

    let telegram = Arc::new(TelegramClient::new(
        settings.bot_token.clone(),
        &settings.api_url,
        settings.http_timeout,
    )?);
    let me = telegram.get_me().await.context("getMe failed, check AUTODELETE_BOT_TOKEN")?;

    let scheduler =
        DeletionScheduler::new(storage, telegram.clone(), Arc::new(SystemClock), settings.delay_secs);
    tracing::info!(
        bot = me.username.as_deref().unwrap_or(&me.first_name),
        chat_id = settings.chat_id,
        delay_secs = scheduler.delay_secs(),
        "bot started"
    );
    scheduler.reconcile(SystemClock.now()).await.context("startup reconciliation failed")?;

    let message_log = settings.message_log.clone().map(MessageLog::new);
    let shutdown = CancellationToken::new();
    spawn_ctrl_c_handler(shutdown.clone());

    let mut poller = UpdatePoller::new(telegram, settings.poll_timeout_secs);
    let result =
        poll_loop(&mut poller, &scheduler, settings.chat_id, message_log.as_ref(), &shutdown).await;

    scheduler.shutdown().await;
    result
}

fn spawn_ctrl_c_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("shutdown requested");
                shutdown.cancel();
            },
            Err(e) => tracing::warn!(error = %e, "cannot listen for Ctrl-C"),
        }
    });
}

async fn poll_loop(
    poller: &mut UpdatePoller,
    scheduler: &Arc<DeletionScheduler>,
    chat_id: i64,
    message_log: Option<&MessageLog>,
    shutdown: &CancellationToken,
) -> Result<()> {
    loop {
        let batch = tokio::select! {
            () = shutdown.cancelled() => return Ok(()),
            batch = poller.next_batch() => batch.context("polling updates failed")?,
        };
        for message in batch {
            if !on_new_message(scheduler, chat_id, message_log, &message).await? {
                return Ok(());
            }
        }
    }
}

/// Schedule `message` if it belongs to the configured chat. Returns `false` once
/// the scheduler stopped accepting work.
async fn on_new_message(
    scheduler: &Arc<DeletionScheduler>,
    chat_id: i64,
    message_log: Option<&MessageLog>,
    message: &Message,
) -> Result<bool> {
    let key = message.key();
    if key.chat_id != chat_id {
        tracing::info!(chat_id = key.chat_id, "unknown chat id, ignoring the message");
        return Ok(true);
    }

    match scheduler.schedule_default(key).await {
        Ok(_) => {},
        Err(ServiceError::ShuttingDown) => return Ok(false),
        // The update is not confirmed to Telegram yet, so it is delivered again
        // after a restart.
        Err(e) => return Err(e).context(format!("could not persist deletion of {key}")),
    }

    if let Some(log) = message_log {
        if let Err(e) = log.append(message).await {
            tracing::warn!(%key, error = %e, "failed to append to message log");
        }
    }
    Ok(true)
}
