use anyhow::Result;
use autodelete_core::{Clock, DeletionKey, PendingDeletion, SystemClock};
use autodelete_storage::Storage;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::ensure_db_dir;

#[derive(Serialize)]
struct PendingRow {
    #[serde(flatten)]
    deletion: PendingDeletion,
    age_secs: f64,
}

fn open(db_path: &Path) -> Result<Storage> {
    ensure_db_dir(db_path)?;
    Ok(Storage::new(db_path)?)
}

pub(crate) fn run_pending(db_path: PathBuf) -> Result<()> {
    let storage = open(&db_path)?;
    let now = SystemClock.now();
    let rows: Vec<PendingRow> = storage
        .list_deletions()?
        .into_iter()
        .map(|deletion| PendingRow { age_secs: now - deletion.registered_at, deletion })
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

pub(crate) fn run_get(db_path: PathBuf, key: DeletionKey) -> Result<()> {
    let storage = open(&db_path)?;
    match storage.get_deletion(key)? {
        Some(registered_at) => {
            println!("{}", serde_json::to_string_pretty(&PendingDeletion::new(key, registered_at))?);
        },
        None => println!("Pending deletion not found: {key}"),
    }
    Ok(())
}

pub(crate) fn run_forget(db_path: PathBuf, key: DeletionKey) -> Result<()> {
    let storage = open(&db_path)?;
    let removed = storage.remove_deletion(key)?;
    if removed == 0 {
        println!("Pending deletion not found: {key}");
    } else {
        tracing::info!(%key, removed, "pending deletion removed by operator");
        println!("Forgot {key}");
    }
    Ok(())
}
