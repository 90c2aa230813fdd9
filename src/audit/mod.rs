//! Append-only audit trail.
//!
//! Every process writes to its own `log-YYYY-MM-DD-HH-MM-SS.txt` file. Each
//! line is `[<RFC 3339 timestamp>] <description>`. Events are mirrored to the
//! application log through `tracing`. Write failures are logged and dropped;
//! they never reach the HTTP response.

use chrono::{DateTime, Local, SecondsFormat, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Something worth recording in the audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    Request {
        method: String,
        uri: String,
        ip: Option<String>,
    },
    DealershipCreated {
        id: i64,
        name: String,
    },
    DealershipRenamed {
        id: i64,
        old_name: String,
        new_name: String,
    },
    DealershipDeleted {
        id: i64,
        cars_removed: u64,
    },
    CarCreated {
        dealership_id: i64,
        car_id: i64,
        make: String,
        model: String,
    },
    CarUpdated {
        dealership_id: i64,
        car_id: i64,
        make: String,
        model: String,
    },
    CarDeleted {
        dealership_id: i64,
        car_id: i64,
    },
    CarsCleared {
        dealership_id: i64,
        cars_removed: u64,
    },
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditEvent::Request { method, uri, ip } => {
                write!(f, "{} {} [{}]", method, uri, ip.as_deref().unwrap_or("-"))
            }
            AuditEvent::DealershipCreated { name, .. } => write!(f, "Dealership created: {}", name),
            AuditEvent::DealershipRenamed {
                id,
                old_name,
                new_name,
            } => write!(f, "Dealership {} renamed: {} -> {}", id, old_name, new_name),
            AuditEvent::DealershipDeleted { id, cars_removed } => {
                write!(f, "Dealership {} deleted ({} cars removed)", id, cars_removed)
            }
            AuditEvent::CarCreated {
                dealership_id,
                make,
                model,
                ..
            } => write!(f, "Car added to dealership {}: {} {}", dealership_id, make, model),
            AuditEvent::CarUpdated {
                dealership_id,
                car_id,
                make,
                model,
            } => write!(
                f,
                "Car {} of dealership {} updated: {} {}",
                car_id, dealership_id, make, model
            ),
            AuditEvent::CarDeleted {
                dealership_id,
                car_id,
            } => write!(f, "Car {} removed from dealership {}", car_id, dealership_id),
            AuditEvent::CarsCleared {
                dealership_id,
                cars_removed,
            } => write!(
                f,
                "All cars removed from dealership {} ({} cars)",
                dealership_id, cars_removed
            ),
        }
    }
}

/// Handle to the process audit file. Cheap to clone.
#[derive(Clone)]
pub struct AuditLog {
    inner: Arc<Inner>,
}

struct Inner {
    path: PathBuf,
    // Opened lazily on first write, then kept for the process lifetime.
    file: Mutex<Option<tokio::fs::File>>,
}

impl AuditLog {
    /// Audit log writing to `log-<local start time>.txt` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::at_path(dir.as_ref().join(file_name(Local::now())))
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                path: path.into(),
                file: Mutex::new(None),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Append one event. Never fails; problems are reported through `tracing`.
    pub async fn record(&self, event: AuditEvent) {
        match &event {
            AuditEvent::Request { .. } => tracing::info!(target: "request", "{}", event),
            _ => tracing::info!(target: "audit", "{}", event),
        }

        let line = format_line(Utc::now(), &event);
        if let Err(e) = self.append(line.as_bytes()).await {
            tracing::warn!(
                path = %self.inner.path.display(),
                error = %e,
                "failed to write audit log entry"
            );
        }
    }

    /// Hold the writer lock, stalling every audit write until the guard drops.
    #[cfg(test)]
    pub(crate) async fn lock_writer(&self) -> tokio::sync::MutexGuard<'_, Option<tokio::fs::File>> {
        self.inner.file.lock().await
    }

    async fn append(&self, bytes: &[u8]) -> std::io::Result<()> {
        let mut guard = self.inner.file.lock().await;
        if guard.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.inner.path)
                .await?;
            *guard = Some(file);
        }

        if let Some(file) = guard.as_mut() {
            file.write_all(bytes).await?;
            file.flush().await?;
        }
        Ok(())
    }
}

fn file_name(started: DateTime<Local>) -> String {
    format!("log-{}.txt", started.format("%Y-%m-%d-%H-%M-%S"))
}

fn format_line(at: DateTime<Utc>, event: &AuditEvent) -> String {
    format!("[{}] {}\n", at.to_rfc3339_opts(SecondsFormat::Millis, true), event)
}
