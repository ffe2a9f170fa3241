//! Scheduled data backups (admin)

use super::{Access, ApiClient, ApiResult};
use crate::models::{BackupRecord, BackupSettings};

pub struct Backup<'a> {
    client: &'a ApiClient,
}

impl<'a> Backup<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn settings(&self) -> ApiResult<BackupSettings> {
        self.client
            .get("/settings/backup", Access::Authenticated)
            .await
    }

    pub async fn update(&self, settings: &BackupSettings) -> ApiResult<BackupSettings> {
        self.client
            .put("/settings/backup", settings, Access::Authenticated)
            .await
    }

    /// Trigger a backup outside the schedule
    pub async fn run_now(&self) -> ApiResult<BackupRecord> {
        let record: BackupRecord = self
            .client
            .post_empty("/settings/backup/run", Access::Authenticated)
            .await?;

        tracing::info!(backup_id = %record.id, status = %record.status, "Backup triggered");
        Ok(record)
    }

    pub async fn history(&self) -> ApiResult<Vec<BackupRecord>> {
        self.client
            .get("/settings/backup/history", Access::Authenticated)
            .await
    }
}
