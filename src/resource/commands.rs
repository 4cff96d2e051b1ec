//! API commands shared by all resource pages.
//!
//! Each command reports back through the owning service's channel. Mutations
//! also confirm or report failure with a toast.

use std::path::PathBuf;

use async_trait::async_trait;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use serde_json::{Value, json};
use tokio::sync::mpsc::UnboundedSender;

use crate::api::{ApiClient, ApiError};
use crate::commands::{Command, CommandEnv};
use crate::resource::{Attachment, RecordId, Resource, ResourceMsg, RowAction, Source};
use crate::ui::ToastType;

pub(super) const SUCCESS_TOAST: &str = "Operation successful!";
pub(super) const FAILURE_TOAST: &str = "Something went wrong.";
pub(super) const DOWNLOAD_FAILURE_TOAST: &str = "Download failed.";

/// Fetch the rows of a collection endpoint, ready for display.
pub async fn fetch_rows<R: Resource>(api: &ApiClient, path: &str) -> Result<Vec<R>, ApiError> {
    let mut rows = match R::SOURCE {
        Source::Records => api.list::<R>(path).await?,
        Source::RecordField(field) => {
            let record: Value = api.get(path).await?;
            match record.get(field) {
                None | Some(Value::Null) => Vec::new(),
                Some(list) => serde_json::from_value(list.clone())
                    .map_err(|e| ApiError::parse(format!("{field}: {e}")))?,
            }
        }
    };
    R::prepare(&mut rows);
    Ok(rows)
}

pub(super) struct FetchRecordsCmd<R> {
    pub api: ApiClient,
    pub path: String,
    pub tx: UnboundedSender<ResourceMsg<R>>,
}

#[async_trait]
impl<R: Resource> Command for FetchRecordsCmd<R> {
    fn name(&self) -> String {
        format!("Loading {}", R::TITLE)
    }

    async fn execute(self: Box<Self>, _env: CommandEnv) -> Result<()> {
        let msg = match fetch_rows::<R>(&self.api, &self.path).await {
            Ok(rows) => {
                tracing::debug!(resource = R::KEY, count = rows.len(), "Loaded records");
                ResourceMsg::Loaded(rows)
            }
            Err(e) => {
                tracing::error!(resource = R::KEY, error = %e, "Failed to load records");
                ResourceMsg::LoadFailed(e.to_string())
            }
        };
        self.tx.send(msg)?;
        Ok(())
    }
}

/// Create (no id) or update a record from form fields.
pub(super) struct SaveRecordCmd<R> {
    pub api: ApiClient,
    pub path: String,
    pub id: Option<RecordId>,
    pub fields: Vec<(String, String)>,
    pub tx: UnboundedSender<ResourceMsg<R>>,
}

#[async_trait]
impl<R: Resource> Command for SaveRecordCmd<R> {
    fn name(&self) -> String {
        match &self.id {
            Some(id) => format!("Updating {} #{id}", R::ITEM),
            None => format!("Creating {}", R::ITEM),
        }
    }

    async fn execute(self: Box<Self>, env: CommandEnv) -> Result<()> {
        let result = match &self.id {
            Some(id) => self.api.update(&self.path, id, &self.fields).await,
            None => self.api.create(&self.path, &self.fields).await,
        };
        report(result, &env, &self.tx, SUCCESS_TOAST, FAILURE_TOAST)
    }
}

pub(super) struct DeleteRecordCmd<R> {
    pub api: ApiClient,
    pub path: String,
    pub record: R,
    pub tx: UnboundedSender<ResourceMsg<R>>,
}

#[async_trait]
impl<R: Resource> Command for DeleteRecordCmd<R> {
    fn name(&self) -> String {
        format!("Deleting {} #{}", R::ITEM, self.record.id())
    }

    async fn execute(self: Box<Self>, env: CommandEnv) -> Result<()> {
        let result = self.api.delete(&self.path, self.record.id()).await;
        report(result, &env, &self.tx, SUCCESS_TOAST, FAILURE_TOAST)
    }
}

/// Accept or decline a record through `{path}/set-status`.
pub(super) struct SetStatusCmd<R> {
    pub api: ApiClient,
    pub path: String,
    pub record: R,
    pub action: RowAction,
    pub tx: UnboundedSender<ResourceMsg<R>>,
}

#[async_trait]
impl<R: Resource> Command for SetStatusCmd<R> {
    fn name(&self) -> String {
        format!("{} {} #{}", self.action.label(), R::ITEM, self.record.id())
    }

    async fn execute(self: Box<Self>, env: CommandEnv) -> Result<()> {
        let Some(status) = self.action.status() else {
            return Ok(());
        };
        let path = format!("{}/set-status", self.path.trim_end_matches('/'));
        let body = json!({ "id": self.record.id(), "status": status });
        let result = self.api.post_json(&path, &body).await;

        let success = if self.action == RowAction::Decline {
            format!("{} declined successfully!", R::ITEM)
        } else {
            format!("{} updated successfully!", R::ITEM)
        };
        let failure = format!("Failed to update {}.", R::ITEM.to_lowercase());
        report(result, &env, &self.tx, &success, &failure)
    }
}

/// Save a record's attachment into `dir`.
pub(super) struct DownloadFileCmd {
    pub api: ApiClient,
    pub attachment: Attachment,
    pub dir: PathBuf,
}

#[async_trait]
impl Command for DownloadFileCmd {
    fn name(&self) -> String {
        format!("Downloading {}", self.attachment.file_name)
    }

    async fn execute(self: Box<Self>, env: CommandEnv) -> Result<()> {
        let target = self.dir.join(&self.attachment.file_name);
        let result = match self.api.download(&self.attachment.path).await {
            Ok(bytes) => tokio::fs::write(&target, bytes)
                .await
                .map_err(|e| eyre!("Could not write {}: {e}", target.display())),
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(()) => {
                tracing::info!(path = %target.display(), "Saved attachment");
                env.show_toast(
                    format!("Saved {} to {}", self.attachment.file_name, self.dir.display()),
                    ToastType::Success,
                );
            }
            Err(e) => {
                tracing::error!(path = %self.attachment.path, error = %e, "Download failed");
                env.show_toast(DOWNLOAD_FAILURE_TOAST, ToastType::Error);
            }
        }
        Ok(())
    }
}

fn report<R: Resource>(
    result: Result<Value, ApiError>,
    env: &CommandEnv,
    tx: &UnboundedSender<ResourceMsg<R>>,
    success: &str,
    failure: &str,
) -> Result<()> {
    match result {
        Ok(_) => {
            env.show_toast(success, ToastType::Success);
            tx.send(ResourceMsg::Changed)?;
        }
        Err(e) => {
            tracing::error!(resource = R::KEY, error = %e, "Mutation failed");
            env.show_toast(failure, ToastType::Error);
            tx.send(ResourceMsg::MutationFailed(e.to_string()))?;
        }
    }
    Ok(())
}
