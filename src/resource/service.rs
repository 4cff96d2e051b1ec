use std::path::PathBuf;

use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::Theme;
use crate::commands::{Command, CopyToClipboardCmd};
use crate::config::GlobalAction;
use crate::registry::ServiceContext;
use crate::resource::commands::{
    DeleteRecordCmd, DownloadFileCmd, FetchRecordsCmd, SaveRecordCmd, SetStatusCmd,
};
use crate::resource::{DeleteDialog, RecordForm, RecordScreen, Resource, ResourceMsg};
use crate::service::{Service, ServiceMsg};
use crate::ui::{Component, EventResult, Keybinding, Modal, Screen, Spinner};

enum Overlay<R: Resource> {
    Form(RecordForm<R>),
    Delete(DeleteDialog<R>),
}

impl<R: Resource> Overlay<R> {
    fn modal(&mut self) -> &mut dyn Modal<Output = ResourceMsg<R>> {
        match self {
            Self::Form(form) => form,
            Self::Delete(dialog) => dialog,
        }
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        match self {
            Self::Form(form) => form.keybindings(),
            Self::Delete(dialog) => dialog.keybindings(),
        }
    }
}

/// Where downloaded attachments go: the user's download folder, else the
/// working directory.
fn download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// CRUD page of one resource: table, record forms and API commands.
pub struct ResourceService<R: Resource> {
    ctx: ServiceContext,
    path: String,
    trail: Vec<String>,
    screen: RecordScreen<R>,
    overlay: Option<Overlay<R>>,
    spinner: Spinner,
    loading: bool,
    msg_tx: UnboundedSender<ResourceMsg<R>>,
    msg_rx: UnboundedReceiver<ResourceMsg<R>>,
}

impl<R: Resource> ResourceService<R> {
    pub fn new(ctx: ServiceContext) -> Self {
        Self::nested(ctx, R::PATH, vec![R::TITLE.to_string()])
    }

    /// A page reading from a non-default endpoint, e.g. the applications of
    /// one career.
    pub fn nested(ctx: ServiceContext, path: impl Into<String>, trail: Vec<String>) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let screen = RecordScreen::new(Vec::new(), ctx.rows_per_page, ctx.resolver.clone());
        Self {
            ctx,
            path: path.into(),
            trail,
            screen,
            overlay: None,
            spinner: Spinner::default(),
            loading: false,
            msg_tx,
            msg_rx,
        }
    }

    fn queue(&self, msg: ResourceMsg<R>) {
        if self.msg_tx.send(msg).is_err() {
            tracing::debug!(resource = R::KEY, "Message dropped, service channel closed");
        }
    }

    fn display_loading_spinner(&mut self, label: impl Into<String>) {
        self.spinner = Spinner::with_label(label);
        self.loading = true;
    }

    fn hide_loading_spinner(&mut self) {
        self.loading = false;
    }

    fn process_message(&mut self, msg: ResourceMsg<R>) -> Result<ServiceMsg> {
        match msg {
            ResourceMsg::Load => {
                self.display_loading_spinner(format!("Loading {}...", R::TITLE));
                Ok(FetchRecordsCmd {
                    api: self.ctx.api.clone(),
                    path: self.path.clone(),
                    tx: self.msg_tx.clone(),
                }
                .into())
            }

            ResourceMsg::Loaded(rows) => {
                self.hide_loading_spinner();
                self.screen.set_rows(rows);
                Ok(ServiceMsg::Idle)
            }

            ResourceMsg::LoadFailed(error) => {
                self.hide_loading_spinner();
                Err(eyre!("Could not load {}: {error}", R::TITLE))
            }

            ResourceMsg::StartCreate => {
                if R::can_create() {
                    self.overlay = Some(Overlay::Form(RecordForm::create(
                        self.ctx.resolver.clone(),
                    )));
                }
                Ok(ServiceMsg::Idle)
            }

            ResourceMsg::StartEdit(record, action) => {
                self.overlay = Some(Overlay::Form(RecordForm::edit(
                    &record,
                    action,
                    self.ctx.resolver.clone(),
                )));
                Ok(ServiceMsg::Idle)
            }

            ResourceMsg::Submit { id, fields } => {
                // The form stays open until the save succeeds.
                self.display_loading_spinner("Saving...");
                Ok(SaveRecordCmd {
                    api: self.ctx.api.clone(),
                    path: self.path.clone(),
                    id,
                    fields,
                    tx: self.msg_tx.clone(),
                }
                .into())
            }

            ResourceMsg::ConfirmDelete(record) => {
                self.overlay = Some(Overlay::Delete(DeleteDialog::new(
                    record,
                    self.ctx.resolver.clone(),
                )));
                Ok(ServiceMsg::Idle)
            }

            ResourceMsg::Delete(record) => {
                self.overlay = None;
                self.display_loading_spinner(format!("Deleting {}...", record.name()));
                Ok(DeleteRecordCmd {
                    api: self.ctx.api.clone(),
                    path: self.path.clone(),
                    record,
                    tx: self.msg_tx.clone(),
                }
                .into())
            }

            ResourceMsg::SetStatus { record, action } => {
                self.display_loading_spinner(format!("{} {}...", action.label(), record.name()));
                Ok(SetStatusCmd {
                    api: self.ctx.api.clone(),
                    path: self.path.clone(),
                    record,
                    action,
                    tx: self.msg_tx.clone(),
                }
                .into())
            }

            ResourceMsg::Changed => {
                self.overlay = None;
                self.queue(ResourceMsg::Load);
                Ok(ServiceMsg::Idle)
            }

            ResourceMsg::MutationFailed(error) => {
                self.hide_loading_spinner();
                if let Some(Overlay::Form(form)) = self.overlay.as_mut() {
                    form.set_error(error);
                }
                Ok(ServiceMsg::Idle)
            }

            ResourceMsg::Open(record) => Ok(record
                .open(&self.ctx)
                .map_or(ServiceMsg::Idle, ServiceMsg::Open)),

            ResourceMsg::Copy(record) => {
                let text = serde_json::to_string_pretty(&record)?;
                Ok(CopyToClipboardCmd::new(text, format!("{} #{}", R::ITEM, record.id())).into())
            }

            ResourceMsg::Download(record) => Ok(record.attachment().map_or(
                ServiceMsg::Idle,
                |attachment| {
                    DownloadFileCmd {
                        api: self.ctx.api.clone(),
                        attachment,
                        dir: download_dir(),
                    }
                    .into()
                },
            )),

            ResourceMsg::DialogCancelled => {
                self.overlay = None;
                Ok(ServiceMsg::Idle)
            }

            ResourceMsg::Close => Ok(ServiceMsg::Close),
        }
    }
}

impl<R: Resource> Service for ResourceService<R> {
    fn init(&mut self) {
        self.queue(ResourceMsg::Load);
    }

    fn handle_tick(&mut self) {
        if self.loading {
            self.spinner.handle_tick();
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> EventResult<()> {
        let has_overlay = self.overlay.is_some();
        let result = match self.overlay.as_mut() {
            Some(overlay) => overlay.modal().handle_key(key),
            None => self.screen.handle_key(key),
        };

        match result {
            Ok(EventResult::Event(msg)) => {
                self.queue(msg);
                EventResult::Consumed
            }
            Ok(EventResult::Consumed) => EventResult::Consumed,
            Ok(EventResult::Ignored) if has_overlay => EventResult::Consumed,
            Ok(EventResult::Ignored) => {
                if self.ctx.resolver.matches_global(&key, GlobalAction::Back) {
                    self.queue(ResourceMsg::Close);
                    EventResult::Consumed
                } else {
                    EventResult::Ignored
                }
            }
            Err(e) => {
                tracing::warn!(resource = R::KEY, error = %e, "Key handling failed");
                EventResult::Consumed
            }
        }
    }

    fn update(&mut self) -> Result<ServiceMsg> {
        let mut commands: Vec<Box<dyn Command>> = Vec::new();

        while let Ok(msg) = self.msg_rx.try_recv() {
            match self.process_message(msg) {
                Ok(ServiceMsg::Idle) => {}
                Ok(ServiceMsg::Run(cmds)) => commands.extend(cmds),
                Ok(other) => return Ok(other),
                Err(e) if commands.is_empty() => return Err(e),
                Err(e) => tracing::error!(resource = R::KEY, error = %e, "Update failed"),
            }
        }

        if commands.is_empty() {
            Ok(ServiceMsg::Idle)
        } else {
            Ok(ServiceMsg::Run(commands))
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if self.loading && self.screen.table().data().rows().is_empty() {
            self.spinner.render(frame, area, theme);
        } else {
            self.screen.render(frame, area, theme);
        }

        if let Some(overlay) = self.overlay.as_mut() {
            overlay.modal().render(frame, area, theme);
        }
    }

    fn breadcrumbs(&self) -> Vec<String> {
        let mut trail = self.trail.clone();
        if let Some(Overlay::Form(form)) = &self.overlay {
            trail.push(form.title().to_string());
        }
        trail
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        self.overlay
            .as_ref()
            .map_or_else(|| self.screen.keybindings(), Overlay::keybindings)
    }
}
