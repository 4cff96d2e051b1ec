use std::sync::Arc;

use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use crate::Theme;
use crate::commands::{Command, CommandEnv};
use crate::config::{GlobalAction, KeyResolver};
use crate::registry::{ServiceContext, ServiceRegistry};
use crate::service::{ResourceSelector, Service, ServiceMsg};
use crate::tui::{Event, Tui};
use crate::ui::{
    Component, ErrorDialog, ErrorDialogEvent, EventResult, HelpEvent, HelpOverlay,
    KeybindingSection, StatusBar, Toast, ToastManager, ToastType,
};

const FRAME_RATE: f64 = 30.0;
const TICK_RATE: f64 = 8.0;
const STATUS_BAR_HEIGHT: u16 = 7;

/// Messages sent to the App from spawned commands.
#[derive(Debug)]
pub enum AppMessage {
    ShowToast {
        message: String,
        toast_type: ToastType,
    },
    CommandCompleted {
        name: String,
        error: Option<String>,
    },
}

enum Overlay {
    Help(HelpOverlay),
    Error(ErrorDialog),
}

pub struct App {
    registry: ServiceRegistry,
    ctx: ServiceContext,
    resolver: Arc<KeyResolver>,
    theme: Theme,
    selector: ResourceSelector,
    /// Open services; the last one is active. Empty shows the selector.
    services: Vec<Box<dyn Service>>,
    overlay: Option<Overlay>,
    toasts: ToastManager,
    status_bar: StatusBar,
    env: CommandEnv,
    msg_tx: UnboundedSender<AppMessage>,
    msg_rx: UnboundedReceiver<AppMessage>,
    running_commands: usize,
    should_quit: bool,
    should_suspend: bool,
}

impl App {
    pub fn new(registry: ServiceRegistry, ctx: ServiceContext, theme: Theme) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let resolver = ctx.resolver.clone();
        let status_bar = StatusBar::new(
            ctx.api.base_url().as_str(),
            ctx.api.has_token(),
            resolver.clone(),
        );
        Self {
            selector: ResourceSelector::new(&registry, resolver.clone()),
            registry,
            ctx,
            resolver,
            theme,
            services: Vec::new(),
            overlay: None,
            toasts: ToastManager::default(),
            status_bar,
            env: CommandEnv::new(msg_tx.clone()),
            msg_tx,
            msg_rx,
            running_commands: 0,
            should_quit: false,
            should_suspend: false,
        }
    }

    /// Open a registered resource by key, on top of the current screen.
    ///
    /// # Errors
    /// Fails if no resource is registered under `key`.
    pub fn open_resource(&mut self, key: &str) -> Result<()> {
        let provider = self.registry.get(key).ok_or_else(|| {
            eyre!(
                "Unknown resource '{key}'. Available: {}",
                self.registry.keys().join(", ")
            )
        })?;
        info!(resource = provider.key(), "Opening resource");
        let service = provider.create_service(&self.ctx);
        self.push_service(service);
        Ok(())
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new(FRAME_RATE, TICK_RATE)?;
        tui.enter()?;

        while !self.should_quit {
            tokio::select! {
                event = tui.next_event() => match event {
                    Some(event) => self.handle_event(&mut tui, event)?,
                    None => break,
                },
                Some(msg) = self.msg_rx.recv() => self.handle_message(msg),
            }

            if self.should_suspend {
                self.should_suspend = false;
                tui.suspend()?;
                tui.resume()?;
            }
        }

        while let Some(mut service) = self.services.pop() {
            service.destroy();
        }
        tui.exit()?;
        Ok(())
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) -> Result<()> {
        match event {
            Event::Quit => self.should_quit = true,
            Event::Suspend => self.should_suspend = true,
            Event::Tick => self.handle_tick(),
            Event::Render => {
                tui.draw(|frame| self.render(frame))?;
            }
            Event::Resize(width, height) => {
                tui.resize(Rect::new(0, 0, width, height))?;
                tui.draw(|frame| self.render(frame))?;
            }
            Event::Key(key) => self.handle_key(key),
            Event::Paste(text) => self.handle_paste(&text),
            Event::Error(e) => error!(error = %e, "Terminal event error"),
            Event::Init => {}
        }
        Ok(())
    }

    fn handle_tick(&mut self) {
        self.toasts.handle_tick();
        if let Some(service) = self.services.last_mut() {
            service.handle_tick();
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.dispatch_key(key) {
            return;
        }

        if self.resolver.matches_global(&key, GlobalAction::Quit) {
            self.should_quit = true;
        } else if self.resolver.matches_global(&key, GlobalAction::Help) {
            self.show_help();
        } else if self.resolver.matches_global(&key, GlobalAction::Back) {
            self.close_service();
        }
    }

    /// Route a key to the topmost layer. Returns whether it was handled.
    fn dispatch_key(&mut self, key: KeyEvent) -> bool {
        if let Some(overlay) = self.overlay.as_mut() {
            let close = match overlay {
                Overlay::Help(help) => matches!(
                    help.handle_key(key),
                    Ok(EventResult::Event(HelpEvent::Close))
                ),
                Overlay::Error(dialog) => matches!(
                    dialog.handle_key(key),
                    Ok(EventResult::Event(ErrorDialogEvent::Dismissed))
                ),
            };
            if close {
                self.overlay = None;
            }
            return true;
        }

        if let Some(service) = self.services.last_mut() {
            if service.handle_key(key).is_consumed() {
                self.update_service();
                return true;
            }
            return false;
        }

        match self.selector.handle_key(key) {
            Ok(EventResult::Event(resource)) => {
                if let Err(e) = self.open_resource(resource) {
                    self.show_error(&e.to_string());
                }
                true
            }
            Ok(result) => result.is_consumed(),
            Err(e) => {
                error!(error = %e, "Resource selector failed");
                true
            }
        }
    }

    /// Pasted text is typed into whatever has focus; global keys stay inert.
    fn handle_paste(&mut self, text: &str) {
        for c in text.chars().filter(|c| !c.is_control()) {
            self.dispatch_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::ShowToast {
                message,
                toast_type,
            } => self.toasts.show(Toast::new(message, toast_type)),
            AppMessage::CommandCompleted { name, error } => {
                self.running_commands = self.running_commands.saturating_sub(1);
                match error {
                    Some(e) => {
                        error!(command = %name, error = %e, "Command failed");
                        self.toasts.show(Toast::error(format!("{name} failed: {e}")));
                    }
                    None => debug!(command = %name, "Command completed"),
                }
                self.update_service();
            }
        }
    }

    fn push_service(&mut self, mut service: Box<dyn Service>) {
        service.init();
        self.services.push(service);
        self.update_service();
    }

    fn close_service(&mut self) {
        if let Some(mut service) = self.services.pop() {
            service.destroy();
        }
    }

    /// Let the active service drain its queue and act on the result.
    fn update_service(&mut self) {
        let Some(service) = self.services.last_mut() else {
            return;
        };
        match service.update() {
            Ok(ServiceMsg::Idle) => {}
            Ok(ServiceMsg::Run(commands)) => {
                for command in commands {
                    self.spawn_command(command);
                }
            }
            Ok(ServiceMsg::Open(service)) => self.push_service(service),
            Ok(ServiceMsg::Close) => self.close_service(),
            Err(e) => {
                error!(error = %e, "Service update failed");
                self.show_error(&e.to_string());
            }
        }
    }

    fn spawn_command(&mut self, command: Box<dyn Command>) {
        let name = command.name();
        debug!(command = %name, "Spawning command");
        self.running_commands += 1;

        let env = self.env.clone();
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let error = command.execute(env).await.err().map(|e| e.to_string());
            if tx.send(AppMessage::CommandCompleted { name, error }).is_err() {
                debug!("App closed before command completed");
            }
        });
    }

    fn show_error(&mut self, message: &str) {
        self.overlay = Some(Overlay::Error(ErrorDialog::new(
            message,
            self.resolver.clone(),
        )));
    }

    fn show_help(&mut self) {
        let (title, local) = match self.services.last() {
            Some(service) => (
                service.breadcrumbs().first().cloned().unwrap_or_default(),
                service.keybindings(),
            ),
            None => ("Resources".to_string(), self.selector.keybindings()),
        };
        let sections = vec![
            KeybindingSection::new(title, local),
            KeybindingSection::new("Global", self.status_bar.global_keybindings()),
        ];
        self.overlay = Some(Overlay::Help(HelpOverlay::new(
            sections,
            self.resolver.clone(),
        )));
    }

    fn breadcrumbs(&self) -> Vec<String> {
        let mut trail = vec!["lazyadmin".to_string()];
        if let Some(service) = self.services.last() {
            trail.extend(service.breadcrumbs());
        }
        trail
    }

    fn render(&mut self, frame: &mut Frame) {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .areas(frame.area());

        self.render_header(frame, header);

        let keybindings = match self.services.last_mut() {
            Some(service) => {
                service.render(frame, body, &self.theme);
                service.keybindings()
            }
            None => {
                self.selector.render(frame, body, &self.theme);
                self.selector.keybindings()
            }
        };

        self.status_bar
            .set_resource(self.services.last().and_then(|s| s.breadcrumbs().first().cloned()));
        self.status_bar
            .render_with_keybindings(frame, footer, &self.theme, &keybindings);

        self.toasts.render(frame, body, &self.theme);

        match self.overlay.as_mut() {
            Some(Overlay::Help(help)) => help.render(frame, frame.area(), &self.theme),
            Some(Overlay::Error(dialog)) => dialog.render(frame, frame.area(), &self.theme),
            None => {}
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let separator = Span::styled(" › ", Style::default().fg(self.theme.overlay1()));
        let crumbs = self.breadcrumbs();
        let last = crumbs.len().saturating_sub(1);

        let mut spans = Vec::new();
        for (i, crumb) in crumbs.into_iter().enumerate() {
            if i > 0 {
                spans.push(separator.clone());
            }
            let style = if i == last {
                Style::default()
                    .fg(self.theme.lavender())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.subtext0())
            };
            spans.push(Span::styled(crumb, style));
        }
        if self.running_commands > 0 {
            spans.push(Span::styled(
                format!("  ({} running)", self.running_commands),
                Style::default().fg(self.theme.peach()),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
