use std::{path::PathBuf, time::Duration};

use client_core::{
    pages::{
        chat::PROCESSING_NOTICE,
        home,
        navbar::{NavbarState, BRAND},
        pricing, ChatError, ChatPage, ChatStatus, DashboardPage, LoginPage, NavAction,
        RegisterPage,
    },
    router::{guard, Route},
    ClientError, ClientResult, UserSession,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui::{self, Align, Button, Key, Layout, RichText, ScrollArea, TextEdit};
use shared::{
    domain::{ChatRole, DocumentId, Plan},
    protocol::{ChatMessage, DocumentRecord},
};
use tokio::sync::watch;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::theme;

/// Seconds between ingestion re-checks while a chat shows the processing notice.
const PROCESSING_RECHECK_SECS: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub server_url: String,
    pub session_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub data_root: PathBuf,
    pub session_path: PathBuf,
}

impl AppPaths {
    pub fn from_startup(startup: &StartupConfig) -> anyhow::Result<Self> {
        let data_root = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("unable to resolve local app data dir"))?
            .join("askpdf");
        let session_path = startup
            .session_file
            .clone()
            .unwrap_or_else(|| data_root.join("session.json"));
        Ok(Self {
            data_root,
            session_path,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBannerSeverity {
    Info,
    Error,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

pub struct AskPdfApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    session_rx: watch::Receiver<Option<UserSession>>,
    route: Route,
    login: LoginPage,
    register: RegisterPage,
    dashboard: DashboardPage,
    chat: Option<ChatPage>,
    banner: Option<StatusBanner>,
    last_processing_check: f64,
}

impl AskPdfApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        session_rx: watch::Receiver<Option<UserSession>>,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            session_rx,
            route: Route::Home,
            login: LoginPage::default(),
            register: RegisterPage::default(),
            dashboard: DashboardPage::default(),
            chat: None,
            banner: None,
            last_processing_check: 0.0,
        }
    }

    fn session(&self) -> Option<UserSession> {
        self.session_rx.borrow().clone()
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        if let Err(err) = dispatch_backend_command(&self.cmd_tx, cmd) {
            self.show_error(err);
        }
    }

    /// Like [`Self::dispatch`], but hands the failure back so the caller can
    /// unwind whatever pending state it set before queueing.
    fn try_dispatch(&mut self, cmd: BackendCommand) -> ClientResult<()> {
        dispatch_backend_command(&self.cmd_tx, cmd).map_err(|err| {
            let message = err.message().to_string();
            self.show_error(err);
            ClientError::Unavailable(message)
        })
    }

    fn load_documents(&mut self) {
        self.dashboard.begin_load();
        if let Err(err) = self.try_dispatch(BackendCommand::ListDocuments) {
            self.dashboard.apply_documents(Err(err));
        }
    }

    fn submit_login(&mut self) {
        let Ok(request) = self.login.begin() else {
            return;
        };
        if let Err(err) = self.try_dispatch(BackendCommand::Login(request)) {
            self.login.finish(&Err(err));
        }
    }

    fn submit_register(&mut self) {
        let Ok(request) = self.register.begin() else {
            return;
        };
        if let Err(err) = self.try_dispatch(BackendCommand::Register(request)) {
            self.register.finish(&Err(err));
        }
    }

    fn start_upload(&mut self) {
        let Some(path) = self.dashboard.begin_upload() else {
            return;
        };
        if let Err(err) = self.try_dispatch(BackendCommand::Upload { path }) {
            self.dashboard.finish_upload(&Err(err));
        }
    }

    fn submit_question(&mut self, document_id: DocumentId) {
        let Some(chat) = self.chat_for(document_id) else {
            return;
        };
        let input = chat.input.clone();
        let query = match chat.begin_submit(&input) {
            Ok(query) => query,
            Err(ChatError::EmptyInput) => return,
            Err(err) => {
                chat.error = Some(err.to_string());
                return;
            }
        };
        if let Err(err) = self.try_dispatch(BackendCommand::Ask { document_id, query }) {
            if let Some(chat) = self.chat_for(document_id) {
                if let Err(err) = chat.complete_submit(Err(err)) {
                    tracing::debug!(%document_id, "question not sent: {err}");
                }
            }
        }
    }

    fn show_error(&mut self, err: UiError) {
        tracing::warn!(context = ?err.context(), "{}", err.message());
        self.banner = Some(StatusBanner {
            severity: StatusBannerSeverity::Error,
            message: err.banner_text(),
        });
    }

    fn show_info(&mut self, message: impl Into<String>) {
        self.banner = Some(StatusBanner {
            severity: StatusBannerSeverity::Info,
            message: message.into(),
        });
    }

    fn navigate(&mut self, target: Route) {
        let session = self.session();
        let route = guard(target, session.as_ref());
        match route {
            Route::Dashboard => self.load_documents(),
            Route::Chat { document_id } => {
                if self.chat.as_ref().map(|chat| chat.document_id) != Some(document_id) {
                    self.chat = Some(ChatPage::new(document_id));
                }
                self.dispatch(BackendCommand::FetchDocument { document_id });
            }
            Route::Register { plan } => self.register.plan = plan,
            Route::Home | Route::Login | Route::Pricing => {}
        }
        tracing::debug!(route = %route, "navigate");
        self.route = route;
    }

    fn activate(&mut self, action: NavAction) {
        match action {
            NavAction::Home => self.navigate(Route::Home),
            NavAction::Dashboard => self.navigate(Route::Dashboard),
            NavAction::Pricing => self.navigate(Route::Pricing),
            NavAction::Login => self.navigate(Route::Login),
            NavAction::Logout => self.dispatch(BackendCommand::Logout),
        }
    }

    /// Sends the user back through the guard when the session disappears underneath a screen.
    fn enforce_guard(&mut self) {
        let session = self.session();
        if guard(self.route, session.as_ref()) != self.route {
            self.chat = None;
            self.dashboard = DashboardPage::default();
            self.navigate(self.route);
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Error(err) => self.show_error(err),
                UiEvent::LoginFinished(result) => {
                    if let Some(route) = self.login.finish(&result) {
                        self.navigate(route);
                    }
                }
                UiEvent::RegisterFinished(result) => {
                    if let Some(route) = self.register.finish(&result) {
                        self.navigate(route);
                    }
                }
                UiEvent::LoggedOut(result) => {
                    self.chat = None;
                    self.dashboard = DashboardPage::default();
                    match result {
                        Ok(route) => {
                            self.show_info("Logged out.");
                            self.navigate(route);
                        }
                        Err(err) => {
                            self.show_error(UiError::from_client(UiErrorContext::Logout, &err))
                        }
                    }
                }
                UiEvent::DocumentsLoaded(result) => {
                    self.note_reauth(&result, UiErrorContext::Documents);
                    self.dashboard.apply_documents(result);
                }
                UiEvent::UploadFinished(result) => {
                    self.note_reauth(&result, UiErrorContext::Documents);
                    if self.dashboard.finish_upload(&result) {
                        self.load_documents();
                    }
                }
                UiEvent::DocumentLoaded {
                    document_id,
                    result,
                } => {
                    self.note_reauth(&result, UiErrorContext::Chat);
                    let fetch_history = match self.chat_for(document_id) {
                        Some(chat) => chat.apply_document(result),
                        None => false,
                    };
                    if fetch_history {
                        self.dispatch(BackendCommand::LoadHistory { document_id });
                    }
                }
                UiEvent::HistoryLoaded {
                    document_id,
                    result,
                } => {
                    if let Some(chat) = self.chat_for(document_id) {
                        chat.apply_history(result);
                    }
                }
                UiEvent::AnswerReceived {
                    document_id,
                    result,
                } => {
                    self.note_reauth(&result, UiErrorContext::Chat);
                    if let Some(chat) = self.chat_for(document_id) {
                        if let Err(err) = chat.complete_submit(result) {
                            tracing::debug!(%document_id, "answer not shown: {err}");
                        }
                    }
                }
            }
        }
    }

    fn chat_for(&mut self, document_id: DocumentId) -> Option<&mut ChatPage> {
        self.chat
            .as_mut()
            .filter(|chat| chat.document_id == document_id)
    }

    fn note_reauth<T>(&mut self, result: &Result<T, ClientError>, context: UiErrorContext) {
        if let Err(err) = result {
            if err.requires_reauth() {
                self.show_error(UiError::from_client(context, err));
            }
        }
    }

    fn poll_processing_document(&mut self, ctx: &egui::Context) {
        let Some(chat) = &self.chat else {
            return;
        };
        if self.route != (Route::Chat { document_id: chat.document_id })
            || chat.status != ChatStatus::Processing
        {
            return;
        }
        let now = ctx.input(|i| i.time);
        if now - self.last_processing_check >= PROCESSING_RECHECK_SECS {
            self.last_processing_check = now;
            let document_id = chat.document_id;
            self.dispatch(BackendCommand::FetchDocument { document_id });
        }
    }

    fn show_navbar(&mut self, ctx: &egui::Context) {
        let state = NavbarState::from_session(self.session().as_ref());
        let mut clicked = None;
        egui::TopBottomPanel::top("navbar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui
                    .link(RichText::new(BRAND).heading().strong().color(theme::ACCENT))
                    .clicked()
                {
                    clicked = Some(NavAction::Home);
                }
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| match &state {
                    NavbarState::LoggedIn { name, email } => {
                        ui.menu_button(name.as_str(), |ui| {
                            ui.label(RichText::new(email.as_str()).weak());
                            ui.separator();
                            for action in state.actions() {
                                if ui.button(action.label()).clicked() {
                                    clicked = Some(*action);
                                }
                            }
                        });
                    }
                    NavbarState::LoggedOut => {
                        for action in state.actions().iter().rev() {
                            if ui.button(action.label()).clicked() {
                                clicked = Some(*action);
                            }
                        }
                    }
                });
            });
            ui.add_space(4.0);
        });
        if let Some(action) = clicked {
            self.activate(action);
        }
    }

    fn show_status_banner(&mut self, ctx: &egui::Context) {
        let Some(banner) = &self.banner else {
            return;
        };
        let mut dismiss = false;
        egui::TopBottomPanel::top("status_banner").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let color = match banner.severity {
                    StatusBannerSeverity::Info => theme::SUCCESS,
                    StatusBannerSeverity::Error => theme::ERROR,
                };
                ui.colored_label(color, &banner.message);
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    dismiss = ui.small_button("Dismiss").clicked();
                });
            });
        });
        if dismiss {
            self.banner = None;
        }
    }

    fn show_home(&mut self, ctx: &egui::Context) {
        let mut target = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(48.0);
                ui.label(RichText::new(home::HEADLINE).size(32.0).strong());
                ui.add_space(8.0);
                ui.label(home::TAGLINE);
                ui.add_space(16.0);
                if ui.button(RichText::new("Get Started").strong()).clicked() {
                    target = Some(Route::Dashboard);
                }
                if ui.button("View Pricing").clicked() {
                    target = Some(Route::Pricing);
                }
                ui.add_space(32.0);
                ui.heading("How it works");
            });
            ui.add_space(12.0);
            ui.columns(home::HOW_IT_WORKS.len(), |columns| {
                for (column, step) in columns.iter_mut().zip(home::HOW_IT_WORKS.iter()) {
                    column.group(|ui| {
                        ui.strong(step.title);
                        ui.label(step.body);
                    });
                }
            });
        });
        if let Some(route) = target {
            self.navigate(route);
        }
    }

    fn show_login(&mut self, ctx: &egui::Context) {
        let mut submit = false;
        let mut go_register = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.heading("Log in to your account");
                ui.add_space(16.0);
                ui.set_max_width(theme::FORM_WIDTH);

                ui.label("Email");
                ui.add(TextEdit::singleline(&mut self.login.email).hint_text("you@example.com"));
                ui.label("Password");
                let password =
                    ui.add(TextEdit::singleline(&mut self.login.password).password(true));
                if password.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                    submit = true;
                }
                ui.add_space(8.0);
                if let Some(error) = &self.login.error {
                    ui.colored_label(theme::ERROR, error);
                }
                let button = Button::new(self.login.submit_label());
                if ui.add_enabled(!self.login.is_loading, button).clicked() {
                    submit = true;
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.label("Don't have an account?");
                    go_register = ui.link("Sign up").clicked();
                });
            });
        });
        if submit {
            self.submit_login();
        }
        if go_register {
            self.navigate(Route::Register {
                plan: Plan::default(),
            });
        }
    }

    fn show_register(&mut self, ctx: &egui::Context) {
        let mut submit = false;
        let mut go_login = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.heading("Create your account");
                ui.add_space(16.0);
                ui.set_max_width(theme::FORM_WIDTH);

                ui.label("Name");
                ui.add(TextEdit::singleline(&mut self.register.name));
                ui.label("Email");
                ui.add(
                    TextEdit::singleline(&mut self.register.email).hint_text("you@example.com"),
                );
                ui.label("Password");
                ui.add(TextEdit::singleline(&mut self.register.password).password(true));
                ui.label("Confirm password");
                let confirm = ui.add(
                    TextEdit::singleline(&mut self.register.confirm_password).password(true),
                );
                if confirm.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                    submit = true;
                }
                ui.horizontal(|ui| {
                    ui.label("Plan");
                    ui.radio_value(&mut self.register.plan, Plan::Free, "Free");
                    ui.radio_value(&mut self.register.plan, Plan::Pro, "Pro");
                });
                ui.add_space(8.0);
                if let Some(error) = &self.register.error {
                    ui.colored_label(theme::ERROR, error);
                }
                let button = Button::new(self.register.submit_label());
                if ui.add_enabled(!self.register.is_loading, button).clicked() {
                    submit = true;
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.label("Already have an account?");
                    go_login = ui.link("Log in").clicked();
                });
            });
        });
        if submit {
            self.submit_register();
        }
        if go_login {
            self.navigate(Route::Login);
        }
    }

    fn show_dashboard(&mut self, ctx: &egui::Context) {
        let mut open_chat = None;
        let mut refresh = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Your Documents");
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button("Upload PDF").clicked() {
                        self.dashboard.open_upload();
                    }
                    if ui
                        .add_enabled(!self.dashboard.is_loading, Button::new("Refresh"))
                        .clicked()
                    {
                        refresh = true;
                    }
                });
            });
            if let Some(notice) = &self.dashboard.notice {
                ui.colored_label(theme::SUCCESS, notice);
            }
            if let Some(error) = &self.dashboard.error {
                ui.colored_label(theme::ERROR, error);
            }
            ui.separator();

            if self.dashboard.documents.is_empty() {
                if self.dashboard.is_loading {
                    ui.spinner();
                } else {
                    ui.label("No documents yet. Upload a PDF to start chatting.");
                }
                return;
            }
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    egui::Grid::new("documents")
                        .num_columns(4)
                        .striped(true)
                        .spacing([16.0, 8.0])
                        .show(ui, |ui| {
                            ui.strong("Name");
                            ui.strong("Uploaded");
                            ui.strong("Status");
                            ui.label("");
                            ui.end_row();
                            for doc in &self.dashboard.documents {
                                ui.label(&doc.pdf_name);
                                ui.label(uploaded_label(doc));
                                if doc.insert_status {
                                    ui.colored_label(theme::SUCCESS, "Ready");
                                } else {
                                    ui.weak("Processing...");
                                }
                                if ui.button("Chat").clicked() {
                                    open_chat = Some(doc.id);
                                }
                                ui.end_row();
                            }
                        });
                });
        });
        self.show_upload_window(ctx);

        if refresh {
            self.load_documents();
        }
        if let Some(document_id) = open_chat {
            self.navigate(DashboardPage::chat_route(document_id));
        }
    }

    fn show_upload_window(&mut self, ctx: &egui::Context) {
        if !self.dashboard.upload_open {
            return;
        }
        let mut open = true;
        let mut pick = false;
        let mut upload = false;
        let mut cancel = false;
        egui::Window::new("Upload a new PDF")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                let busy = self.dashboard.is_uploading;
                ui.horizontal(|ui| {
                    pick = ui
                        .add_enabled(!busy, Button::new("Choose file..."))
                        .clicked();
                    match self.dashboard.selected_file_name() {
                        Some(name) => ui.label(name),
                        None => ui.weak("No file selected"),
                    };
                });
                if let Some(error) = &self.dashboard.error {
                    ui.colored_label(theme::ERROR, error);
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let can_upload = self.dashboard.selected_file.is_some() && !busy;
                    upload = ui
                        .add_enabled(can_upload, Button::new(self.dashboard.upload_label()))
                        .clicked();
                    cancel = ui.add_enabled(!busy, Button::new("Cancel")).clicked();
                    if busy {
                        ui.spinner();
                    }
                });
            });

        if pick {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("PDF", &["pdf"])
                .pick_file()
            {
                if let Err(err) = self.dashboard.select_file(path) {
                    tracing::debug!("rejected file selection: {err}");
                }
            }
        }
        if upload {
            self.start_upload();
        }
        if !open || cancel {
            self.dashboard.close_upload();
        }
    }

    fn show_chat(&mut self, ctx: &egui::Context) {
        let Some(chat) = self.chat.as_mut() else {
            self.navigate(Route::Dashboard);
            return;
        };
        let document_id = chat.document_id;
        let mut back = false;
        let mut recheck = false;
        let mut submit = false;

        egui::TopBottomPanel::top("chat_header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                back = ui.button("< Dashboard").clicked();
                ui.heading(chat.title());
            });
        });

        if chat.status == ChatStatus::Ready {
            egui::TopBottomPanel::bottom("composer").show(ctx, |ui| {
                ui.add_space(6.0);
                if let Some(error) = &chat.error {
                    ui.colored_label(theme::ERROR, error);
                }
                ui.horizontal(|ui| {
                    let input = ui.add(
                        TextEdit::singleline(&mut chat.input)
                            .hint_text("Ask a question about your PDF...")
                            .desired_width(ui.available_width() - 80.0),
                    );
                    if input.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                        submit = true;
                    }
                    if ui
                        .add_enabled(chat.can_submit(), Button::new("Send"))
                        .clicked()
                    {
                        submit = true;
                    }
                    if chat.in_flight {
                        ui.spinner();
                    }
                });
                ui.add_space(6.0);
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| match &chat.status {
            ChatStatus::Loading => {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
            }
            ChatStatus::Processing => {
                ui.vertical_centered(|ui| {
                    ui.add_space(48.0);
                    ui.spinner();
                    ui.label(PROCESSING_NOTICE);
                    recheck = ui.button("Check again").clicked();
                });
            }
            ChatStatus::Failed(reason) => {
                ui.vertical_centered(|ui| {
                    ui.add_space(48.0);
                    ui.colored_label(theme::ERROR, reason);
                    recheck = ui.button("Retry").clicked();
                });
            }
            ChatStatus::Ready => {
                ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for message in &chat.messages {
                            message_bubble(ui, message);
                        }
                        if chat.in_flight {
                            ui.horizontal(|ui| {
                                ui.spinner();
                                ui.weak("Thinking...");
                            });
                        }
                    });
            }
        });

        if submit {
            self.submit_question(document_id);
        }
        if recheck {
            self.dispatch(BackendCommand::FetchDocument { document_id });
        }
        if back {
            self.navigate(Route::Dashboard);
        }
    }

    fn show_pricing(&mut self, ctx: &egui::Context) {
        let mut target = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(32.0);
                ui.label(RichText::new(pricing::HEADLINE).size(28.0).strong());
                ui.label(pricing::SUBHEADLINE);
            });
            ui.add_space(24.0);
            ui.columns(pricing::OFFERS.len(), |columns| {
                for (column, offer) in columns.iter_mut().zip(pricing::OFFERS.iter()) {
                    column.group(|ui| {
                        ui.horizontal(|ui| {
                            ui.heading(offer.title);
                            if offer.popular {
                                ui.colored_label(theme::ACCENT, "Popular");
                            }
                        });
                        ui.label(offer.tagline);
                        ui.add_space(8.0);
                        ui.label(RichText::new(offer.price_label()).size(22.0).strong());
                        ui.add_space(8.0);
                        for feature in offer.features {
                            ui.label(format!("+ {feature}"));
                        }
                        ui.add_space(8.0);
                        if ui.button(offer.call_to_action).clicked() {
                            target = Some(offer.route());
                        }
                    });
                }
            });
        });
        if let Some(route) = target {
            self.navigate(route);
        }
    }
}

fn uploaded_label(doc: &DocumentRecord) -> String {
    doc.created_at_parsed()
        .map(|at| at.format("%b %e, %Y %H:%M").to_string())
        .unwrap_or_else(|| doc.created_at.clone())
}

fn message_bubble(ui: &mut egui::Ui, message: &ChatMessage) {
    let (layout, fill) = match message.role {
        ChatRole::User => (Layout::right_to_left(Align::TOP), theme::USER_BUBBLE),
        ChatRole::Assistant | ChatRole::System => {
            (Layout::left_to_right(Align::TOP), theme::ASSISTANT_BUBBLE)
        }
    };
    ui.with_layout(layout, |ui| {
        let max_width = ui.available_width() * 0.75;
        egui::Frame::new()
            .fill(fill)
            .corner_radius(theme::BUBBLE_RADIUS)
            .inner_margin(theme::BUBBLE_MARGIN)
            .show(ui, |ui| {
                ui.set_max_width(max_width);
                ui.label(RichText::new(&message.content).color(theme::BUBBLE_TEXT));
            });
    });
    ui.add_space(4.0);
}

impl eframe::App for AskPdfApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.enforce_guard();
        self.poll_processing_document(ctx);

        self.show_navbar(ctx);
        self.show_status_banner(ctx);
        match self.route {
            Route::Home => self.show_home(ctx),
            Route::Login => self.show_login(ctx),
            Route::Register { .. } => self.show_register(ctx),
            Route::Dashboard => self.show_dashboard(ctx),
            Route::Chat { .. } => self.show_chat(ctx),
            Route::Pricing => self.show_pricing(ctx),
        }

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use client_core::{MemoryStorage, SessionStore};
    use crossbeam_channel::bounded;

    use super::*;

    fn app() -> (AskPdfApp, Receiver<BackendCommand>, Arc<SessionStore>) {
        let store = Arc::new(SessionStore::load(Arc::new(MemoryStorage::new())));
        let (cmd_tx, cmd_rx) = bounded(16);
        let (_ui_tx, ui_rx) = bounded(16);
        (AskPdfApp::new(cmd_tx, ui_rx, store.subscribe()), cmd_rx, store)
    }

    fn user() -> UserSession {
        UserSession {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            token: "token".into(),
            plan: None,
        }
    }

    #[test]
    fn protected_screens_redirect_to_login_without_session() {
        let (mut app, cmd_rx, _store) = app();
        app.navigate(Route::Dashboard);
        assert_eq!(app.route, Route::Login);
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn opening_chat_fetches_document_metadata() {
        let (mut app, cmd_rx, store) = app();
        store.set_user(user()).expect("set user");
        let document_id: DocumentId = "5b0e3a4c-9d61-4c1f-8f4e-2f3a9c7d1e20"
            .parse()
            .expect("document id");

        app.navigate(Route::Chat { document_id });

        assert_eq!(app.route, Route::Chat { document_id });
        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::FetchDocument { document_id: id }) if id == document_id
        ));
        assert_eq!(app.chat.as_ref().map(|chat| chat.document_id), Some(document_id));
    }

    #[test]
    fn losing_the_session_leaves_protected_screens() {
        let (mut app, _cmd_rx, store) = app();
        store.set_user(user()).expect("set user");
        app.navigate(Route::Dashboard);
        assert_eq!(app.route, Route::Dashboard);

        store.remove_user().expect("remove user");
        app.enforce_guard();

        assert_eq!(app.route, Route::Login);
    }

    #[test]
    fn stopped_worker_does_not_leave_forms_pending() {
        let (mut app, cmd_rx, store) = app();
        store.set_user(user()).expect("set user");
        drop(cmd_rx);

        app.login.email = "ada@example.com".into();
        app.login.password = "hunter22".into();
        app.submit_login();
        assert!(!app.login.is_loading);
        assert!(app.login.error.is_some());

        app.navigate(Route::Dashboard);
        assert!(!app.dashboard.is_loading);

        app.dashboard.open_upload();
        app.dashboard.selected_file = Some(PathBuf::from("/tmp/report.pdf"));
        app.start_upload();
        assert!(!app.dashboard.is_uploading);
        assert!(app.banner.is_some());
    }

    #[test]
    fn unsent_question_frees_the_composer() {
        let (mut app, cmd_rx, store) = app();
        store.set_user(user()).expect("set user");
        let document_id: DocumentId = "0c9b7f6e-2a44-4d5e-9b1a-6f0e8d3c2b11"
            .parse()
            .expect("document id");
        app.navigate(Route::Chat { document_id });
        drop(cmd_rx);

        let chat = app.chat.as_mut().expect("chat page");
        chat.status = ChatStatus::Ready;
        chat.input = "what is this?".into();
        app.submit_question(document_id);

        let chat = app.chat.as_ref().expect("chat page");
        assert!(!chat.in_flight);
        assert!(chat.error.is_some());
        assert_eq!(
            chat.messages.last().map(|m| m.content.as_str()),
            Some("what is this?")
        );
    }

    #[test]
    fn startup_paths_honor_explicit_session_file() {
        let startup = StartupConfig {
            server_url: "http://localhost:8000".into(),
            session_file: Some(PathBuf::from("/tmp/askpdf-gui.json")),
        };
        let paths = AppPaths::from_startup(&startup).expect("paths");
        assert_eq!(paths.session_path, PathBuf::from("/tmp/askpdf-gui.json"));
    }
}
