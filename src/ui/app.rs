use eframe::egui;
use egui::{Color32, RichText};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use super::views;
use super::week_editor::{ScheduleUpdate, WeekEditor};
use crate::api::{
    is_connectivity_error, Appointment, Comment, Profile, Program, ProgramTimeUpdate,
    SchedulerClient, SignupRequest, TimeBlock, TimeBlockValue, UserType, WeekTimes,
};
use crate::config::Config;

pub struct SchedulerApp {
    config: Config,
    state: AppState,
    client: Option<Arc<SchedulerClient>>,

    // First-run server setup
    setup_server: String,

    // Login form
    login_email: String,
    login_password: String,
    login_error: Option<String>,

    // Signup form
    signup_name: String,
    signup_email: String,
    signup_password: String,
    signup_verify: String,
    signup_user_type: UserType,
    signup_error: Option<String>,

    // Session
    profile: Option<Profile>,
    tab: MainTab,

    // Appointments and their comment thread
    appointments: Vec<Appointment>,
    appointments_loading: bool,
    selected_appointment: Option<i64>,
    comments: Vec<Comment>,
    comments_loading: bool,
    comments_error: Option<String>,
    comment_input: String,

    // Availability editing
    programs: Vec<Program>,
    selected_program: Option<i64>,
    week_editor: WeekEditor,
    program_times: WeekTimes,
    times_load_pending: bool,
    duration_input: String,

    // Status
    status_message: Option<(String, bool)>, // (message, is_error)
    loading: bool,
    is_offline: bool,

    // Async communication
    runtime: tokio::runtime::Runtime,
    result_rx: Receiver<AsyncResult>,
    result_tx: Sender<AsyncResult>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AppState {
    Setup,
    Login,
    Signup,
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum MainTab {
    Home,
    Appointments,
    Availability,
}

enum AsyncResult {
    SignedUp,
    SignupFailed(String),
    LoggedIn(Profile),
    LoginFailed(String),
    LoggedOut,
    AppointmentsLoaded(Vec<Appointment>),
    CommentsLoaded(Vec<Comment>),
    CommentsFailed(String),
    CommentPosted,
    CommentDeleted(i64),
    ProgramsLoaded(Vec<Program>),
    TimesLoaded(i64, WeekTimes),
    TimeSaved,
    Error(String),
    Offline,
}

/// Route an async failure to the offline banner or the status line
fn send_failure(tx: &Sender<AsyncResult>, err: anyhow::Error, prefix: &str) {
    if is_connectivity_error(&err) {
        let _ = tx.send(AsyncResult::Offline);
    } else {
        let _ = tx.send(AsyncResult::Error(format!("{}: {}", prefix, err)));
    }
}

impl SchedulerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = Config::load().unwrap_or_default();
        super::setup_fonts(&cc.egui_ctx);
        super::setup_theme(&cc.egui_ctx);

        let state = if config.is_configured() {
            AppState::Login
        } else {
            AppState::Setup
        };
        let client = if config.is_configured() {
            SchedulerClient::new(&config).ok().map(Arc::new)
        } else {
            None
        };

        let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
        let (result_tx, result_rx) = channel();

        Self {
            setup_server: config.server_url.clone(),
            login_email: config.email.clone(),
            login_password: String::new(),
            login_error: None,
            signup_name: String::new(),
            signup_email: String::new(),
            signup_password: String::new(),
            signup_verify: String::new(),
            signup_user_type: UserType::Student,
            signup_error: None,
            profile: None,
            tab: MainTab::Home,
            appointments: Vec::new(),
            appointments_loading: false,
            selected_appointment: None,
            comments: Vec::new(),
            comments_loading: false,
            comments_error: None,
            comment_input: String::new(),
            programs: Vec::new(),
            selected_program: None,
            week_editor: WeekEditor::new(),
            program_times: WeekTimes::new(),
            times_load_pending: false,
            duration_input: String::new(),
            status_message: None,
            loading: false,
            is_offline: false,
            config,
            state,
            client,
            runtime,
            result_rx,
            result_tx,
        }
    }

    fn role(&self) -> Option<UserType> {
        self.profile.as_ref().map(|p| p.account_type)
    }

    fn check_async_results(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                AsyncResult::SignedUp => {
                    self.loading = false;
                    self.login_email = self.signup_email.clone();
                    self.signup_name.clear();
                    self.signup_email.clear();
                    self.signup_password.clear();
                    self.signup_verify.clear();
                    self.signup_error = None;
                    self.state = AppState::Login;
                    self.status_message = Some((
                        "Account created successfully. Login to your account now!".to_string(),
                        false,
                    ));
                }
                AsyncResult::SignupFailed(msg) => {
                    self.loading = false;
                    self.signup_error = Some(msg);
                }
                AsyncResult::LoggedIn(profile) => {
                    self.loading = false;
                    self.is_offline = false;
                    self.login_password.clear();
                    self.login_error = None;
                    self.config.email = profile.email.clone();
                    let _ = self.config.save();
                    let is_instructor = profile.account_type == UserType::Instructor;
                    self.profile = Some(profile);
                    self.state = AppState::Main;
                    self.tab = MainTab::Home;
                    self.refresh_appointments();
                    if is_instructor {
                        self.load_programs();
                    }
                }
                AsyncResult::LoginFailed(msg) => {
                    self.loading = false;
                    self.login_error = Some(msg);
                }
                AsyncResult::LoggedOut => {
                    self.loading = false;
                    self.profile = None;
                    self.state = AppState::Login;
                    self.tab = MainTab::Home;
                    self.appointments.clear();
                    self.selected_appointment = None;
                    self.comments.clear();
                    self.comment_input.clear();
                    self.programs.clear();
                    self.selected_program = None;
                    self.week_editor = WeekEditor::new();
                    self.program_times.clear();
                    self.times_load_pending = false;
                    self.duration_input.clear();
                    self.status_message = None;
                }
                AsyncResult::AppointmentsLoaded(appointments) => {
                    self.appointments_loading = false;
                    self.is_offline = false;
                    self.appointments = appointments;
                }
                AsyncResult::CommentsLoaded(comments) => {
                    self.comments_loading = false;
                    self.comments_error = None;
                    self.comments = comments;
                }
                AsyncResult::CommentsFailed(msg) => {
                    self.comments_loading = false;
                    self.comments_error = Some(msg);
                }
                AsyncResult::CommentPosted => {
                    self.loading = false;
                    self.comment_input.clear();
                    self.status_message = Some(("Comment posted!".to_string(), false));
                    // Fetch the thread again so the new comment shows up
                    if let Some(id) = self.selected_appointment {
                        self.refresh_comments(id);
                    }
                }
                AsyncResult::CommentDeleted(comment_id) => {
                    self.loading = false;
                    self.comments.retain(|c| c.id != comment_id);
                }
                AsyncResult::ProgramsLoaded(programs) => {
                    self.loading = false;
                    self.programs = programs;
                }
                AsyncResult::TimesLoaded(program_id, times) => {
                    self.loading = false;
                    // Ignore a late response for a program no longer selected
                    if self.selected_program == Some(program_id) {
                        self.program_times = times;
                        self.times_load_pending = true;
                    }
                }
                AsyncResult::TimeSaved => {
                    self.loading = false;
                }
                AsyncResult::Error(msg) => {
                    self.loading = false;
                    self.appointments_loading = false;
                    self.comments_loading = false;
                    self.is_offline = false;
                    self.status_message = Some((msg, true));
                }
                AsyncResult::Offline => {
                    self.loading = false;
                    self.appointments_loading = false;
                    self.comments_loading = false;
                    self.is_offline = true;
                    self.status_message = None;
                }
            }
        }
    }

    fn save_server(&mut self) {
        if self.setup_server.trim().is_empty() {
            self.status_message = Some(("Enter the scheduler address first.".to_string(), true));
            return;
        }

        self.config.server_url = self.setup_server.trim().to_string();
        match self.config.save() {
            Ok(_) => {
                self.client = SchedulerClient::new(&self.config).ok().map(Arc::new);
                self.status_message = None;
                self.state = AppState::Login;
            }
            Err(e) => {
                self.status_message = Some((format!("Failed to save: {}", e), true));
            }
        }
    }

    fn submit_login(&mut self) {
        if self.login_email.trim().is_empty() || self.login_password.is_empty() {
            self.login_error = Some("Email and password are required.".to_string());
            return;
        }
        let Some(client) = self.client.clone() else {
            return;
        };

        self.loading = true;
        self.login_error = None;

        let email = self.login_email.trim().to_string();
        let password = self.login_password.clone();
        let tx = self.result_tx.clone();

        self.runtime.spawn(async move {
            match client.login(&email, &password).await {
                Ok(profile) => {
                    let _ = tx.send(AsyncResult::LoggedIn(profile));
                }
                Err(e) => {
                    if is_connectivity_error(&e) {
                        let _ = tx.send(AsyncResult::Offline);
                    } else {
                        let _ = tx.send(AsyncResult::LoginFailed(e.to_string()));
                    }
                }
            }
        });
    }

    fn submit_signup(&mut self) {
        let fields = [
            &self.signup_name,
            &self.signup_email,
            &self.signup_password,
            &self.signup_verify,
        ];
        if fields.iter().any(|f| f.trim().is_empty()) {
            self.signup_error = Some("All fields are required.".to_string());
            return;
        }
        if self.signup_password != self.signup_verify {
            self.signup_error = Some("Passwords do not match.".to_string());
            return;
        }
        let Some(client) = self.client.clone() else {
            return;
        };

        self.loading = true;
        self.signup_error = None;

        let request = SignupRequest {
            name: self.signup_name.trim().to_string(),
            email: self.signup_email.trim().to_string(),
            password: self.signup_password.clone(),
            verify_password: self.signup_verify.clone(),
            user_type: self.signup_user_type,
        };
        let tx = self.result_tx.clone();

        self.runtime.spawn(async move {
            match client.sign_up(&request).await {
                Ok(()) => {
                    let _ = tx.send(AsyncResult::SignedUp);
                }
                Err(e) => {
                    if is_connectivity_error(&e) {
                        let _ = tx.send(AsyncResult::Offline);
                    } else {
                        let _ = tx.send(AsyncResult::SignupFailed(e.to_string()));
                    }
                }
            }
        });
    }

    fn do_logout(&mut self) {
        let Some(client) = self.client.clone() else {
            return;
        };
        self.loading = true;
        let tx = self.result_tx.clone();
        self.runtime.spawn(async move {
            // Session is dropped locally regardless of the backend's answer
            let _ = client.logout().await;
            let _ = tx.send(AsyncResult::LoggedOut);
        });
    }

    fn refresh_appointments(&mut self) {
        let Some(role) = self.role() else { return };
        let Some(client) = self.client.clone() else {
            return;
        };

        self.appointments_loading = true;
        let tx = self.result_tx.clone();
        self.runtime.spawn(async move {
            match client.get_appointments(role).await {
                Ok(appointments) => {
                    let _ = tx.send(AsyncResult::AppointmentsLoaded(appointments));
                }
                Err(e) => send_failure(&tx, e, "Failed to load appointments"),
            }
        });
    }

    fn select_appointment(&mut self, appointment_id: i64) {
        self.selected_appointment = Some(appointment_id);
        self.comments.clear();
        self.comment_input.clear();
        self.refresh_comments(appointment_id);
    }

    fn refresh_comments(&mut self, appointment_id: i64) {
        let Some(role) = self.role() else { return };
        let Some(client) = self.client.clone() else {
            return;
        };

        self.comments_loading = true;
        self.comments_error = None;
        let tx = self.result_tx.clone();
        self.runtime.spawn(async move {
            match client.get_comments(role, appointment_id).await {
                Ok(comments) => {
                    let _ = tx.send(AsyncResult::CommentsLoaded(comments));
                }
                Err(e) => {
                    if is_connectivity_error(&e) {
                        let _ = tx.send(AsyncResult::Offline);
                    } else {
                        let _ = tx.send(AsyncResult::CommentsFailed(format!(
                            "Error fetching comments: {}",
                            e
                        )));
                    }
                }
            }
        });
    }

    fn post_comment(&mut self, appointment_id: i64) {
        let Some(role) = self.role() else { return };
        let Some(client) = self.client.clone() else {
            return;
        };

        self.loading = true;
        let comment = self.comment_input.trim().to_string();
        let tx = self.result_tx.clone();
        self.runtime.spawn(async move {
            match client.post_comment(role, appointment_id, &comment).await {
                Ok(()) => {
                    let _ = tx.send(AsyncResult::CommentPosted);
                }
                Err(e) => send_failure(&tx, e, "Error posting comment"),
            }
        });
    }

    fn delete_comment(&mut self, appointment_id: i64, comment_id: i64) {
        let Some(role) = self.role() else { return };
        let Some(client) = self.client.clone() else {
            return;
        };

        self.loading = true;
        let tx = self.result_tx.clone();
        self.runtime.spawn(async move {
            match client.delete_comment(role, appointment_id, comment_id).await {
                Ok(()) => {
                    let _ = tx.send(AsyncResult::CommentDeleted(comment_id));
                }
                Err(e) => send_failure(&tx, e, "Failed to delete comment"),
            }
        });
    }

    fn load_programs(&mut self) {
        let Some(client) = self.client.clone() else {
            return;
        };

        self.loading = true;
        let tx = self.result_tx.clone();
        self.runtime.spawn(async move {
            match client.get_programs().await {
                Ok(programs) => {
                    let _ = tx.send(AsyncResult::ProgramsLoaded(programs));
                }
                Err(e) => send_failure(&tx, e, "Failed to load programs"),
            }
        });
    }

    fn select_program(&mut self, program_id: i64) {
        self.selected_program = Some(program_id);
        self.week_editor = WeekEditor::new();
        self.program_times.clear();
        self.times_load_pending = false;
        self.duration_input.clear();
        self.load_program_times(program_id);
    }

    fn load_program_times(&mut self, program_id: i64) {
        let Some(client) = self.client.clone() else {
            return;
        };

        self.loading = true;
        let tx = self.result_tx.clone();
        self.runtime.spawn(async move {
            match client.get_program_times(program_id).await {
                Ok(times) => {
                    let _ = tx.send(AsyncResult::TimesLoaded(program_id, times));
                }
                Err(e) => send_failure(&tx, e, "Failed to load program times"),
            }
        });
    }

    /// Persist one weekday's change, fire-and-forget
    fn push_time_update(&mut self, update: ScheduleUpdate) {
        let Some(program_id) = self.selected_program else {
            return;
        };
        let Some(client) = self.client.clone() else {
            return;
        };

        let payload = ProgramTimeUpdate {
            program_id,
            name: update.day,
            value: match update.range {
                Some(range) => TimeBlockValue::Set(TimeBlock::from(range)),
                None => TimeBlockValue::cleared(),
            },
        };
        let tx = self.result_tx.clone();
        self.runtime.spawn(async move {
            match client.post_program_time(&payload).await {
                Ok(()) => {
                    let _ = tx.send(AsyncResult::TimeSaved);
                }
                Err(e) => send_failure(&tx, e, "Failed to save time block"),
            }
        });
    }

    fn render_setup(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.heading("Meetbox setup");
            ui.add_space(20.0);
            ui.label("Enter the address of your Canvas Meeting Scheduler backend.");
            ui.add_space(20.0);
        });

        egui::Grid::new("setup_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Server:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.setup_server)
                        .hint_text("scheduler.example.edu")
                        .desired_width(350.0),
                );
                ui.end_row();
            });

        ui.add_space(20.0);

        if ui.button("Save and continue").clicked() {
            self.save_server();
        }
    }

    fn render_login(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.heading("Sign in");
            ui.add_space(20.0);
        });

        egui::Grid::new("login_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Email:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.login_email)
                        .hint_text("you@school.edu")
                        .desired_width(300.0),
                );
                ui.end_row();

                ui.label("Password:");
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.login_password)
                        .password(true)
                        .desired_width(300.0),
                );
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    self.submit_login();
                }
                ui.end_row();
            });

        if let Some(error) = &self.login_error {
            ui.add_space(8.0);
            ui.label(RichText::new(error).color(super::theme::error_color()));
        }

        ui.add_space(16.0);
        ui.horizontal(|ui| {
            let sign_in = egui::Button::new(RichText::new("Sign in").color(Color32::WHITE))
                .fill(super::theme::accent_color());
            if ui.add(sign_in).clicked() {
                self.submit_login();
            }

            ui.add_space(12.0);
            if ui.link("Need an account? Register").clicked() {
                self.signup_error = None;
                self.state = AppState::Signup;
            }
        });

        ui.add_space(24.0);
        if ui
            .link(RichText::new("Change server").size(13.0))
            .clicked()
        {
            self.state = AppState::Setup;
        }
    }

    fn render_signup(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(30.0);
            ui.heading("Register");
            ui.add_space(20.0);
        });

        egui::Grid::new("signup_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Name:");
                ui.add(egui::TextEdit::singleline(&mut self.signup_name).desired_width(300.0));
                ui.end_row();

                ui.label("Email:");
                ui.add(egui::TextEdit::singleline(&mut self.signup_email).desired_width(300.0));
                ui.end_row();

                ui.label("Enter Password:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.signup_password)
                        .password(true)
                        .desired_width(300.0),
                );
                ui.end_row();

                ui.label("Verify Password:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.signup_verify)
                        .password(true)
                        .desired_width(300.0),
                );
                ui.end_row();

                ui.label("User Type:");
                ui.horizontal(|ui| {
                    ui.radio_value(&mut self.signup_user_type, UserType::Student, "Student");
                    ui.radio_value(
                        &mut self.signup_user_type,
                        UserType::Instructor,
                        "Instructor",
                    );
                });
                ui.end_row();
            });

        if let Some(error) = &self.signup_error {
            ui.add_space(8.0);
            ui.label(
                RichText::new(format!("{} {}", egui_phosphor::regular::X_CIRCLE, error))
                    .color(super::theme::error_color()),
            );
        }

        ui.add_space(16.0);
        ui.horizontal(|ui| {
            let register = egui::Button::new(RichText::new("Register").color(Color32::WHITE))
                .fill(super::theme::accent_color());
            if ui.add(register).clicked() {
                self.submit_signup();
            }

            ui.add_space(12.0);
            if ui.link("Back to sign in").clicked() {
                self.state = AppState::Login;
            }
        });
    }

    fn render_main(&mut self, ui: &mut egui::Ui) {
        let mut switch_tab: Option<MainTab> = None;
        let mut logout_clicked = false;

        ui.horizontal(|ui| {
            ui.label(
                RichText::new("Canvas Meeting Scheduler")
                    .size(16.0)
                    .color(super::theme::accent_color())
                    .strong(),
            );
            ui.add_space(16.0);

            let is_instructor = self.role() == Some(UserType::Instructor);
            let tabs = [
                (MainTab::Home, "Home"),
                (MainTab::Appointments, "Appointments"),
                (MainTab::Availability, "Availability"),
            ];
            for (tab, label) in tabs {
                if tab == MainTab::Availability && !is_instructor {
                    continue;
                }
                if ui.selectable_label(self.tab == tab, label).clicked() && self.tab != tab {
                    switch_tab = Some(tab);
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let dim = Color32::from_rgb(150, 150, 160);

                let logout = ui.add(
                    egui::Label::new(
                        RichText::new(egui_phosphor::regular::SIGN_OUT)
                            .size(18.0)
                            .color(dim),
                    )
                    .sense(egui::Sense::click()),
                );
                if logout.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                if logout.on_hover_text("Sign out").clicked() {
                    logout_clicked = true;
                }

                ui.add_space(8.0);
                if let Some(profile) = &self.profile {
                    ui.label(RichText::new(&profile.name).size(14.0).color(dim));
                }
                if self.loading || self.appointments_loading || self.comments_loading {
                    ui.add_space(8.0);
                    ui.spinner();
                }
            });
        });

        if logout_clicked {
            self.do_logout();
        }
        if let Some(tab) = switch_tab {
            self.tab = tab;
            match tab {
                MainTab::Appointments => self.refresh_appointments(),
                MainTab::Availability => {
                    if self.programs.is_empty() {
                        self.load_programs();
                    }
                }
                MainTab::Home => {}
            }
        }

        ui.add_space(8.0);

        // Show offline message if we're offline
        if self.is_offline {
            self.render_offline(ui);
            return;
        }

        match self.tab {
            MainTab::Home => views::render_home(ui, self.profile.as_ref()),
            MainTab::Appointments => self.render_appointments(ui),
            MainTab::Availability => self.render_availability(ui),
        }
    }

    fn render_offline(&mut self, ui: &mut egui::Ui) {
        ui.add_space(40.0);
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(egui_phosphor::regular::WIFI_SLASH.to_string())
                    .size(34.0)
                    .color(super::theme::error_color()),
            );
            ui.add_space(16.0);
            ui.label(
                RichText::new("No connection")
                    .size(20.0)
                    .color(Color32::from_rgb(200, 200, 210)),
            );
            ui.add_space(8.0);
            ui.label(
                RichText::new("Check your internet and try again")
                    .size(14.0)
                    .color(Color32::from_rgb(120, 120, 140)),
            );
            ui.add_space(24.0);
            let retry = egui::Button::new(
                RichText::new(format!("{} Retry", egui_phosphor::regular::ARROWS_CLOCKWISE))
                    .size(17.0)
                    .color(Color32::WHITE),
            )
            .fill(super::theme::accent_color())
            .rounding(6.0);
            if ui.add(retry).clicked() {
                self.is_offline = false;
                match self.tab {
                    MainTab::Appointments => self.refresh_appointments(),
                    MainTab::Availability => {
                        if let Some(program_id) = self.selected_program {
                            self.load_program_times(program_id);
                        } else {
                            self.load_programs();
                        }
                    }
                    MainTab::Home => {}
                }
            }
        });
    }

    fn render_appointments(&mut self, ui: &mut egui::Ui) {
        if self.appointments_loading && self.appointments.is_empty() {
            ui.label("Loading appointments...");
            return;
        }

        let clicked = views::render_appointment_list(
            ui,
            &self.appointments,
            self.selected_appointment,
        );
        if let Some(appointment_id) = clicked {
            self.select_appointment(appointment_id);
        }

        if let Some(appointment_id) = self.selected_appointment {
            let own_user_id = self.profile.as_ref().map(|p| p.id).unwrap_or_default();
            let result = views::render_comment_panel(
                ui,
                &mut self.comment_input,
                &self.comments,
                self.comments_loading,
                self.comments_error.as_deref(),
                own_user_id,
            );
            if result.post_clicked {
                self.post_comment(appointment_id);
            }
            if let Some(comment_id) = result.delete_comment {
                self.delete_comment(appointment_id, comment_id);
            }
        }
    }

    fn render_availability(&mut self, ui: &mut egui::Ui) {
        let mut switch_program: Option<i64> = None;

        ui.horizontal(|ui| {
            ui.label("Program:");
            let selected_name = self
                .programs
                .iter()
                .find(|p| Some(p.id) == self.selected_program)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| "Select a program".to_string());
            egui::ComboBox::from_id_salt("program_picker")
                .selected_text(selected_name)
                .show_ui(ui, |ui| {
                    for program in &self.programs {
                        let checked = Some(program.id) == self.selected_program;
                        if ui.selectable_label(checked, &program.name).clicked() && !checked {
                            switch_program = Some(program.id);
                        }
                    }
                });
            if let Some(program) = self
                .programs
                .iter()
                .find(|p| Some(p.id) == self.selected_program)
            {
                if let Some(description) = &program.description {
                    views::info_tooltip(ui, description);
                }
            }
        });

        if let Some(program_id) = switch_program {
            self.select_program(program_id);
        }

        if self.selected_program.is_none() {
            ui.add_space(8.0);
            ui.label("Choose a program to set its weekly time blocks.");
            return;
        }

        // One-shot hydration once the persisted times arrive
        if self
            .week_editor
            .hydrate(&self.program_times, self.times_load_pending)
        {
            self.times_load_pending = false;
        }

        ui.add_space(12.0);
        let output = self.week_editor.show(ui);
        for update in output.updates {
            self.push_time_update(update);
        }

        // Duration control appears once any day has a block
        if self.week_editor.has_any_time_block() {
            ui.add_space(16.0);
            ui.horizontal(|ui| {
                ui.label("Meeting duration (minutes):");
                ui.add(
                    egui::TextEdit::singleline(&mut self.duration_input)
                        .hint_text("30")
                        .desired_width(60.0),
                );
                views::info_tooltip(
                    ui,
                    "Applied when appointment slots are generated from these time blocks.",
                );
            });
        }
    }
}

impl eframe::App for SchedulerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle pinch-to-zoom (trackpad pinch or Ctrl+scroll)
        let zoom_delta = ctx.input(|i| i.zoom_delta());
        if zoom_delta != 1.0 {
            self.config.font_scale = (self.config.font_scale * zoom_delta).clamp(0.75, 2.5);
            if (zoom_delta - 1.0).abs() > 0.01 {
                let _ = self.config.save();
            }
        }

        // Apply font scale
        ctx.set_pixels_per_point(self.config.font_scale);

        // Check for async results
        self.check_async_results();

        // Keep polling while requests are in flight
        if self.loading || self.appointments_loading || self.comments_loading {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().inner_margin(egui::Margin::symmetric(12.0, 8.0)))
            .show(ctx, |ui| {
                // Status message - selectable with close button
                let mut dismiss_message = false;
                if let Some((msg, is_error)) = &self.status_message {
                    let color = if *is_error {
                        super::theme::error_color()
                    } else {
                        super::theme::ok_color()
                    };
                    let dim_color = Color32::from_rgb(120, 120, 130);
                    ui.horizontal(|ui| {
                        ui.add(egui::Label::new(RichText::new(msg).color(color)));

                        ui.add_space(8.0);

                        let close_btn = ui.add(
                            egui::Label::new(
                                RichText::new(egui_phosphor::regular::X)
                                    .size(14.0)
                                    .color(dim_color),
                            )
                            .sense(egui::Sense::click()),
                        );
                        if close_btn.hovered() {
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                        }
                        if close_btn.clicked() {
                            dismiss_message = true;
                        }
                    });
                    ui.add_space(8.0);
                }
                if dismiss_message {
                    self.status_message = None;
                }

                match self.state {
                    AppState::Setup => self.render_setup(ui),
                    AppState::Login => self.render_login(ui),
                    AppState::Signup => self.render_signup(ui),
                    AppState::Main => self.render_main(ui),
                }
            });
    }
}
