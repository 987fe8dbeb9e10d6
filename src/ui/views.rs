use egui::{Color32, RichText, Ui};

use super::theme;
use crate::api::{format_timestamp, Appointment, Comment, Profile, UserType};

/// Where account activation questions go
const ADMIN_EMAIL: &str = "markk@uw.edu";

/// Small info icon whose hover shows an explanatory tooltip
pub fn info_tooltip(ui: &mut Ui, tip: &str) {
    let icon = RichText::new(egui_phosphor::regular::INFO)
        .size(14.0)
        .color(Color32::from_rgb(150, 150, 160));
    ui.label(icon).on_hover_text(tip);
}

fn section_heading(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(20.0).color(theme::accent_color()).strong());
}

/// Home tab. Content depends on whether anyone is signed in and on the
/// account's status.
pub fn render_home(ui: &mut Ui, profile: Option<&Profile>) {
    egui::ScrollArea::vertical().show(ui, |ui| {
        match profile {
            None => render_home_signed_out(ui),
            Some(profile) => render_home_signed_in(ui, profile),
        }
    });
}

fn render_home_signed_out(ui: &mut Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(16.0);
        ui.label(
            RichText::new("Welcome to Canvas Meeting Scheduler!")
                .size(26.0)
                .color(theme::accent_color())
                .strong(),
        );
    });
    ui.add_space(8.0);
    ui.label(
        "This application provides students and instructors a centralized location to \
         schedule meetings on Canvas. The goal is to reduce the need of relying on 3rd \
         party schedulers and difficulty finding office hours across courses.",
    );

    ui.add_space(16.0);
    section_heading(ui, "How It Works");
    ui.label(
        "As an instructor, you'll have the flexibility to set your availability and define \
         meeting types and information about them for all courses. As a student you can \
         view information about courses, when drop-in meetings are happening, and book \
         appointments based on instructor availabilities.",
    );

    ui.add_space(16.0);
    section_heading(ui, "Have One Place to Schedule Meetings");
    ui.label(
        "Instead of having to schedule meetings using different calendar applications, \
         meetings can be directly scheduled through the Canvas platform.",
    );

    ui.add_space(16.0);
    section_heading(ui, "Create Availabilities & Appointments Seamlessly");
    ui.label(
        "Availabilities are made based on when an instructor can meet with students. Once \
         an instructor makes an availability, it can apply to all courses taught or a \
         single course. Students can then view these availabilities and book appointments \
         when the times work best for them. Both students and instructors can view and \
         edit appointment details, cancel appointments, and provide feedback afterwards.",
    );
}

fn render_home_signed_in(ui: &mut Ui, profile: &Profile) {
    ui.add_space(8.0);
    ui.label(
        RichText::new(format!("Hello, {}!", profile.name))
            .size(22.0)
            .color(theme::accent_color())
            .strong(),
    );

    match profile.status.as_str() {
        "inactive" => {
            ui.add_space(8.0);
            ui.label("Account Status: Inactive");
            admin_contact_line(ui, "Please contact the admin to activate your account:");
        }
        "pending" => {
            ui.add_space(8.0);
            ui.label("Account Status: Pending");
            admin_contact_line(
                ui,
                "Your account is currently under review. Contact the admin if needed:",
            );
        }
        _ => {
            ui.add_space(8.0);
            let blurb = match profile.account_type {
                UserType::Instructor => {
                    "Use the Availability tab to set the weekly time blocks students can \
                     book, and the Appointments tab to follow up on scheduled meetings."
                }
                UserType::Student => {
                    "Use the Appointments tab to review your booked meetings and leave \
                     comments for your instructors."
                }
            };
            ui.label(blurb);
        }
    }
}

fn admin_contact_line(ui: &mut Ui, text: &str) {
    ui.horizontal_wrapped(|ui| {
        ui.label(text);
        let link = ui.add(
            egui::Label::new(RichText::new(ADMIN_EMAIL).color(theme::accent_color()))
                .sense(egui::Sense::click()),
        );
        if link.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }
        if link.clicked() {
            let _ = open::that(format!("mailto:{}", ADMIN_EMAIL));
        }
    });
}

/// Result from appointment list interactions
pub fn render_appointment_list(
    ui: &mut Ui,
    appointments: &[Appointment],
    selected: Option<i64>,
) -> Option<i64> {
    let mut clicked = None;

    if appointments.is_empty() {
        ui.label("No appointments scheduled.");
        return None;
    }

    for appointment in appointments {
        let is_selected = selected == Some(appointment.id);
        let label = format!(
            "{}  {} - {}  {}",
            appointment.date,
            appointment.start_time,
            appointment.end_time,
            appointment.name.as_deref().unwrap_or("Meeting"),
        );
        ui.horizontal(|ui| {
            if ui.selectable_label(is_selected, label).clicked() {
                clicked = Some(appointment.id);
            }
            ui.label(
                RichText::new(&appointment.status)
                    .size(13.0)
                    .color(Color32::from_rgb(150, 150, 160)),
            );
            if let Some(course) = &appointment.course_name {
                info_tooltip(ui, course);
            }
        });
    }

    clicked
}

/// Result from comment panel interactions
#[derive(Default)]
pub struct CommentPanelResult {
    pub post_clicked: bool,
    pub delete_comment: Option<i64>,
}

pub fn render_comment_panel(
    ui: &mut Ui,
    input: &mut String,
    comments: &[Comment],
    loading: bool,
    error: Option<&str>,
    own_user_id: i64,
) -> CommentPanelResult {
    let mut result = CommentPanelResult::default();

    ui.add_space(12.0);
    ui.label(RichText::new("Comments").size(18.0).strong());

    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(input)
                .hint_text("Add a comment...")
                .desired_width(ui.available_width() - 90.0),
        );
        let submitted =
            response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        let post = egui::Button::new(RichText::new("Post").color(Color32::WHITE))
            .fill(theme::accent_color());
        if (ui.add(post).clicked() || submitted) && !input.trim().is_empty() {
            result.post_clicked = true;
        }
    });

    if loading {
        ui.label("Loading comments...");
        return result;
    }
    if let Some(error) = error {
        ui.label(RichText::new(error).color(theme::error_color()));
        return result;
    }

    let (_card_bg, text_color, secondary) = theme::card_colors();
    for comment in comments {
        egui::Frame::none()
            .fill(theme::card_colors().0)
            .rounding(egui::Rounding::same(6.0))
            .inner_margin(egui::Margin::same(10.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&comment.name).color(text_color).strong());
                    if let Some(pronouns) = &comment.pronouns {
                        ui.label(RichText::new(pronouns).size(12.0).color(secondary));
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        // Only the author can remove a comment
                        if comment.user_id == own_user_id {
                            let x = ui.add(
                                egui::Label::new(
                                    RichText::new(egui_phosphor::regular::X)
                                        .size(14.0)
                                        .color(secondary),
                                )
                                .sense(egui::Sense::click()),
                            );
                            if x.hovered() {
                                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                            }
                            if x.clicked() {
                                result.delete_comment = Some(comment.id);
                            }
                        }
                        ui.label(
                            RichText::new(format_timestamp(&comment.created_at))
                                .size(12.0)
                                .color(secondary),
                        );
                    });
                });
                ui.label(RichText::new(&comment.appointment_comment).color(text_color));
            });
        ui.add_space(4.0);
    }

    result
}
