use chrono::NaiveTime;
use egui::{Align2, Color32, RichText, Ui};
use thiserror::Error;

use crate::api::{self, format_hhmm, TimeRange, WeekTimes, Weekday};

/// Rejection raised when a committed range is incomplete or reversed.
/// The display text is shown verbatim in the blocking notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid time block entered.")]
pub struct InvalidRange;

/// One weekday's change, pushed to the parent as it happens.
/// `range: None` means the day was cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleUpdate {
    pub day: Weekday,
    pub range: Option<TimeRange>,
}

/// Result from week editor interactions, collected per frame
#[derive(Default)]
pub struct WeekEditorOutput {
    pub updates: Vec<ScheduleUpdate>,
}

#[derive(Debug, Clone, Default)]
struct DayEntry {
    open: bool,
    committed: Option<TimeRange>,
    // Pending display value, possibly half-filled while typing
    draft_start: Option<NaiveTime>,
    draft_end: Option<NaiveTime>,
    // Text buffer backing the inline input
    text: String,
}

impl DayEntry {
    fn has_data(&self) -> bool {
        self.committed.is_some() || self.draft_start.is_some() || self.draft_end.is_some()
    }
}

/// Weekly time-block editor: one optional range per weekday.
///
/// Clicking a weekday header toggles its inline range input. Edits are
/// held in a shared scratch draft until the input loses focus, at which
/// point the draft is validated and the change emitted to the caller.
pub struct WeekEditor {
    days: [DayEntry; 5],
    // Shared scratch range, reused across whichever day is being edited
    scratch: (Option<NaiveTime>, Option<NaiveTime>),
    // Set when a commit was rejected, cleared when the notice is dismissed
    invalid_notice: bool,
}

impl Default for WeekEditor {
    fn default() -> Self {
        Self {
            days: Default::default(),
            // Matches the hint the time field shows before any input
            scratch: (
                NaiveTime::from_hms_opt(12, 0, 0),
                NaiveTime::from_hms_opt(12, 30, 0),
            ),
            invalid_notice: false,
        }
    }
}

fn range_text(range: TimeRange) -> String {
    format!("{} - {}", format_hhmm(range.start), format_hhmm(range.end))
}

impl WeekEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a weekday's editor open or closed. Closing clears any stored
    /// range for the day and reports it upward; opening reports nothing
    /// until the user completes input.
    pub fn toggle(&mut self, day: Weekday) -> Option<ScheduleUpdate> {
        let entry = &mut self.days[day.index()];
        if entry.open {
            *entry = DayEntry::default();
            Some(ScheduleUpdate { day, range: None })
        } else {
            entry.open = true;
            None
        }
    }

    /// Record in-progress input for a day. Overwrites the shared scratch
    /// and the day's pending display value; never validates or emits.
    pub fn update_draft(
        &mut self,
        day: Weekday,
        start: Option<NaiveTime>,
        end: Option<NaiveTime>,
    ) {
        self.scratch = (start, end);
        let entry = &mut self.days[day.index()];
        entry.draft_start = start;
        entry.draft_end = end;
    }

    /// Validate the scratch draft and store it as the day's range.
    /// On rejection nothing is mutated and the blocking notice is armed;
    /// the previously displayed value stays visible for correction.
    pub fn commit(&mut self, day: Weekday) -> Result<ScheduleUpdate, InvalidRange> {
        let range = match self.scratch {
            (Some(start), Some(end)) if start < end => TimeRange::new(start, end),
            _ => {
                self.invalid_notice = true;
                return Err(InvalidRange);
            }
        };

        let entry = &mut self.days[day.index()];
        entry.committed = Some(range);
        entry.draft_start = Some(range.start);
        entry.draft_end = Some(range.end);
        entry.text = range_text(range);

        Ok(ScheduleUpdate {
            day,
            range: Some(range),
        })
    }

    /// One-shot hydration from persisted times. Effective only while
    /// `load_pending` is true; the whole internal copy is overwritten.
    /// Returns true when the load was consumed so the caller clears its
    /// flag; later calls with the flag false are no-ops.
    pub fn hydrate(&mut self, times: &WeekTimes, load_pending: bool) -> bool {
        if !load_pending {
            return false;
        }

        self.days = Default::default();
        for day in Weekday::ALL {
            if let Some(block) = times.get(&day) {
                let entry = &mut self.days[day.index()];
                entry.open = true;
                if let Some(range) = block.to_range() {
                    entry.committed = Some(range);
                    entry.draft_start = Some(range.start);
                    entry.draft_end = Some(range.end);
                    entry.text = range_text(range);
                }
            }
        }
        true
    }

    /// True when at least one weekday has a committed range or a pending
    /// value. Derived on demand, never cached.
    pub fn has_any_time_block(&self) -> bool {
        self.days.iter().any(DayEntry::has_data)
    }

    pub fn is_open(&self, day: Weekday) -> bool {
        self.days[day.index()].open
    }

    pub fn committed(&self, day: Weekday) -> Option<TimeRange> {
        self.days[day.index()].committed
    }

    #[cfg(test)]
    fn invalid_notice(&self) -> bool {
        self.invalid_notice
    }

    /// Render the editor and collect the frame's emissions.
    pub fn show(&mut self, ui: &mut Ui) -> WeekEditorOutput {
        let mut output = WeekEditorOutput::default();

        ui.label(RichText::new("Set Program Times:").size(18.0).strong());
        ui.add_space(8.0);

        ui.columns(Weekday::ALL.len(), |cols| {
            for day in Weekday::ALL {
                let ui = &mut cols[day.index()];
                let open = self.days[day.index()].open;

                let (header_bg, header_open_bg, header_text) = super::theme::weekday_header_colors();
                let fill = if open { header_open_bg } else { header_bg };
                let header = ui.add_sized(
                    [ui.available_width(), 28.0],
                    egui::Button::new(RichText::new(day.name()).color(header_text)).fill(fill),
                );
                if header.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                if header.clicked() {
                    if let Some(update) = self.toggle(day) {
                        output.updates.push(update);
                    }
                }

                // Inline range input, shown only while the day is open
                if self.days[day.index()].open {
                    let response = {
                        let entry = &mut self.days[day.index()];
                        ui.add(
                            egui::TextEdit::singleline(&mut entry.text)
                                .hint_text("12:00 - 12:30")
                                .desired_width(ui.available_width()),
                        )
                    };
                    if response.changed() {
                        let text = self.days[day.index()].text.clone();
                        let (start, end) = api::parse_range_text(&text);
                        self.update_draft(day, start, end);
                    }
                    if response.lost_focus() {
                        if let Ok(update) = self.commit(day) {
                            output.updates.push(update);
                        }
                    }
                }
            }
        });

        if self.invalid_notice {
            self.show_invalid_notice(ui);
        }

        output
    }

    /// Blocking notice shown until dismissed
    fn show_invalid_notice(&mut self, ui: &mut Ui) {
        egui::Window::new("Invalid time block")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ui.ctx(), |ui| {
                ui.label(InvalidRange.to_string());
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    let ok = egui::Button::new(RichText::new("OK").color(Color32::WHITE))
                        .fill(super::theme::accent_color())
                        .min_size(egui::vec2(80.0, 28.0));
                    if ui.add(ok).clicked() {
                        self.invalid_notice = false;
                    }
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TimeBlock;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn range(sh: u32, sm: u32, eh: u32, em: u32) -> TimeRange {
        TimeRange::new(t(sh, sm), t(eh, em))
    }

    #[test]
    fn toggle_twice_restores_closed_and_empty() {
        for day in Weekday::ALL {
            let mut editor = WeekEditor::new();
            assert!(!editor.is_open(day));

            // First click opens without emitting
            assert_eq!(editor.toggle(day), None);
            assert!(editor.is_open(day));

            // Second click closes, clears, and emits the cleared update
            let update = editor.toggle(day).unwrap();
            assert_eq!(update, ScheduleUpdate { day, range: None });
            assert!(!editor.is_open(day));
            assert_eq!(editor.committed(day), None);
            assert!(!editor.has_any_time_block());
        }
    }

    #[test]
    fn closing_a_day_with_a_range_clears_and_emits() {
        let mut editor = WeekEditor::new();
        editor.toggle(Weekday::Monday);
        editor.update_draft(Weekday::Monday, Some(t(9, 0)), Some(t(10, 0)));
        editor.commit(Weekday::Monday).unwrap();
        assert_eq!(editor.committed(Weekday::Monday), Some(range(9, 0, 10, 0)));

        let update = editor.toggle(Weekday::Monday).unwrap();
        assert_eq!(update.range, None);
        assert_eq!(editor.committed(Weekday::Monday), None);
    }

    #[test]
    fn valid_commit_stores_and_emits_once() {
        let mut editor = WeekEditor::new();
        editor.toggle(Weekday::Tuesday);
        editor.update_draft(Weekday::Tuesday, Some(t(8, 30)), Some(t(11, 15)));

        let update = editor.commit(Weekday::Tuesday).unwrap();
        assert_eq!(
            update,
            ScheduleUpdate {
                day: Weekday::Tuesday,
                range: Some(range(8, 30, 11, 15)),
            }
        );
        assert_eq!(editor.committed(Weekday::Tuesday), Some(range(8, 30, 11, 15)));
    }

    #[test]
    fn reversed_or_equal_ranges_are_rejected() {
        let mut editor = WeekEditor::new();
        editor.toggle(Weekday::Monday);

        editor.update_draft(Weekday::Monday, Some(t(14, 0)), Some(t(13, 0)));
        assert_eq!(editor.commit(Weekday::Monday), Err(InvalidRange));
        assert_eq!(editor.committed(Weekday::Monday), None);
        assert!(editor.invalid_notice());

        editor.update_draft(Weekday::Monday, Some(t(14, 0)), Some(t(14, 0)));
        assert_eq!(editor.commit(Weekday::Monday), Err(InvalidRange));
        assert_eq!(editor.committed(Weekday::Monday), None);
    }

    #[test]
    fn missing_endpoint_is_rejected() {
        let mut editor = WeekEditor::new();
        editor.toggle(Weekday::Friday);
        editor.update_draft(Weekday::Friday, Some(t(9, 0)), None);
        assert_eq!(editor.commit(Weekday::Friday), Err(InvalidRange));
        assert_eq!(editor.committed(Weekday::Friday), None);
    }

    #[test]
    fn rejected_commit_keeps_previous_range() {
        let mut editor = WeekEditor::new();
        editor.toggle(Weekday::Thursday);
        editor.update_draft(Weekday::Thursday, Some(t(9, 0)), Some(t(10, 0)));
        editor.commit(Weekday::Thursday).unwrap();

        editor.update_draft(Weekday::Thursday, Some(t(16, 0)), Some(t(15, 0)));
        assert_eq!(editor.commit(Weekday::Thursday), Err(InvalidRange));
        assert_eq!(editor.committed(Weekday::Thursday), Some(range(9, 0, 10, 0)));
    }

    #[test]
    fn hydrate_opens_only_days_with_data() {
        let mut times = WeekTimes::new();
        times.insert(
            Weekday::Monday,
            TimeBlock {
                start_time: "09:00".into(),
                end_time: "10:00".into(),
            },
        );

        let mut editor = WeekEditor::new();
        let consumed = editor.hydrate(&times, true);
        assert!(consumed);

        assert!(editor.is_open(Weekday::Monday));
        assert_eq!(editor.committed(Weekday::Monday), Some(range(9, 0, 10, 0)));
        for day in [
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
        ] {
            assert!(!editor.is_open(day));
            assert_eq!(editor.committed(day), None);
        }
        assert!(editor.has_any_time_block());
    }

    #[test]
    fn hydrate_without_pending_load_is_a_noop() {
        let mut times = WeekTimes::new();
        times.insert(
            Weekday::Wednesday,
            TimeBlock {
                start_time: "09:00".into(),
                end_time: "10:00".into(),
            },
        );

        let mut editor = WeekEditor::new();
        assert!(!editor.hydrate(&times, false));
        assert!(!editor.is_open(Weekday::Wednesday));
        assert!(!editor.has_any_time_block());
    }

    #[test]
    fn hydrate_overwrites_earlier_state() {
        let mut editor = WeekEditor::new();
        editor.toggle(Weekday::Friday);
        editor.update_draft(Weekday::Friday, Some(t(13, 0)), Some(t(14, 0)));
        editor.commit(Weekday::Friday).unwrap();

        let mut times = WeekTimes::new();
        times.insert(
            Weekday::Monday,
            TimeBlock {
                start_time: "08:00".into(),
                end_time: "09:30".into(),
            },
        );
        assert!(editor.hydrate(&times, true));

        assert_eq!(editor.committed(Weekday::Monday), Some(range(8, 0, 9, 30)));
        assert!(!editor.is_open(Weekday::Friday));
        assert_eq!(editor.committed(Weekday::Friday), None);
    }

    #[test]
    fn unparseable_stored_block_opens_day_without_range() {
        let mut times = WeekTimes::new();
        times.insert(
            Weekday::Tuesday,
            TimeBlock {
                start_time: "9am".into(),
                end_time: "10:00".into(),
            },
        );

        let mut editor = WeekEditor::new();
        assert!(editor.hydrate(&times, true));
        assert!(editor.is_open(Weekday::Tuesday));
        assert_eq!(editor.committed(Weekday::Tuesday), None);
    }

    #[test]
    fn has_any_time_block_tracks_commit_and_clear() {
        let mut editor = WeekEditor::new();
        assert!(!editor.has_any_time_block());

        editor.toggle(Weekday::Wednesday);
        editor.update_draft(Weekday::Wednesday, Some(t(14, 0)), Some(t(15, 0)));
        editor.commit(Weekday::Wednesday).unwrap();
        assert!(editor.has_any_time_block());

        editor.toggle(Weekday::Wednesday);
        assert!(!editor.has_any_time_block());
    }

    #[test]
    fn partial_draft_counts_as_pending_data() {
        let mut editor = WeekEditor::new();
        editor.toggle(Weekday::Monday);
        editor.update_draft(Weekday::Monday, Some(t(9, 0)), None);
        assert!(editor.has_any_time_block());
    }

    #[test]
    fn scratch_is_shared_across_days() {
        let mut editor = WeekEditor::new();
        editor.toggle(Weekday::Monday);
        editor.toggle(Weekday::Tuesday);

        // The last edit wins no matter which day commits
        editor.update_draft(Weekday::Monday, Some(t(9, 0)), Some(t(10, 0)));
        let update = editor.commit(Weekday::Tuesday).unwrap();
        assert_eq!(update.range, Some(range(9, 0, 10, 0)));
    }

    #[test]
    fn invalid_then_corrected_wednesday_entry() {
        let mut editor = WeekEditor::new();
        editor.toggle(Weekday::Wednesday);

        editor.update_draft(Weekday::Wednesday, Some(t(14, 0)), Some(t(13, 0)));
        let err = editor.commit(Weekday::Wednesday).unwrap_err();
        assert_eq!(err.to_string(), "Invalid time block entered.");
        assert_eq!(editor.committed(Weekday::Wednesday), None);

        editor.update_draft(Weekday::Wednesday, Some(t(14, 0)), Some(t(15, 0)));
        let update = editor.commit(Weekday::Wednesday).unwrap();
        assert_eq!(update.day, Weekday::Wednesday);
        assert_eq!(update.range, Some(range(14, 0, 15, 0)));
        assert_eq!(editor.committed(Weekday::Wednesday), Some(range(14, 0, 15, 0)));
    }
}
