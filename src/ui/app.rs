use anyhow::Result;

use crate::calendar::{
    group_activities_by_month, recent_months, MonthActivities, MonthSelection, Toggle, MAX_SELECTION,
};
use crate::capacity::{build_summary, CapacitySummary};
use crate::db::Database;
use crate::models::Month;
use crate::ui::util::ListScroll;

/// Frames a rejected toggle keeps the month strip shaking.
pub(crate) const SHAKE_TICKS: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Calendar,
    Capacity,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Calendar, Self::Capacity]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Calendar => write!(f, "Calendar"),
            Self::Capacity => write!(f, "Capacity"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
        }
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) today: Month,

    // Calendar
    pub(crate) calendar_months: Vec<Month>,
    pub(crate) month_cursor: usize,
    pub(crate) selection: MonthSelection,
    pub(crate) shake_ticks: u8,
    pub(crate) emp_filter: Option<String>,
    pub(crate) activities: Vec<MonthActivities>,
    pub(crate) activity_scroll: ListScroll,

    // Capacity
    pub(crate) summary: CapacitySummary,
    pub(crate) summary_start: Option<Month>,
    pub(crate) window_size: usize,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(today: Month, window_size: usize) -> Self {
        Self {
            running: true,
            screen: Screen::Calendar,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            today,

            calendar_months: Vec::new(),
            month_cursor: 0,
            selection: MonthSelection::new(),
            shake_ticks: 0,
            emp_filter: None,
            activities: Vec::new(),
            activity_scroll: ListScroll::default(),

            summary: CapacitySummary::default(),
            summary_start: None,
            window_size,

            visible_rows: 20,
        }
    }

    /// Reload the month strip. An empty selection starts on the latest month.
    pub(crate) fn refresh_calendar(&mut self, db: &Database) -> Result<()> {
        self.calendar_months = recent_months(&db.get_allocation_months()?, self.today);
        if self.month_cursor >= self.calendar_months.len() {
            self.month_cursor = self.calendar_months.len().saturating_sub(1);
        }
        if self.selection.is_empty() {
            if let Some(&latest) = self.calendar_months.last() {
                self.selection.toggle(latest);
                self.month_cursor = self.calendar_months.len() - 1;
            }
        }
        self.refresh_activities(db)
    }

    pub(crate) fn refresh_activities(&mut self, db: &Database) -> Result<()> {
        let months = self.selection.months().to_vec();
        let rows = db.get_activities(&months, self.emp_filter.as_deref())?;
        self.activities = group_activities_by_month(&months, &rows);
        self.activity_scroll.reset();
        Ok(())
    }

    pub(crate) fn refresh_capacity(&mut self, db: &Database) -> Result<()> {
        self.summary = build_summary(db, self.summary_start, self.window_size, self.today)?;
        // Pin the detected start so H/L shift from what is on screen.
        if self.summary_start.is_none() {
            self.summary_start = self.summary.first_month();
        }
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.refresh_calendar(db)?;
        self.refresh_capacity(db)?;
        Ok(())
    }

    pub(crate) fn cursor_month(&self) -> Option<Month> {
        self.calendar_months.get(self.month_cursor).copied()
    }

    pub(crate) fn move_cursor(&mut self, delta: isize) {
        if self.calendar_months.is_empty() {
            return;
        }
        let max = self.calendar_months.len() as isize - 1;
        self.month_cursor = (self.month_cursor as isize + delta).clamp(0, max) as usize;
    }

    /// Toggle the month under the cursor. Rejected toggles start the shake.
    pub(crate) fn toggle_cursor_month(&mut self, db: &Database) -> Result<Option<Toggle>> {
        let Some(month) = self.cursor_month() else {
            return Ok(None);
        };
        let outcome = self.selection.toggle(month);
        if outcome.changed() {
            self.refresh_activities(db)?;
            self.set_status(format!(
                "Showing {} ({}/{MAX_SELECTION})",
                self.selection_label(),
                self.selection.len()
            ));
        } else {
            self.shake_ticks = SHAKE_TICKS;
            self.set_status(format!("Selection must stay contiguous, up to {MAX_SELECTION} months"));
        }
        tracing::debug!(month = %month, ?outcome, "month toggled");
        Ok(Some(outcome))
    }

    pub(crate) fn selection_label(&self) -> String {
        match (self.selection.first(), self.selection.last()) {
            (Some(first), Some(last)) if first == last => first.label(),
            (Some(first), Some(last)) => format!("{} – {}", first.label(), last.label()),
            _ => "no months".into(),
        }
    }

    /// Advance the shake animation by one frame.
    pub(crate) fn tick(&mut self) {
        self.shake_ticks = self.shake_ticks.saturating_sub(1);
    }

    /// Horizontal offset of the month strip for the current shake frame.
    pub(crate) fn shake_offset(&self) -> u16 {
        if self.shake_ticks % 2 == 1 {
            2
        } else {
            0
        }
    }

    /// Number of rendered lines in the activities pane.
    pub(crate) fn activity_line_count(&self) -> usize {
        self.activities
            .iter()
            .map(|m| 1 + m.groups.len() + m.activities.len().max(1))
            .sum()
    }

    pub(crate) fn shift_summary_start(&mut self, db: &Database, months: i32) -> Result<()> {
        let start = self
            .summary_start
            .or_else(|| self.summary.first_month())
            .unwrap_or(self.today);
        self.summary_start = Some(start.offset(months));
        self.refresh_capacity(db)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
