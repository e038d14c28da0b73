use crate::models::Month;

/// Upper bound on the number of months in a selection.
pub(crate) const MAX_SELECTION: usize = 3;

/// What a call to [`MonthSelection::toggle`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Toggle {
    /// Selection was empty and now holds the clicked month.
    Started,
    /// Month was adjacent to an edge and was added.
    Extended,
    /// An edge month was removed.
    Shrunk,
    /// Selection was replaced by the clicked month alone.
    Reset,
    /// Removing a middle (or the sole) month would break the window.
    /// State is unchanged; callers use this to play a shake.
    Rejected,
}

impl Toggle {
    pub(crate) fn changed(self) -> bool {
        self != Self::Rejected
    }
}

/// A contiguous, ascending window of at most [`MAX_SELECTION`] months.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct MonthSelection {
    months: Vec<Month>,
}

impl MonthSelection {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn months(&self) -> &[Month] {
        &self.months
    }

    pub(crate) fn len(&self) -> usize {
        self.months.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub(crate) fn contains(&self, month: Month) -> bool {
        self.months.contains(&month)
    }

    pub(crate) fn first(&self) -> Option<Month> {
        self.months.first().copied()
    }

    pub(crate) fn last(&self) -> Option<Month> {
        self.months.last().copied()
    }

    pub(crate) fn clear(&mut self) {
        self.months.clear();
    }

    pub(crate) fn toggle(&mut self, month: Month) -> Toggle {
        let (first, last) = match (self.first(), self.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                self.months = vec![month];
                return Toggle::Started;
            }
        };

        if self.contains(month) {
            if self.months.len() > 1 && month == first {
                self.months.remove(0);
                return Toggle::Shrunk;
            }
            if self.months.len() > 1 && month == last {
                self.months.pop();
                return Toggle::Shrunk;
            }
            return Toggle::Rejected;
        }

        let full = self.months.len() >= MAX_SELECTION;
        if !full && month.index() + 1 == first.index() {
            self.months.insert(0, month);
            Toggle::Extended
        } else if !full && month.index() == last.index() + 1 {
            self.months.push(month);
            Toggle::Extended
        } else {
            self.months = vec![month];
            Toggle::Reset
        }
    }
}
