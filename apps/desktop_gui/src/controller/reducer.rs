//! Commission editing state machine, one instance per roster row.
//!
//! The editor owns a draft while the user is editing and treats the external
//! value as the source of truth the rest of the time. External updates that
//! arrive mid-edit are dropped so they cannot clobber unsaved input.

use shared::domain::{Commission, CommissionKind};
use shared::locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Viewing,
    Editing,
}

#[derive(Debug, Clone)]
pub struct CommissionEditor {
    mode: EditorMode,
    committed: Commission,
    draft_amount: f64,
    draft_kind: CommissionKind,
    draft_text: String,
}

impl CommissionEditor {
    pub fn new(committed: Commission) -> Self {
        Self {
            mode: EditorMode::Viewing,
            committed,
            draft_amount: committed.amount,
            draft_kind: committed.kind,
            draft_text: locale::format_input_number(committed.amount),
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == EditorMode::Editing
    }

    pub fn committed(&self) -> Commission {
        self.committed
    }

    pub fn draft_amount(&self) -> f64 {
        self.draft_amount
    }

    pub fn draft_kind(&self) -> CommissionKind {
        self.draft_kind
    }

    pub fn draft_text(&self) -> &str {
        &self.draft_text
    }

    /// Read-only summary of the committed value, e.g. "150.000 ₫" or "12,5%".
    pub fn display_value(&self) -> String {
        locale::format_commission(self.committed)
    }

    /// Enters edit mode with the draft seeded from the committed value.
    pub fn begin_edit(&mut self) {
        if self.mode == EditorMode::Editing {
            return;
        }
        self.draft_amount = self.committed.amount;
        self.draft_kind = self.committed.kind;
        self.draft_text = locale::format_input_number(self.committed.amount);
        self.mode = EditorMode::Editing;
    }

    /// Leaves edit mode without reporting anything upward; the draft is
    /// re-seeded from the committed value.
    pub fn cancel_edit(&mut self) {
        self.draft_amount = self.committed.amount;
        self.draft_kind = self.committed.kind;
        self.draft_text = locale::format_input_number(self.committed.amount);
        self.mode = EditorMode::Viewing;
    }

    /// Commits the draft, leaves edit mode, and returns the value the caller
    /// reports upward. One save action maps to exactly one returned value.
    pub fn save(&mut self) -> Commission {
        let committed = Commission::new(self.draft_amount, self.draft_kind);
        self.committed = committed;
        self.draft_text = locale::format_input_number(committed.amount);
        self.mode = EditorMode::Viewing;
        committed
    }

    /// Adopts an externally updated value. Dropped entirely while editing so a
    /// concurrent update cannot overwrite the user's unsaved input.
    pub fn sync_external(&mut self, commission: Commission) {
        if self.mode == EditorMode::Editing {
            return;
        }
        self.committed = commission;
        self.draft_amount = commission.amount;
        self.draft_kind = commission.kind;
        self.draft_text = locale::format_input_number(commission.amount);
    }

    /// Switches the draft between money and percent. With a usable reference
    /// price the amount is converted; without one it is cleared to zero rather
    /// than carried across incompatible units.
    pub fn toggle_kind(&mut self, kind: CommissionKind, reference_price: Option<f64>) {
        if self.mode != EditorMode::Editing || kind == self.draft_kind {
            return;
        }
        let price = reference_price.filter(|price| price.is_finite() && *price > 0.0);
        match price {
            Some(price) if self.draft_amount > 0.0 => {
                let converted = match kind {
                    CommissionKind::Money => (self.draft_amount * price / 100.0).round(),
                    CommissionKind::Percent => {
                        locale::round_to_max_fraction(self.draft_amount / price * 100.0)
                    }
                };
                self.draft_amount = converted;
                self.draft_text = locale::format_input_number(converted);
            }
            _ => {
                self.draft_amount = 0.0;
                self.draft_text.clear();
            }
        }
        self.draft_kind = kind;
    }

    /// Applies one change of the numeric text field. Grouping dots are
    /// stripped, the comma is the decimal separator, empty clears to zero, and
    /// unparseable input keeps the last valid state.
    pub fn apply_input(&mut self, raw: &str) {
        if self.mode != EditorMode::Editing {
            return;
        }
        if raw.trim().is_empty() {
            self.draft_amount = 0.0;
            self.draft_text.clear();
            return;
        }
        if let Some(value) = locale::parse_grouped(raw) {
            self.draft_amount = value;
            self.draft_text = locale::format_input_number(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CommissionEditor, EditorMode};
    use shared::domain::{Commission, CommissionKind};

    fn editing(committed: Commission) -> CommissionEditor {
        let mut editor = CommissionEditor::new(committed);
        editor.begin_edit();
        editor
    }

    #[test]
    fn seeds_draft_from_committed_value_on_edit_entry() {
        let mut editor = CommissionEditor::new(Commission::money(150_000.0));
        assert_eq!(editor.mode(), EditorMode::Viewing);

        editor.begin_edit();
        assert_eq!(editor.mode(), EditorMode::Editing);
        assert_eq!(editor.draft_amount(), 150_000.0);
        assert_eq!(editor.draft_kind(), CommissionKind::Money);
        assert_eq!(editor.draft_text(), "150.000");

        // Re-entering edit mode keeps the live draft.
        editor.apply_input("99");
        editor.begin_edit();
        assert_eq!(editor.draft_amount(), 99.0);
    }

    #[test]
    fn viewing_display_uses_locale_formatting() {
        assert_eq!(
            CommissionEditor::new(Commission::money(150_000.0)).display_value(),
            "150.000 \u{20ab}"
        );
        assert_eq!(
            CommissionEditor::new(Commission::percent(12.5)).display_value(),
            "12,5%"
        );
        assert_eq!(
            CommissionEditor::new(Commission::percent(0.0)).display_value(),
            "0 \u{20ab}"
        );
    }

    #[test]
    fn same_kind_toggle_is_a_no_op() {
        let mut editor = editing(Commission::money(100_000.0));
        editor.toggle_kind(CommissionKind::Money, Some(500_000.0));
        assert_eq!(editor.draft_amount(), 100_000.0);
        assert_eq!(editor.draft_kind(), CommissionKind::Money);
        assert_eq!(editor.draft_text(), "100.000");
    }

    #[test]
    fn converts_money_to_percent_against_reference_price() {
        let mut editor = editing(Commission::money(100_000.0));
        editor.toggle_kind(CommissionKind::Percent, Some(500_000.0));
        assert_eq!(editor.draft_amount(), 20.0);
        assert_eq!(editor.draft_kind(), CommissionKind::Percent);
        assert_eq!(editor.draft_text(), "20");
    }

    #[test]
    fn converts_percent_to_money_against_reference_price() {
        let mut editor = editing(Commission::percent(12.5));
        editor.toggle_kind(CommissionKind::Money, Some(480_000.0));
        assert_eq!(editor.draft_amount(), 60_000.0);
        assert_eq!(editor.draft_text(), "60.000");
    }

    #[test]
    fn percent_conversion_rounds_to_two_decimals() {
        let mut editor = editing(Commission::money(100_000.0));
        editor.toggle_kind(CommissionKind::Percent, Some(300_000.0));
        // 100000 / 300000 * 100 = 33.333...
        assert_eq!(editor.draft_amount(), 33.33);
        assert_eq!(editor.draft_text(), "33,33");
    }

    #[test]
    fn money_percent_round_trip_stays_within_rounding_tolerance() {
        for (amount, price) in [
            (150_000.0_f64, 499_000.0_f64),
            (75_500.0, 1_200_000.0),
            (12_345.0, 99_999.0),
            (300_000.0, 300_000.0),
        ] {
            let mut editor = editing(Commission::money(amount));
            editor.toggle_kind(CommissionKind::Percent, Some(price));
            editor.toggle_kind(CommissionKind::Money, Some(price));
            // Percent is kept to two decimals, so the round trip may drift by
            // up to half of 0.01% of the price, plus the final rounding step.
            let tolerance = price / 20_000.0 + 0.5;
            assert!(
                (editor.draft_amount() - amount).abs() <= tolerance,
                "amount {amount} price {price} came back as {}",
                editor.draft_amount()
            );
        }
    }

    #[test]
    fn toggle_without_reference_price_clears_the_draft() {
        let mut editor = editing(Commission::percent(15.0));
        editor.toggle_kind(CommissionKind::Money, None);
        assert_eq!(editor.draft_amount(), 0.0);
        assert_eq!(editor.draft_kind(), CommissionKind::Money);
        assert_eq!(editor.draft_text(), "");

        let mut editor = editing(Commission::money(80_000.0));
        editor.toggle_kind(CommissionKind::Percent, Some(0.0));
        assert_eq!(editor.draft_amount(), 0.0);
        assert_eq!(editor.draft_kind(), CommissionKind::Percent);
        assert_eq!(editor.draft_text(), "");
    }

    #[test]
    fn grouped_digit_input_updates_value_and_reformats() {
        let mut editor = editing(Commission::money(0.0));
        editor.apply_input("1.234");
        assert_eq!(editor.draft_amount(), 1_234.0);
        assert_eq!(editor.draft_text(), "1.234");

        editor.apply_input("1234567");
        assert_eq!(editor.draft_amount(), 1_234_567.0);
        assert_eq!(editor.draft_text(), "1.234.567");
    }

    #[test]
    fn comma_decimal_input_is_kept_for_percentages() {
        let mut editor = editing(Commission::percent(0.0));
        editor.apply_input("12,5");
        assert_eq!(editor.draft_amount(), 12.5);
        assert_eq!(editor.draft_text(), "12,5");
    }

    #[test]
    fn rejects_unparseable_input_and_keeps_last_valid_state() {
        let mut editor = editing(Commission::money(0.0));
        editor.apply_input("2500");
        assert_eq!(editor.draft_amount(), 2_500.0);

        for garbage in ["abc", "12abc", "-300", "1,2,3"] {
            editor.apply_input(garbage);
            assert_eq!(editor.draft_amount(), 2_500.0, "input {garbage:?}");
            assert_eq!(editor.draft_text(), "2.500", "input {garbage:?}");
        }
    }

    #[test]
    fn empty_input_clears_to_zero_with_blank_text() {
        let mut editor = editing(Commission::money(45_000.0));
        editor.apply_input("");
        assert_eq!(editor.draft_amount(), 0.0);
        assert_eq!(editor.draft_text(), "");
    }

    #[test]
    fn save_commits_draft_and_returns_to_viewing() {
        let mut editor = editing(Commission::money(0.0));
        editor.apply_input("250000");
        editor.toggle_kind(CommissionKind::Percent, Some(500_000.0));

        let saved = editor.save();
        assert_eq!(saved, Commission::percent(50.0));
        assert_eq!(editor.mode(), EditorMode::Viewing);
        assert_eq!(editor.committed(), saved);
        assert_eq!(editor.display_value(), "50%");
    }

    #[test]
    fn cancel_discards_draft_and_reseeds_from_committed() {
        let mut editor = editing(Commission::money(150_000.0));
        editor.apply_input("999999");
        editor.cancel_edit();

        assert_eq!(editor.mode(), EditorMode::Viewing);
        assert_eq!(editor.committed(), Commission::money(150_000.0));

        editor.begin_edit();
        assert_eq!(editor.draft_amount(), 150_000.0);
        assert_eq!(editor.draft_text(), "150.000");
    }

    #[test]
    fn external_updates_are_dropped_while_editing() {
        let mut editor = editing(Commission::money(150_000.0));
        editor.apply_input("175000");

        editor.sync_external(Commission::money(999_000.0));
        assert_eq!(editor.committed(), Commission::money(150_000.0));
        assert_eq!(editor.draft_amount(), 175_000.0);

        editor.cancel_edit();
        editor.sync_external(Commission::money(999_000.0));
        assert_eq!(editor.committed(), Commission::money(999_000.0));
        assert_eq!(editor.display_value(), "999.000 \u{20ab}");
    }

    #[test]
    fn input_and_toggles_are_ignored_outside_edit_mode() {
        let mut editor = CommissionEditor::new(Commission::money(150_000.0));
        editor.apply_input("1");
        editor.toggle_kind(CommissionKind::Percent, Some(500_000.0));
        assert_eq!(editor.committed(), Commission::money(150_000.0));
        assert_eq!(editor.draft_amount(), 150_000.0);
        assert_eq!(editor.draft_kind(), CommissionKind::Money);
    }
}
