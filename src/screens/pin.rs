//! Transaction PIN entry: a row of single-digit slots with auto-advance,
//! auto-backspace and auto-submit.

use std::fmt;

pub const DEFAULT_PIN_LENGTH: usize = 4;

/// True for exactly four ASCII digits.
pub fn is_valid_pin(pin: &str) -> bool {
    pin.len() == DEFAULT_PIN_LENGTH && pin.chars().all(|c| c.is_ascii_digit())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStyle {
    Empty,
    Filled,
    Error,
}

/// Result of feeding one key event to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinOutcome {
    /// Rejected input, or the controller is loading.
    Ignored,
    Updated,
    /// Every slot is filled; carries the digits in slot order.
    Complete(String),
}

type CompletionHook = Box<dyn FnMut(&str) + Send>;

pub struct PinEntry {
    slots: Vec<Option<char>>,
    focus: usize,
    loading: bool,
    error: Option<String>,
    submitted: bool,
    on_complete: Option<CompletionHook>,
}

impl fmt::Debug for PinEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinEntry")
            .field("length", &self.slots.len())
            .field("filled", &self.slots.iter().filter(|s| s.is_some()).count())
            .field("focus", &self.focus)
            .field("loading", &self.loading)
            .field("error", &self.error)
            .finish()
    }
}

impl Default for PinEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl PinEntry {
    pub fn new() -> Self {
        Self::with_length(DEFAULT_PIN_LENGTH)
    }

    pub fn with_length(length: usize) -> Self {
        Self {
            slots: vec![None; length.max(1)],
            focus: 0,
            loading: false,
            error: None,
            submitted: false,
            on_complete: None,
        }
    }

    /// Called with the PIN each time the entry completes.
    pub fn with_completion_hook(mut self, hook: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(hook));
        self
    }

    /// Input event at slot `index`. `value` is the slot's new content: one
    /// digit, or empty when the slot was cleared.
    pub fn input(&mut self, index: usize, value: &str) -> PinOutcome {
        if self.loading || index >= self.slots.len() {
            return PinOutcome::Ignored;
        }

        let mut chars = value.chars();
        let digit = match (chars.next(), chars.next()) {
            (None, _) => None,
            (Some(c), None) if c.is_ascii_digit() => Some(c),
            _ => return PinOutcome::Ignored,
        };

        self.slots[index] = digit;
        if digit.is_none() {
            self.submitted = false;
            return PinOutcome::Updated;
        }

        let last = self.slots.len() - 1;
        if index < last {
            self.focus = index + 1;
            return PinOutcome::Updated;
        }

        if self.is_complete() && !self.submitted {
            self.submitted = true;
            let pin = self.value();
            if let Some(hook) = self.on_complete.as_mut() {
                hook(&pin);
            }
            return PinOutcome::Complete(pin);
        }

        PinOutcome::Updated
    }

    /// Backspace key at slot `index`. Only an empty slot moves focus back;
    /// clearing a filled slot arrives as `input(index, "")`.
    pub fn backspace(&mut self, index: usize) -> PinOutcome {
        if self.loading || index >= self.slots.len() {
            return PinOutcome::Ignored;
        }
        if self.slots[index].is_none() && index > 0 {
            self.focus = index - 1;
            return PinOutcome::Updated;
        }
        PinOutcome::Ignored
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn set_focus(&mut self, index: usize) {
        if !self.loading && index < self.slots.len() {
            self.focus = index;
        }
    }

    pub fn slots(&self) -> &[Option<char>] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Filled digits in slot order.
    pub fn value(&self) -> String {
        self.slots.iter().flatten().collect()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn slot_style(&self, index: usize) -> SlotStyle {
        if self.error.is_some() {
            return SlotStyle::Error;
        }
        match self.slots.get(index) {
            Some(Some(_)) => SlotStyle::Filled,
            _ => SlotStyle::Empty,
        }
    }

    /// The "forgot PIN" link is hidden while an error is shown.
    pub fn show_forgot_pin(&self) -> bool {
        self.error.is_none()
    }

    /// Clear every slot and return focus to the first one. The error stays.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.focus = 0;
        self.submitted = false;
    }
}
