//! First-run slides.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slide {
    pub title: &'static str,
    pub body: &'static str,
}

pub const SLIDES: &[Slide] = &[
    Slide {
        title: "One wallet for naira and crypto",
        body: "Hold NGN, USD, BTC, ETH, USDT and more side by side.",
    },
    Slide {
        title: "Send money in seconds",
        body: "Pay any Thunder user by email or move funds to an external address.",
    },
    Slide {
        title: "Pay bills and earn cashback",
        body: "Electricity, airtime, data and TV, with cashback on every eligible bill.",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingEvent {
    /// Moved to the slide at this index.
    Showing(usize),
    /// Onboarding is over; the host navigates to sign-in.
    Finished,
}

#[derive(Debug, Clone, Default)]
pub struct Onboarding {
    index: usize,
}

impl Onboarding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &'static Slide {
        &SLIDES[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == SLIDES.len()
    }

    /// Label for the primary button.
    pub fn primary_label(&self) -> &'static str {
        if self.is_last() {
            "Get started"
        } else {
            "Next"
        }
    }

    pub fn next(&mut self) -> OnboardingEvent {
        if self.is_last() {
            return OnboardingEvent::Finished;
        }
        self.index += 1;
        OnboardingEvent::Showing(self.index)
    }

    pub fn skip(&mut self) -> OnboardingEvent {
        OnboardingEvent::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_through_slides_then_finishes() {
        let mut onboarding = Onboarding::new();
        assert_eq!(onboarding.primary_label(), "Next");
        assert_eq!(onboarding.next(), OnboardingEvent::Showing(1));
        assert_eq!(onboarding.next(), OnboardingEvent::Showing(2));
        assert!(onboarding.is_last());
        assert_eq!(onboarding.primary_label(), "Get started");
        assert_eq!(onboarding.next(), OnboardingEvent::Finished);
        assert_eq!(onboarding.index(), 2);
    }

    #[test]
    fn skip_finishes_from_anywhere() {
        let mut onboarding = Onboarding::new();
        assert_eq!(onboarding.skip(), OnboardingEvent::Finished);
        assert_eq!(onboarding.current(), &SLIDES[0]);
    }
}
