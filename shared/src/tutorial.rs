pub const FIRST_STEP: usize = 1;
pub const LAST_STEP: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TutorialStep {
    pub title: &'static str,
    pub body: &'static str,
    pub enable: &'static [&'static str],
}

pub const STEPS: [TutorialStep; LAST_STEP] = [
    TutorialStep {
        title: "Welcome",
        body: "welcome and drawing canvas placeholder",
        enable: &[],
    },
    TutorialStep {
        title: "Colours",
        body: "colour placeholder",
        enable: &["#background", "#brushColor"],
    },
    TutorialStep {
        title: "Swap Colours",
        body: "swap colours placeholder",
        enable: &["#swapColors"],
    },
    TutorialStep {
        title: "Draw & Erase",
        body: "draw & erase placeholder",
        enable: &["[data-tool=\"draw\"]", "[data-tool=\"erase\"]"],
    },
    TutorialStep {
        title: "Move Tool",
        body: "move placeholder",
        enable: &["[data-tool=\"move\"]"],
    },
    TutorialStep {
        title: "Two-finger Controls",
        body: "two finger controls with the move tool placeholder",
        enable: &[],
    },
    TutorialStep {
        title: "Flip",
        body: "flip placeholder",
        enable: &["#flipH"],
    },
    TutorialStep {
        title: "Undo & Redo",
        body: "undo & redo placeholder",
        enable: &["#undo", "#redo"],
    },
    TutorialStep {
        title: "Clear",
        body: "clear placeholder",
        enable: &["#clear"],
    },
    TutorialStep {
        title: "Finish",
        body: "finish placeholder",
        enable: &["#saveButton"],
    },
];

pub const MASK_ALL: [&str; 11] = [
    "#background",
    "#brushColor",
    "#swapColors",
    "[data-tool=\"draw\"]",
    "[data-tool=\"erase\"]",
    "[data-tool=\"move\"]",
    "#flipH",
    "#undo",
    "#redo",
    "#clear",
    "#saveButton",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tutorial {
    step: usize,
}

impl Default for Tutorial {
    fn default() -> Self {
        Self { step: FIRST_STEP }
    }
}

impl Tutorial {
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn current(&self) -> &'static TutorialStep {
        &STEPS[self.step - 1]
    }

    pub fn advance(&mut self) -> &'static TutorialStep {
        self.step = (self.step + 1).min(LAST_STEP);
        self.current()
    }

    pub fn next_available(&self) -> bool {
        self.step < LAST_STEP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_welcome() {
        let tutorial = Tutorial::default();
        assert_eq!(tutorial.step(), 1);
        assert_eq!(tutorial.current().title, "Welcome");
        assert!(tutorial.current().enable.is_empty());
        assert!(tutorial.next_available());
    }

    #[test]
    fn test_advance_stops_at_finish() {
        let mut tutorial = Tutorial::default();
        for _ in 0..20 {
            tutorial.advance();
        }
        assert_eq!(tutorial.step(), LAST_STEP);
        assert_eq!(tutorial.current().enable, &["#saveButton"]);
        assert!(!tutorial.next_available());
    }

    #[test]
    fn test_every_enabled_selector_starts_masked() {
        for step in STEPS.iter() {
            for selector in step.enable {
                assert!(MASK_ALL.contains(selector), "{selector} not masked");
            }
        }
        let revealed: usize = STEPS.iter().map(|step| step.enable.len()).sum();
        assert_eq!(revealed, MASK_ALL.len());
    }
}
