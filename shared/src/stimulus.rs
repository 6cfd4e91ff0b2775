pub const FIXATION_MIN_MS: f64 = 5000.0;
pub const FADE_AT_MS: i32 = 17_000;
pub const END_AT_MS: i32 = 20_000;
pub const PRELOAD_CAP_MS: f64 = 30_000.0;
pub const POLL_MS: i32 = 100;

pub const FIXATION_SRC: &str = "https://upload.wikimedia.org/wikipedia/commons/thumb/c/ca/Eo_circle_green_letter-x.svg/768px-Eo_circle_green_letter-x.svg.png?20200417132944";
pub const FIXATION_ALT: &str = "Fixation cross placeholder";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PracticeStimulus {
    pub key: &'static str,
    pub image_src: &'static str,
    pub image_alt: &'static str,
    pub draw_page: &'static str,
}

pub const PRACTICE: [PracticeStimulus; 2] = [
    PracticeStimulus {
        key: "p1",
        image_src: "https://upload.wikimedia.org/wikipedia/commons/thumb/d/d4/Woman_teaching_geometry.jpg/800px-Woman_teaching_geometry.jpg",
        image_alt: "Practice 1 image (pre-selected)",
        draw_page: "practice-1-draw.html",
    },
    PracticeStimulus {
        key: "p2",
        image_src: "https://upload.wikimedia.org/wikipedia/commons/thumb/3/3a/Cat03.jpg/800px-Cat03.jpg",
        image_alt: "Practice 2 image (pre-selected)",
        draw_page: "practice-2-draw.html",
    },
];

pub fn practice(key: &str) -> Option<&'static PracticeStimulus> {
    let key = key.trim().to_ascii_lowercase();
    PRACTICE.iter().find(|stim| stim.key == key)
}

pub fn config_error_message(key: &str) -> String {
    format!("Configuration error: unknown practice key \"{key}\".")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preload {
    Pending,
    Ready,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FixationOutcome {
    Wait,
    ShowStimulus,
    SkipToDrawing,
}

/// Decides what follows fixation `elapsed_ms` after it started.
/// A preload still pending at the cap shows the stimulus anyway.
pub fn fixation_outcome(preload: Preload, elapsed_ms: f64) -> FixationOutcome {
    if elapsed_ms < FIXATION_MIN_MS {
        return FixationOutcome::Wait;
    }
    match preload {
        Preload::Ready => FixationOutcome::ShowStimulus,
        Preload::Failed => FixationOutcome::SkipToDrawing,
        Preload::Pending if elapsed_ms >= PRELOAD_CAP_MS => FixationOutcome::ShowStimulus,
        Preload::Pending => FixationOutcome::Wait,
    }
}
