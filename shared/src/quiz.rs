use serde::{Deserialize, Serialize};

pub const NEXT_PAGE: &str = "07_prePracticeWait.html";
pub const RAND_LEFT_KEY: &str = "guidelinesQuiz::randLeft";

pub const BORDER_NONE: &str = "transparent";
pub const BORDER_CORRECT: &str = "#10b981";
pub const BORDER_INCORRECT: &str = "#ef4444";

const DEFAULT_CORRECT: &str = "Correct.";
const DEFAULT_INCORRECT: &str = "Not quite.";
const DEFAULT_BOTH_CORRECT: &str = "Either choice is acceptable.";

const IMG: &str = "https://universityofsussex.eu.qualtrics.com/ControlPanel/Graphic.php?IM=";
const STIM: &str = "https://universityofsussex.eu.qualtrics.com/CP/Graphic.php?IM=";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CorrectSide {
    Left,
    Right,
    /// Side drawn once per tab from `rand_left`. No guideline uses it today.
    Random,
}

#[derive(Clone, Copy, Debug)]
pub struct Question {
    pub correct_img: &'static str,
    pub incorrect_img: &'static str,
    pub msg_correct: Option<&'static str>,
    pub msg_incorrect: Option<&'static str>,
    pub msg_both_correct: Option<&'static str>,
    pub both_correct: bool,
    pub correct_side: CorrectSide,
}

#[derive(Clone, Copy, Debug)]
pub struct Guideline {
    pub title: &'static str,
    pub paragraphs: &'static [&'static str],
    pub stimulus_id: &'static str,
    pub questions: &'static [Question],
}

impl Guideline {
    pub fn stimulus_src(&self) -> String {
        format!("{STIM}{}", self.stimulus_id)
    }
}

const fn graded(
    correct: &'static str,
    incorrect: &'static str,
    msg_correct: &'static str,
    msg_incorrect: &'static str,
    side: CorrectSide,
) -> Question {
    Question {
        correct_img: correct,
        incorrect_img: incorrect,
        msg_correct: Some(msg_correct),
        msg_incorrect: Some(msg_incorrect),
        msg_both_correct: None,
        both_correct: false,
        correct_side: side,
    }
}

const SQUARE: &str = "IM_t1cd8UYGPtjMtmu";
const CORNERS: &str = "IM_fVsylhlmtUGn1LM";
const OVER_TIME: &str = "Not quite, you don't want to combine different things you saw over time. Instead, you should just pick one moment to draw.";

pub const GUIDELINES: [Guideline; 6] = [
    Guideline {
        title: "Draw what you see across your field of view",
        paragraphs: &[
            "Imagine you could take a picture of your whole visual field. Don't select only certain things to draw or move things around.",
            "Imagine you saw this triangle on the upper left with a diamond below it:",
        ],
        stimulus_id: "IM_mdVkaaP3iA0waVE",
        questions: &[
            graded(
                CORNERS,
                "IM_N2Y3D25t0vflWas",
                "That’s right, try to draw everything in its place.",
                "Not quite - you should draw everything where you saw it, don’t move something from the corner to the centre or vice versa.",
                CorrectSide::Left,
            ),
            graded(
                CORNERS,
                "IM_SHJbdoGx0v3UhXG",
                "That’s right, try not to leave things out.",
                "Not quite - try to draw everything you see, as much as you can.",
                CorrectSide::Right,
            ),
        ],
    },
    Guideline {
        title: "Draw what you see at one point in time",
        paragraphs: &[
            "You may see various things over time, just pick one and draw that",
            "Imagine you saw this - a line and then an oval:",
        ],
        stimulus_id: "IM_YnWoPkG4isEUGAm",
        questions: &[
            graded(
                "IM_HwrptbGuDi88bE1",
                "IM_QoRZTc8LxShTf0u",
                "Correct, just drawing the line is a great choice.",
                OVER_TIME,
                CorrectSide::Left,
            ),
            graded(
                "IM_tPdPqm2n52GppDT",
                "IM_s5eYW54xZmfrzuN",
                "Correct, just drawing the oval is a great choice.",
                OVER_TIME,
                CorrectSide::Right,
            ),
        ],
    },
    Guideline {
        title: "Draw what you see at one point in time, and pick what you see most often.",
        paragraphs: &[
            "If you see a few different things over time, pick a moment that you remember best which represents the rest of that trial well.",
            "Imagine you saw this, mostly squares, but also some circles",
        ],
        stimulus_id: "IM_jnyauSgc3SqMAPC",
        questions: &[graded(
            "IM_kL1IIMw3EXqocAZ",
            "IM_KxyOqfmQtvfSrbY",
            "That’s right! It's better to draw a memory of a square because that better represents the whole experience.",
            "Close - it would be OK to draw the circle because you did see a circle like that. But it's better to draw what you saw most often, like the square.",
            CorrectSide::Right,
        )],
    },
    Guideline {
        title: "Draw what you really saw",
        paragraphs: &[
            "Try to draw what you saw, as you saw it, simplifying it as little as possible.",
            "Imagine you saw this square:",
        ],
        stimulus_id: "IM_9SvVX2Q9tU4c7Tv",
        questions: &[
            graded(
                SQUARE,
                "IM_2FLGbxvzSH9CNxF",
                "Correct. Don’t write or conceptualize what you saw with symbols, diagrams, text, or arrows.",
                "Not quite - don’t write down what you saw or use arrows. Try to just draw it as you saw it.",
                CorrectSide::Left,
            ),
            graded(
                SQUARE,
                "IM_rXaMaGjzwQSRC92",
                "Correct. Try to draw the image with the shades you really saw.",
                "Not quite. In this example, you saw a white square on a black background, not a black square on a white background. Try not to flip things or change the shades of what you saw.",
                CorrectSide::Right,
            ),
            graded(
                SQUARE,
                "IM_xRqZxc7Y7F9dtYe",
                "Correct. Don’t draw outlines unless you really saw outlines.",
                "Not quite, in this example you saw a filled in square, not one in outlines.",
                CorrectSide::Right,
            ),
            graded(
                SQUARE,
                "IM_xeByuhovQDMaPZ3",
                "Correct. Draw what you saw, not what you were thinking of or imagining.",
                "Not quite, try to draw what you literally saw, not what you were thinking of or imagining. ",
                CorrectSide::Left,
            ),
        ],
    },
    Guideline {
        title: "Always draw something.",
        paragraphs: &["Even if you saw almost nothing.", "Imagine you saw this:"],
        stimulus_id: "IM_OudPoa3TOMdUaJT",
        questions: &[graded(
            "IM_duwPtqZaMgVItmW",
            "IM_6HmeTfA1tGG5Ymm",
            "Correct. Try to draw something in every trial. If you saw barely anything at all, you might not need to draw much, but don’t draw nothing.",
            "Not quite, try to draw something in every trial.",
            CorrectSide::Left,
        )],
    },
    Guideline {
        title: "Don’t worry about it, just try your best!",
        paragraphs: &[
            "We don’t expect you to be an artist, just try your best in each trial.",
            "Imagine you saw this:",
        ],
        stimulus_id: "IM_SzIPoKeIJTtNLzb",
        questions: &[Question {
            correct_img: "IM_QHYZxsDa1OqkLln",
            incorrect_img: "IM_XI6kq8FTTwMtbeL",
            msg_correct: None,
            msg_incorrect: None,
            msg_both_correct: Some(
                "Trick question. Either is fine, just as long as you try your hardest!",
            ),
            both_correct: true,
            correct_side: CorrectSide::Left,
        }],
    },
];

#[derive(Clone, Copy, Debug)]
pub struct QuizItem {
    pub guideline_index: usize,
    pub guideline: &'static Guideline,
    pub question: &'static Question,
}

impl QuizItem {
    pub fn title_html(&self) -> String {
        format!(
            "<strong><span style=\"font-size:24px;\">Guideline {} of {}: {}</span></strong>",
            self.guideline_index + 1,
            GUIDELINES.len(),
            self.guideline.title
        )
    }

    pub fn body_html(&self) -> String {
        self.guideline
            .paragraphs
            .iter()
            .map(|text| format!("<p>{text}</p>"))
            .collect()
    }

    pub fn correct_src(&self) -> String {
        format!("{IMG}{}", self.question.correct_img)
    }

    pub fn incorrect_src(&self) -> String {
        format!("{IMG}{}", self.question.incorrect_img)
    }
}

pub fn questions() -> Vec<QuizItem> {
    GUIDELINES
        .iter()
        .enumerate()
        .flat_map(|(guideline_index, guideline)| {
            guideline.questions.iter().map(move |question| QuizItem {
                guideline_index,
                guideline,
                question,
            })
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizStep {
    Question(usize),
    Finish,
    Stay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackStep {
    Question(usize),
    HistoryBack,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionView {
    pub counter: String,
    pub left_src: String,
    pub right_src: String,
    pub left_border: &'static str,
    pub right_border: &'static str,
    pub message: String,
    pub next_visible: bool,
}

pub struct QuizSession {
    items: Vec<QuizItem>,
    rand_left: Vec<bool>,
    passed: Vec<bool>,
    chosen: Vec<Option<Side>>,
    missed: Option<Side>,
    idx: usize,
}

impl QuizSession {
    /// `rand_left` is only used for questions whose correct side is random.
    /// A list of the wrong length is replaced by calling `coin` per question.
    pub fn new(rand_left: Option<Vec<bool>>, mut coin: impl FnMut() -> bool) -> Self {
        let items = questions();
        let rand_left = match rand_left {
            Some(sides) if sides.len() == items.len() => sides,
            _ => (0..items.len()).map(|_| coin()).collect(),
        };
        let count = items.len();
        Self {
            items,
            rand_left,
            passed: vec![false; count],
            chosen: vec![None; count],
            missed: None,
            idx: 0,
        }
    }

    pub fn rand_left(&self) -> &[bool] {
        &self.rand_left
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn index(&self) -> usize {
        self.idx
    }

    pub fn current(&self) -> Option<&QuizItem> {
        self.items.get(self.idx)
    }

    pub fn is_passed(&self, index: usize) -> bool {
        self.passed.get(index).copied().unwrap_or(false)
    }

    fn left_is_correct(&self, index: usize) -> bool {
        match self.items[index].question.correct_side {
            CorrectSide::Left => true,
            CorrectSide::Right => false,
            CorrectSide::Random => self.rand_left.get(index).copied().unwrap_or(false),
        }
    }

    fn side_is_correct(&self, index: usize, side: Side) -> bool {
        if self.items[index].question.both_correct {
            return true;
        }
        self.left_is_correct(index) == (side == Side::Left)
    }

    pub fn pick(&mut self, side: Side) -> bool {
        let idx = self.idx;
        if idx >= self.items.len() || self.passed[idx] {
            return false;
        }
        self.chosen[idx] = Some(side);
        if self.side_is_correct(idx, side) {
            self.passed[idx] = true;
            self.missed = None;
        } else {
            self.missed = Some(side);
        }
        true
    }

    pub fn next(&mut self) -> QuizStep {
        let last = self.items.len().saturating_sub(1);
        if self.idx == last && self.is_passed(self.idx) {
            return QuizStep::Finish;
        }
        if self.idx < last {
            self.idx += 1;
            self.missed = None;
            return QuizStep::Question(self.idx);
        }
        QuizStep::Stay
    }

    pub fn back(&mut self) -> BackStep {
        if self.idx > 0 {
            self.idx -= 1;
            self.missed = None;
            BackStep::Question(self.idx)
        } else {
            BackStep::HistoryBack
        }
    }

    pub fn view(&self) -> Option<QuestionView> {
        let item = self.current()?;
        let question = item.question;
        let idx = self.idx;
        let left_is_correct = self.left_is_correct(idx);
        let (left_src, right_src) = if left_is_correct {
            (item.correct_src(), item.incorrect_src())
        } else {
            (item.incorrect_src(), item.correct_src())
        };
        let border = |side: Side| {
            if self.side_is_correct(idx, side) {
                BORDER_CORRECT
            } else {
                BORDER_INCORRECT
            }
        };
        let mut view = QuestionView {
            counter: format!("Question {} of {}", idx + 1, self.items.len()),
            left_src,
            right_src,
            left_border: BORDER_NONE,
            right_border: BORDER_NONE,
            message: String::new(),
            next_visible: false,
        };
        if self.passed[idx] {
            view.left_border = border(Side::Left);
            view.right_border = border(Side::Right);
            let correct_side = if left_is_correct { Side::Left } else { Side::Right };
            view.message = if question.both_correct {
                question.msg_both_correct.unwrap_or(DEFAULT_BOTH_CORRECT)
            } else if self.chosen[idx] == Some(correct_side) {
                question.msg_correct.unwrap_or(DEFAULT_CORRECT)
            } else {
                question.msg_incorrect.unwrap_or(DEFAULT_INCORRECT)
            }
            .to_string();
            view.next_visible = true;
        } else if let Some(side) = self.missed {
            match side {
                Side::Left => view.left_border = BORDER_INCORRECT,
                Side::Right => view.right_border = BORDER_INCORRECT,
            }
            view.message = question.msg_incorrect.unwrap_or(DEFAULT_INCORRECT).to_string();
        }
        Some(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> QuizSession {
        QuizSession::new(None, || false)
    }

    #[test]
    fn test_flattened_question_counts() {
        let items = questions();
        assert_eq!(items.len(), 11);
        let per_guideline: Vec<usize> = (0..GUIDELINES.len())
            .map(|g| items.iter().filter(|item| item.guideline_index == g).count())
            .collect();
        assert_eq!(per_guideline, vec![2, 2, 1, 4, 1, 1]);
    }

    #[test]
    fn test_title_html() {
        let items = questions();
        assert!(items[4]
            .title_html()
            .contains("Guideline 3 of 6: Draw what you see at one point in time, and pick"));
        assert!(items[0].body_html().starts_with("<p>Imagine you could"));
    }

    #[test]
    fn test_stored_sides_reused_only_with_matching_length() {
        let kept = QuizSession::new(Some(vec![true; 11]), || false);
        assert!(kept.rand_left().iter().all(|side| *side));
        let replaced = QuizSession::new(Some(vec![true; 3]), || false);
        assert_eq!(replaced.rand_left().len(), 11);
        assert!(replaced.rand_left().iter().all(|side| !*side));
    }

    #[test]
    fn test_stored_sides_json() {
        let raw = serde_json::to_string(&[false; 11]).unwrap();
        let stored: Vec<bool> = serde_json::from_str(&raw).unwrap();
        let quiz = QuizSession::new(Some(stored), || true);
        assert!(quiz.rand_left().iter().all(|side| !*side));
        assert_eq!(serde_json::to_string(&Side::Left).unwrap(), "\"left\"");
    }

    #[test]
    fn test_random_side_follows_stored_coin() {
        static COIN_QUESTION: Question =
            graded(CORNERS, "IM_coin", "Yes.", "No.", CorrectSide::Random);
        let mut quiz = QuizSession::new(Some(vec![false; 11]), || true);
        quiz.items[0].question = &COIN_QUESTION;
        let view = quiz.view().unwrap();
        assert!(view.right_src.ends_with(CORNERS));
        assert!(quiz.pick(Side::Left));
        assert!(!quiz.is_passed(0));
        assert!(quiz.pick(Side::Right));
        assert!(quiz.is_passed(0));
    }

    #[test]
    fn test_wrong_pick_keeps_next_hidden() {
        let mut quiz = session();
        assert!(quiz.pick(Side::Right));
        let view = quiz.view().unwrap();
        assert_eq!(view.right_border, BORDER_INCORRECT);
        assert_eq!(view.left_border, BORDER_NONE);
        assert!(view.message.starts_with("Not quite - you should draw"));
        assert!(!view.next_visible);
        assert!(!quiz.is_passed(0));
    }

    #[test]
    fn test_correct_pick_passes_and_locks() {
        let mut quiz = session();
        assert!(quiz.pick(Side::Left));
        let view = quiz.view().unwrap();
        assert_eq!(view.left_border, BORDER_CORRECT);
        assert_eq!(view.right_border, BORDER_INCORRECT);
        assert!(view.next_visible);
        assert!(!quiz.pick(Side::Right));
        assert_eq!(quiz.view().unwrap(), view);
    }

    #[test]
    fn test_next_requires_nothing_but_finish_requires_pass() {
        let mut quiz = session();
        for expected in 1..11 {
            assert_eq!(quiz.next(), QuizStep::Question(expected));
        }
        assert_eq!(quiz.next(), QuizStep::Stay);
        assert!(quiz.pick(Side::Right));
        assert_eq!(quiz.next(), QuizStep::Finish);
    }

    #[test]
    fn test_both_correct_question() {
        let mut quiz = session();
        while quiz.index() < 10 {
            quiz.next();
        }
        assert!(quiz.pick(Side::Right));
        let view = quiz.view().unwrap();
        assert_eq!(view.left_border, BORDER_CORRECT);
        assert_eq!(view.right_border, BORDER_CORRECT);
        assert!(view.message.starts_with("Trick question."));
    }

    #[test]
    fn test_back_restores_passed_state() {
        let mut quiz = session();
        quiz.pick(Side::Left);
        quiz.next();
        quiz.pick(Side::Left);
        assert_eq!(quiz.back(), BackStep::Question(0));
        let view = quiz.view().unwrap();
        assert!(view.next_visible);
        assert_eq!(view.message, "That’s right, try to draw everything in its place.");
        assert_eq!(quiz.back(), BackStep::HistoryBack);
    }

    #[test]
    fn test_right_side_question_swaps_images() {
        let mut quiz = session();
        quiz.next();
        let view = quiz.view().unwrap();
        assert!(view.right_src.ends_with(CORNERS));
        assert_eq!(view.counter, "Question 2 of 11");
    }
}
