use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::params::Params;
use crate::ParseError;

pub const BLOCK_DELIMITER: char = 'X';

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrialKind {
    Light,
    Image,
    Unknown,
}

impl TrialKind {
    pub fn from_code(code: char) -> Self {
        match code {
            '0'..='9' => TrialKind::Light,
            'A'..='D' => TrialKind::Image,
            _ => TrialKind::Unknown,
        }
    }

    pub fn label(self, code: char) -> String {
        match self {
            TrialKind::Light => format!("Light ({code})"),
            TrialKind::Image => format!("Image ({code})"),
            TrialKind::Unknown => code.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrialNode {
    pub code: char,
    pub block_index: usize,
    pub trial_in_block: usize,
    pub trials_in_block: usize,
}

impl TrialNode {
    pub fn kind(&self) -> TrialKind {
        TrialKind::from_code(self.code)
    }

    pub fn label(&self) -> String {
        self.kind().label(self.code)
    }

    pub fn is_start_of_block(&self) -> bool {
        self.trial_in_block == 0
    }

    pub fn first_page(&self) -> Page {
        match self.kind() {
            TrialKind::Image => Page::ImageStim,
            _ => Page::PreDrawing,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TrialPlan {
    pub blocks: Vec<Vec<char>>,
    pub trials: Vec<TrialNode>,
}

pub fn split_into_blocks(order: &str) -> Vec<Vec<char>> {
    order
        .split(BLOCK_DELIMITER)
        .filter(|block| !block.is_empty())
        .map(|block| block.chars().collect())
        .collect()
}

impl TrialPlan {
    pub fn parse(order: &str) -> Self {
        let blocks = split_into_blocks(order);
        let trials = blocks
            .iter()
            .enumerate()
            .flat_map(|(block_index, block)| {
                block
                    .iter()
                    .enumerate()
                    .map(move |(trial_in_block, code)| TrialNode {
                        code: *code,
                        block_index,
                        trial_in_block,
                        trials_in_block: block.len(),
                    })
            })
            .collect();
        Self { blocks, trials }
    }

    pub fn total_trials(&self) -> usize {
        self.trials.len()
    }

    pub fn clamp_index(&self, raw: i64) -> usize {
        let last = self.total_trials().saturating_sub(1);
        raw.clamp(0, last as i64) as usize
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentTrial {
    pub plan: TrialPlan,
    pub index: usize,
    pub info: Option<TrialNode>,
}

impl CurrentTrial {
    pub fn from_params(params: &Params) -> Self {
        let plan = TrialPlan::parse(&params.t);
        let index = plan.clamp_index(params.raw_index());
        let info = plan.trials.get(index).copied();
        Self { plan, index, info }
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.plan.total_trials()
    }

    /// Params and node for the trial after the one in `params`. Stepping past
    /// the end of the plan yields no node rather than clamping back onto the
    /// last trial.
    pub fn following(params: &Params) -> (Params, Option<TrialNode>) {
        let next_raw = params.raw_index().saturating_add(1);
        let next_params = Params {
            i: next_raw.to_string(),
            ..params.clone()
        };
        let next = CurrentTrial::from_params(&next_params);
        if next_raw >= next.plan.total_trials() as i64 {
            return (next_params, None);
        }
        (next_params, next.info)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    ParamCheck,
    Welcome,
    ImageStim,
    PreDrawing,
    Drawing,
    Wait,
    End,
}

impl Page {
    pub fn token(self) -> &'static str {
        match self {
            Page::ParamCheck => "param-check",
            Page::Welcome => "welcome",
            Page::ImageStim => "image-stim",
            Page::PreDrawing => "pre-drawing",
            Page::Drawing => "drawing",
            Page::Wait => "wait",
            Page::End => "end",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.html", self.token())
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Page {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "param-check" => Ok(Page::ParamCheck),
            "welcome" => Ok(Page::Welcome),
            "image-stim" => Ok(Page::ImageStim),
            "pre-drawing" => Ok(Page::PreDrawing),
            "drawing" => Ok(Page::Drawing),
            "wait" => Ok(Page::Wait),
            "end" => Ok(Page::End),
            other => Err(ParseError::UnknownPage(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub page: Page,
    pub params: Params,
}

impl Route {
    fn to(page: Page, params: &Params) -> Self {
        Self {
            page,
            params: params.clone(),
        }
    }
}

pub fn next_route(current: &str, params: &Params) -> Route {
    let trial = CurrentTrial::from_params(params);
    let Some(info) = trial.info else {
        return Route::to(Page::End, params);
    };
    let Ok(page) = current.parse::<Page>() else {
        return Route::to(Page::End, params);
    };
    match page {
        Page::ParamCheck => {
            if info.is_start_of_block() {
                Route::to(Page::Welcome, params)
            } else {
                Route::to(info.first_page(), params)
            }
        }
        Page::Welcome => Route::to(info.first_page(), params),
        Page::ImageStim => Route::to(Page::PreDrawing, params),
        Page::PreDrawing => Route::to(Page::Drawing, params),
        Page::Drawing => {
            if trial.is_last() {
                Route::to(Page::End, params)
            } else {
                Route::to(Page::Wait, params)
            }
        }
        Page::Wait => {
            let (next_params, next) = CurrentTrial::following(&params.with_index(trial.index));
            match next {
                None => Route::to(Page::End, &next_params),
                Some(next) if next.is_start_of_block() => Route::to(Page::Welcome, &next_params),
                Some(next) => Route::to(next.first_page(), &next_params),
            }
        }
        Page::End => Route::to(Page::End, params),
    }
}

pub fn back_route(current: &str, params: &Params) -> Route {
    let Ok(page) = current.parse::<Page>() else {
        return Route::to(Page::ParamCheck, params);
    };
    match page {
        Page::Welcome => Route::to(Page::ParamCheck, params),
        Page::ImageStim => Route::to(Page::Welcome, params),
        Page::PreDrawing => {
            let is_image = CurrentTrial::from_params(params)
                .info
                .is_some_and(|info| info.kind() == TrialKind::Image);
            if is_image {
                Route::to(Page::ImageStim, params)
            } else {
                Route::to(Page::Welcome, params)
            }
        }
        Page::Drawing => Route::to(Page::PreDrawing, params),
        Page::Wait => Route::to(Page::Drawing, params),
        Page::End | Page::ParamCheck => Route::to(Page::ParamCheck, params),
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PlaceholderPayload {
    pub trial_text: String,
    pub block_num: usize,
    pub type_label: String,
    pub index: usize,
    pub total_in_block: usize,
}

pub fn placeholder_payload(params: &Params) -> PlaceholderPayload {
    let trial = CurrentTrial::from_params(params);
    match trial.info {
        None => PlaceholderPayload {
            trial_text: "Trial 0 of 0".to_string(),
            block_num: 0,
            type_label: "(none)".to_string(),
            index: trial.index,
            total_in_block: 0,
        },
        Some(info) => PlaceholderPayload {
            trial_text: format!("Trial {} of {}", info.trial_in_block + 1, info.trials_in_block),
            block_num: info.block_index + 1,
            type_label: info.label(),
            index: trial.index,
            total_in_block: info.trials_in_block,
        },
    }
}

pub fn next_trial_message(params: &Params) -> String {
    match CurrentTrial::following(params).1 {
        None => "You are about to finish.".to_string(),
        Some(next) if next.is_start_of_block() => "Please enjoy a short break.".to_string(),
        Some(next) => format!(
            "You will soon begin trial {} of {}.",
            next.trial_in_block + 1,
            next.trials_in_block
        ),
    }
}
