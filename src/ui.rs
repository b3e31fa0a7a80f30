//! HUD and overlay screens
//!
//! Plain view-models; the browser front end turns them into DOM.

use crate::sim::{GamePhase, GameState};

pub const TITLE: &str = "Informatics Racer";
pub const TAGLINE: &str = "Drive, dodge, and learn! Hit mystery boxes to answer informatics \
                           questions and earn extra lives.";

/// Top bar shown while driving
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub lives: u32,
    pub score: u32,
    pub level: u32,
}

impl Hud {
    /// HUD for the current state, `None` outside of `Playing`
    pub fn for_state(state: &GameState) -> Option<Self> {
        (state.phase == GamePhase::Playing).then(|| Self {
            lives: state.lives,
            score: state.score,
            level: state.level,
        })
    }

    /// One heart per life
    pub fn lives_text(&self) -> String {
        "❤️".repeat(self.lives as usize)
    }
}

/// What a button on an overlay does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    /// Start / next level / play again
    Confirm,
    /// Pick quiz option `n`
    Answer(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: ButtonAction,
}

/// Color accent for the overlay heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Title,
    Success,
    Danger,
    Gold,
    Quiz,
}

impl Accent {
    /// CSS class in index.html
    pub fn css_class(self) -> &'static str {
        match self {
            Accent::Title => "accent-title",
            Accent::Success => "accent-success",
            Accent::Danger => "accent-danger",
            Accent::Gold => "accent-gold",
            Accent::Quiz => "accent-quiz",
        }
    }
}

/// Full-screen panel over the road
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub heading: String,
    pub accent: Accent,
    pub lines: Vec<String>,
    pub buttons: Vec<Button>,
}

fn confirm(label: &str) -> Button {
    Button {
        label: label.to_string(),
        action: ButtonAction::Confirm,
    }
}

impl Overlay {
    /// Overlay for the current phase, `None` while driving
    pub fn for_state(state: &GameState) -> Option<Self> {
        let final_score = format!("Final Score: {}", state.score);
        let overlay = match state.phase {
            GamePhase::Playing => return None,
            GamePhase::Start => Self {
                heading: TITLE.to_string(),
                accent: Accent::Title,
                lines: vec![TAGLINE.to_string()],
                buttons: vec![confirm("Start Game")],
            },
            GamePhase::Quiz => {
                let question = state.question.as_ref()?;
                Self {
                    heading: question.question.clone(),
                    accent: Accent::Quiz,
                    lines: Vec::new(),
                    buttons: question
                        .options
                        .iter()
                        .enumerate()
                        .map(|(i, option)| Button {
                            label: option.clone(),
                            action: ButtonAction::Answer(i),
                        })
                        .collect(),
                }
            }
            GamePhase::LevelComplete => Self {
                heading: format!("Level {} Complete!", state.level),
                accent: Accent::Success,
                lines: vec![final_score],
                buttons: vec![confirm("Next Level")],
            },
            GamePhase::GameOver => Self {
                heading: "Game Over".to_string(),
                accent: Accent::Danger,
                lines: vec![final_score],
                buttons: vec![confirm("Play Again")],
            },
            GamePhase::GameWon => Self {
                heading: "Congratulations!".to_string(),
                accent: Accent::Gold,
                lines: vec!["You've completed all levels!".to_string(), final_score],
                buttons: vec![confirm("Play Again")],
            },
        };
        Some(overlay)
    }
}

/// Remembers the overlay on screen so the DOM is only rebuilt when it changes
#[derive(Debug, Default)]
pub struct OverlayTracker {
    shown: Option<Option<Overlay>>,
}

impl OverlayTracker {
    /// Overlay to show if it differs from the one on screen. A new quiz
    /// question counts as a change even without a phase change.
    pub fn take_change(&mut self, state: &GameState) -> Option<Option<Overlay>> {
        let overlay = Overlay::for_state(state);
        if self.shown.as_ref() == Some(&overlay) {
            return None;
        }
        self.shown = Some(overlay.clone());
        Some(overlay)
    }
}
