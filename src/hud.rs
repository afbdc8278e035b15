//! Score labels and the menu overlay
//!
//! Text only; the host decides fonts and placement.

use serde::{Deserialize, Serialize};

use crate::sim::GameSession;

/// Zero-padded four digit score ("0042")
pub fn format_score(score: u32) -> String {
    format!("{score:04}")
}

/// Label text for the score and high score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudText {
    pub score: String,
    pub high_score: String,
}

impl HudText {
    pub fn from_session(session: &GameSession) -> Self {
        Self {
            score: format_score(session.score),
            high_score: format_score(session.high_score),
        }
    }
}

/// Overlay shown while no run is active
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuOverlay {
    pub message: String,
    /// Final score of the run that just ended
    pub score: Option<u32>,
}

impl MenuOverlay {
    pub fn tap_to_play() -> Self {
        Self {
            message: "Tap to play".to_string(),
            score: None,
        }
    }

    pub fn game_over(score: u32) -> Self {
        Self {
            message: "Game Over!".to_string(),
            score: Some(score),
        }
    }

    /// Lines to render, top to bottom
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.message.clone()];
        if let Some(score) = self.score {
            lines.push(format!("Score: {score}"));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;

    #[test]
    fn test_format_score_pads() {
        assert_eq!(format_score(0), "0000");
        assert_eq!(format_score(42), "0042");
        assert_eq!(format_score(12345), "12345");
    }

    #[test]
    fn test_hud_from_session() {
        let mut session = GameSession::new(Tuning::default());
        session.score = 7;
        session.high_score = 350;
        let hud = HudText::from_session(&session);
        assert_eq!(hud.score, "0007");
        assert_eq!(hud.high_score, "0350");
    }

    #[test]
    fn test_overlay_lines() {
        assert_eq!(MenuOverlay::tap_to_play().lines(), vec!["Tap to play"]);
        assert_eq!(
            MenuOverlay::game_over(120).lines(),
            vec!["Game Over!", "Score: 120"]
        );
    }
}
