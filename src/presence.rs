pub const ONLINE_COLOR: &str = "#57cbde";
pub const IDLE_COLOR: &str = "#8f98a0";

/// Steam `personastate` values as reported by `GetPlayerSummaries`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonaState {
    Offline,
    Online,
    Busy,
    Away,
    Snooze,
    LookingToTrade,
    LookingToPlay,
}

impl PersonaState {
    /// Unknown codes fall back to `Offline`.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Online,
            2 => Self::Busy,
            3 => Self::Away,
            4 => Self::Snooze,
            5 => Self::LookingToTrade,
            6 => Self::LookingToPlay,
            _ => Self::Offline,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Offline => "Offline",
            Self::Online => "Online",
            Self::Busy => "Busy",
            Self::Away => "Away",
            Self::Snooze => "Snooze",
            Self::LookingToTrade => "Looking to Trade",
            Self::LookingToPlay => "Looking to Play",
        }
    }

    pub fn indicator_color(self) -> &'static str {
        match self {
            Self::Online => ONLINE_COLOR,
            _ => IDLE_COLOR,
        }
    }
}

/// Text shown next to the indicator dot. A current game wins over presence.
pub fn status_text(state: PersonaState, activity: Option<&str>) -> String {
    match activity.map(str::trim).filter(|game| !game.is_empty()) {
        Some(game) => format!("In-Game: {game}"),
        None => state.label().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_labels_and_colors() {
        let expected = [
            (1, "Online", ONLINE_COLOR),
            (2, "Busy", IDLE_COLOR),
            (3, "Away", IDLE_COLOR),
            (4, "Snooze", IDLE_COLOR),
            (5, "Looking to Trade", IDLE_COLOR),
            (6, "Looking to Play", IDLE_COLOR),
        ];
        for (code, label, color) in expected {
            let state = PersonaState::from_code(code);
            assert_eq!(state.label(), label, "label for code {code}");
            assert_eq!(state.indicator_color(), color, "color for code {code}");
        }
    }

    #[test]
    fn unknown_codes_are_offline() {
        for code in [0, 7, 42, -1, i64::MAX, i64::MIN] {
            let state = PersonaState::from_code(code);
            assert_eq!(state, PersonaState::Offline);
            assert_eq!(state.label(), "Offline");
            assert_eq!(state.indicator_color(), "#8f98a0");
        }
    }

    #[test]
    fn activity_overrides_presence() {
        let away = PersonaState::from_code(3);
        assert_eq!(status_text(away, Some("Some Game")), "In-Game: Some Game");
        assert_eq!(status_text(away, None), "Away");
        assert_eq!(status_text(away, Some("  ")), "Away");
    }

    #[test]
    fn online_without_activity() {
        let online = PersonaState::from_code(1);
        assert_eq!(status_text(online, None), "Online");
        assert_eq!(online.indicator_color(), "#57cbde");
    }
}
