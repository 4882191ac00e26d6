use serde::Deserialize;

/// One entry of `GetPlayerSummaries/v2`. Only the fields the card needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerSummary {
    pub steamid: String,
    #[serde(default)]
    pub personaname: String,
    #[serde(default)]
    pub avatarfull: String,
    #[serde(default)]
    pub personastate: i64,
    #[serde(default)]
    pub gameextrainfo: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayerSummariesEnvelope {
    #[serde(default)]
    pub response: PlayerSummariesResponse,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayerSummariesResponse {
    #[serde(default)]
    pub players: Vec<PlayerSummary>,
}

impl PlayerSummariesEnvelope {
    pub fn into_first(self) -> Option<PlayerSummary> {
        self.response.players.into_iter().next()
    }
}
