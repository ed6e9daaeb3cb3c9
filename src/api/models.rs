use serde::Deserialize;

// Account V1 response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
    #[serde(default)]
    pub game_name: Option<String>,
    #[serde(default)]
    pub tag_line: Option<String>,
}

// Match V5 response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchDto {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    pub match_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    /// Seconds.
    #[serde(default)]
    pub game_duration: u64,
    #[serde(default)]
    pub participants: Vec<ParticipantDto>,
}

impl MatchInfo {
    pub fn duration_minutes(&self) -> u64 {
        self.game_duration / 60
    }

    pub fn participant(&self, puuid: &str) -> Option<&ParticipantDto> {
        self.participants.iter().find(|p| p.puuid == puuid)
    }
}

/// One player's line in a match. Counters are unsigned so a negative value
/// from upstream fails deserialization instead of corrupting totals.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticipantDto {
    pub puuid: String,
    pub riot_id_game_name: Option<String>,
    pub champion_name: String,
    pub team_id: u32,
    pub win: bool,
    /// TOP, JUNGLE, MIDDLE, BOTTOM, UTILITY or empty
    pub team_position: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub total_minions_killed: u32,
    pub neutral_minions_killed: u32,
    pub gold_earned: u32,
    pub total_damage_dealt_to_champions: u64,
    pub vision_score: u32,
    pub wards_placed: u32,
    pub wards_killed: u32,
    pub double_kills: u32,
    pub triple_kills: u32,
    pub quadra_kills: u32,
    pub penta_kills: u32,
    pub first_blood_kill: bool,
    pub first_blood_assist: bool,
    pub challenges: Option<ChallengesDto>,
}

impl ParticipantDto {
    pub fn creep_score(&self) -> u32 {
        self.total_minions_killed + self.neutral_minions_killed
    }

    pub fn challenges(&self) -> ChallengesDto {
        self.challenges.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChallengesDto {
    pub baron_takedowns: u32,
    pub dragon_takedowns: u32,
    pub rift_herald_takedowns: u32,
    pub turret_takedowns: u32,
    pub turret_plates_taken: u32,
    pub solo_kills: u32,
    pub control_wards_placed: u32,
    pub kill_participation: Option<f64>,
    pub damage_per_minute: f64,
    pub gold_per_minute: f64,
}

// Messages API response (analysis generation)
#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}
