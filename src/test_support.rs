//! Builders for match fixtures shared by the unit tests.

use crate::api::models::{MatchDto, MatchInfo, MatchMetadata, ParticipantDto};

pub const BLUE: u32 = 100;
pub const RED: u32 = 200;

/// The target player on the blue side, mid lane, 2/1/3.
pub fn game(puuid: &str, champion: &str, win: bool) -> ParticipantDto {
    ParticipantDto {
        puuid: puuid.to_string(),
        riot_id_game_name: Some("Tester".to_string()),
        champion_name: champion.to_string(),
        team_id: BLUE,
        win,
        team_position: "MIDDLE".to_string(),
        kills: 2,
        deaths: 1,
        assists: 3,
        ..Default::default()
    }
}

pub fn other(puuid: &str, champion: &str, team_id: u32, position: &str) -> ParticipantDto {
    ParticipantDto {
        puuid: puuid.to_string(),
        champion_name: champion.to_string(),
        team_id,
        team_position: position.to_string(),
        ..Default::default()
    }
}

pub struct MatchBuilder {
    match_id: String,
    duration_secs: u64,
    participants: Vec<ParticipantDto>,
}

impl MatchBuilder {
    pub fn new(match_id: &str) -> Self {
        MatchBuilder {
            match_id: match_id.to_string(),
            duration_secs: 25 * 60,
            participants: Vec::new(),
        }
    }

    pub fn minutes(mut self, minutes: u64) -> Self {
        self.duration_secs = minutes * 60;
        self
    }

    pub fn player(mut self, participant: ParticipantDto) -> Self {
        self.participants.push(participant);
        self
    }

    /// Adds an enemy on the red side with the given raw position.
    pub fn enemy(self, champion: &str, position: &str) -> Self {
        let puuid = format!("enemy-{}-{}", champion, self.participants.len());
        self.player(other(&puuid, champion, RED, position))
    }

    /// Adds a teammate on the blue side with the given raw position.
    pub fn ally(self, champion: &str, position: &str) -> Self {
        let puuid = format!("ally-{}-{}", champion, self.participants.len());
        self.player(other(&puuid, champion, BLUE, position))
    }

    pub fn build(self) -> MatchDto {
        MatchDto {
            metadata: MatchMetadata {
                match_id: self.match_id,
            },
            info: MatchInfo {
                game_duration: self.duration_secs,
                participants: self.participants,
            },
        }
    }
}
