//! The aggregated view of one player's recent ranked games.
//!
//! Everything here is plain data. Ratios (win rate, KDA) are computed on
//! demand and never stored, so a serialized profile only carries counters.

use super::role::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Percentage of `wins` over `games`, 0 when nothing was played.
pub fn win_rate(wins: u32, games: u32) -> f64 {
    if games == 0 {
        0.0
    } else {
        wins as f64 / games as f64 * 100.0
    }
}

/// Win rate with one decimal and a trailing `%`, e.g. `55.0%`.
pub fn percent(wins: u32, games: u32) -> String {
    format!("{:.1}%", win_rate(wins, games))
}

/// (kills + assists) / deaths with deaths floored at 1, so a deathless
/// stretch still yields a finite number.
pub fn kda(kills: u32, deaths: u32, assists: u32) -> f64 {
    (kills as f64 + assists as f64) / deaths.max(1) as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "L")]
    Loss,
}

impl Outcome {
    pub fn from_win(won: bool) -> Self {
        if won {
            Outcome::Win
        } else {
            Outcome::Loss
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Win => "W",
            Outcome::Loss => "L",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinCounter {
    pub games: u32,
    pub wins: u32,
}

impl WinCounter {
    pub fn record(&mut self, won: bool) {
        self.games += 1;
        if won {
            self.wins += 1;
        }
    }
}

pub type RoleStat = WinCounter;
pub type TimeBucketStat = WinCounter;
pub type SideStat = WinCounter;
pub type MatchupStat = WinCounter;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChampionStat {
    pub games: u32,
    pub wins: u32,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    /// Lane opponent champion -> record against it.
    pub vs_champions: BTreeMap<String, MatchupStat>,
}

impl ChampionStat {
    pub fn kda(&self) -> f64 {
        kda(self.kills, self.deaths, self.assists)
    }

    /// Matchups by descending game count, ties by opponent name.
    pub fn matchups_by_games(&self) -> Vec<(&str, &MatchupStat)> {
        let mut matchups: Vec<_> = self
            .vs_champions
            .iter()
            .map(|(name, stat)| (name.as_str(), stat))
            .collect();
        matchups.sort_by(|a, b| b.1.games.cmp(&a.1.games));
        matchups
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBucket {
    Early,
    Mid,
    Late,
}

impl TimeBucket {
    pub fn from_minutes(minutes: u64) -> Self {
        if minutes < 20 {
            TimeBucket::Early
        } else if minutes < 30 {
            TimeBucket::Mid
        } else {
            TimeBucket::Late
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeBucket::Early => "Early (0-20min)",
            TimeBucket::Mid => "Mid (20-30min)",
            TimeBucket::Late => "Late (30+ min)",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBuckets {
    pub early: TimeBucketStat,
    pub mid: TimeBucketStat,
    pub late: TimeBucketStat,
}

impl TimeBuckets {
    pub fn get(&self, bucket: TimeBucket) -> &TimeBucketStat {
        match bucket {
            TimeBucket::Early => &self.early,
            TimeBucket::Mid => &self.mid,
            TimeBucket::Late => &self.late,
        }
    }

    pub fn get_mut(&mut self, bucket: TimeBucket) -> &mut TimeBucketStat {
        match bucket {
            TimeBucket::Early => &mut self.early,
            TimeBucket::Mid => &mut self.mid,
            TimeBucket::Late => &mut self.late,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Blue,
    Red,
}

impl Side {
    /// Team 100 starts on the blue side; anything else is treated as red.
    pub fn from_team_id(team_id: u32) -> Self {
        if team_id == 100 {
            Side::Blue
        } else {
            Side::Red
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Blue => "BLUE",
            Side::Red => "RED",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideStats {
    pub blue: SideStat,
    pub red: SideStat,
}

impl SideStats {
    pub fn get_mut(&mut self, side: Side) -> &mut SideStat {
        match side {
            Side::Blue => &mut self.blue,
            Side::Red => &mut self.red,
        }
    }
}

/// Deaths spread over game phases by an even three-way split per game.
/// An approximation: the buckets need not add up to the total death count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeathPhaseStat {
    /// 0-15 min
    pub early: f64,
    /// 15-25 min
    pub mid: f64,
    /// 25+ min
    pub late: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiKillStat {
    pub double: u32,
    pub triple: u32,
    pub quadra: u32,
    pub penta: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveStat {
    pub baron: u32,
    pub dragon: u32,
    pub herald: u32,
    pub tower: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstBloodStat {
    /// Games with a first blood kill or assist.
    pub participated: u32,
    pub total: u32,
}

impl FirstBloodStat {
    pub fn rate(&self) -> f64 {
        win_rate(self.participated, self.total)
    }
}

/// Snapshot of the target player's line in one processed game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDetail {
    /// 1-based position among processed games.
    pub game_number: usize,
    pub match_id: String,
    pub champion: String,
    pub role: Role,
    pub win: bool,
    pub side: Side,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub cs: u32,
    pub cs_per_min: f64,
    pub gold: u32,
    pub damage: u64,
    pub vision_score: u32,
    pub duration_min: u64,
    pub lane_opponent: Option<String>,
    pub kill_participation: Option<f64>,
    pub solo_kills: u32,
    pub turret_plates: u32,
    pub damage_per_min: f64,
    pub gold_per_min: f64,
    pub wards_placed: u32,
    pub wards_killed: u32,
    pub control_wards: u32,
    pub multi_kills: MultiKillStat,
    pub first_blood_kill: bool,
    pub first_blood_assist: bool,
    pub ally_team: Vec<String>,
    pub enemy_team: Vec<String>,
}

impl GameDetail {
    pub fn kda_line(&self) -> String {
        format!("{}/{}/{}", self.kills, self.deaths, self.assists)
    }

    /// Highest multi-kill of the game: PENTA, QUADRA, TRIPLE, `Nx2` or empty.
    pub fn multi_kill_label(&self) -> String {
        let m = &self.multi_kills;
        if m.penta > 0 {
            "PENTA".to_string()
        } else if m.quadra > 0 {
            "QUADRA".to_string()
        } else if m.triple > 0 {
            "TRIPLE".to_string()
        } else if m.double > 0 {
            format!("{}x2", m.double)
        } else {
            String::new()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub puuid: String,
    pub player_name: String,
    pub total_games: u32,
    pub wins: u32,
    pub losses: u32,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub multi_kills: MultiKillStat,
    pub champions: BTreeMap<String, ChampionStat>,
    pub roles: BTreeMap<Role, RoleStat>,
    pub time_buckets: TimeBuckets,
    pub sides: SideStats,
    pub death_phases: DeathPhaseStat,
    pub objectives: ObjectiveStat,
    pub first_blood: FirstBloodStat,
    pub recent_form: Vec<Outcome>,
    pub games_detail: Vec<GameDetail>,
}

impl PlayerProfile {
    pub fn new(puuid: &str) -> Self {
        PlayerProfile {
            puuid: puuid.to_string(),
            player_name: "Unknown".to_string(),
            total_games: 0,
            wins: 0,
            losses: 0,
            kills: 0,
            deaths: 0,
            assists: 0,
            multi_kills: MultiKillStat::default(),
            champions: BTreeMap::new(),
            roles: BTreeMap::new(),
            time_buckets: TimeBuckets::default(),
            sides: SideStats::default(),
            death_phases: DeathPhaseStat::default(),
            objectives: ObjectiveStat::default(),
            first_blood: FirstBloodStat::default(),
            recent_form: Vec::new(),
            games_detail: Vec::new(),
        }
    }

    pub fn kda(&self) -> f64 {
        kda(self.kills, self.deaths, self.assists)
    }

    /// Champions by descending game count, ties by champion name.
    pub fn champions_by_games(&self) -> Vec<(&str, &ChampionStat)> {
        let mut champions: Vec<_> = self
            .champions
            .iter()
            .map(|(name, stat)| (name.as_str(), stat))
            .collect();
        champions.sort_by(|a, b| b.1.games.cmp(&a.1.games));
        champions
    }

    /// Roles by descending game count, ties in TOP..FILL order.
    pub fn roles_by_games(&self) -> Vec<(Role, &RoleStat)> {
        let mut roles: Vec<_> = self.roles.iter().map(|(role, stat)| (*role, stat)).collect();
        roles.sort_by(|a, b| b.1.games.cmp(&a.1.games));
        roles
    }
}
