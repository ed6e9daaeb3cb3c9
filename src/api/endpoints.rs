// Region table and URL builders for the Riot endpoints used by the client.

use crate::error::AppError;
use std::fmt;
use std::str::FromStr;

/// Ranked Solo/Duo queue id on the match-v5 API.
pub const RANKED_SOLO_QUEUE: u32 = 420;

/// Upper bound the match-ids endpoint accepts for `count`.
pub const MAX_MATCH_IDS_PER_REQUEST: usize = 100;

pub const GENERATION_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Kr,
    Na,
    Euw,
    Eune,
    Br,
    Lan,
    Las,
    Oce,
    Jp,
    Sg,
}

impl Region {
    pub const ALL: [Region; 10] = [
        Region::Kr,
        Region::Na,
        Region::Euw,
        Region::Eune,
        Region::Br,
        Region::Lan,
        Region::Las,
        Region::Oce,
        Region::Jp,
        Region::Sg,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Region::Kr => "kr",
            Region::Na => "na",
            Region::Euw => "euw",
            Region::Eune => "eune",
            Region::Br => "br",
            Region::Lan => "lan",
            Region::Las => "las",
            Region::Oce => "oce",
            Region::Jp => "jp",
            Region::Sg => "sg",
        }
    }

    /// Platform id used by the platform-scoped APIs (summoner, league).
    pub fn platform(self) -> &'static str {
        match self {
            Region::Kr => "kr",
            Region::Na => "na1",
            Region::Euw => "euw1",
            Region::Eune => "eun1",
            Region::Br => "br1",
            Region::Lan => "la1",
            Region::Las => "la2",
            Region::Oce => "oc1",
            Region::Jp => "jp1",
            Region::Sg => "sg2",
        }
    }

    /// Regional routing cluster used by account-v1 and match-v5.
    pub fn routing(self) -> &'static str {
        match self {
            Region::Na | Region::Br | Region::Lan | Region::Las => "americas",
            Region::Euw | Region::Eune => "europe",
            Region::Kr | Region::Jp => "asia",
            Region::Oce | Region::Sg => "sea",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Region::Kr => "Korea (KR)",
            Region::Na => "North America (NA)",
            Region::Euw => "Europe West (EUW)",
            Region::Eune => "Europe Nordic & East (EUNE)",
            Region::Br => "Brazil (BR)",
            Region::Lan => "Latin America North (LAN)",
            Region::Las => "Latin America South (LAS)",
            Region::Oce => "Oceania (OCE)",
            Region::Jp => "Japan (JP)",
            Region::Sg => "Singapore (SG)",
        }
    }
}

impl FromStr for Region {
    type Err = AppError;

    /// Accepts either the short code (`na`) or the platform id (`na1`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Region::ALL
            .into_iter()
            .find(|r| r.code() == needle || r.platform() == needle)
            .ok_or_else(|| AppError::ConfigError(format!("Unknown region: {}", s)))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

pub fn account_url(region: Region, game_name: &str, tag_line: &str) -> String {
    format!(
        "https://{}.api.riotgames.com/riot/account/v1/accounts/by-riot-id/{}/{}",
        region.routing(),
        game_name,
        tag_line
    )
}

pub fn match_ids_url(region: Region, puuid: &str, count: usize) -> String {
    format!(
        "https://{}.api.riotgames.com/lol/match/v5/matches/by-puuid/{}/ids?queue={}&count={}",
        region.routing(),
        puuid,
        RANKED_SOLO_QUEUE,
        count.min(MAX_MATCH_IDS_PER_REQUEST)
    )
}

pub fn match_url(region: Region, match_id: &str) -> String {
    format!(
        "https://{}.api.riotgames.com/lol/match/v5/matches/{}",
        region.routing(),
        match_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_and_platform_ids() {
        assert_eq!("kr".parse::<Region>().unwrap(), Region::Kr);
        assert_eq!("NA1".parse::<Region>().unwrap(), Region::Na);
        assert_eq!(" eun1 ".parse::<Region>().unwrap(), Region::Eune);
        assert!(matches!(
            "pbe".parse::<Region>(),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn routing_clusters() {
        assert_eq!(Region::Kr.routing(), "asia");
        assert_eq!(Region::Las.routing(), "americas");
        assert_eq!(Region::Euw.routing(), "europe");
        assert_eq!(Region::Sg.routing(), "sea");
    }

    #[test]
    fn match_ids_url_is_ranked_and_capped() {
        let url = match_ids_url(Region::Na, "abc", 250);
        assert_eq!(
            url,
            "https://americas.api.riotgames.com/lol/match/v5/matches/by-puuid/abc/ids?queue=420&count=100"
        );
    }

    #[test]
    fn account_url_uses_routing_host() {
        assert_eq!(
            account_url(Region::Kr, "Hide on bush", "KR1"),
            "https://asia.api.riotgames.com/riot/account/v1/accounts/by-riot-id/Hide on bush/KR1"
        );
    }
}
