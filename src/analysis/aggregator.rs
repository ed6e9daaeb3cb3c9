use super::profile::{GameDetail, MultiKillStat, Outcome, PlayerProfile, Side, TimeBucket};
use super::role::Role;
use crate::api::models::{MatchDto, ParticipantDto};
use crate::error::AppError;
use tracing::debug;

/// Only the first this-many processed games feed the recent form line.
pub const RECENT_FORM_LEN: usize = 20;

/// Folds match records into a [`PlayerProfile`] for one target player.
///
/// Records are folded in the order they are added; `recent_form` and
/// `games_detail` keep that order.
pub struct StatAggregator {
    profile: PlayerProfile,
    skipped: usize,
}

impl StatAggregator {
    pub fn new(puuid: &str) -> Self {
        StatAggregator {
            profile: PlayerProfile::new(puuid),
            skipped: 0,
        }
    }

    /// Number of records that did not contain the target player.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Fold one match. Returns `false` when the target player is not in it,
    /// in which case nothing is counted.
    pub fn add_match(&mut self, match_data: &MatchDto) -> bool {
        let info = &match_data.info;
        let Some(player) = info.participant(&self.profile.puuid) else {
            debug!(match_id = %match_data.metadata.match_id, "target player missing, skipping");
            self.skipped += 1;
            return false;
        };

        let profile = &mut self.profile;
        let won = player.win;
        let role = Role::from(player.team_position.as_str());
        let side = Side::from_team_id(player.team_id);
        let minutes = info.duration_minutes();
        let challenges = player.challenges();

        profile.total_games += 1;
        if let Some(name) = &player.riot_id_game_name {
            profile.player_name = name.clone();
        }
        if won {
            profile.wins += 1;
        } else {
            profile.losses += 1;
        }
        profile.kills += player.kills;
        profile.deaths += player.deaths;
        profile.assists += player.assists;

        let lane_opponent = lane_opponent(player, &info.participants).map(|p| p.champion_name.clone());

        let champion = profile
            .champions
            .entry(player.champion_name.clone())
            .or_default();
        champion.games += 1;
        if won {
            champion.wins += 1;
        }
        champion.kills += player.kills;
        champion.deaths += player.deaths;
        champion.assists += player.assists;
        if let Some(opponent) = &lane_opponent {
            champion
                .vs_champions
                .entry(opponent.clone())
                .or_default()
                .record(won);
        }

        profile.roles.entry(role).or_default().record(won);
        profile.sides.get_mut(side).record(won);
        profile
            .time_buckets
            .get_mut(TimeBucket::from_minutes(minutes))
            .record(won);

        let multi_kills = MultiKillStat {
            double: player.double_kills,
            triple: player.triple_kills,
            quadra: player.quadra_kills,
            penta: player.penta_kills,
        };
        profile.multi_kills.double += multi_kills.double;
        profile.multi_kills.triple += multi_kills.triple;
        profile.multi_kills.quadra += multi_kills.quadra;
        profile.multi_kills.penta += multi_kills.penta;

        profile.objectives.baron += challenges.baron_takedowns;
        profile.objectives.dragon += challenges.dragon_takedowns;
        profile.objectives.herald += challenges.rift_herald_takedowns;
        profile.objectives.tower += challenges.turret_takedowns;

        profile.first_blood.total += 1;
        if player.first_blood_kill || player.first_blood_assist {
            profile.first_blood.participated += 1;
        }

        attribute_deaths(profile, player.deaths, minutes);

        if profile.recent_form.len() < RECENT_FORM_LEN {
            profile.recent_form.push(Outcome::from_win(won));
        }

        let cs = player.creep_score();
        let (ally_team, enemy_team): (Vec<_>, Vec<_>) = info
            .participants
            .iter()
            .partition(|p| p.team_id == player.team_id);

        profile.games_detail.push(GameDetail {
            game_number: profile.total_games as usize,
            match_id: match_data.metadata.match_id.clone(),
            champion: player.champion_name.clone(),
            role,
            win: won,
            side,
            kills: player.kills,
            deaths: player.deaths,
            assists: player.assists,
            cs,
            cs_per_min: round_tenth(cs as f64 / minutes.max(1) as f64),
            gold: player.gold_earned,
            damage: player.total_damage_dealt_to_champions,
            vision_score: player.vision_score,
            duration_min: minutes,
            lane_opponent,
            kill_participation: challenges.kill_participation,
            solo_kills: challenges.solo_kills,
            turret_plates: challenges.turret_plates_taken,
            damage_per_min: challenges.damage_per_minute,
            gold_per_min: challenges.gold_per_minute,
            wards_placed: player.wards_placed,
            wards_killed: player.wards_killed,
            control_wards: challenges.control_wards_placed,
            multi_kills,
            first_blood_kill: player.first_blood_kill,
            first_blood_assist: player.first_blood_assist,
            ally_team: ally_team.into_iter().map(|p| p.champion_name.clone()).collect(),
            enemy_team: enemy_team.into_iter().map(|p| p.champion_name.clone()).collect(),
        });

        true
    }

    /// Hand over the finished profile, or [`AppError::NoValidGames`] when
    /// no record contained the target player.
    pub fn finish(self) -> Result<PlayerProfile, AppError> {
        if self.profile.total_games == 0 {
            return Err(AppError::NoValidGames);
        }
        debug!(
            games = self.profile.total_games,
            skipped = self.skipped,
            "aggregation finished"
        );
        Ok(self.profile)
    }
}

/// Fold `matches` in order for `puuid`.
pub fn aggregate<'a, I>(puuid: &str, matches: I) -> Result<PlayerProfile, AppError>
where
    I: IntoIterator<Item = &'a MatchDto>,
{
    let mut aggregator = StatAggregator::new(puuid);
    for match_data in matches {
        aggregator.add_match(match_data);
    }
    aggregator.finish()
}

/// First participant on another team listed under the same raw position.
/// When several qualify (e.g. empty positions) upstream order decides.
fn lane_opponent<'a>(
    player: &ParticipantDto,
    participants: &'a [ParticipantDto],
) -> Option<&'a ParticipantDto> {
    participants
        .iter()
        .find(|p| p.team_position == player.team_position && p.team_id != player.team_id)
}

fn attribute_deaths(profile: &mut PlayerProfile, deaths: u32, minutes: u64) {
    if deaths == 0 {
        return;
    }
    let deaths = deaths as f64;
    let share = deaths / 3.0;
    let phases = &mut profile.death_phases;
    if minutes >= 15 {
        phases.early += deaths.min(share);
    }
    if minutes >= 25 {
        phases.mid += (deaths - share).min(share);
    }
    if minutes > 25 {
        phases.late += (deaths - 2.0 * share).max(0.0);
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::ChallengesDto;
    use crate::test_support::{game, other, MatchBuilder, RED};
    use proptest::prelude::*;

    const ME: &str = "me";

    fn simple(id: &str, champion: &str, win: bool) -> MatchDto {
        MatchBuilder::new(id)
            .player(game(ME, champion, win))
            .enemy("Syndra", "MIDDLE")
            .build()
    }

    fn without_me(id: &str) -> MatchDto {
        MatchBuilder::new(id)
            .player(other("someone", "Garen", 100, "TOP"))
            .enemy("Darius", "TOP")
            .build()
    }

    #[test]
    fn skips_records_without_target_player() {
        let matches = [
            simple("A", "Ahri", true),
            without_me("B"),
            simple("C", "Zed", false),
        ];
        let profile = aggregate(ME, &matches).unwrap();

        assert_eq!(profile.total_games, 2);
        assert_eq!(profile.losses, 1);
        let ids: Vec<_> = profile.games_detail.iter().map(|g| g.match_id.as_str()).collect();
        assert_eq!(ids, ["A", "C"]);
        assert_eq!(profile.games_detail[1].game_number, 2);
    }

    #[test]
    fn no_valid_games_when_player_never_present() {
        let matches = [without_me("A"), without_me("B")];
        assert!(matches!(aggregate(ME, &matches), Err(AppError::NoValidGames)));
        assert!(matches!(
            aggregate(ME, std::iter::empty()),
            Err(AppError::NoValidGames)
        ));
    }

    #[test]
    fn totals_and_champion_stats() {
        let matches = [
            simple("A", "Ahri", true),
            simple("B", "Ahri", false),
            simple("C", "Zed", true),
        ];
        let profile = aggregate(ME, &matches).unwrap();

        assert_eq!((profile.wins, profile.losses), (2, 1));
        assert_eq!((profile.kills, profile.deaths, profile.assists), (6, 3, 9));
        let ahri = &profile.champions["Ahri"];
        assert_eq!((ahri.games, ahri.wins, ahri.kills), (2, 1, 4));
        assert_eq!(ahri.vs_champions["Syndra"].games, 2);
        assert_eq!(ahri.vs_champions["Syndra"].wins, 1);
        assert_eq!(profile.roles[&Role::Mid].games, 3);
        assert_eq!(profile.player_name, "Tester");
    }

    #[test]
    fn lane_opponent_is_first_opposing_same_position() {
        let m = MatchBuilder::new("A")
            .ally("Lee Sin", "JUNGLE")
            .player(game(ME, "Ahri", true))
            .enemy("Vi", "JUNGLE")
            .enemy("Syndra", "MIDDLE")
            .enemy("Orianna", "MIDDLE")
            .build();
        let profile = aggregate(ME, [&m]).unwrap();

        assert_eq!(profile.games_detail[0].lane_opponent.as_deref(), Some("Syndra"));
        assert!(!profile.champions["Ahri"].vs_champions.contains_key("Orianna"));
        assert_eq!(profile.games_detail[0].ally_team, ["Lee Sin", "Ahri"]);
        assert_eq!(profile.games_detail[0].enemy_team, ["Vi", "Syndra", "Orianna"]);
    }

    #[test]
    fn no_lane_opponent_leaves_matchups_empty() {
        let m = MatchBuilder::new("A")
            .player(game(ME, "Ahri", true))
            .enemy("Vi", "JUNGLE")
            .build();
        let profile = aggregate(ME, [&m]).unwrap();
        assert!(profile.champions["Ahri"].vs_champions.is_empty());
        assert_eq!(profile.games_detail[0].lane_opponent, None);
    }

    #[test]
    fn empty_position_counts_as_fill_and_matches_raw_label() {
        let mut me = game(ME, "Ahri", true);
        me.team_position = String::new();
        let m = MatchBuilder::new("A")
            .player(me)
            .enemy("Teemo", "")
            .build();
        let profile = aggregate(ME, [&m]).unwrap();
        assert_eq!(profile.roles[&Role::Fill].games, 1);
        assert_eq!(profile.games_detail[0].lane_opponent.as_deref(), Some("Teemo"));
    }

    #[test]
    fn sides_and_time_buckets() {
        let mut red = game(ME, "Ahri", false);
        red.team_id = RED;
        let matches = [
            MatchBuilder::new("A").minutes(18).player(game(ME, "Ahri", true)).build(),
            MatchBuilder::new("B").minutes(25).player(red).build(),
            MatchBuilder::new("C").minutes(35).player(game(ME, "Ahri", true)).build(),
        ];
        let profile = aggregate(ME, &matches).unwrap();

        assert_eq!(profile.sides.blue.games, 2);
        assert_eq!(profile.sides.blue.wins, 2);
        assert_eq!(profile.sides.red.games, 1);
        assert_eq!(profile.sides.red.wins, 0);
        assert_eq!(profile.time_buckets.early.games, 1);
        assert_eq!(profile.time_buckets.mid.games, 1);
        assert_eq!(profile.time_buckets.late.games, 1);
        assert_eq!(profile.games_detail[1].side, Side::Red);
    }

    #[test]
    fn death_phases_for_single_long_game() {
        let mut me = game(ME, "Ahri", false);
        me.deaths = 6;
        let m = MatchBuilder::new("A").minutes(28).player(me).build();
        let phases = aggregate(ME, [&m]).unwrap().death_phases;

        assert!((phases.early - 2.0).abs() < 1e-9);
        assert!((phases.mid - 2.0).abs() < 1e-9);
        assert!((phases.late - 2.0).abs() < 1e-9);
    }

    #[test]
    fn death_phases_depend_on_duration() {
        let mut me = game(ME, "Ahri", false);
        me.deaths = 3;
        let short = MatchBuilder::new("A").minutes(14).player(me.clone()).build();
        let exactly_25 = MatchBuilder::new("B").minutes(25).player(me).build();

        let phases = aggregate(ME, [&short]).unwrap().death_phases;
        assert_eq!((phases.early, phases.mid, phases.late), (0.0, 0.0, 0.0));

        let phases = aggregate(ME, [&exactly_25]).unwrap().death_phases;
        assert!((phases.early - 1.0).abs() < 1e-9);
        assert!((phases.mid - 1.0).abs() < 1e-9);
        assert_eq!(phases.late, 0.0);
    }

    #[test]
    fn recent_form_keeps_first_twenty() {
        let matches: Vec<_> = (0..25)
            .map(|i| simple(&format!("M{}", i), "Ahri", i < 20))
            .collect();
        let profile = aggregate(ME, &matches).unwrap();

        assert_eq!(profile.recent_form.len(), RECENT_FORM_LEN);
        assert!(profile.recent_form.iter().all(|o| *o == Outcome::Win));
        assert_eq!(profile.games_detail.len(), 25);
    }

    #[test]
    fn multi_kills_objectives_and_first_blood() {
        let mut me = game(ME, "Jinx", true);
        me.double_kills = 2;
        me.penta_kills = 1;
        me.first_blood_assist = true;
        me.challenges = Some(ChallengesDto {
            baron_takedowns: 1,
            dragon_takedowns: 2,
            rift_herald_takedowns: 1,
            turret_takedowns: 3,
            kill_participation: Some(0.5),
            ..Default::default()
        });
        let matches = [
            MatchBuilder::new("A").player(me).build(),
            simple("B", "Jinx", false),
        ];
        let profile = aggregate(ME, &matches).unwrap();

        assert_eq!(profile.multi_kills.double, 2);
        assert_eq!(profile.multi_kills.penta, 1);
        assert_eq!(profile.objectives.dragon, 2);
        assert_eq!(profile.objectives.tower, 3);
        assert_eq!(profile.first_blood.participated, 1);
        assert_eq!(profile.first_blood.total, 2);
        assert_eq!(profile.games_detail[0].kill_participation, Some(0.5));
    }

    #[test]
    fn cs_per_minute_is_rounded() {
        let mut me = game(ME, "Jinx", true);
        me.total_minions_killed = 180;
        me.neutral_minions_killed = 20;
        let m = MatchBuilder::new("A").minutes(27).player(me).build();
        let detail = &aggregate(ME, [&m]).unwrap().games_detail[0];
        assert_eq!(detail.cs, 200);
        assert_eq!(detail.cs_per_min, 7.4);
    }

    #[test]
    fn aggregation_is_repeatable() {
        let matches = [
            simple("A", "Ahri", true),
            without_me("B"),
            simple("C", "Zed", false),
        ];
        assert_eq!(aggregate(ME, &matches).unwrap(), aggregate(ME, &matches).unwrap());
    }

    #[test]
    fn skipped_count_is_tracked() {
        let mut aggregator = StatAggregator::new(ME);
        assert!(!aggregator.add_match(&without_me("A")));
        assert!(aggregator.add_match(&simple("B", "Ahri", true)));
        assert_eq!(aggregator.skipped(), 1);
    }

    prop_compose! {
        fn arb_match(index: usize)(
            present in prop::bool::weighted(0.8),
            win in any::<bool>(),
            champion in prop::sample::select(vec!["Ahri", "Zed", "Lux", "Jinx"]),
            position in prop::sample::select(vec!["TOP", "JUNGLE", "MIDDLE", "BOTTOM", "UTILITY", ""]),
            opponent in prop::sample::select(vec!["Syndra", "Yasuo", "Teemo"]),
            opponent_position in prop::sample::select(vec!["TOP", "MIDDLE", ""]),
            deaths in 0u32..15,
            minutes in 10u64..50,
        ) -> MatchDto {
            let id = format!("M{}", index);
            let builder = MatchBuilder::new(&id).minutes(minutes).enemy(opponent, opponent_position);
            if present {
                let mut me = game(ME, champion, win);
                me.team_position = position.to_string();
                me.deaths = deaths;
                builder.player(me).build()
            } else {
                builder.build()
            }
        }
    }

    fn arb_matches() -> impl Strategy<Value = Vec<MatchDto>> {
        (0usize..40).prop_flat_map(|n| (0..n).map(arb_match).collect::<Vec<_>>())
    }

    proptest! {
        #[test]
        fn prop_profile_invariants(matches in arb_matches()) {
            let present = matches.iter().filter(|m| m.info.participant(ME).is_some()).count();
            match aggregate(ME, &matches) {
                Ok(profile) => {
                    prop_assert_eq!(profile.wins + profile.losses, profile.total_games);
                    prop_assert_eq!(profile.total_games as usize, present);
                    prop_assert_eq!(profile.recent_form.len(), present.min(RECENT_FORM_LEN));
                    prop_assert_eq!(profile.games_detail.len(), present);
                    for stat in profile.champions.values() {
                        let matchup_games: u32 = stat.vs_champions.values().map(|m| m.games).sum();
                        prop_assert!(matchup_games <= stat.games);
                    }
                    let role_games: u32 = profile.roles.values().map(|r| r.games).sum();
                    prop_assert_eq!(role_games, profile.total_games);
                }
                Err(e) => {
                    prop_assert!(matches!(e, AppError::NoValidGames));
                    prop_assert_eq!(present, 0);
                }
            }
        }
    }
}
