//! Renders a [`PlayerProfile`] into the analysis request sent to the text
//! generation endpoint. Output is deterministic for a given profile and
//! options. All percentages carry exactly one decimal digit.

use crate::analysis::profile::{percent, PlayerProfile, TimeBucket};
use std::fmt::Write;

/// Which sections to render and how many rows each list gets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOptions {
    pub top_champions: usize,
    /// Per champion; 0 hides matchups.
    pub top_matchups: usize,
    pub time_buckets: bool,
    pub sides: bool,
    pub multi_kills: bool,
    pub objectives: bool,
    pub first_blood: bool,
    pub death_phases: bool,
    /// Rows of the game-by-game table; 0 hides it.
    pub game_log_rows: usize,
    /// Most recent processed games shown with full team compositions; 0 hides them.
    pub team_composition_rows: usize,
    /// Appended to the closing request, e.g. "Korean (한국어)".
    pub response_language: Option<String>,
}

impl Default for PromptOptions {
    fn default() -> Self {
        PromptOptions {
            top_champions: 5,
            top_matchups: 3,
            time_buckets: true,
            sides: true,
            multi_kills: true,
            objectives: true,
            first_blood: true,
            death_phases: true,
            game_log_rows: 30,
            team_composition_rows: 10,
            response_language: None,
        }
    }
}

impl PromptOptions {
    /// Overall stats, roles, champions and a short game log only.
    pub fn compact() -> Self {
        PromptOptions {
            top_matchups: 0,
            time_buckets: false,
            sides: false,
            multi_kills: false,
            objectives: false,
            first_blood: false,
            death_phases: false,
            team_composition_rows: 0,
            ..Default::default()
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.response_language = Some(language.into());
        self
    }

    pub fn with_game_log_rows(mut self, rows: usize) -> Self {
        self.game_log_rows = rows;
        self
    }

    pub fn with_top_champions(mut self, count: usize) -> Self {
        self.top_champions = count;
        self
    }
}

pub struct PromptFormatter {
    options: PromptOptions,
}

impl PromptFormatter {
    pub fn new(options: PromptOptions) -> Self {
        PromptFormatter { options }
    }

    pub fn render(&self, profile: &PlayerProfile) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_prompt(&mut out, profile);
        out
    }

    fn write_prompt(&self, out: &mut String, profile: &PlayerProfile) -> std::fmt::Result {
        let opts = &self.options;

        self.write_overview(out, profile)?;
        self.write_roles(out, profile)?;
        self.write_champions(out, profile)?;
        if opts.time_buckets {
            self.write_time_buckets(out, profile)?;
        }
        if opts.sides {
            writeln!(out, "\n### Side Performance (Blue vs Red)")?;
            let sides = &profile.sides;
            writeln!(out, "- Blue Side: {} games ({} WR)", sides.blue.games, percent(sides.blue.wins, sides.blue.games))?;
            writeln!(out, "- Red Side: {} games ({} WR)", sides.red.games, percent(sides.red.wins, sides.red.games))?;
        }
        if opts.multi_kills {
            let m = &profile.multi_kills;
            writeln!(out, "\n### Multi-Kill Statistics")?;
            writeln!(out, "- Penta Kills: {}", m.penta)?;
            writeln!(out, "- Quadra Kills: {}", m.quadra)?;
            writeln!(out, "- Triple Kills: {}", m.triple)?;
            writeln!(out, "- Double Kills: {}", m.double)?;
        }
        if opts.objectives {
            let o = &profile.objectives;
            writeln!(out, "\n### Objective Control")?;
            writeln!(out, "- Baron Takedowns: {}", o.baron)?;
            writeln!(out, "- Dragon Takedowns: {}", o.dragon)?;
            writeln!(out, "- Herald Takedowns: {}", o.herald)?;
            writeln!(out, "- Tower Takedowns: {}", o.tower)?;
        }
        if opts.first_blood {
            let fb = &profile.first_blood;
            writeln!(out, "\n### First Blood Participation")?;
            writeln!(
                out,
                "- Participated in First Blood: {}/{} games ({:.1}%)",
                fb.participated,
                fb.total,
                fb.rate()
            )?;
        }
        if opts.death_phases && profile.deaths > 0 {
            self.write_death_phases(out, profile)?;
        }
        if opts.game_log_rows > 0 {
            self.write_game_log(out, profile)?;
        }
        if opts.team_composition_rows > 0 {
            self.write_team_compositions(out, profile)?;
        }
        self.write_request(out)
    }

    fn write_overview(&self, out: &mut String, profile: &PlayerProfile) -> std::fmt::Result {
        let form: Vec<String> = profile.recent_form.iter().map(|o| o.to_string()).collect();

        writeln!(out, "# Player Analysis Request")?;
        writeln!(out)?;
        writeln!(out, "## Player: {}", profile.player_name)?;
        writeln!(
            out,
            "## Games Analyzed: {} (Recent Ranked Solo/Duo)",
            profile.total_games
        )?;
        writeln!(out)?;
        writeln!(out, "### Overall Stats")?;
        writeln!(
            out,
            "- Win Rate: {} ({}W {}L)",
            percent(profile.wins, profile.total_games),
            profile.wins,
            profile.losses
        )?;
        writeln!(
            out,
            "- KDA: {:.2} ({}/{}/{})",
            profile.kda(),
            profile.kills,
            profile.deaths,
            profile.assists
        )?;
        writeln!(out, "- Recent Form (Last 20): {}", form.join(" "))
    }

    fn write_roles(&self, out: &mut String, profile: &PlayerProfile) -> std::fmt::Result {
        writeln!(out, "\n### Role Distribution")?;
        for (role, stat) in profile.roles_by_games() {
            writeln!(
                out,
                "- {}: {} games ({} WR)",
                role,
                stat.games,
                percent(stat.wins, stat.games)
            )?;
        }
        Ok(())
    }

    fn write_champions(&self, out: &mut String, profile: &PlayerProfile) -> std::fmt::Result {
        let opts = &self.options;
        writeln!(out, "\n### Top {} Champions", opts.top_champions)?;
        for (name, stat) in profile
            .champions_by_games()
            .into_iter()
            .take(opts.top_champions)
        {
            writeln!(
                out,
                "- **{}**: {} games ({} WR, {:.2} KDA)",
                name,
                stat.games,
                percent(stat.wins, stat.games),
                stat.kda()
            )?;

            let matchups = stat.matchups_by_games();
            if opts.top_matchups == 0 || matchups.is_empty() {
                continue;
            }
            writeln!(out, "  Top matchups:")?;
            for (opponent, record) in matchups.into_iter().take(opts.top_matchups) {
                writeln!(
                    out,
                    "    vs {}: {} games ({} WR)",
                    opponent,
                    record.games,
                    percent(record.wins, record.games)
                )?;
            }
        }
        Ok(())
    }

    fn write_time_buckets(&self, out: &mut String, profile: &PlayerProfile) -> std::fmt::Result {
        writeln!(out, "\n### Performance by Game Length")?;
        for bucket in [TimeBucket::Early, TimeBucket::Mid, TimeBucket::Late] {
            let stat = profile.time_buckets.get(bucket);
            if stat.games > 0 {
                writeln!(
                    out,
                    "- {}: {} games ({} WR)",
                    bucket.label(),
                    stat.games,
                    percent(stat.wins, stat.games)
                )?;
            }
        }
        Ok(())
    }

    fn write_death_phases(&self, out: &mut String, profile: &PlayerProfile) -> std::fmt::Result {
        let total = profile.deaths as f64;
        let phases = &profile.death_phases;
        writeln!(out, "\n### Death Timing Analysis")?;
        for (label, deaths) in [
            ("Early Game Deaths (0-15min)", phases.early),
            ("Mid Game Deaths (15-25min)", phases.mid),
            ("Late Game Deaths (25+min)", phases.late),
        ] {
            writeln!(
                out,
                "- {}: {:.0} ({:.1}%)",
                label,
                deaths,
                deaths / total * 100.0
            )?;
        }
        Ok(())
    }

    fn write_game_log(&self, out: &mut String, profile: &PlayerProfile) -> std::fmt::Result {
        let rows = self.options.game_log_rows;
        writeln!(out, "\n### Detailed Game History (Last {} Games)", rows)?;
        writeln!(out, "```")?;
        writeln!(
            out,
            "{:>3} | {:5} | {:4} | {:12} | {:4} | {:9} | {:12} | {:4} | {:6} | {:5} | {:6} | {:4}",
            "#", "Result", "Side", "Champion", "Role", "KDA", "vs", "CS/m", "DMG", "KP", "Multi", "Time"
        )?;
        writeln!(out, "{}", "-".repeat(135))?;
        for game in profile.games_detail.iter().take(rows) {
            let result = if game.win { "WIN " } else { "LOSS" };
            let opponent: String = game
                .lane_opponent
                .as_deref()
                .unwrap_or("Unknown")
                .chars()
                .take(12)
                .collect();
            let kp = match game.kill_participation {
                Some(kp) if kp > 0.0 => format!("{:.1}%", kp * 100.0),
                _ => "N/A".to_string(),
            };
            writeln!(
                out,
                "{:3} | {:5} | {:4} | {:12} | {:4} | {:9} | {:12} | {:4.1} | {:6} | {:>5} | {:>6} | {:2}m",
                game.game_number,
                result,
                game.side.label(),
                game.champion,
                game.role,
                game.kda_line(),
                opponent,
                game.cs_per_min,
                game.damage,
                kp,
                game.multi_kill_label(),
                game.duration_min
            )?;
        }
        writeln!(out, "```")
    }

    fn write_team_compositions(
        &self,
        out: &mut String,
        profile: &PlayerProfile,
    ) -> std::fmt::Result {
        let rows = self.options.team_composition_rows;
        let skip = profile.games_detail.len().saturating_sub(rows);
        writeln!(out, "\n### Team Compositions (Last {} Games)", rows)?;
        writeln!(out, "```")?;
        for game in profile.games_detail.iter().skip(skip) {
            let result = if game.win { "WIN " } else { "LOSS" };
            writeln!(out)?;
            writeln!(
                out,
                "Game {} - {} ({} Side)",
                game.game_number,
                result,
                game.side.label()
            )?;
            writeln!(out, "  Ally:  {}", game.ally_team.join(", "))?;
            writeln!(out, "  Enemy: {}", game.enemy_team.join(", "))?;
        }
        writeln!(out, "```")
    }

    fn write_request(&self, out: &mut String) -> std::fmt::Result {
        out.push_str(ANALYSIS_REQUEST);
        if let Some(language) = &self.options.response_language {
            writeln!(out)?;
            writeln!(
                out,
                "Please provide a comprehensive analysis in {}.",
                language
            )?;
        }
        Ok(())
    }
}

const ANALYSIS_REQUEST: &str = "
### Analysis Request

Based on the above data, please provide:

1. **Player Strengths**: What does this player do well?
2. **Weaknesses**: What areas need improvement?
3. **Champion Pool Analysis**: Are they a one-trick or versatile?
4. **Role Performance**: Which role do they perform best in?
5. **Recent Form Analysis**: Are they on an upswing or downswing?
6. **Recommendations**:
   - Which champions should they focus on?
   - Which champions should they avoid?
   - What skills should they work on?
7. **Overall Rating**: Rate this player from 1-10 for their elo
";
