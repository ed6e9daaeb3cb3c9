use crate::analysis::profile::{percent, Outcome, PlayerProfile};
use crate::api::fetcher::FetchFailure;
use crate::api::generation::{Analysis, AnalysisSection};
use crate::snapshot::SavedReport;
use colored::*;
use tabled::{settings::Style, Table, Tabled};

const PREVIEW_CHARS: usize = 1000;

#[derive(Tabled)]
struct ChampionRow {
    #[tabled(rename = "#")]
    rank: String,
    champion: String,
    games: String,
    win_rate: String,
    kda: String,
}

#[derive(Tabled)]
struct RoleRow {
    role: String,
    games: String,
    win_rate: String,
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn display_warning(message: &str) {
    println!("{} {}", "⚠️".yellow(), message);
}

pub fn display_fetch_failures(failures: &[FetchFailure]) {
    if failures.is_empty() {
        return;
    }
    let rate_limited = failures.iter().filter(|f| f.rate_limited).count();
    display_warning(&format!(
        "{} matches could not be fetched ({} rate limited) and were skipped",
        failures.len(),
        rate_limited
    ));
}

pub fn display_profile_summary(profile: &PlayerProfile) {
    println!(
        "\n{}",
        format!("📊 {} - {} ranked games", profile.player_name, profile.total_games)
            .bold()
            .cyan()
    );
    println!("{}\n", "=".repeat(60).cyan());

    let form: String = profile
        .recent_form
        .iter()
        .map(|outcome| match outcome {
            Outcome::Win => "W".green().to_string(),
            Outcome::Loss => "L".red().to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ");

    println!(
        "{} {} W / {} L ({} WR)  KDA {:.2}",
        "📈 Overall:".bold(),
        profile.wins.to_string().green(),
        profile.losses.to_string().red(),
        percent(profile.wins, profile.total_games),
        profile.kda()
    );
    println!("{} {}\n", "🔥 Recent form:".bold(), form);

    let role_rows: Vec<RoleRow> = profile
        .roles_by_games()
        .into_iter()
        .map(|(role, stat)| RoleRow {
            role: role.to_string(),
            games: stat.games.to_string(),
            win_rate: percent(stat.wins, stat.games),
        })
        .collect();
    let mut table = Table::new(role_rows);
    table.with(Style::rounded());
    println!("{}\n", table);

    let champion_rows: Vec<ChampionRow> = profile
        .champions_by_games()
        .into_iter()
        .take(10)
        .enumerate()
        .map(|(idx, (name, stat))| ChampionRow {
            rank: format!("#{}", idx + 1),
            champion: name.to_string(),
            games: stat.games.to_string(),
            win_rate: percent(stat.wins, stat.games),
            kda: format!("{:.2}", stat.kda()),
        })
        .collect();
    let mut table = Table::new(champion_rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_analysis(analysis: &Analysis) {
    println!("\n{}", "🧠 AI ANALYSIS".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    if analysis.sections.is_empty() {
        println!("{}\n", analysis.full_text);
        return;
    }

    for section in AnalysisSection::ALL {
        if let Some(body) = analysis.section(section) {
            println!("{}", section.title().bold().yellow());
            println!("{}\n", body);
        }
    }
}

pub fn display_prompt_preview(prompt: &str) {
    println!("\n{}", "📋 Prompt Preview".bold().cyan());
    println!("{}", "=".repeat(60).cyan());
    let preview: String = prompt.chars().take(PREVIEW_CHARS).collect();
    println!("{}", preview);
    if prompt.chars().count() > PREVIEW_CHARS {
        println!("{}", "... (truncated)".dimmed());
    }
}

pub fn display_saved(saved: &SavedReport) {
    display_success(&format!("Prompt saved to: {}", saved.prompt_path.display()));
    display_success(&format!("Raw data saved to: {}", saved.data_path.display()));
    if let Some(path) = &saved.analysis_path {
        display_success(&format!("Analysis saved to: {}", path.display()));
    }
}
