use crate::api::endpoints::GENERATION_ENDPOINT;
use crate::config::Config;
use crate::error::AppError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};

use super::models::MessagesResponse;

const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4000;
const TEMPERATURE: f32 = 0.7;

// Generation can take well over the Riot request timeout.
const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Parts of the critique requested by the prompt's closing block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AnalysisSection {
    Strengths,
    Weaknesses,
    ChampionPool,
    RolePerformance,
    RecentForm,
    Recommendations,
    OverallRating,
}

impl AnalysisSection {
    pub const ALL: [AnalysisSection; 7] = [
        AnalysisSection::Strengths,
        AnalysisSection::Weaknesses,
        AnalysisSection::ChampionPool,
        AnalysisSection::RolePerformance,
        AnalysisSection::RecentForm,
        AnalysisSection::Recommendations,
        AnalysisSection::OverallRating,
    ];

    pub fn title(self) -> &'static str {
        match self {
            AnalysisSection::Strengths => "Strengths",
            AnalysisSection::Weaknesses => "Weaknesses",
            AnalysisSection::ChampionPool => "Champion Pool",
            AnalysisSection::RolePerformance => "Role Performance",
            AnalysisSection::RecentForm => "Recent Form",
            AnalysisSection::Recommendations => "Recommendations",
            AnalysisSection::OverallRating => "Overall Rating",
        }
    }

    /// Heading phrases that open this section, lowercase. English and
    /// Korean, the two response languages the prompt is used with.
    fn aliases(self) -> &'static [&'static str] {
        match self {
            AnalysisSection::Strengths => &["strength", "강점"],
            AnalysisSection::Weaknesses => &["weakness", "약점"],
            AnalysisSection::ChampionPool => &["champion pool", "챔피언 풀", "챔피언풀"],
            AnalysisSection::RolePerformance => &["role", "position", "포지션", "역할"],
            AnalysisSection::RecentForm => {
                &["recent form", "form trend", "최근 폼", "최근 경기력", "최근 흐름"]
            }
            AnalysisSection::Recommendations => {
                &["recommendation", "improvement", "추천", "개선", "장기 성장"]
            }
            AnalysisSection::OverallRating => {
                &["rating", "overall score", "종합 평가", "평점", "예상 티어"]
            }
        }
    }

    /// Which section a markdown heading opens, if any, together with the
    /// text following a `:` on the heading line.
    fn from_heading(line: &str) -> Option<(Self, &str)> {
        let heading = line.trim_start().strip_prefix('#')?.trim_start_matches('#');
        let (title, inline) = match heading.split_once(|c: char| c == ':' || c == '：') {
            Some((title, inline)) => (title, inline.trim()),
            None => (heading, ""),
        };
        let title = title.to_lowercase();
        AnalysisSection::ALL
            .into_iter()
            .find(|section| {
                section
                    .aliases()
                    .iter()
                    .any(|alias| starts_word(&title, alias))
            })
            .map(|section| (section, inline))
    }
}

/// Whether `needle` occurs in `haystack` at the start of a word.
fn starts_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(idx, _)| {
        haystack[..idx]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric())
    })
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub full_text: String,
    pub sections: BTreeMap<AnalysisSection, String>,
}

impl Analysis {
    /// Split a markdown response on its headings. Text under headings that
    /// match no known section is only kept in `full_text`.
    pub fn parse(text: &str) -> Self {
        let mut sections = BTreeMap::new();
        let mut current: Option<AnalysisSection> = None;
        let mut buffer: Vec<&str> = Vec::new();

        let mut flush = |section: Option<AnalysisSection>, buffer: &mut Vec<&str>| {
            if let Some(section) = section {
                let body = buffer.join("\n").trim().to_string();
                if !body.is_empty() {
                    sections.entry(section).or_insert(body);
                }
            }
            buffer.clear();
        };

        for line in text.lines() {
            if line.trim_start().starts_with('#') {
                flush(current, &mut buffer);
                current = AnalysisSection::from_heading(line).map(|(section, inline)| {
                    if !inline.is_empty() {
                        buffer.push(inline);
                    }
                    section
                });
            } else {
                buffer.push(line);
            }
        }
        flush(current, &mut buffer);

        Analysis {
            full_text: text.to_string(),
            sections,
        }
    }

    pub fn section(&self, section: AnalysisSection) -> Option<&str> {
        self.sections.get(&section).map(String::as_str)
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

/// Client for the text-generation (messages) endpoint.
pub struct AnalysisClient {
    api_key: String,
    model: String,
    agent: ureq::Agent,
}

impl AnalysisClient {
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let api_key = config.anthropic_api_key.clone().ok_or_else(|| {
            AppError::ConfigError("ANTHROPIC_API_KEY not found in .env file".to_string())
        })?;
        let agent = ureq::AgentBuilder::new()
            .timeout(GENERATION_TIMEOUT)
            .build();
        Ok(AnalysisClient {
            api_key,
            model: config.model.clone(),
            agent,
        })
    }

    pub fn analyze(&self, prompt: &str) -> Result<Analysis, AppError> {
        let request = build_request(&self.model, prompt);
        info!(model = %self.model, prompt_chars = prompt.len(), "requesting analysis");

        let response = self
            .agent
            .post(GENERATION_ENDPOINT)
            .set("x-api-key", &self.api_key)
            .set("anthropic-version", API_VERSION)
            .send_json(&request);

        let body = match response {
            Ok(resp) => resp
                .into_string()
                .map_err(|e| AppError::HttpError(e.to_string()))?,
            Err(ureq::Error::Status(429, _)) => return Err(AppError::RateLimited),
            Err(ureq::Error::Status(code, resp)) => {
                let detail = resp.into_string().unwrap_or_default();
                return Err(AppError::GenerationError(format!("HTTP {}: {}", code, detail)));
            }
            Err(e) => return Err(AppError::HttpError(e.to_string())),
        };

        let text = response_text(&body)?;
        debug!(chars = text.len(), "analysis received");
        Ok(Analysis::parse(&text))
    }
}

fn build_request<'a>(model: &'a str, prompt: &'a str) -> MessagesRequest<'a> {
    MessagesRequest {
        model,
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
        messages: [Message {
            role: "user",
            content: prompt,
        }],
    }
}

/// First text block of a messages response.
fn response_text(body: &str) -> Result<String, AppError> {
    let parsed: MessagesResponse =
        serde_json::from_str(body).map_err(|e| AppError::JsonError(e.to_string()))?;
    parsed
        .content
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
        .ok_or_else(|| AppError::GenerationError("response contained no text".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = "\
Overview line before any heading.

## 1. Player Strengths
- Strong laning on Ahri
- Good vision

## 2. Weaknesses
Dies too often after 25 minutes.

## Champion Pool Analysis
Versatile.

## 7. Overall Rating
7/10
";

    #[test]
    fn request_body_shape() {
        let json = serde_json::to_value(build_request("model-x", "hello")).unwrap();
        assert_eq!(json["model"], "model-x");
        assert_eq!(json["max_tokens"], 4000);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn extracts_first_text_block() {
        let body = r#"{"content": [{"type": "thinking"}, {"type": "text", "text": "Looks good"}]}"#;
        assert_eq!(response_text(body).unwrap(), "Looks good");
    }

    #[test]
    fn empty_response_is_an_error() {
        let body = r#"{"content": []}"#;
        assert!(matches!(
            response_text(body),
            Err(AppError::GenerationError(_))
        ));
    }

    #[test]
    fn splits_sections_on_headings() {
        let analysis = Analysis::parse(RESPONSE);

        assert_eq!(
            analysis.section(AnalysisSection::Strengths),
            Some("- Strong laning on Ahri\n- Good vision")
        );
        assert_eq!(
            analysis.section(AnalysisSection::Weaknesses),
            Some("Dies too often after 25 minutes.")
        );
        assert_eq!(analysis.section(AnalysisSection::ChampionPool), Some("Versatile."));
        assert_eq!(analysis.section(AnalysisSection::OverallRating), Some("7/10"));
        assert_eq!(analysis.section(AnalysisSection::RecentForm), None);
        assert!(analysis.full_text.starts_with("Overview line"));
    }

    fn heading_section(line: &str) -> Option<AnalysisSection> {
        AnalysisSection::from_heading(line).map(|(section, _)| section)
    }

    #[test]
    fn champion_pool_heading_is_not_taken_for_role() {
        assert_eq!(
            heading_section("### Champion Pool Analysis"),
            Some(AnalysisSection::ChampionPool)
        );
        assert_eq!(
            heading_section("### 4. Role Performance"),
            Some(AnalysisSection::RolePerformance)
        );
        assert_eq!(heading_section("plain role text"), None);
    }

    #[test]
    fn aliases_only_match_at_word_starts() {
        assert_eq!(heading_section("## Performance Summary"), None);
        assert_eq!(heading_section("## Team Control"), None);
        assert_eq!(
            heading_section("## **Recommendations**"),
            Some(AnalysisSection::Recommendations)
        );
        assert_eq!(
            heading_section("## 5. Recent Form Analysis"),
            Some(AnalysisSection::RecentForm)
        );
    }

    #[test]
    fn unrelated_heading_does_not_steal_a_section() {
        let text = "## Performance Summary\nSolid all round.\n\n## 5. Recent Form Analysis\nUpswing.\n\n## 7. Overall Rating: 7/10\n";
        let analysis = Analysis::parse(text);

        assert_eq!(analysis.section(AnalysisSection::RecentForm), Some("Upswing."));
        assert_eq!(analysis.section(AnalysisSection::OverallRating), Some("7/10"));
        assert_eq!(analysis.sections.len(), 2);
    }

    #[test]
    fn heading_text_after_colon_is_kept() {
        let analysis = Analysis::parse("## Overall Rating: 8/10\nConsistent climber.");
        assert_eq!(
            analysis.section(AnalysisSection::OverallRating),
            Some("8/10\nConsistent climber.")
        );
    }

    #[test]
    fn korean_headings_are_recognised() {
        let text = "## 1. 강점\n- 라인전이 강함\n\n## 2. 약점\n- 후반 데스가 많음\n\n## 3. 챔피언 풀 분석\n- 아리 원챔\n\n## 7. 종합 평가: 6/10\n";
        let analysis = Analysis::parse(text);

        assert_eq!(analysis.section(AnalysisSection::Strengths), Some("- 라인전이 강함"));
        assert_eq!(analysis.section(AnalysisSection::Weaknesses), Some("- 후반 데스가 많음"));
        assert_eq!(analysis.section(AnalysisSection::ChampionPool), Some("- 아리 원챔"));
        assert_eq!(analysis.section(AnalysisSection::OverallRating), Some("6/10"));
    }
}
