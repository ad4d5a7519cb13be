//! Publication record derivation.
//!
//! Turns a two-column `title,link` export into enriched [`Publication`]
//! records. Year, topic and impact are synthetic: they are derived from the
//! link digits, title keywords and line position respectively.

use crate::error::{BiopubsError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, error, info};
use url::Url;

/// First year of the synthetic year range
pub const BASE_YEAR: u16 = 2020;

/// Number of years the synthetic year cycles through
const YEAR_SPAN: u64 = 5;

/// `"<title>",<link>` or `<title>,<link>`
static LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"?([^"]*)"?,(.+)$"#).expect("line pattern is valid"));

/// PubMed Central id embedded in an article link
static PMC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/PMC([0-9]{7})/").expect("PMC pattern is valid"));

/// Research area assigned from title keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "Bone & Skeletal")]
    BoneSkeletal,
    #[serde(rename = "Cellular Biology")]
    CellularBiology,
    #[serde(rename = "Plant Science")]
    PlantScience,
    #[serde(rename = "Radiation Biology")]
    RadiationBiology,
    #[serde(rename = "Human Physiology")]
    HumanPhysiology,
    Microbiology,
    Genomics,
    Immunology,
    Other,
}

/// Keyword groups in priority order. The first group with a hit wins.
const TOPIC_RULES: &[(&[&str], Topic)] = &[
    (&["bone", "skeletal"], Topic::BoneSkeletal),
    (&["cell", "cellular"], Topic::CellularBiology),
    (&["plant", "arabidopsis"], Topic::PlantScience),
    (&["radiation", "cosmic"], Topic::RadiationBiology),
    (&["muscle", "cardiac"], Topic::HumanPhysiology),
    (&["bacteria", "microbial"], Topic::Microbiology),
    (&["gene", "genome"], Topic::Genomics),
    (&["immune", "antibody"], Topic::Immunology),
];

impl Topic {
    /// All topics in display order
    pub const ALL: [Topic; 9] = [
        Topic::BoneSkeletal,
        Topic::CellularBiology,
        Topic::PlantScience,
        Topic::RadiationBiology,
        Topic::HumanPhysiology,
        Topic::Microbiology,
        Topic::Genomics,
        Topic::Immunology,
        Topic::Other,
    ];

    /// Human-readable label, also used as the serialized form
    pub fn label(self) -> &'static str {
        match self {
            Topic::BoneSkeletal => "Bone & Skeletal",
            Topic::CellularBiology => "Cellular Biology",
            Topic::PlantScience => "Plant Science",
            Topic::RadiationBiology => "Radiation Biology",
            Topic::HumanPhysiology => "Human Physiology",
            Topic::Microbiology => "Microbiology",
            Topic::Genomics => "Genomics",
            Topic::Immunology => "Immunology",
            Topic::Other => "Other",
        }
    }

    /// Classify a title by substring keyword match (case-insensitive).
    pub fn classify(title: &str) -> Topic {
        let title = title.to_lowercase();
        TOPIC_RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| title.contains(k)))
            .map(|(_, topic)| *topic)
            .unwrap_or(Topic::Other)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Impact tier, cycled by line position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Impact {
    Critical,
    High,
    Medium,
}

impl Impact {
    /// Tier for a 1-based line index.
    pub fn for_line(index: usize) -> Impact {
        match index % 3 {
            0 => Impact::Critical,
            1 => Impact::High,
            _ => Impact::Medium,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Impact::Critical => "Critical",
            Impact::High => "High",
            Impact::Medium => "Medium",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single enriched catalog record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    /// 1-based line position in the source (header excluded)
    pub id: usize,
    /// Article title
    pub title: String,
    /// Article URL
    pub link: String,
    /// Synthetic year (2020..=2024)
    pub year: u16,
    /// Keyword-derived topic
    pub topic: Topic,
    /// Position-derived impact tier
    pub impact: Impact,
}

/// A non-blank line that did not have the `title,link` shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line position
    pub line: usize,
    /// Trimmed line content
    pub content: String,
}

/// Records plus the malformed lines that were dropped on the way
#[derive(Debug, Default)]
pub struct Derivation {
    pub publications: Vec<Publication>,
    pub skipped: Vec<SkippedLine>,
}

/// Synthetic year from a `/PMC<7 digits>/` segment of the link.
///
/// Links without one fall back to [`BASE_YEAR`].
pub fn derive_year(link: &str) -> u16 {
    let pmc_id = PMC_REGEX
        .captures(link)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .unwrap_or(0);
    // pmc_id % 5 is always < 5
    BASE_YEAR + (pmc_id % YEAR_SPAN) as u16
}

/// Split a trimmed line into `(title, link)`.
fn parse_line(line: &str) -> Option<(String, String)> {
    let caps = LINE_REGEX.captures(line)?;
    let raw_title = caps.get(1)?.as_str();
    let title = raw_title.strip_prefix('"').unwrap_or(raw_title);
    let title = title.strip_suffix('"').unwrap_or(title);
    let link = caps.get(2)?.as_str().trim();
    Some((title.to_string(), link.to_string()))
}

/// Derive publications and keep track of malformed lines.
pub fn derive_with_report(text: &str) -> Derivation {
    let mut derivation = Derivation::default();

    // Line 0 is the header
    for (index, raw) in text.split('\n').enumerate().skip(1) {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let Some((title, link)) = parse_line(line) else {
            derivation.skipped.push(SkippedLine {
                line: index,
                content: line.to_string(),
            });
            continue;
        };

        let year = derive_year(&link);
        let topic = Topic::classify(&title);
        derivation.publications.push(Publication {
            id: index,
            title,
            link,
            year,
            topic,
            impact: Impact::for_line(index),
        });
    }

    if !derivation.skipped.is_empty() {
        debug!(
            skipped = derivation.skipped.len(),
            "Dropped malformed publication lines"
        );
    }

    derivation
}

/// Derive publications from the full text of a source export.
///
/// Malformed lines are dropped silently.
pub fn derive_publications(text: &str) -> Vec<Publication> {
    derive_with_report(text).publications
}

/// Where the publication export is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Local file
    Path(PathBuf),
    /// Remote `http(s)` resource
    Url(Url),
}

impl DataSource {
    /// Parse a source string: `http(s)://` URLs are remote, everything else is a path.
    pub fn parse(source: &str) -> Result<Self> {
        let source = source.trim();
        if source.starts_with("http://") || source.starts_with("https://") {
            let url = Url::parse(source)
                .map_err(|e| BiopubsError::Config(format!("Invalid source URL: {}", e)))?;
            Ok(DataSource::Url(url))
        } else if source.is_empty() {
            Err(BiopubsError::Config("Publication source is empty".to_string()))
        } else {
            Ok(DataSource::Path(PathBuf::from(source)))
        }
    }

    /// Read the whole resource as text.
    pub async fn fetch_text(&self, client: &reqwest::Client) -> Result<String> {
        match self {
            DataSource::Path(path) => Ok(tokio::fs::read_to_string(path).await?),
            DataSource::Url(url) => {
                let response = client.get(url.clone()).send().await?;
                let response = response.error_for_status()?;
                Ok(response.text().await?)
            }
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Fetch and derive the catalog, keeping the lines that could not be parsed.
///
/// A source that cannot be read yields an empty derivation; the cause is logged.
pub async fn load_with_report(source: &DataSource, client: &reqwest::Client) -> Derivation {
    match source.fetch_text(client).await {
        Ok(text) => {
            let derivation = derive_with_report(&text);
            info!(
                source = %source,
                count = derivation.publications.len(),
                skipped = derivation.skipped.len(),
                "Loaded publications"
            );
            derivation
        }
        Err(e) => {
            error!(source = %source, error = %e, "Error loading publications");
            Derivation::default()
        }
    }
}

/// Fetch and derive the catalog.
pub async fn load_publications(source: &DataSource, client: &reqwest::Client) -> Vec<Publication> {
    load_with_report(source, client).await.publications
}

/// Save publications to a CSV file with a header row.
pub fn save_csv(path: &Path, publications: &[&Publication]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(true).from_path(path)?;

    for publication in publications {
        wtr.serialize(publication)?;
    }

    wtr.flush()?;
    info!(path = %path.display(), count = publications.len(), "Saved publications CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Title,Link";

    fn export(lines: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for line in lines {
            text.push('\n');
            text.push_str(line);
        }
        text
    }

    #[test]
    fn test_quoted_and_unquoted_titles() {
        let text = export(&[
            r#""Microgravity, muscle and bone",https://www.ncbi.nlm.nih.gov/pmc/articles/PMC3630201/"#,
            "Spaceflight effects on mice,https://example.org/a",
        ]);
        let pubs = derive_publications(&text);
        assert_eq!(pubs.len(), 2);
        assert_eq!(pubs[0].title, "Microgravity, muscle and bone");
        assert_eq!(pubs[0].link, "https://www.ncbi.nlm.nih.gov/pmc/articles/PMC3630201/");
        assert_eq!(pubs[1].title, "Spaceflight effects on mice");
        assert_eq!(pubs[1].link, "https://example.org/a");
    }

    #[test]
    fn test_ids_track_line_position() {
        let text = export(&["A,https://a", "", "no comma here", "   ", "B,https://b"]);
        let pubs = derive_publications(&text);
        let ids: Vec<usize> = pubs.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 5]);
    }

    #[test]
    fn test_header_is_ignored() {
        let pubs = derive_publications("Bone,https://header-looks-like-data");
        assert!(pubs.is_empty());
    }

    #[test]
    fn test_unquoted_title_splits_on_last_comma() {
        let text = export(&["Cells, tissues, organs,https://x.org/1"]);
        let pubs = derive_publications(&text);
        assert_eq!(pubs[0].title, "Cells, tissues, organs");
        assert_eq!(pubs[0].link, "https://x.org/1");
    }

    #[test]
    fn test_link_is_trimmed() {
        let text = export(&["Title,   https://x.org/2   "]);
        assert_eq!(derive_publications(&text)[0].link, "https://x.org/2");
    }

    #[test]
    fn test_derive_year() {
        assert_eq!(derive_year("https://www.ncbi.nlm.nih.gov/pmc/articles/PMC1234567/"), 2022);
        assert_eq!(derive_year("https://www.ncbi.nlm.nih.gov/pmc/articles/PMC3630201/"), 2021);
        assert_eq!(derive_year("https://example.org/no-id"), 2020);
        // Six digits is not a PMC id
        assert_eq!(derive_year("https://x.org/PMC123456/"), 2020);
        // Missing trailing slash
        assert_eq!(derive_year("https://x.org/PMC1234567"), 2020);
    }

    #[test]
    fn test_classify_topic() {
        assert_eq!(Topic::classify("Bone density loss in microgravity"), Topic::BoneSkeletal);
        assert_eq!(Topic::classify("Arabidopsis growth in microgravity"), Topic::PlantScience);
        assert_eq!(Topic::classify("Rodent habitat design"), Topic::Other);
        assert_eq!(Topic::classify("COSMIC rays and DNA"), Topic::RadiationBiology);
        // Earlier rules win
        assert_eq!(Topic::classify("Stem cell response to radiation"), Topic::CellularBiology);
        assert_eq!(Topic::classify("Skeletal muscle atrophy"), Topic::BoneSkeletal);
        // Substring match, as in "genetic"
        assert_eq!(Topic::classify("Genetic drift in flies"), Topic::Genomics);
    }

    #[test]
    fn test_impact_cycle() {
        assert_eq!(Impact::for_line(3), Impact::Critical);
        assert_eq!(Impact::for_line(4), Impact::High);
        assert_eq!(Impact::for_line(5), Impact::Medium);
    }

    #[test]
    fn test_impact_uses_line_index_not_record_count() {
        let text = export(&["malformed", "A,https://a", "B,https://b"]);
        let pubs = derive_publications(&text);
        assert_eq!(pubs[0].id, 2);
        assert_eq!(pubs[0].impact, Impact::Medium);
        assert_eq!(pubs[1].id, 3);
        assert_eq!(pubs[1].impact, Impact::Critical);
    }

    #[test]
    fn test_report_lists_skipped_lines() {
        let text = export(&["A,https://a", "", "garbage", "\"unterminated"]);
        let derivation = derive_with_report(&text);
        assert_eq!(derivation.publications.len(), 1);
        assert_eq!(
            derivation.skipped,
            vec![
                SkippedLine { line: 3, content: "garbage".to_string() },
                SkippedLine { line: 4, content: "\"unterminated".to_string() },
            ]
        );
    }

    #[test]
    fn test_crlf_lines() {
        let text = "Title,Link\r\nBone study,https://x.org/PMC0000003/\r\n";
        let pubs = derive_publications(text);
        assert_eq!(pubs.len(), 1);
        assert_eq!(pubs[0].link, "https://x.org/PMC0000003/");
        assert_eq!(pubs[0].year, 2023);
    }

    #[test]
    fn test_serialized_labels() -> Result<()> {
        let text = export(&["Bone study,https://x.org/b"]);
        let json = serde_json::to_value(&derive_publications(&text)[0])?;
        assert_eq!(json["topic"], "Bone & Skeletal");
        assert_eq!(json["impact"], "High");
        Ok(())
    }

    #[test]
    fn test_data_source_parse() -> Result<()> {
        assert!(matches!(DataSource::parse("https://example.org/p.csv")?, DataSource::Url(_)));
        assert_eq!(
            DataSource::parse("data/publications.csv")?,
            DataSource::Path(PathBuf::from("data/publications.csv"))
        );
        assert!(DataSource::parse("  ").is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_load_from_file() -> Result<()> {
        let mut temp = NamedTempFile::new()?;
        write!(temp, "{}", export(&["Plant roots,https://x.org/PMC0000001/"]))?;

        let source = DataSource::Path(temp.path().to_path_buf());
        let pubs = load_publications(&source, &reqwest::Client::new()).await;
        assert_eq!(pubs.len(), 1);
        assert_eq!(pubs[0].topic, Topic::PlantScience);
        assert_eq!(pubs[0].year, 2021);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_source_yields_empty() {
        let source = DataSource::Path(PathBuf::from("/nonexistent/publications.csv"));
        assert!(load_publications(&source, &reqwest::Client::new()).await.is_empty());
    }

    #[tokio::test]
    async fn test_load_with_report() -> Result<()> {
        let mut temp = NamedTempFile::new()?;
        write!(
            temp,
            "{}",
            export(&["Plant roots,https://x.org/PMC0000001/", "no link on this line"])
        )?;

        let client = reqwest::Client::new();
        let source = DataSource::Path(temp.path().to_path_buf());
        let derivation = load_with_report(&source, &client).await;
        assert_eq!(derivation.publications.len(), 1);
        assert_eq!(derivation.skipped.len(), 1);
        assert_eq!(derivation.skipped[0].content, "no link on this line");

        let missing = DataSource::Path(PathBuf::from("/nonexistent/publications.csv"));
        let empty = load_with_report(&missing, &client).await;
        assert!(empty.publications.is_empty());
        assert!(empty.skipped.is_empty());
        Ok(())
    }

    #[test]
    fn test_save_csv() -> Result<()> {
        let temp = NamedTempFile::new()?;
        let text = export(&["\"Bone, cells\",https://x.org/b"]);
        let pubs = derive_publications(&text);
        let refs: Vec<&Publication> = pubs.iter().collect();
        save_csv(temp.path(), &refs)?;

        let written = std::fs::read_to_string(temp.path())?;
        let mut lines = written.lines();
        assert_eq!(lines.next(), Some("id,title,link,year,topic,impact"));
        assert_eq!(
            lines.next(),
            Some("1,\"Bone, cells\",https://x.org/b,2020,Bone & Skeletal,High")
        );
        Ok(())
    }
}
