/*!
 * Organization research sweeps
 *
 * Searches a fixed set of organization-name terms grouped into categories,
 * keeps the results located in a target state, and summarizes them per
 * category. Terms are searched one at a time; a failed term is logged and
 * skipped so a single bad request does not lose the rest of the sweep.
 */

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

use crate::client::{NpiRegistryClient, NEW_YORK};
use crate::data_types::{ProviderRecord, StateCode};
use crate::export::{CsvExporter, JsonExporter};
use crate::query::SearchCriteria;
use crate::Result;

/// Results kept per search term when sweeping categories
pub const DEFAULT_PER_TERM_LIMIT: u32 = 50;

/// Results kept per name when searching major organizations
pub const DEFAULT_MAJOR_LIMIT: u32 = 10;

/// A named group of organization-name search terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchCategory {
    pub name: String,
    pub terms: Vec<String>,
}

impl ResearchCategory {
    pub fn new(name: &str, terms: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            terms: terms.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Healthcare organization categories searched by default
pub fn default_categories() -> Vec<ResearchCategory> {
    vec![
        ResearchCategory::new("Hospitals", &["Hospital", "Medical Center", "Health System"]),
        ResearchCategory::new("Clinics", &["Clinic", "Medical Group", "Health Center"]),
        ResearchCategory::new("Specialized Care", &["Psychiatric", "Rehabilitation", "Cancer", "Cardiology"]),
        ResearchCategory::new("Nursing Homes", &["Nursing Home", "Skilled Nursing", "Long Term Care"]),
        ResearchCategory::new("Mental Health", &["Mental Health", "Behavioral Health", "Psychiatric"]),
    ]
}

/// Well-known New York health systems
pub fn default_major_organizations() -> Vec<String> {
    [
        "Mount Sinai",
        "New York Presbyterian",
        "NYU Langone",
        "Montefiore",
        "Northwell Health",
        "Memorial Sloan Kettering",
        "Columbia University",
        "Weill Cornell",
        "Lenox Hill",
        "Bellevue Hospital",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// One organization found by a category sweep
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrganizationSummary {
    pub category: String,
    pub search_term: String,
    pub npi_number: Option<String>,
    pub organization_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone: Option<String>,
    pub taxonomy: Option<String>,
    pub enumeration_date: Option<String>,
    pub status: Option<String>,
}

impl OrganizationSummary {
    pub const HEADERS: [&'static str; 11] = [
        "category",
        "search_term",
        "npi_number",
        "organization_name",
        "city",
        "state",
        "zip_code",
        "phone",
        "taxonomy",
        "enumeration_date",
        "status",
    ];

    /// Summarize from the first address and first taxonomy of the record
    pub fn from_record(category: &str, search_term: &str, record: &ProviderRecord) -> Self {
        let address = record.addresses.first();
        Self {
            category: category.to_string(),
            search_term: search_term.to_string(),
            npi_number: record.npi_str().map(str::to_string),
            organization_name: record.organization_name.clone(),
            city: address.and_then(|a| a.city.clone()),
            state: address.and_then(|a| a.state.clone()),
            zip_code: address.and_then(|a| a.postal_code.clone()),
            phone: address.and_then(|a| a.telephone.clone()),
            taxonomy: record.taxonomies.first().and_then(|t| t.desc.clone()),
            enumeration_date: record.enumeration_date.map(|d| d.format("%Y-%m-%d").to_string()),
            status: record.status.clone(),
        }
    }
}

/// One well-known organization match
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompanySummary {
    pub company_name: Option<String>,
    pub npi_number: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone: Option<String>,
    pub taxonomy: Option<String>,
}

impl From<&ProviderRecord> for CompanySummary {
    fn from(record: &ProviderRecord) -> Self {
        let address = record.addresses.first();
        Self {
            company_name: record.organization_name.clone(),
            npi_number: record.npi_str().map(str::to_string),
            city: address.and_then(|a| a.city.clone()),
            state: address.and_then(|a| a.state.clone()),
            zip_code: address.and_then(|a| a.postal_code.clone()),
            phone: address.and_then(|a| a.telephone.clone()),
            taxonomy: record.taxonomies.first().and_then(|t| t.desc.clone()),
        }
    }
}

/// Outcome of a category sweep
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResearchReport {
    /// Target state of the sweep
    pub state: String,
    pub rows: Vec<OrganizationSummary>,
    /// Rows per category, in category order
    pub category_counts: Vec<(String, usize)>,
    /// Terms whose request failed
    pub failed_terms: Vec<String>,
}

/// Files written by `ResearchReport::save`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedReport {
    pub json_path: PathBuf,
    /// None when there were no rows to write
    pub csv_path: Option<PathBuf>,
}

impl ResearchReport {
    pub fn total(&self) -> usize {
        self.rows.len()
    }

    /// Write `<state>_healthcare_companies_<timestamp>.json` and `.csv` under `dir`
    pub fn save(&self, dir: &Path) -> Result<SavedReport> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        self.save_with_stem(dir, &format!("{}_healthcare_companies_{}", self.state.to_lowercase(), timestamp))
    }

    fn save_with_stem(&self, dir: &Path, stem: &str) -> Result<SavedReport> {
        std::fs::create_dir_all(dir)?;

        let json_path = dir.join(format!("{}.json", stem));
        JsonExporter::new().write_values(&self.rows, &json_path)?;

        let csv_path = if self.rows.is_empty() {
            None
        } else {
            let path = dir.join(format!("{}.csv", stem));
            CsvExporter::new().write_rows(&OrganizationSummary::HEADERS, &self.rows, &path)?;
            Some(path)
        };

        info!(rows = self.rows.len(), json = %json_path.display(), "saved research report");
        Ok(SavedReport { json_path, csv_path })
    }

    /// Write `research_summary_<timestamp>.png` under `dir`
    ///
    /// Charts rows per category next to the total and `major_found`.
    #[cfg(feature = "chart")]
    pub fn save_chart(&self, dir: &Path, major_found: usize) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("research_summary_{}.png", timestamp));
        crate::chart::write_summary_chart(&path, &self.category_counts, self.total(), major_found)?;
        info!(chart = %path.display(), "saved research chart");
        Ok(path)
    }

    /// Print totals and a sample of the rows
    pub fn print_summary(&self, sample: usize) {
        println!("=== {} Healthcare Research Summary ===", self.state);
        println!("Total organizations found: {}", self.total());
        for (category, count) in &self.category_counts {
            println!("  {}: {} organizations", category, count);
        }
        if !self.failed_terms.is_empty() {
            println!("Failed search terms: {}", self.failed_terms.join(", "));
        }

        for (i, row) in self.rows.iter().take(sample).enumerate() {
            println!();
            println!("{}. {}", i + 1, row.organization_name.as_deref().unwrap_or("N/A"));
            println!("   NPI: {}", row.npi_number.as_deref().unwrap_or("N/A"));
            println!(
                "   Location: {}, {} {}",
                row.city.as_deref().unwrap_or(""),
                row.state.as_deref().unwrap_or(""),
                row.zip_code.as_deref().unwrap_or("")
            );
            println!("   Category: {}", row.category);
            println!("   Type: {}", row.taxonomy.as_deref().unwrap_or(""));
        }
    }
}

/// Runs research sweeps against a client
pub struct Researcher<'a> {
    client: &'a NpiRegistryClient,
    state: String,
    per_term_limit: u32,
    major_limit: u32,
    show_progress: bool,
}

impl<'a> Researcher<'a> {
    /// Researcher targeting New York with default limits
    pub fn new(client: &'a NpiRegistryClient) -> Self {
        Self {
            show_progress: client.config().enable_progress_bar,
            client,
            state: NEW_YORK.to_string(),
            per_term_limit: DEFAULT_PER_TERM_LIMIT,
            major_limit: DEFAULT_MAJOR_LIMIT,
        }
    }

    /// Target a different state
    pub fn state(mut self, state: &str) -> Result<Self> {
        self.state = StateCode::new(state)?.as_str().to_string();
        Ok(self)
    }

    pub fn per_term_limit(mut self, limit: u32) -> Self {
        self.per_term_limit = limit;
        self
    }

    pub fn major_limit(mut self, limit: u32) -> Self {
        self.major_limit = limit;
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn organization_criteria(&self, name: &str, limit: u32) -> SearchCriteria {
        SearchCriteria::builder()
            .organization_name(name)
            .organizations_only()
            .limit(limit)
            .build()
    }

    /// Search every term of every category, keeping organizations in the target state
    ///
    /// Invalid limits fail up front; request failures for single terms are recorded
    /// in `failed_terms` and the sweep continues.
    pub async fn research_categories(&self, categories: &[ResearchCategory]) -> Result<ResearchReport> {
        // Validate once so a bad limit is not reported as a failure of every term
        self.organization_criteria("probe", self.per_term_limit).validate()?;

        let state = self.state.as_str();
        let mut report = ResearchReport {
            state: state.to_string(),
            ..Default::default()
        };

        let total_terms: usize = categories.iter().map(|c| c.terms.len()).sum();
        let progress = self.progress_bar(total_terms as u64);

        for category in categories {
            let mut found = 0usize;

            for term in &category.terms {
                progress.set_message(term.clone());
                match self.client.search(&self.organization_criteria(term, self.per_term_limit)).await {
                    Ok(records) => {
                        for record in records.iter().filter(|r| r.has_address_in(state)) {
                            report.rows.push(OrganizationSummary::from_record(&category.name, term, record));
                            found += 1;
                        }
                    }
                    Err(e) => {
                        warn!(term = %term, error = %e, "research term failed, skipping");
                        report.failed_terms.push(term.clone());
                    }
                }
                progress.inc(1);
            }

            info!(category = %category.name, found, "research category complete");
            report.category_counts.push((category.name.clone(), found));
        }

        progress.finish();
        Ok(report)
    }

    /// Look up well-known organizations by name, keeping matches in the target state
    pub async fn search_major_organizations(&self, names: &[String]) -> Result<Vec<CompanySummary>> {
        self.organization_criteria("probe", self.major_limit).validate()?;

        let state = self.state.as_str();
        let mut found = Vec::new();

        for name in names {
            match self.client.search(&self.organization_criteria(name, self.major_limit)).await {
                Ok(records) => {
                    found.extend(
                        records.iter()
                            .filter(|r| r.has_address_in(state))
                            .map(CompanySummary::from),
                    );
                }
                Err(e) => warn!(name = %name, error = %e, "major organization search failed, skipping"),
            }
        }

        Ok(found)
    }

    #[cfg(feature = "progress")]
    fn progress_bar(&self, len: u64) -> SweepProgress {
        if !self.show_progress {
            return SweepProgress(None);
        }
        let pb = ProgressBar::new(len);
        let template = "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";
        if let Ok(style) = ProgressStyle::default_bar().template(template) {
            pb.set_style(style.progress_chars("#>-"));
        }
        SweepProgress(Some(pb))
    }

    #[cfg(not(feature = "progress"))]
    fn progress_bar(&self, _len: u64) -> SweepProgress {
        SweepProgress
    }
}

#[cfg(feature = "progress")]
struct SweepProgress(Option<ProgressBar>);

#[cfg(feature = "progress")]
impl SweepProgress {
    fn set_message(&self, msg: String) {
        if let Some(pb) = &self.0 {
            pb.set_message(msg);
        }
    }

    fn inc(&self, delta: u64) {
        if let Some(pb) = &self.0 {
            pb.inc(delta);
        }
    }

    fn finish(&self) {
        if let Some(pb) = &self.0 {
            pb.finish_with_message("done");
        }
    }
}

#[cfg(not(feature = "progress"))]
struct SweepProgress;

#[cfg(not(feature = "progress"))]
impl SweepProgress {
    fn set_message(&self, _msg: String) {}
    fn inc(&self, _delta: u64) {}
    fn finish(&self) {}
}
