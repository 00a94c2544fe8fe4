//! Implementations behind the `bteb` subcommands.
//!
//! Commands write their output to any `io::Write` and return the domain
//! value they produced, so the binary stays a thin argument parser.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::io::Write;
use std::time::Duration;

use crate::booklist::{Catalog, Category};
use crate::cache::ResultCache;
use crate::cgpa::{compute_cgpa, parse_gpa, CgpaResult, GpaSheet};
use crate::config::{AppConfig, ConfigManager, ConfigSource};
use crate::error::{BtebError, Result};
use crate::regulation::{Regulation, SEMESTER_COUNT};
use crate::render;
use crate::result::{
    sheet_gpas, CachedResultProvider, HttpResultProvider, ResultProvider, ResultQuery,
    StudentResult,
};

/// Placeholder accepted on the command line for a semester left blank.
pub const BLANK_SLOT: &str = "-";

fn write_json<W: Write, T: serde::Serialize>(out: &mut W, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| BtebError::Other(anyhow::anyhow!("Failed to encode output: {e}")))?;
    writeln!(out, "{text}")?;
    Ok(())
}

/// The HTTP provider, behind the result cache when caching is enabled.
pub fn build_provider(config: &AppConfig) -> Result<Box<dyn ResultProvider>> {
    let http = HttpResultProvider::from_config(config)?;
    if !config.cache_enabled {
        tracing::debug!("Result cache disabled");
        return Ok(Box::new(http));
    }

    let cache = result_cache(config)?;
    tracing::debug!(dir = %cache.dir().display(), ttl_secs = config.cache_ttl_secs, "Using result cache");
    Ok(Box::new(CachedResultProvider::new(http, cache)))
}

fn result_cache(config: &AppConfig) -> Result<ResultCache> {
    let ttl = Duration::from_secs(config.cache_ttl_secs);
    let cache = match &config.cache_dir {
        Some(dir) => ResultCache::new(dir, ttl),
        None => ResultCache::in_default_dir(ttl)?,
    };
    Ok(cache)
}

/// Run a lookup with a spinner on stderr. The spinner hides itself when
/// stderr is not a terminal.
pub fn fetch_with_spinner<P: ResultProvider + ?Sized>(
    provider: &P,
    query: &ResultQuery,
    show_spinner: bool,
) -> Result<StudentResult> {
    let spinner = if show_spinner {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Fetching result for roll {}", query.roll()));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    } else {
        ProgressBar::hidden()
    };

    let outcome = provider.fetch(query);
    spinner.finish_and_clear();
    outcome
}

/// Compute a CGPA from GPAs typed on the command line.
pub struct CgpaCommand {
    regulation: String,
    gpas: Vec<String>,
    json: bool,
}

impl CgpaCommand {
    /// `gpas` are per-semester inputs in order; [`BLANK_SLOT`] or an empty
    /// string leaves a semester unset.
    pub fn new(regulation: impl Into<String>, gpas: Vec<String>) -> Self {
        Self {
            regulation: regulation.into(),
            gpas,
            json: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn execute<W: Write>(&self, out: &mut W) -> Result<CgpaResult> {
        let regulation: Regulation = self.regulation.parse()?;

        let mut sheet = GpaSheet::new();
        for (i, raw) in self.gpas.iter().take(SEMESTER_COUNT).enumerate() {
            let text = if raw.trim() == BLANK_SLOT { "" } else { raw.as_str() };
            sheet.set(i + 1, text);
        }

        let slots: Vec<Option<&str>> = sheet
            .slots()
            .iter()
            .map(|s| (!s.trim().is_empty()).then_some(s.as_str()))
            .collect();
        let cgpa = compute_cgpa(regulation.id(), &slots)?;

        if self.json {
            let gpas: Vec<Option<f64>> = sheet.slots().iter().map(|s| parse_gpa(s)).collect();
            write_json(
                out,
                &json!({
                    "regulation": regulation.id(),
                    "gpas": gpas,
                    "cgpa": cgpa.to_string(),
                    "value": cgpa.value,
                    "semesters_counted": cgpa.semesters_counted,
                    "total_weight": cgpa.total_weight,
                }),
            )?;
            return Ok(cgpa);
        }

        if self.gpas.len() > SEMESTER_COUNT {
            writeln!(
                out,
                "{} Only the first {SEMESTER_COUNT} semesters are used",
                "⚠".yellow()
            )?;
        }
        for position in sheet.invalid_positions() {
            writeln!(
                out,
                "{} Semester {position}: '{}' is not a GPA between 0 and 4, ignored",
                "⚠".yellow(),
                sheet.slots()[position - 1].trim()
            )?;
        }

        let gpas: Vec<Option<f64>> = sheet.slots().iter().map(|s| parse_gpa(s)).collect();
        render::render_cgpa(out, regulation, &gpas, &cgpa)?;
        Ok(cgpa)
    }
}

/// Fetch a student's result and compute the CGPA from it.
pub struct AutofillCommand<P> {
    provider: P,
    json: bool,
    show_spinner: bool,
}

impl<P: ResultProvider> AutofillCommand<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            json: false,
            show_spinner: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn with_spinner(mut self, show: bool) -> Self {
        self.show_spinner = show;
        self
    }

    pub fn execute<W: Write>(&self, out: &mut W, query: &ResultQuery) -> Result<CgpaResult> {
        let result = fetch_with_spinner(&self.provider, query, self.show_spinner && !self.json)?;
        let gpas = sheet_gpas(&result);

        let mut sheet = GpaSheet::new();
        sheet.fill_from(&gpas);
        let cgpa = sheet.compute(query.regulation());

        if self.json {
            write_json(
                out,
                &json!({
                    "roll": query.roll(),
                    "regulation": query.regulation().id(),
                    "gpas": gpas,
                    "cgpa": cgpa.to_string(),
                    "value": cgpa.value,
                    "semesters_counted": cgpa.semesters_counted,
                    "total_weight": cgpa.total_weight,
                }),
            )?;
            return Ok(cgpa);
        }

        let filled = gpas.iter().filter(|g| g.is_some()).count();
        writeln!(
            out,
            "{} Filled {filled} semester(s) from roll {}",
            "✓".green(),
            query.roll().cyan()
        )?;
        render::render_cgpa(out, query.regulation(), &gpas, &cgpa)?;
        Ok(cgpa)
    }
}

/// Fetch and display a student's full result.
pub struct ResultCommand<P> {
    provider: P,
    json: bool,
    show_spinner: bool,
}

impl<P: ResultProvider> ResultCommand<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            json: false,
            show_spinner: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn with_spinner(mut self, show: bool) -> Self {
        self.show_spinner = show;
        self
    }

    pub fn execute<W: Write>(&self, out: &mut W, query: &ResultQuery) -> Result<StudentResult> {
        let result = fetch_with_spinner(&self.provider, query, self.show_spinner && !self.json)?;
        if self.json {
            write_json(out, &result)?;
        } else {
            render::render_result(out, &result)?;
        }
        Ok(result)
    }
}

pub fn weights<W: Write>(out: &mut W, regulation: Option<Regulation>, as_json: bool) -> Result<()> {
    if as_json {
        let regulations: Vec<Regulation> = match regulation {
            Some(r) => vec![r],
            None => Regulation::ALL.to_vec(),
        };
        let tables: serde_json::Map<String, serde_json::Value> = regulations
            .iter()
            .map(|r| (r.id().to_string(), json!(r.weight_table().weights())))
            .collect();
        return write_json(out, &tables);
    }
    render::render_weights(out, regulation)?;
    Ok(())
}

/// Listing, searching and showing technology booklists.
pub struct BooklistCommand<'a> {
    catalog: &'a Catalog,
    json: bool,
}

impl<'a> BooklistCommand<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            json: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn list<W: Write>(&self, out: &mut W, category: Option<Category>) -> Result<usize> {
        let items = match category {
            Some(category) => self.catalog.by_category(category),
            None => self.catalog.technologies().iter().collect(),
        };
        if self.json {
            write_json(out, &items)?;
        } else {
            if let Some(category) = category {
                writeln!(out, "{}", category.label().blue().bold())?;
            }
            render::render_technologies(out, &items)?;
        }
        Ok(items.len())
    }

    pub fn search<W: Write>(&self, out: &mut W, term: &str) -> Result<usize> {
        let items = self.catalog.search(term);
        if self.json {
            write_json(out, &items)?;
        } else {
            render::render_technologies(out, &items)?;
        }
        Ok(items.len())
    }

    pub fn show<W: Write>(&self, out: &mut W, slug: &str, semester: Option<u32>) -> Result<()> {
        let booklist = self.catalog.booklist(slug.trim())?;
        if self.json {
            match semester {
                Some(n) => write_json(out, &booklist.semester(n))?,
                None => write_json(out, booklist)?,
            }
        } else {
            render::render_booklist(out, booklist, semester)?;
        }
        Ok(())
    }
}

pub fn config_show<W: Write>(out: &mut W, manager: &ConfigManager) -> Result<AppConfig> {
    let (config, source) = manager.load()?;
    match &source {
        ConfigSource::Defaults => writeln!(
            out,
            "{} No config file at {}, showing defaults",
            "ℹ".blue(),
            manager.path().display()
        )?,
        ConfigSource::File(path) => {
            writeln!(out, "{} Loaded from {}", "→".green(), path.display())?
        }
    }
    write_json(out, &config)?;
    Ok(config)
}

pub fn config_init<W: Write>(out: &mut W, manager: &ConfigManager, force: bool) -> Result<bool> {
    let written = manager.init(force)?;
    if written {
        writeln!(
            out,
            "{} Wrote default config to {}",
            "✓".green(),
            manager.path().display()
        )?;
    } else {
        writeln!(
            out,
            "{} Config already exists at {} (use --force to overwrite)",
            "ℹ".blue(),
            manager.path().display()
        )?;
    }
    Ok(written)
}

pub fn config_path<W: Write>(out: &mut W, manager: &ConfigManager) -> Result<()> {
    writeln!(out, "{}", manager.path().display())?;
    Ok(())
}

pub fn cache_clear<W: Write>(out: &mut W, config: &AppConfig) -> Result<usize> {
    let cache = result_cache(config)?;
    let removed = cache.clear()?;
    writeln!(
        out,
        "{} Removed {removed} cached result(s) from {}",
        "✓".green(),
        cache.dir().display()
    )?;
    Ok(removed)
}
