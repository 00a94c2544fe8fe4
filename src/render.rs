//! Terminal rendering for results, CGPA and booklists.
//!
//! Everything writes to an `io::Write` so commands can be captured in
//! tests. Colors come from `colored` and switch off automatically when the
//! output is not a terminal.

use chrono::{DateTime, NaiveDate};
use colored::Colorize;
use std::io::{self, Write};

use crate::booklist::{BooklistItem, TechnologyBooklist};
use crate::cgpa::CgpaResult;
use crate::regulation::{Regulation, SEMESTER_COUNT};
use crate::result::{semesters_newest_first, ExamResult, ReferredSubject, StudentResult};

const REFERRED: &str = "Referred";

/// Format an upstream exam date as `Month D, YYYY`. Dates that are
/// neither RFC 3339 nor `YYYY-MM-DD` are returned unchanged.
pub fn format_exam_date(raw: &str) -> String {
    let trimmed = raw.trim();
    let date = DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"));
    match date {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => trimmed.to_string(),
    }
}

/// GPA text for one attempt: two decimals, or `Referred` when absent.
pub fn format_gpa(gpa: Option<f64>) -> String {
    match gpa {
        Some(gpa) => format!("{gpa:.2}"),
        None => REFERRED.to_string(),
    }
}

pub fn render_result<W: Write>(out: &mut W, result: &StudentResult) -> io::Result<()> {
    writeln!(out, "{}", "📋 Student Result".blue().bold())?;
    writeln!(out, "  Roll:        {}", result.roll.to_string().cyan().bold())?;
    if !result.exam.is_empty() {
        writeln!(out, "  Exam:        {}", result.exam)?;
    }
    writeln!(out, "  Regulation:  {}", result.regulation)?;
    if !result.other_regulations.is_empty() {
        writeln!(
            out,
            "  Also under:  {}",
            result.other_regulations.join(", ").dimmed()
        )?;
    }
    writeln!(
        out,
        "  Institute:   {} ({})",
        result.institute.name, result.institute.code
    )?;
    if !result.institute.district.is_empty() {
        writeln!(out, "  District:    {}", result.institute.district)?;
    }

    if let Some(latest) = &result.latest_result {
        writeln!(out)?;
        writeln!(out, "{}", "Latest result".green().bold())?;
        render_attempt(out, latest, "  ")?;
    }

    if !result.current_referreds.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", "Current referred subjects".yellow().bold())?;
        for subject in &result.current_referreds {
            render_referred(out, subject, "  ")?;
        }
    }

    let semesters = semesters_newest_first(result);
    if !semesters.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", "Semester results".blue().bold())?;
    }
    for semester in semesters {
        writeln!(out, "  {} {}", "Semester".bold(), semester.semester)?;
        if semester.exam_results.is_empty() {
            writeln!(out, "    {}", "No exam attempts".dimmed())?;
        }
        for attempt in &semester.exam_results {
            render_attempt(out, attempt, "    ")?;
        }
    }

    if let Some(cgpa) = result.cgpa {
        writeln!(out)?;
        writeln!(out, "  Reported CGPA: {}", format!("{cgpa:.2}").green().bold())?;
    }
    Ok(())
}

fn render_attempt<W: Write>(out: &mut W, attempt: &ExamResult, indent: &str) -> io::Result<()> {
    let gpa = format_gpa(attempt.gpa);
    let gpa = if attempt.is_referred() {
        gpa.red().bold()
    } else {
        gpa.green().bold()
    };
    write!(out, "{indent}{} GPA {gpa}", "•".blue())?;
    if !attempt.date.trim().is_empty() {
        write!(out, "  {}", format_exam_date(&attempt.date).dimmed())?;
    }
    writeln!(out)?;

    let nested = format!("{indent}    ");
    for subject in &attempt.referreds {
        render_referred(out, subject, &nested)?;
    }
    Ok(())
}

fn render_referred<W: Write>(out: &mut W, subject: &ReferredSubject, indent: &str) -> io::Result<()> {
    let state = if subject.passed {
        "passed".green()
    } else {
        "not passed".red()
    };
    writeln!(
        out,
        "{indent}{} {} {} [{}] {}",
        "→".yellow(),
        subject.subject_code,
        subject.subject_name,
        subject.referred_type,
        state
    )
}

/// Show the semester GPAs that took part and the resulting CGPA.
pub fn render_cgpa<W: Write>(
    out: &mut W,
    regulation: Regulation,
    gpas: &[Option<f64>],
    cgpa: &CgpaResult,
) -> io::Result<()> {
    let table = regulation.weight_table();
    writeln!(
        out,
        "{} Regulation {}",
        "→".green(),
        regulation.id().cyan()
    )?;
    for (i, gpa) in gpas.iter().take(SEMESTER_COUNT).enumerate() {
        let position = i + 1;
        let value = match gpa {
            Some(g) => format!("{g:.2}"),
            None => "-".dimmed().to_string(),
        };
        writeln!(
            out,
            "  Semester {position}  {value:>5}  ({}%)",
            table.weight_at(position)
        )?;
    }
    if cgpa.is_empty() {
        writeln!(out, "{}", "No valid GPA entered".yellow())?;
    }
    writeln!(out, "{} {}", "CGPA:".bold(), cgpa.to_string().green().bold())
}

/// Weight table for one regulation, or all of them side by side.
pub fn render_weights<W: Write>(out: &mut W, regulation: Option<Regulation>) -> io::Result<()> {
    let regulations: Vec<Regulation> = match regulation {
        Some(r) => vec![r],
        None => Regulation::ALL.to_vec(),
    };

    write!(out, "{:<10}", "Semester".bold())?;
    for r in &regulations {
        write!(out, "{:>6}", r.id().cyan())?;
    }
    writeln!(out)?;

    for position in 1..=SEMESTER_COUNT {
        write!(out, "{position:<10}")?;
        for r in &regulations {
            write!(out, "{:>6}", r.weight_table().weight_at(position))?;
        }
        writeln!(out)?;
    }

    write!(out, "{:<10}", "Total")?;
    for r in &regulations {
        write!(out, "{:>6}", r.weight_table().total())?;
    }
    writeln!(out)
}

pub fn render_technologies<W: Write>(out: &mut W, items: &[&BooklistItem]) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "{}", "No technologies match".yellow());
    }
    for item in items {
        writeln!(
            out,
            "  {} {:<4} {} {}",
            "•".blue(),
            item.code.cyan(),
            item.name,
            format!("({})", item.slug).dimmed()
        )?;
    }
    writeln!(out)?;
    writeln!(out, "{} technologies", items.len())
}

/// Subjects per semester. `semester` narrows output to one semester.
pub fn render_booklist<W: Write>(
    out: &mut W,
    booklist: &TechnologyBooklist,
    semester: Option<u32>,
) -> io::Result<()> {
    writeln!(
        out,
        "{} {} ({})",
        "📚".blue(),
        booklist.technology_name.bold(),
        booklist.technology_code.cyan()
    )?;

    let semesters = booklist
        .semesters
        .iter()
        .filter(|s| semester.map_or(true, |n| s.semester == n));
    let mut shown = 0;
    for entry in semesters {
        shown += 1;
        writeln!(out)?;
        writeln!(out, "{} {}", "Semester".green().bold(), entry.semester)?;
        for subject in &entry.subjects {
            writeln!(out, "  {:<7} {}", subject.code.cyan(), subject.name)?;
        }
    }
    if shown == 0 {
        writeln!(out, "{}", "No subjects listed for that semester".yellow())?;
    }
    Ok(())
}
