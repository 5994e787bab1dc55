use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::types::{FileError, FileType};
use crate::clock::{DayOfYear, Timestamp, days_in_year};

const FIRST_YEAR: i64 = 1;
const LAST_YEAR: i64 = 9999;

pub fn file_type_from_path(path: &Path) -> Result<FileType, FileError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => Ok(FileType::Csv),
        Some("dat" | "txt" | "wth" | "inp") | None => Ok(FileType::Whitespace),
        _ => Err(FileError::UnknownFileType(path.to_path_buf())),
    }
}

/// Comments start with `#`; blank lines carry no record.
pub fn is_data_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('#')
}

/// Splits a record line into numbers. A field written `count*value` stands for `count` copies
/// of `value`.
pub fn split_fields(line: &str, file_type: FileType) -> Result<Vec<f64>, String> {
    let tokens: Vec<&str> = match file_type {
        FileType::Whitespace => line.split_whitespace().collect(),
        FileType::Csv => line
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect(),
    };

    let mut values = Vec::with_capacity(tokens.len());
    for token in tokens {
        match token.split_once('*') {
            Some((count, value)) => {
                let count: usize = count
                    .parse()
                    .map_err(|_| format!("invalid repeat count in '{}'", token))?;
                let value = parse_number(value)?;
                values.extend(std::iter::repeat_n(value, count));
            }
            None => values.push(parse_number(token)?),
        }
    }
    Ok(values)
}

fn parse_number(token: &str) -> Result<f64, String> {
    token
        .parse::<f64>()
        .map_err(|_| format!("invalid number '{}'", token))
}

/// Checks a row has at least `expected` columns.
pub fn require_columns(row: &[f64], expected: usize) -> Result<(), String> {
    if row.len() < expected {
        return Err(format!(
            "expected at least {} columns, found {}",
            expected,
            row.len()
        ));
    }
    Ok(())
}

/// Reads a whole-number column such as a day, hour or year.
pub fn integer_field(value: f64, name: &str) -> Result<i64, String> {
    if value.fract() != 0.0 || !value.is_finite() {
        return Err(format!("{} must be a whole number, found {}", name, value));
    }
    Ok(value as i64)
}

/// Reads the `day` and `year` columns of a record. The day must fall inside that year.
pub fn day_fields(day: f64, year: f64) -> Result<DayOfYear, String> {
    let julian = integer_field(day, "day")?;
    let year = integer_field(year, "year")?;
    if !(FIRST_YEAR..=LAST_YEAR).contains(&year) {
        return Err(format!(
            "year must be within {}..={}, found {}",
            FIRST_YEAR, LAST_YEAR, year
        ));
    }
    let year = year as i32;
    let last_day = days_in_year(year) as i64;
    if !(1..=last_day).contains(&julian) {
        return Err(format!(
            "day must be within 1..={} in {}, found {}",
            last_day, year, julian
        ));
    }
    Ok(DayOfYear::new(julian, year))
}

/// Reads `day`, `hour` and `year` columns. Hour 24 is midnight opening the next day.
pub fn stamp_fields(day: f64, hour: f64, year: f64) -> Result<Timestamp, String> {
    let day = day_fields(day, year)?;
    let hour = integer_field(hour, "hour")?;
    if !(0..=24).contains(&hour) {
        return Err(format!("hour must be within 0..=24, found {}", hour));
    }
    Ok(Timestamp::new(day.julian() as i64, hour as u8, day.year()))
}

/// Locates an input file: `name` as given, then under `base_dir`, then anywhere below
/// `base_dir`.
pub fn resolve_input(base_dir: &Path, name: &str) -> Result<PathBuf, FileError> {
    let given = Path::new(name);
    if given.is_absolute() && given.exists() {
        return Ok(given.to_path_buf());
    }

    let direct_path = base_dir.join(name);
    if direct_path.exists() {
        return Ok(direct_path);
    }

    let file_name = given
        .file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_else(|| name.to_string());

    search_file_recursively(base_dir, &file_name).ok_or_else(|| FileError::NotFound {
        name: name.to_string(),
        base: base_dir.to_path_buf(),
    })
}

fn search_file_recursively(base_dir: &Path, filename: &str) -> Option<PathBuf> {
    if !base_dir.exists() {
        return None;
    }

    for entry in WalkDir::new(base_dir).into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_file()
            && let Some(file_name) = entry.path().file_name()
            && file_name.to_string_lossy() == filename
        {
            return Some(entry.path().to_path_buf());
        }
    }

    None
}
