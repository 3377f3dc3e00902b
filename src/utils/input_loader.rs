// src/utils/input_loader.rs - Query lists from inline strings and name files
use anyhow::Context;
use log::{info, warn};
use std::collections::HashSet;
use std::path::Path;

use crate::error::SearchError;
use crate::models::Query;
use crate::utils::constants::{MAX_QUERY_NAME_LEN, MIN_QUERY_NAME_LEN};

/// Parses `"John Smith,1990;Jane Doe;Bob Jones"`. An entry whose part after the
/// comma is not a year is kept whole as the name.
pub fn parse_names_input(input: &str) -> Vec<Query> {
    clean_queries(input.split(';').filter_map(parse_entry))
}

/// Reads one entry per line (`name` or `name,birth_year`). A first line whose
/// first field is `name` is treated as a header. Blank lines and `#` comments are skipped.
pub fn load_queries_from_file(path: &Path) -> Result<Vec<Query>, SearchError> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))
        .map_err(|e| SearchError::InputFile(format!("{:#}", e)))?;

    let mut lines = raw.lines().peekable();
    if let Some(first) = lines.peek() {
        let first_field = first.split(',').next().unwrap_or("").trim();
        if first_field.eq_ignore_ascii_case("name") {
            lines.next();
        }
    }

    let queries = clean_queries(
        lines
            .map(str::trim)
            .filter(|line| !line.starts_with('#'))
            .filter_map(parse_entry),
    );

    if queries.is_empty() {
        return Err(SearchError::InputFile(format!(
            "No valid names found in {}",
            path.display()
        )));
    }
    info!("Loaded {} name(s) from {}", queries.len(), path.display());
    Ok(queries)
}

fn parse_entry(entry: &str) -> Option<(String, Option<i32>)> {
    let entry = entry.trim();
    if entry.is_empty() {
        return None;
    }
    match entry.split_once(',') {
        Some((name, year)) => match year.trim().parse::<i32>() {
            Ok(year) => Some((name.trim().to_string(), Some(year))),
            Err(_) => Some((entry.to_string(), None)),
        },
        None => Some((entry.to_string(), None)),
    }
}

/// Length limits plus case-insensitive de-duplication, first occurrence wins.
fn clean_queries<I>(entries: I) -> Vec<Query>
where
    I: IntoIterator<Item = (String, Option<i32>)>,
{
    let mut seen = HashSet::new();
    let mut queries = Vec::new();
    let mut duplicates = 0usize;

    for (name, birth_year) in entries {
        let name = name.trim();
        if name.chars().count() < MIN_QUERY_NAME_LEN {
            warn!("Skipping too short name: '{}'", name);
            continue;
        }
        let name: String = if name.chars().count() > MAX_QUERY_NAME_LEN {
            warn!("Truncating long name: '{}...'", name.chars().take(50).collect::<String>());
            name.chars().take(MAX_QUERY_NAME_LEN).collect()
        } else {
            name.to_string()
        };

        if !seen.insert((name.to_lowercase(), birth_year)) {
            duplicates += 1;
            continue;
        }
        match Query::new(name, birth_year) {
            Ok(query) => queries.push(query),
            Err(e) => warn!("Skipping invalid entry: {}", e),
        }
    }

    if duplicates > 0 {
        info!("Removed {} duplicate name(s)", duplicates);
    }
    queries
}
