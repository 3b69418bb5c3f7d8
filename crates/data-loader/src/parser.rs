//! Parsers for the cleaned catalog export.
//!
//! All three files are `::`-delimited:
//! - titles.dat: header row, then one row per item; every column that is not
//!   a known metadata column is a genre indicator column
//! - ratings.dat: userId::showId::rating (optional header)
//! - users.dat: header row, then one row per user
//!
//! Null cells and exact duplicate rows are dropped here, the same way the
//! upstream export pipeline does it.

use crate::catalog::{self, TitleRecord};
use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use tracing::debug;

const DELIMITER: &str = "::";

/// Metadata columns of titles.dat. Anything else in the header is a genre.
const TITLE_COLUMNS: [&str; 10] = [
    "show_id",
    "type",
    "title",
    "director",
    "cast",
    "country",
    "release_year",
    "rating",
    "duration",
    "description",
];

/// User columns that never leave the data-preparation step
const DROPPED_USER_COLUMNS: [&str; 6] = ["name", "phone", "email", "city", "state", "zip"];

/// Parsed titles.dat: the genre header plus one record per distinct row
#[derive(Debug, Clone)]
pub struct TitleTable {
    pub genre_columns: Vec<String>,
    pub records: Vec<TitleRecord>,
}

/// Read a file into lines, tolerating invalid UTF-8
fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let content = String::from_utf8_lossy(&bytes);
    Ok(content.lines().map(|s| s.to_string()).collect())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Column name to position for a header row
fn header_positions(header: &str) -> HashMap<String, usize> {
    header
        .split(DELIMITER)
        .enumerate()
        .map(|(idx, name)| (name.trim().to_string(), idx))
        .collect()
}

fn require_column(positions: &HashMap<String, usize>, file: &str, column: &str) -> Result<usize> {
    positions
        .get(column)
        .copied()
        .ok_or_else(|| DataLoadError::MissingColumn {
            file: file.to_string(),
            column: column.to_string(),
        })
}

/// Cell at a column, `None` when the column or the value is missing
fn cell(fields: &[&str], position: Option<usize>) -> Option<String> {
    let value = fields.get(position?)?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse the titles.dat file
///
/// Format: header row naming the columns, then `::`-separated rows.
pub fn parse_titles(path: &Path) -> Result<TitleTable> {
    let file = file_name(path);
    let lines = read_lines(path)?;
    let mut lines = lines.iter().enumerate().filter(|(_, l)| !l.trim().is_empty());

    let (_, header) = lines.next().ok_or_else(|| DataLoadError::ParseError {
        file: file.clone(),
        line: 1,
        reason: "Missing header row".to_string(),
    })?;
    let positions = header_positions(header);
    let id_col = require_column(&positions, &file, "show_id")?;
    let title_col = require_column(&positions, &file, "title")?;

    let mut genre_columns: Vec<(usize, String)> = positions
        .iter()
        .filter(|(name, _)| !TITLE_COLUMNS.contains(&name.as_str()))
        .map(|(name, &idx)| (idx, name.clone()))
        .collect();
    genre_columns.sort_by_key(|(idx, _)| *idx);

    let mut seen_rows: HashSet<&str> = HashSet::new();
    let mut records = Vec::new();

    for (idx, line) in lines {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if !seen_rows.insert(line_trimmed) {
            continue; // exact duplicate row
        }

        let fields: Vec<&str> = line_trimmed.split(DELIMITER).collect();

        let id = cell(&fields, Some(id_col))
            .ok_or_else(|| DataLoadError::ParseError {
                file: file.clone(),
                line: line_no,
                reason: "Missing show_id".to_string(),
            })?
            .parse()
            .map_err(|e| DataLoadError::ParseError {
                file: file.clone(),
                line: line_no,
                reason: format!("Invalid show_id: {}", e),
            })?;

        let title = cell(&fields, Some(title_col)).ok_or_else(|| DataLoadError::ParseError {
            file: file.clone(),
            line: line_no,
            reason: "Missing title".to_string(),
        })?;

        let column = |name: &str| cell(&fields, positions.get(name).copied());

        records.push(TitleRecord {
            id,
            title,
            kind: column("type"),
            director: column("director"),
            cast: column("cast"),
            country: column("country"),
            release_year: column("release_year").and_then(|y| y.parse().ok()),
            rating_label: column("rating"),
            duration: column("duration"),
            description: column("description"),
            indicators: genre_columns
                .iter()
                .map(|(pos, _)| {
                    cell(&fields, Some(*pos))
                        .map(|v| catalog::is_truthy(&v))
                        .unwrap_or(false)
                })
                .collect(),
        });
    }

    debug!("Parsed {} title rows from {}", records.len(), file);
    Ok(TitleTable {
        genre_columns: genre_columns.into_iter().map(|(_, name)| name).collect(),
        records,
    })
}

/// Parse the ratings.dat file
///
/// Format: userId::showId::rating
pub fn parse_ratings(path: &Path) -> Result<Vec<RawRating>> {
    let file = file_name(path);
    let lines = read_lines(path)?;
    let mut seen: HashSet<(UserId, ItemId, u32)> = HashSet::new();
    let mut ratings = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line_trimmed.split(DELIMITER).map(str::trim).collect();
        if idx == 0 && fields.first().is_some_and(|f| f.parse::<UserId>().is_err()) {
            continue; // header row
        }
        if fields.len() < 3 || fields.iter().take(3).any(|f| f.is_empty()) {
            continue; // null cell
        }

        let user_id: UserId = fields[0].parse().map_err(|e| DataLoadError::ParseError {
            file: file.clone(),
            line: line_no,
            reason: format!("Invalid userId: {}", e),
        })?;
        let item_id: ItemId = fields[1].parse().map_err(|e| DataLoadError::ParseError {
            file: file.clone(),
            line: line_no,
            reason: format!("Invalid showId: {}", e),
        })?;
        let rating: f32 = fields[2].parse().map_err(|e| DataLoadError::ParseError {
            file: file.clone(),
            line: line_no,
            reason: format!("Invalid rating: {}", e),
        })?;

        if seen.insert((user_id, item_id, rating.to_bits())) {
            ratings.push(RawRating {
                user_id,
                item_id,
                rating,
            });
        }
    }

    debug!("Parsed {} distinct ratings from {}", ratings.len(), file);
    Ok(ratings)
}

/// Parse the users.dat file
///
/// Format: header row naming the columns; `user_id` is required, personal
/// contact columns are dropped and the rest kept as attributes.
pub fn parse_users(path: &Path) -> Result<Vec<User>> {
    let file = file_name(path);
    let lines = read_lines(path)?;
    let mut lines = lines.iter().enumerate().filter(|(_, l)| !l.trim().is_empty());

    let (_, header) = lines.next().ok_or_else(|| DataLoadError::ParseError {
        file: file.clone(),
        line: 1,
        reason: "Missing header row".to_string(),
    })?;
    let names: Vec<String> = header.split(DELIMITER).map(|n| n.trim().to_string()).collect();
    let positions = header_positions(header);
    let id_col = require_column(&positions, &file, "user_id")?;

    let mut seen: HashSet<UserId> = HashSet::new();
    let mut users = Vec::new();

    for (idx, line) in lines {
        let line_no = idx + 1;
        let fields: Vec<&str> = line.trim().split(DELIMITER).collect();

        let id: UserId = cell(&fields, Some(id_col))
            .ok_or_else(|| DataLoadError::ParseError {
                file: file.clone(),
                line: line_no,
                reason: "Missing user_id".to_string(),
            })?
            .parse()
            .map_err(|e| DataLoadError::ParseError {
                file: file.clone(),
                line: line_no,
                reason: format!("Invalid user_id: {}", e),
            })?;

        if !seen.insert(id) {
            continue;
        }

        let attributes: BTreeMap<String, String> = names
            .iter()
            .enumerate()
            .filter(|(pos, name)| {
                *pos != id_col && !DROPPED_USER_COLUMNS.contains(&name.as_str())
            })
            .filter_map(|(pos, name)| cell(&fields, Some(pos)).map(|v| (name.clone(), v)))
            .collect();

        users.push(User { id, attributes });
    }

    debug!("Parsed {} users from {}", users.len(), file);
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("data-loader-parser-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_parse_titles_reads_genre_columns() {
        let path = write_temp(
            "titles_genres.dat",
            "show_id::type::title::country::rating::description::Action::Dramas\n\
             1::Movie::Heat::United States::R::Cops and robbers.::1::0\n\
             2::TV Show::Quiet Days::::::Slow family life.::0::1\n\
             1::Movie::Heat::United States::R::Cops and robbers.::1::0\n",
        );

        let table = parse_titles(&path).unwrap();
        assert_eq!(table.genre_columns, vec!["Action".to_string(), "Dramas".to_string()]);
        // the exact duplicate row is dropped
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].indicators, vec![true, false]);
        assert_eq!(table.records[1].country, None);
        assert_eq!(table.records[1].rating_label, None);
    }

    #[test]
    fn test_parse_titles_requires_show_id() {
        let path = write_temp("titles_no_id.dat", "type::title\nMovie::Heat\n");
        let result = parse_titles(&path);
        assert!(matches!(result, Err(DataLoadError::MissingColumn { .. })));
    }

    #[test]
    fn test_parse_ratings_drops_nulls_and_duplicates() {
        let path = write_temp(
            "ratings.dat",
            "user_id::show_id::rating\n1::10::4.5\n1::10::4.5\n2::10::\n2::11::3\n",
        );

        let ratings = parse_ratings(&path).unwrap();
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[0].rating, 4.5);
        assert_eq!(ratings[1].item_id, 11);
    }

    #[test]
    fn test_parse_ratings_rejects_bad_number() {
        let path = write_temp("ratings_bad.dat", "1::abc::4.0\n");
        assert!(parse_ratings(&path).is_err());
    }

    #[test]
    fn test_parse_users_drops_contact_columns() {
        let path = write_temp(
            "users.dat",
            "user_id::name::email::age::gender\n5::Ann::ann@example.com::34::F\n",
        );

        let users = parse_users(&path).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, 5);
        assert!(!users[0].attributes.contains_key("name"));
        assert!(!users[0].attributes.contains_key("email"));
        assert_eq!(users[0].attributes.get("age").map(String::as_str), Some("34"));
    }

    #[test]
    fn test_missing_file() {
        let result = parse_ratings(Path::new("/definitely/not/here/ratings.dat"));
        assert!(matches!(result, Err(DataLoadError::FileNotFound { .. })));
    }
}
