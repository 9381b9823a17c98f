//! NAIF Leapseconds Kernel (LSK) text file parser.
//!
//! Parses the `\begindata` section of an LSK file to extract the
//! `DELTET/DELTA_AT` leap-second history and the `DELTET/DELTA_T_A`
//! (TT−TAI) constant.
//!
//! Reference: NAIF Time Required Reading (public domain, US Government work product).

use crate::error::TimeError;
use crate::julian::{calendar_to_mjd, month_from_abbrev};

/// One leap-second table entry: TAI−UTC from 0h UTC of `mjd` onwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeapEntry {
    pub mjd: f64,
    pub tai_minus_utc: f64,
}

/// Parsed contents of an LSK file.
#[derive(Debug, Clone)]
pub struct LskData {
    /// TT − TAI offset in seconds (DELTET/DELTA_T_A).
    pub delta_t_a: f64,
    /// Leap-second table, sorted by MJD.
    pub leap_seconds: Vec<LeapEntry>,
}

/// Parse an LSK file from its text content.
pub fn parse_lsk(content: &str) -> Result<LskData, TimeError> {
    let data_text = extract_data_section(content)?;
    let pool = parse_kernel_pool(&data_text)?;

    let delta_t_a = get_scalar(&pool, "DELTET/DELTA_T_A")?;
    let delta_at_vals = pool
        .get("DELTET/DELTA_AT")
        .ok_or_else(|| TimeError::LskParse("missing DELTET/DELTA_AT".into()))?;

    let leap_seconds = build_leap_table(delta_at_vals)?;
    log::debug!(
        "parsed LSK: {} leap-second entries, TT-TAI = {delta_t_a} s",
        leap_seconds.len()
    );

    Ok(LskData {
        delta_t_a,
        leap_seconds,
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Pool of named variables: name → list of f64 values.
type KernelPool = std::collections::HashMap<String, Vec<f64>>;

/// Find text between `\begindata` and `\begintext` (or EOF).
fn extract_data_section(content: &str) -> Result<String, TimeError> {
    let mut in_data = false;
    let mut data_lines = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("\\begindata") {
            in_data = true;
            continue;
        }
        if trimmed.eq_ignore_ascii_case("\\begintext") {
            in_data = false;
            continue;
        }
        if in_data {
            data_lines.push(line);
        }
    }

    if data_lines.is_empty() {
        return Err(TimeError::LskParse("no \\begindata section found".into()));
    }

    Ok(data_lines.join("\n"))
}

/// Parse NAIF kernel pool assignments, scalar or parenthesised arrays
/// spanning several lines.
fn parse_kernel_pool(text: &str) -> Result<KernelPool, TimeError> {
    let mut pool = KernelPool::new();
    let mut current_name: Option<String> = None;
    let mut current_values: Vec<f64> = Vec::new();
    let mut in_array = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(eq_pos) = trimmed.find('=') {
            if let Some(name) = current_name.take() {
                pool.insert(name, std::mem::take(&mut current_values));
            }

            let name = trimmed[..eq_pos].trim().to_string();
            let mut rhs = trimmed[eq_pos + 1..].trim();
            if let Some(stripped) = rhs.strip_prefix('(') {
                in_array = true;
                rhs = stripped;
            }
            if let Some(stripped) = rhs.strip_suffix(')') {
                in_array = false;
                rhs = stripped;
            }

            current_name = Some(name);
            parse_values(rhs, &mut current_values)?;
        } else if in_array {
            let line_data = match trimmed.strip_suffix(')') {
                Some(stripped) => {
                    in_array = false;
                    stripped
                }
                None => trimmed,
            };
            parse_values(line_data, &mut current_values)?;
        }
    }

    if let Some(name) = current_name {
        pool.insert(name, current_values);
    }

    Ok(pool)
}

/// Parse whitespace/comma-separated values: plain floats, Fortran `D`
/// exponents (`1.657D-3`) and `@YYYY-MON-D` date literals (as MJD).
fn parse_values(text: &str, out: &mut Vec<f64>) -> Result<(), TimeError> {
    for token in text.split([' ', ',', '\t']).filter(|t| !t.is_empty()) {
        if let Some(date_str) = token.strip_prefix('@') {
            out.push(parse_naif_date(date_str)?);
        } else {
            let normalized = token.replace(['D', 'd'], "e");
            let val: f64 = normalized
                .parse()
                .map_err(|e| TimeError::LskParse(format!("cannot parse '{token}' as f64: {e}")))?;
            out.push(val);
        }
    }
    Ok(())
}

/// Parse a NAIF date literal like `1972-JAN-1` into the MJD of 0h UTC.
fn parse_naif_date(s: &str) -> Result<f64, TimeError> {
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != 3 {
        return Err(TimeError::LskParse(format!("bad date literal: @{s}")));
    }

    let year: i32 = parts[0]
        .parse()
        .map_err(|_| TimeError::LskParse(format!("bad year in @{s}")))?;
    let month = month_from_abbrev(parts[1])
        .ok_or_else(|| TimeError::LskParse(format!("bad month in @{s}")))?;
    let day: u32 = parts[2]
        .parse()
        .map_err(|_| TimeError::LskParse(format!("bad day in @{s}")))?;

    calendar_to_mjd(year, month, day).map_err(|e| TimeError::LskParse(format!("@{s}: {e}")))
}

/// Build the leap-second table from the flat `DELTET/DELTA_AT` array of
/// `[delta_at_1, date_1, delta_at_2, date_2, ...]` pairs.
fn build_leap_table(flat: &[f64]) -> Result<Vec<LeapEntry>, TimeError> {
    if flat.len() % 2 != 0 {
        return Err(TimeError::LskParse(
            "DELTET/DELTA_AT must have even number of values".into(),
        ));
    }
    if flat.is_empty() {
        return Err(TimeError::LskParse("DELTET/DELTA_AT is empty".into()));
    }

    let mut table: Vec<LeapEntry> = flat
        .chunks(2)
        .map(|pair| LeapEntry {
            tai_minus_utc: pair[0],
            mjd: pair[1],
        })
        .collect();
    table.sort_by(|a, b| a.mjd.total_cmp(&b.mjd));

    Ok(table)
}

fn get_scalar(pool: &KernelPool, name: &str) -> Result<f64, TimeError> {
    pool.get(name)
        .and_then(|vals| vals.first().copied())
        .ok_or_else(|| TimeError::LskParse(format!("missing {name}")))
}
