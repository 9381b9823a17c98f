//! IERS Earth Orientation Parameters: UT1−UTC and polar motion lookup.
//!
//! Parses the IERS finals2000A fixed-width format and linearly interpolates
//! daily values to any epoch inside the table.
//!
//! Data file: IERS finals2000A.all (public domain), from
//! <https://datacenter.iers.org/> or <https://maia.usno.navy.mil/ser7/>.
//!
//! File format (relevant columns, 1-indexed):
//! - Col  8-15: Modified Julian Date (F8.2)
//! - Col 19-27: PM-x in arcseconds (F9.6)
//! - Col 38-46: PM-y in arcseconds (F9.6)
//! - Col 58:    Flag 'I' (IERS final) or 'P' (prediction)
//! - Col 59-68: UT1−UTC in seconds (F10.7)

use std::f64::consts::PI;

use crate::error::TimeError;
use crate::julian::JulianPair;

const ARCSEC_TO_RAD: f64 = PI / (180.0 * 3600.0);

/// Earth orientation at one epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EopSample {
    /// UT1−UTC in seconds.
    pub dut1_s: f64,
    /// Polar motion x in radians.
    pub xp_rad: f64,
    /// Polar motion y in radians.
    pub yp_rad: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct EopRow {
    mjd: f64,
    dut1_s: f64,
    xp_arcsec: f64,
    yp_arcsec: f64,
}

/// Parsed IERS Earth Orientation Parameters table.
#[derive(Debug, Clone)]
pub struct EopData {
    /// Daily rows sorted ascending by MJD.
    rows: Vec<EopRow>,
}

fn field(line: &str, range: std::ops::Range<usize>) -> Option<f64> {
    line.get(range)?.trim().parse().ok()
}

impl EopData {
    /// Parse IERS finals2000A fixed-width rows.
    ///
    /// Rows whose MJD, polar motion or UT1−UTC fields are blank or
    /// unparseable are skipped.
    pub fn parse_finals(content: &str) -> Result<Self, TimeError> {
        let mut rows = Vec::new();

        for line in content.lines() {
            if line.len() < 68 {
                continue;
            }
            let (Some(mjd), Some(xp), Some(yp), Some(dut1)) = (
                field(line, 7..15),
                field(line, 18..27),
                field(line, 37..46),
                field(line, 58..68),
            ) else {
                continue;
            };
            rows.push(EopRow {
                mjd,
                dut1_s: dut1,
                xp_arcsec: xp,
                yp_arcsec: yp,
            });
        }

        if rows.is_empty() {
            return Err(TimeError::EopParse("no valid EOP rows found".to_string()));
        }

        rows.sort_by(|a, b| a.mjd.total_cmp(&b.mjd));

        Ok(Self { rows })
    }

    /// Number of rows in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// MJD range covered by the table: (first, last).
    pub fn range(&self) -> (f64, f64) {
        match (self.rows.first(), self.rows.last()) {
            (Some(first), Some(last)) => (first.mjd, last.mjd),
            _ => (f64::NAN, f64::NAN),
        }
    }

    /// Interpolated Earth orientation at a UTC MJD.
    pub fn sample_at_mjd(&self, mjd: f64) -> Result<EopSample, TimeError> {
        let (mjd_start, mjd_end) = self.range();
        if !(mjd >= mjd_start && mjd <= mjd_end) {
            return Err(TimeError::EopOutOfRange);
        }

        let idx = self
            .rows
            .partition_point(|row| row.mjd < mjd)
            .saturating_sub(1);

        let r0 = self.rows[idx];
        let Some(&r1) = self.rows.get(idx + 1) else {
            return Ok(r0.sample(r0, 0.0));
        };
        if (r1.mjd - r0.mjd).abs() < 1e-12 {
            return Ok(r0.sample(r0, 0.0));
        }

        let frac = (mjd - r0.mjd) / (r1.mjd - r0.mjd);
        Ok(r0.sample(r1, frac))
    }

    /// UT1−UTC in seconds at a UTC MJD.
    pub fn dut1_at_mjd(&self, mjd: f64) -> Result<f64, TimeError> {
        Ok(self.sample_at_mjd(mjd)?.dut1_s)
    }
}

impl EopRow {
    fn sample(self, next: Self, frac: f64) -> EopSample {
        let lerp = |a: f64, b: f64| a + frac * (b - a);
        EopSample {
            dut1_s: lerp(self.dut1_s, next.dut1_s),
            xp_rad: lerp(self.xp_arcsec, next.xp_arcsec) * ARCSEC_TO_RAD,
            yp_rad: lerp(self.yp_arcsec, next.yp_arcsec) * ARCSEC_TO_RAD,
        }
    }
}

/// Loaded IERS EOP file.
///
/// Follows the same load-from-file pattern as [`crate::LeapSecondKernel`].
#[derive(Debug, Clone)]
pub struct EopKernel {
    data: EopData,
}

impl EopKernel {
    /// Load a finals2000A file from disk.
    pub fn load(path: &std::path::Path) -> Result<Self, TimeError> {
        let content = std::fs::read_to_string(path)?;
        let kernel = Self::parse(&content)?;
        let (first, last) = kernel.data.range();
        log::info!(
            "loaded EOP table {} ({} rows, MJD {first}..{last})",
            path.display(),
            kernel.data.len()
        );
        Ok(kernel)
    }

    /// Parse finals2000A rows from string content.
    pub fn parse(content: &str) -> Result<Self, TimeError> {
        let data = EopData::parse_finals(content)?;
        Ok(Self { data })
    }

    pub fn data(&self) -> &EopData {
        &self.data
    }

    /// Interpolated Earth orientation at a two-part UTC Julian Date.
    pub fn sample_at_utc(&self, utc: JulianPair) -> Result<EopSample, TimeError> {
        self.data.sample_at_mjd(utc.mjd())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Fixed-width rows with MJD, PM-x, PM-y and UT1−UTC in their columns.
    fn test_snippet() -> String {
        let mut lines = Vec::new();
        for &(mjd, xp, yp, dut1) in &[
            (60000.00, 0.100000, 0.300000, 0.1234567),
            (60001.00, 0.102000, 0.298000, 0.2345678),
            (60002.00, 0.104000, 0.296000, -0.1000000),
        ] {
            lines.push(row(mjd, Some((xp, yp)), Some(dut1)));
        }
        lines.join("\n")
    }

    fn row(mjd: f64, pm: Option<(f64, f64)>, dut1: Option<f64>) -> String {
        let mut line = vec![b' '; 80];
        line[7..15].copy_from_slice(format!("{mjd:8.2}").as_bytes());
        if let Some((xp, yp)) = pm {
            line[16] = b'I';
            line[18..27].copy_from_slice(format!("{xp:9.6}").as_bytes());
            line[37..46].copy_from_slice(format!("{yp:9.6}").as_bytes());
        }
        if let Some(dut1) = dut1 {
            line[57] = b'I';
            line[58..68].copy_from_slice(format!("{dut1:10.7}").as_bytes());
        }
        String::from_utf8(line).unwrap()
    }

    #[test]
    fn parse_small_snippet() {
        let data = EopData::parse_finals(&test_snippet()).unwrap();
        assert_eq!(data.len(), 3);
        let (start, end) = data.range();
        assert!((start - 60000.0).abs() < 0.01);
        assert!((end - 60002.0).abs() < 0.01);
    }

    #[test]
    fn interpolation_exact() {
        let data = EopData::parse_finals(&test_snippet()).unwrap();
        let s = data.sample_at_mjd(60000.0).unwrap();
        assert!((s.dut1_s - 0.1234567).abs() < 1e-7);
        assert!((s.xp_rad - 0.1 * ARCSEC_TO_RAD).abs() < 1e-15);
        assert!((s.yp_rad - 0.3 * ARCSEC_TO_RAD).abs() < 1e-15);
    }

    #[test]
    fn interpolation_midpoint() {
        let data = EopData::parse_finals(&test_snippet()).unwrap();
        let s = data.sample_at_mjd(60000.5).unwrap();
        let expected = (0.1234567 + 0.2345678) / 2.0;
        assert!(
            (s.dut1_s - expected).abs() < 1e-7,
            "midpoint: got {}, expected {expected}",
            s.dut1_s
        );
        assert!((s.xp_rad - 0.101 * ARCSEC_TO_RAD).abs() < 1e-14);
    }

    #[test]
    fn last_row_exact() {
        let data = EopData::parse_finals(&test_snippet()).unwrap();
        assert!((data.dut1_at_mjd(60002.0).unwrap() + 0.1).abs() < 1e-7);
    }

    #[test]
    fn out_of_range() {
        let data = EopData::parse_finals(&test_snippet()).unwrap();
        assert_eq!(data.sample_at_mjd(59999.0), Err(TimeError::EopOutOfRange));
        assert_eq!(data.sample_at_mjd(60003.0), Err(TimeError::EopOutOfRange));
        assert_eq!(data.sample_at_mjd(f64::NAN), Err(TimeError::EopOutOfRange));
    }

    #[test]
    fn incomplete_rows_skipped() {
        let mut snippet = test_snippet();
        snippet.push('\n');
        snippet.push_str(&row(60003.0, Some((0.1, 0.2)), None));
        snippet.push('\n');
        snippet.push_str(&row(60004.0, None, Some(0.05)));

        let data = EopData::parse_finals(&snippet).unwrap();
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn empty_table_is_error() {
        assert!(matches!(
            EopData::parse_finals("short\nlines\n"),
            Err(TimeError::EopParse(_))
        ));
    }

    #[test]
    fn kernel_sample_from_julian_pair() {
        let kernel = EopKernel::parse(&test_snippet()).unwrap();
        let s = kernel
            .sample_at_utc(JulianPair::new(2_400_000.5, 60_001.0))
            .unwrap();
        assert!((s.dut1_s - 0.2345678).abs() < 1e-7);
    }
}
