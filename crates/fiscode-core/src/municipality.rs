//! Municipality lookup: name and province to cadastral code.
//!
//! [`MunicipalitySource`] is the seam the builder depends on. The in-memory
//! [`MunicipalityIndex`] is the standard implementation: it is loaded once
//! from a delimited `municipality,province,cadastral` table and never
//! mutated afterwards, so shared references can be used from any number of
//! threads without locking.
//!
//! Keys are the upper-cased, diacritic-stripped municipality name (see
//! [`normalize_key`]) and the province code. Matching is exact; there is no
//! fuzzy or prefix fallback.
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io;

use tracing::{debug, info, warn};

use crate::error::{FiscalCodeError, IndexLoadError};
use crate::newtypes::{CadastralCode, ProvinceCode};
use crate::normalize::normalize_key;

/// A read-only lookup from municipality to cadastral code.
///
/// The trait is object-safe so callers can pass `&dyn MunicipalitySource`.
pub trait MunicipalitySource {
    /// Returns the cadastral code for an already-normalized municipality key
    /// in `province`, or `None` if there is no such entry.
    fn cadastral_code(
        &self,
        municipality_key: &str,
        province: &ProvinceCode,
    ) -> Option<CadastralCode>;
}

/// Resolves a municipality name to its cadastral code.
///
/// The name is normalized with [`normalize_key`] before the lookup.
///
/// # Errors
///
/// Returns [`FiscalCodeError::MunicipalityNotFound`] when `source` has no
/// exact match.
pub fn resolve<S>(
    source: &S,
    municipality: &str,
    province: &ProvinceCode,
) -> Result<CadastralCode, FiscalCodeError>
where
    S: MunicipalitySource + ?Sized,
{
    let key = normalize_key(municipality);
    match source.cadastral_code(&key, province) {
        Some(code) => {
            debug!(municipality = %key, %province, cadastral = %code, "resolved municipality");
            Ok(code)
        }
        None => Err(FiscalCodeError::MunicipalityNotFound {
            municipality: municipality.trim().to_owned(),
            province: province.to_string(),
        }),
    }
}

/// One row of a municipality table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MunicipalityRecord {
    /// Municipality name as written in the source.
    pub municipality: String,
    /// Province code.
    pub province: ProvinceCode,
    /// Cadastral code.
    pub cadastral_code: CadastralCode,
}

/// Options for parsing a municipality table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Field delimiter byte. Defaults to `,`.
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// In-memory municipality table keyed by province, then normalized name.
#[derive(Debug, Clone, Default)]
pub struct MunicipalityIndex {
    by_province: HashMap<ProvinceCode, HashMap<String, CadastralCode>>,
    len: usize,
}

impl MunicipalityIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from records, rejecting conflicting duplicates.
    ///
    /// The reported line of a conflict is the 1-based position of the record
    /// in the iterator.
    ///
    /// # Errors
    ///
    /// Returns [`IndexLoadError::DuplicateEntry`] when the same normalized
    /// name and province appear with two different codes.
    pub fn try_from_records<I>(records: I) -> Result<Self, IndexLoadError>
    where
        I: IntoIterator<Item = MunicipalityRecord>,
    {
        let mut index = Self::new();
        for (line, record) in (1u64..).zip(records) {
            index.insert(line, record)?;
        }
        Ok(index)
    }

    /// Parses a comma-delimited table from `reader`.
    ///
    /// See [`MunicipalityIndex::from_csv_reader_with`].
    ///
    /// # Errors
    ///
    /// See [`MunicipalityIndex::from_csv_reader_with`].
    pub fn from_csv_reader<R: io::Read>(reader: R) -> Result<Self, IndexLoadError> {
        Self::from_csv_reader_with(reader, LoadOptions::default())
    }

    /// Parses a comma-delimited table held in memory.
    ///
    /// # Errors
    ///
    /// See [`MunicipalityIndex::from_csv_reader_with`].
    pub fn from_csv_str(content: &str) -> Result<Self, IndexLoadError> {
        Self::from_csv_reader(content.as_bytes())
    }

    /// Parses a delimited `municipality,province,cadastral` table.
    ///
    /// - Fields are trimmed; blank lines are skipped.
    /// - If neither the province nor the cadastral field of the first record
    ///   is valid, that record is treated as a header and skipped.
    /// - Identical duplicate rows are accepted; conflicting ones are not.
    ///
    /// # Errors
    ///
    /// - [`IndexLoadError::Csv`] for I/O or quoting errors.
    /// - [`IndexLoadError::MalformedRecord`] for a wrong field count, a blank
    ///   name, or an invalid province or cadastral code.
    /// - [`IndexLoadError::DuplicateEntry`] for conflicting duplicates.
    pub fn from_csv_reader_with<R: io::Read>(
        reader: R,
        options: LoadOptions,
    ) -> Result<Self, IndexLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(options.delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut index = Self::new();
        let mut seen_first = false;
        for result in csv_reader.records() {
            let row = result?;
            let line = row.position().map_or(0, csv::Position::line);
            if row.iter().all(str::is_empty) {
                continue;
            }
            let is_first = !seen_first;
            seen_first = true;

            let (Some(name), Some(province), Some(code), None) =
                (row.get(0), row.get(1), row.get(2), row.get(3))
            else {
                return Err(IndexLoadError::MalformedRecord {
                    line,
                    detail: format!("expected 3 fields, got {}", row.len()),
                });
            };

            if is_first && looks_like_header(province, code) {
                warn!(line, header = %code, "skipping header row in municipality table");
                continue;
            }

            let record = parse_record(line, name, province, code)?;
            index.insert(line, record)?;
        }

        info!(entries = index.len(), "loaded municipality index");
        Ok(index)
    }

    fn insert(&mut self, line: u64, record: MunicipalityRecord) -> Result<(), IndexLoadError> {
        let key = normalize_key(&record.municipality);
        let names = self.by_province.entry(record.province.clone()).or_default();
        match names.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(record.cadastral_code);
                self.len += 1;
                Ok(())
            }
            Entry::Occupied(slot) if *slot.get() == record.cadastral_code => Ok(()),
            Entry::Occupied(slot) => Err(IndexLoadError::DuplicateEntry {
                line,
                municipality: slot.key().clone(),
                province: record.province.to_string(),
                existing: slot.get().to_string(),
                conflicting: record.cadastral_code.to_string(),
            }),
        }
    }

    /// Looks up a municipality by name (normalized here) and province.
    pub fn get(&self, municipality: &str, province: &ProvinceCode) -> Option<&CadastralCode> {
        self.by_province
            .get(province)?
            .get(normalize_key(municipality).as_str())
    }

    /// Number of distinct (municipality, province) entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over `(normalized name, province, cadastral code)` in no
    /// particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProvinceCode, &CadastralCode)> {
        self.by_province.iter().flat_map(|(province, names)| {
            names
                .iter()
                .map(move |(name, code)| (name.as_str(), province, code))
        })
    }

    /// Returns every `(normalized name, province)` carrying `code`, sorted.
    ///
    /// A cadastral code normally identifies exactly one municipality; more
    /// than one entry indicates renamed or merged municipalities in the
    /// source table.
    pub fn municipalities_for(&self, code: &CadastralCode) -> Vec<(&str, &ProvinceCode)> {
        let mut found: Vec<_> = self
            .iter()
            .filter(|(_, _, c)| *c == code)
            .map(|(name, province, _)| (name, province))
            .collect();
        found.sort_unstable();
        found
    }
}

impl MunicipalitySource for MunicipalityIndex {
    fn cadastral_code(
        &self,
        municipality_key: &str,
        province: &ProvinceCode,
    ) -> Option<CadastralCode> {
        self.by_province
            .get(province)?
            .get(municipality_key)
            .cloned()
    }
}

/// A header carries labels in both code columns.
fn looks_like_header(province: &str, code: &str) -> bool {
    ProvinceCode::try_from(province).is_err() && CadastralCode::try_from(code).is_err()
}

fn parse_record(
    line: u64,
    name: &str,
    province: &str,
    code: &str,
) -> Result<MunicipalityRecord, IndexLoadError> {
    if name.is_empty() {
        return Err(IndexLoadError::MalformedRecord {
            line,
            detail: "municipality name is empty".to_owned(),
        });
    }
    let province = ProvinceCode::try_from(province).map_err(|e| IndexLoadError::MalformedRecord {
        line,
        detail: e.to_string(),
    })?;
    let cadastral_code =
        CadastralCode::try_from(code).map_err(|e| IndexLoadError::MalformedRecord {
            line,
            detail: e.to_string(),
        })?;
    Ok(MunicipalityRecord {
        municipality: name.to_owned(),
        province,
        cadastral_code,
    })
}
