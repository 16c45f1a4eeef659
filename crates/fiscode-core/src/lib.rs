#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod builder;
pub mod check_digits;
pub mod date_sex;
pub mod error;
pub mod letters;
pub mod municipality;
pub mod newtypes;
pub mod normalize;
pub mod person;

pub use builder::{build, generate_fiscal_code, validate_date};
pub use check_digits::{check_letter, verify};
pub use error::{Field, FiscalCodeError, IndexLoadError};
pub use municipality::{
    LoadOptions, MunicipalityIndex, MunicipalityRecord, MunicipalitySource, resolve,
};
pub use newtypes::{CadastralCode, FiscalCode, NewtypeError, ProvinceCode};
pub use person::{DEFAULT_MIN_BIRTH_YEAR, PersonFields, PersonRecord, Sex, ValidationConfig};

/// Returns the current version of the fiscode-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn version_is_semver() {
        let v = version();
        let parts: Vec<&str> = v.split('.').collect();
        assert_eq!(parts.len(), 3, "version should have 3 parts: {v}");
        for part in parts {
            part.parse::<u32>().expect("each part should be a number");
        }
    }
}
