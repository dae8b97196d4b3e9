//! # Bondval Ext File
//!
//! File-based market data and reference data for the Bondval resolution
//! engine.
//!
//! This crate provides default implementations for testing, EOD loads and
//! static data:
//! - JSON-based yield curves and CSV-based quotes ([`JsonMarketData`])
//! - CSV-based bond reference data ([`CsvBondSource`])

#![warn(missing_docs)]
#![warn(clippy::all)]

mod market_data;
mod reference_data;

pub use market_data::*;
pub use reference_data::*;

use std::path::Path;

use bondval_traits::TraitResult;

/// Create a file-based bond reference source.
pub fn create_file_reference_data(bonds_csv: impl AsRef<Path>) -> TraitResult<CsvBondSource> {
    CsvBondSource::new(bonds_csv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bondval_traits::TraitError;
    use std::io::Write;

    #[test]
    fn test_create_file_reference_data() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(
            b"security_id,currency,issuer_name,issuer_domicile,issuer_type,coupon_rate,frequency,day_count,issue_date,maturity_date\n\
              US0001,USD,ACME CORP,US,corporate,0.045,2,30/360,2020-05-15,2030-05-15\n",
        )
        .unwrap();

        let bonds = create_file_reference_data(file.path()).unwrap();
        assert_eq!(bonds.len(), 1);
        assert!(bonds.get("US0001").is_some());
        assert!(matches!(bonds.require("NOPE"), Err(TraitError::NotFound(_))));
    }
}
