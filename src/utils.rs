//! Utils

use std::path::PathBuf;

use clap::Parser;

use crate::{fixtures::DEFAULT_BASE_PATH, observability::LoggingConfig};

/// Arguments for the checkout binary
#[derive(Debug, Parser)]
#[command(name = "checkout", version, about = "Price a basket of product codes")]
pub struct CheckoutArgs {
    /// Fixture set to load products, discounts and delivery tiers from
    #[arg(short, long, default_value = "widgets")]
    pub fixture: String,

    /// Directory containing the fixture sets
    #[arg(short = 'd', long, env = "CHECKOUT_FIXTURES", default_value = DEFAULT_BASE_PATH)]
    pub fixtures_dir: PathBuf,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Product codes to add, in order
    #[arg(required = true)]
    pub codes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn args_parse_codes_in_order() -> TestResult {
        let args = CheckoutArgs::try_parse_from(["checkout", "-f", "widgets", "R01", "B01"])?;

        assert_eq!(args.fixture, "widgets");
        assert_eq!(args.codes, vec!["R01", "B01"]);

        Ok(())
    }

    #[test]
    fn args_require_at_least_one_code() {
        assert!(CheckoutArgs::try_parse_from(["checkout"]).is_err());
    }
}
