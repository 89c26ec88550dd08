//! Configuration types for the cleaning pipeline.
//!
//! Every lookup table and column declaration the pipeline uses lives here as
//! an immutable value handed to [`crate::Pipeline`] at construction time.
//! [`CleaningConfig::default()`] reproduces the tables that ship with the
//! retail live-project workbook; alternate tables can be supplied through the
//! builder or a JSON file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Pattern used to flag email addresses as valid.
pub const DEFAULT_EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

const DEFAULT_TEXT_COLUMNS: [&str; 9] = [
    "City",
    "Product_Category",
    "Product_Name",
    "Payment_Mode",
    "Delivery_Status",
    "Customer_Name",
    "Email",
    "Gender",
    "Country",
];

const DEFAULT_NUMERIC_COLUMNS: [&str; 4] = [
    "Purchase_Amount",
    "Discount_Offered",
    "Customer_Satisfaction",
    "Age",
];

const DEFAULT_DATE_COLUMNS: [&str; 1] = ["Purchase_Date"];

const DEFAULT_CATEGORY_MAPPINGS: [(&str, &str); 5] = [
    ("laptop", "Electronics"),
    ("sofa", "Home"),
    ("shoes", "Fashion"),
    ("shampoo", "Beauty"),
    ("novel", "Books"),
];

const DEFAULT_PAYMENT_MODES: [(&str, &str); 5] = [
    ("upi", "UPI"),
    ("debit card", "Debit Card"),
    ("credit card", "Credit Card"),
    ("cash", "Cash"),
    ("net banking", "Net Banking"),
];

const DEFAULT_DELIVERY_STATUSES: [(&str, &str); 4] = [
    ("delivered", "Delivered"),
    ("pending", "Pending"),
    ("cancelled", "Cancelled"),
    ("returned", "Returned"),
];

const DEFAULT_GENDERS: [(&str, &str); 4] = [
    ("male", "Male"),
    ("female", "Female"),
    ("m", "Male"),
    ("f", "Female"),
];

fn owned_list(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn owned_pairs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn owned_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Names of the columns that individual cleaning steps act on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnRoles {
    /// Product name, searched for category keywords.
    pub product_name: String,
    /// Product category, overwritten by keyword matches.
    pub category: String,
    pub payment_mode: String,
    pub delivery_status: String,
    pub gender: String,
    pub email: String,
    /// Boolean column added next to the email column.
    pub email_valid: String,
    /// Numeric column clamped into [`CleaningConfig::satisfaction_range`].
    pub satisfaction: String,
    /// Columns converted to title case (cities, countries).
    pub proper_case: Vec<String>,
    pub customer_name: String,
    pub purchase_amount: String,
    /// Text column holding the per-row quality annotation.
    pub quality_issues: String,
}

impl Default for ColumnRoles {
    fn default() -> Self {
        Self {
            product_name: "Product_Name".to_string(),
            category: "Product_Category".to_string(),
            payment_mode: "Payment_Mode".to_string(),
            delivery_status: "Delivery_Status".to_string(),
            gender: "Gender".to_string(),
            email: "Email".to_string(),
            email_valid: "Email_Valid".to_string(),
            satisfaction: "Customer_Satisfaction".to_string(),
            proper_case: owned_list(&["City", "Country"]),
            customer_name: "Customer_Name".to_string(),
            purchase_amount: "Purchase_Amount".to_string(),
            quality_issues: "Data_Quality_Issues".to_string(),
        }
    }
}

/// Inclusive bounds used for range clipping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipRange {
    pub min: f64,
    pub max: f64,
}

impl ClipRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp a value into the range.
    #[inline]
    pub fn clip(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl Default for ClipRange {
    fn default() -> Self {
        Self { min: 1.0, max: 5.0 }
    }
}

/// Configuration for the cleaning pipeline.
///
/// Use [`CleaningConfig::builder()`] to override individual tables while
/// keeping the defaults for everything else.
///
/// # Example
///
/// ```rust,ignore
/// use retail_cleaner::config::CleaningConfig;
///
/// let config = CleaningConfig::builder()
///     .category_mappings([("tablet", "Electronics"), ("sofa", "Home")])
///     .satisfaction_range(0.0, 10.0)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Columns cast to text and trimmed.
    pub text_columns: Vec<String>,

    /// Columns coerced to floating point numbers.
    pub numeric_columns: Vec<String>,

    /// Columns parsed as calendar dates (month before day).
    pub date_columns: Vec<String>,

    /// Ordered `(keyword, category)` pairs. Keywords are matched as lowercase
    /// substrings of the product name; the last matching pair wins.
    pub category_mappings: Vec<(String, String)>,

    /// Lowercase payment mode token to display label.
    pub payment_mode_map: BTreeMap<String, String>,

    /// Lowercase delivery status token to display label.
    pub delivery_status_map: BTreeMap<String, String>,

    /// Lowercase gender token to display label.
    pub gender_map: BTreeMap<String, String>,

    /// Regular expression an email must match to be flagged valid.
    pub email_pattern: String,

    /// Inclusive bounds for the satisfaction score.
    /// Default: 1.0 ..= 5.0
    pub satisfaction_range: ClipRange,

    /// Names of role-specific columns.
    pub columns: ColumnRoles,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            text_columns: owned_list(&DEFAULT_TEXT_COLUMNS),
            numeric_columns: owned_list(&DEFAULT_NUMERIC_COLUMNS),
            date_columns: owned_list(&DEFAULT_DATE_COLUMNS),
            category_mappings: owned_pairs(&DEFAULT_CATEGORY_MAPPINGS),
            payment_mode_map: owned_map(&DEFAULT_PAYMENT_MODES),
            delivery_status_map: owned_map(&DEFAULT_DELIVERY_STATUSES),
            gender_map: owned_map(&DEFAULT_GENDERS),
            email_pattern: DEFAULT_EMAIL_PATTERN.to_string(),
            satisfaction_range: ClipRange::default(),
            columns: ColumnRoles::default(),
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Load a configuration from a JSON file.
    ///
    /// Fields missing from the file keep their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: CleaningConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (keyword, _) in &self.category_mappings {
            if keyword.is_empty() {
                return Err(ConfigValidationError::EmptyCategoryKeyword);
            }
            if keyword.to_lowercase() != *keyword {
                return Err(ConfigValidationError::NonLowercaseKey {
                    table: "category_mappings".to_string(),
                    key: keyword.clone(),
                });
            }
        }

        for (table, map) in [
            ("payment_mode_map", &self.payment_mode_map),
            ("delivery_status_map", &self.delivery_status_map),
            ("gender_map", &self.gender_map),
        ] {
            if let Some(key) = map.keys().find(|k| k.to_lowercase() != **k) {
                return Err(ConfigValidationError::NonLowercaseKey {
                    table: table.to_string(),
                    key: key.clone(),
                });
            }
        }

        if let Err(e) = regex::Regex::new(&self.email_pattern) {
            return Err(ConfigValidationError::InvalidEmailPattern {
                pattern: self.email_pattern.clone(),
                reason: e.to_string(),
            });
        }

        let range = self.satisfaction_range;
        if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
            return Err(ConfigValidationError::InvalidClipRange {
                min: range.min,
                max: range.max,
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Category keywords must not be empty")]
    EmptyCategoryKeyword,

    #[error("Key '{key}' in '{table}' must be lowercase")]
    NonLowercaseKey { table: String, key: String },

    #[error("Invalid email pattern '{pattern}': {reason}")]
    InvalidEmailPattern { pattern: String, reason: String },

    #[error("Invalid clip range: min {min} must not exceed max {max}")]
    InvalidClipRange { min: f64, max: f64 },
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    text_columns: Option<Vec<String>>,
    numeric_columns: Option<Vec<String>>,
    date_columns: Option<Vec<String>>,
    category_mappings: Option<Vec<(String, String)>>,
    payment_mode_map: Option<BTreeMap<String, String>>,
    delivery_status_map: Option<BTreeMap<String, String>>,
    gender_map: Option<BTreeMap<String, String>>,
    email_pattern: Option<String>,
    satisfaction_range: Option<ClipRange>,
    columns: Option<ColumnRoles>,
}

fn collect_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(Into::into).collect()
}

fn collect_pairs<I, K, V>(pairs: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

impl CleaningConfigBuilder {
    /// Set the columns that are cast to text and trimmed.
    pub fn text_columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.text_columns = Some(collect_names(names));
        self
    }

    /// Set the columns coerced to numbers.
    pub fn numeric_columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric_columns = Some(collect_names(names));
        self
    }

    /// Set the columns parsed as dates.
    pub fn date_columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_columns = Some(collect_names(names));
        self
    }

    /// Set the ordered keyword to category table.
    ///
    /// Order matters: when several keywords match one product name, the
    /// category of the last matching pair is kept.
    pub fn category_mappings<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.category_mappings = Some(collect_pairs(pairs));
        self
    }

    /// Set the payment mode harmonisation table.
    pub fn payment_mode_map<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.payment_mode_map = Some(collect_pairs(pairs).into_iter().collect());
        self
    }

    /// Set the delivery status harmonisation table.
    pub fn delivery_status_map<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.delivery_status_map = Some(collect_pairs(pairs).into_iter().collect());
        self
    }

    /// Set the gender harmonisation table.
    pub fn gender_map<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.gender_map = Some(collect_pairs(pairs).into_iter().collect());
        self
    }

    /// Set the email validity pattern.
    pub fn email_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.email_pattern = Some(pattern.into());
        self
    }

    /// Set the inclusive satisfaction bounds.
    pub fn satisfaction_range(mut self, min: f64, max: f64) -> Self {
        self.satisfaction_range = Some(ClipRange::new(min, max));
        self
    }

    /// Override the role column names.
    pub fn columns(mut self, columns: ColumnRoles) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let defaults = CleaningConfig::default();
        let config = CleaningConfig {
            text_columns: self.text_columns.unwrap_or(defaults.text_columns),
            numeric_columns: self.numeric_columns.unwrap_or(defaults.numeric_columns),
            date_columns: self.date_columns.unwrap_or(defaults.date_columns),
            category_mappings: self.category_mappings.unwrap_or(defaults.category_mappings),
            payment_mode_map: self.payment_mode_map.unwrap_or(defaults.payment_mode_map),
            delivery_status_map: self
                .delivery_status_map
                .unwrap_or(defaults.delivery_status_map),
            gender_map: self.gender_map.unwrap_or(defaults.gender_map),
            email_pattern: self.email_pattern.unwrap_or(defaults.email_pattern),
            satisfaction_range: self
                .satisfaction_range
                .unwrap_or(defaults.satisfaction_range),
            columns: self.columns.unwrap_or(defaults.columns),
        };

        config.validate()?;
        Ok(config)
    }
}
