//! Field validation rules for userboard edit forms.
//!
//! Validation is keyed purely by field name. It has no knowledge of which
//! entity or form invoked it: the caller passes a field name and the raw
//! candidate value and gets back every rule violation as a human-readable
//! message. An empty list means the value is valid.
//!
//! # Example
//!
//! ```
//! use userboard_validation::validate_field;
//!
//! assert!(validate_field("username", "abcd").is_empty());
//!
//! let errors = validate_field("username", "");
//! assert_eq!(
//!     errors,
//!     vec![
//!         "Username is required.".to_string(),
//!         "Username must be at least 3 characters.".to_string(),
//!     ]
//! );
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

// Optional international prefix, an optionally parenthesised first block,
// one to four further digit groups, then an optional `x`/`ext` extension.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\+?\d{1,3}[-.\s]?)?(\(\d{1,4}\)|\d{1,4})([-.\s]?\d{2,4}){1,4}(\s?(x|ext\.?)\s?\d{1,6})?$",
    )
    .expect("valid phone regex")
});

/// Minimum number of characters accepted for a username.
pub const USERNAME_MIN_LEN: usize = 3;

/// Minimum number of characters accepted for a display name.
pub const NAME_MIN_LEN: usize = 5;

/// The closed set of fields that carry validation rules.
///
/// Unrecognised field names parse to [`Field::Unknown`], which has no rule
/// and always validates.
///
/// # Examples
///
/// ```
/// use userboard_validation::Field;
///
/// let field: Field = "email".parse().unwrap();
/// assert_eq!(field, Field::Email);
/// assert_eq!("website".parse::<Field>().unwrap(), Field::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Login handle.
    Username,
    /// Contact email address.
    Email,
    /// Address street line.
    Street,
    /// Address suite / apartment line.
    Suite,
    /// Address city.
    City,
    /// Display name.
    Name,
    /// Contact phone number.
    Phone,
    /// Any field without a rule.
    Unknown,
}

impl Field {
    /// Returns the wire name of the field (`"username"`, `"email"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::Street => "street",
            Self::Suite => "suite",
            Self::City => "city",
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Unknown => "unknown",
        }
    }

    /// Label used at the start of error messages.
    fn label(&self) -> &'static str {
        match self {
            Self::Username => "Username",
            Self::Email => "Email",
            Self::Street => "Street",
            Self::Suite => "Suite",
            Self::City => "City",
            Self::Name => "Name",
            Self::Phone => "Phone",
            Self::Unknown => "Field",
        }
    }

    /// Validates `value` against this field's rules.
    ///
    /// Violations accumulate in rule order: the required check first, then
    /// length, then format.
    ///
    /// # Examples
    ///
    /// ```
    /// use userboard_validation::Field;
    ///
    /// assert!(Field::Email.validate("leanne@april.biz").is_empty());
    /// assert_eq!(Field::Email.validate("nope"), vec!["Invalid email format.".to_string()]);
    /// assert!(Field::Unknown.validate("").is_empty());
    /// ```
    pub fn validate(&self, value: &str) -> Vec<String> {
        let mut errors = Vec::new();
        if *self == Self::Unknown {
            return errors;
        }

        if value.is_empty() {
            errors.push(format!("{} is required.", self.label()));
        }

        let min_len = match self {
            Self::Username => Some(USERNAME_MIN_LEN),
            Self::Name => Some(NAME_MIN_LEN),
            _ => None,
        };
        if let Some(min) = min_len {
            if value.chars().count() < min {
                errors.push(format!(
                    "{} must be at least {min} characters.",
                    self.label()
                ));
            }
        }

        match self {
            Self::Email if !EMAIL_RE.is_match(value) => {
                errors.push("Invalid email format.".to_string());
            },
            Self::Phone if !PHONE_RE.is_match(value) => {
                errors.push("Invalid phone number format.".to_string());
            },
            _ => {},
        }

        errors
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "username" => Self::Username,
            "email" => Self::Email,
            "street" => Self::Street,
            "suite" => Self::Suite,
            "city" => Self::City,
            "name" => Self::Name,
            "phone" => Self::Phone,
            _ => Self::Unknown,
        })
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(field) => field,
            Err(never) => match never {},
        }
    }
}

/// Validates a single field by name.
///
/// Unknown field names have no rule and return an empty list.
pub fn validate_field(field: &str, value: &str) -> Vec<String> {
    Field::from(field).validate(value)
}

/// Validates several `(field, value)` pairs, returning only the fields that
/// have at least one error, in input order.
///
/// # Examples
///
/// ```
/// use userboard_validation::validate_fields;
///
/// let errors = validate_fields([("username", "bret"), ("city", "")]);
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors[0].0, "city");
/// ```
pub fn validate_fields<'a, I>(fields: I) -> Vec<(&'a str, Vec<String>)>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    fields
        .into_iter()
        .filter_map(|(field, value)| {
            let errors = validate_field(field, value);
            (!errors.is_empty()).then_some((field, errors))
        })
        .collect()
}
