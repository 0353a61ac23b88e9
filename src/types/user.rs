//! User records and their partial edit shape.

use serde::{Deserialize, Serialize};

use crate::overlay::{Entity, Patch};

/// Geographic coordinates as the remote serves them (decimal strings).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geo {
    /// Latitude.
    pub lat: String,
    /// Longitude.
    pub lng: String,
}

/// Postal address nested inside a [`User`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street line.
    pub street: String,
    /// Suite / apartment line.
    pub suite: String,
    /// City.
    pub city: String,
    /// Postal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    /// Coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
}

/// Employer details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Company name.
    pub name: String,
    /// Slogan.
    #[serde(default)]
    pub catch_phrase: String,
    /// Business summary.
    #[serde(default)]
    pub bs: String,
}

/// A user as served by `GET /users` and `GET /users/{id}`.
///
/// # Examples
///
/// ```
/// use userboard::User;
///
/// let user: User = serde_json::from_value(serde_json::json!({
///     "id": 1,
///     "name": "Leanne Graham",
///     "username": "Bret",
///     "email": "Sincere@april.biz",
///     "phone": "1-770-736-8031 x56442",
///     "address": { "street": "Kulas Light", "suite": "Apt. 556", "city": "Gwenborough" }
/// }))
/// .unwrap();
/// assert_eq!(user.username, "Bret");
/// assert!(user.address.zipcode.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique id assigned by the remote.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Login handle.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: String,
    /// Personal website.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Address,
    /// Employer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
}

impl Entity for User {
    type Patch = UserPatch;

    fn id(&self) -> u64 {
        self.id
    }
}

/// Pending changes to an [`Address`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suite: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
}

impl AddressPatch {
    fn merge(&mut self, later: Self) {
        merge_slot(&mut self.street, later.street);
        merge_slot(&mut self.suite, later.suite);
        merge_slot(&mut self.city, later.city);
        merge_slot(&mut self.zipcode, later.zipcode);
        merge_slot(&mut self.geo, later.geo);
    }

    fn apply_to(&self, base: &Address) -> Address {
        Address {
            street: pick(&self.street, &base.street),
            suite: pick(&self.suite, &base.suite),
            city: pick(&self.city, &base.city),
            zipcode: self.zipcode.clone().or_else(|| base.zipcode.clone()),
            geo: self.geo.clone().or_else(|| base.geo.clone()),
        }
    }
}

/// Pending changes to a [`User`]. Only set fields are applied.
///
/// # Examples
///
/// ```
/// use userboard::{User, UserPatch};
/// use userboard::overlay::Patch;
///
/// let base = User { id: 1, name: "Leanne Graham".into(), ..User::default() };
/// let patch = UserPatch::new().email("leanne@example.com").city("Lisbon");
/// let shown = patch.apply_to(&base);
/// assert_eq!(shown.name, "Leanne Graham");
/// assert_eq!(shown.email, "leanne@example.com");
/// assert_eq!(shown.address.city, "Lisbon");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default)]
    pub address: AddressPatch,
}

impl UserPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a single-field patch from a form field name.
    ///
    /// Address fields (`street`, `suite`, `city`, `zipcode`) land in the
    /// nested address patch. Returns `None` for fields that are not editable.
    pub fn from_field(field: &str, value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let patch = Self::new();
        Some(match field {
            "name" => patch.name(value),
            "username" => patch.username(value),
            "email" => patch.email(value),
            "phone" => patch.phone(value),
            "website" => patch.website(value),
            "street" => patch.street(value),
            "suite" => patch.suite(value),
            "city" => patch.city(value),
            "zipcode" => patch.zipcode(value),
            _ => return None,
        })
    }

    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    pub fn username(mut self, value: impl Into<String>) -> Self {
        self.username = Some(value.into());
        self
    }

    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    pub fn phone(mut self, value: impl Into<String>) -> Self {
        self.phone = Some(value.into());
        self
    }

    pub fn website(mut self, value: impl Into<String>) -> Self {
        self.website = Some(value.into());
        self
    }

    pub fn street(mut self, value: impl Into<String>) -> Self {
        self.address.street = Some(value.into());
        self
    }

    pub fn suite(mut self, value: impl Into<String>) -> Self {
        self.address.suite = Some(value.into());
        self
    }

    pub fn city(mut self, value: impl Into<String>) -> Self {
        self.address.city = Some(value.into());
        self
    }

    pub fn zipcode(mut self, value: impl Into<String>) -> Self {
        self.address.zipcode = Some(value.into());
        self
    }

    pub fn geo(mut self, value: Geo) -> Self {
        self.address.geo = Some(value);
        self
    }
}

impl Patch for UserPatch {
    type Target = User;

    fn merge(&mut self, later: Self) {
        merge_slot(&mut self.name, later.name);
        merge_slot(&mut self.username, later.username);
        merge_slot(&mut self.email, later.email);
        merge_slot(&mut self.phone, later.phone);
        merge_slot(&mut self.website, later.website);
        self.address.merge(later.address);
    }

    fn apply_to(&self, base: &User) -> User {
        User {
            id: base.id,
            name: pick(&self.name, &base.name),
            username: pick(&self.username, &base.username),
            email: pick(&self.email, &base.email),
            phone: pick(&self.phone, &base.phone),
            website: self.website.clone().or_else(|| base.website.clone()),
            address: self.address.apply_to(&base.address),
            company: base.company.clone(),
        }
    }
}

pub(crate) fn merge_slot<V>(slot: &mut Option<V>, later: Option<V>) {
    if later.is_some() {
        *slot = later;
    }
}

pub(crate) fn pick<V: Clone>(patched: &Option<V>, base: &V) -> V {
    patched.as_ref().unwrap_or(base).clone()
}
