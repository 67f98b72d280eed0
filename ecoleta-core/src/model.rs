//! Domain data structures for categories, locations, contacts, and submissions.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Wire and dropdown value meaning "nothing chosen".
pub const UNSET_VALUE: &str = "0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier of a recyclable material category.
pub struct CategoryId(pub i64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Material category a collection point can accept.
pub struct CategoryItem {
    /// Unique identifier.
    pub id: CategoryId,
    /// Display title, e.g. “Lâmpadas”.
    pub title: String,
    /// Icon served by the backend.
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Two-letter state code (UF) from the IBGE taxonomy.
pub struct StateCode(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Municipality name within a state.
pub struct CityName(pub String);

impl fmt::Display for StateCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl fmt::Display for CityName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<&str> for StateCode {
    fn from(code: &str) -> Self {
        StateCode(code.to_owned())
    }
}

impl From<&str> for CityName {
    fn from(name: &str) -> Self {
        CityName(name.to_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
/// Latitude/longitude pair in decimal degrees.
pub struct Coordinate {
    /// Latitude, positive north.
    pub latitude: f64,
    /// Longitude, positive east.
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate from latitude and longitude.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Dropdown selection that may still be at the placeholder.
pub enum Selection<T> {
    /// Placeholder option, sent as [`UNSET_VALUE`].
    Unset,
    /// A real value picked by the operator.
    Chosen(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::Unset
    }
}

impl<T> Selection<T> {
    /// Whether the placeholder is still selected.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, Selection::Unset)
    }

    /// Borrow the chosen value, if any.
    #[must_use]
    pub fn chosen(&self) -> Option<&T> {
        match self {
            Selection::Unset => None,
            Selection::Chosen(value) => Some(value),
        }
    }
}

impl<T: for<'a> From<&'a str>> Selection<T> {
    /// Parse a dropdown value, mapping the sentinel to [`Selection::Unset`].
    #[must_use]
    pub fn from_value(value: &str) -> Self {
        if value == UNSET_VALUE {
            Selection::Unset
        } else {
            Selection::Chosen(T::from(value))
        }
    }
}

impl<T: Serialize> Serialize for Selection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Selection::Unset => serializer.serialize_str(UNSET_VALUE),
            Selection::Chosen(value) => value.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Contact data typed into the form.
pub struct ContactInfo {
    /// Entity name.
    pub name: String,
    /// E-mail address.
    pub email: String,
    /// WhatsApp number.
    pub whatsapp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Editable contact field.
pub enum ContactField {
    /// [`ContactInfo::name`].
    Name,
    /// [`ContactInfo::email`].
    Email,
    /// [`ContactInfo::whatsapp`].
    Whatsapp,
}

impl ContactInfo {
    /// Current value of a field.
    #[must_use]
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Whatsapp => &self.whatsapp,
        }
    }

    /// Overwrite a single field.
    pub fn set(&mut self, field: ContactField, value: String) {
        match field {
            ContactField::Name => self.name = value,
            ContactField::Email => self.email = value,
            ContactField::Whatsapp => self.whatsapp = value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Insertion-ordered set of selected category ids.
pub struct SelectedCategoryIds(Vec<CategoryId>);

impl SelectedCategoryIds {
    /// Remove `id` when present, otherwise append it.
    pub fn toggle(&mut self, id: CategoryId) {
        if self.contains(id) {
            self.0.retain(|selected| *selected != id);
        } else {
            self.0.push(id);
        }
    }

    /// Membership check.
    #[must_use]
    pub fn contains(&self, id: CategoryId) -> bool {
        self.0.contains(&id)
    }

    /// Selected ids in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[CategoryId] {
        &self.0
    }

    /// Number of selected ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<CategoryId> for SelectedCategoryIds {
    fn from_iter<I: IntoIterator<Item = CategoryId>>(iter: I) -> Self {
        let mut ids = SelectedCategoryIds::default();
        for id in iter {
            if !ids.contains(id) {
                ids.0.push(id);
            }
        }
        ids
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Body posted to the backend when registering a collection point.
pub struct SubmissionRecord {
    /// Entity name.
    pub name: String,
    /// E-mail address.
    pub email: String,
    /// WhatsApp number.
    pub whatsapp: String,
    /// State code, or the sentinel when unset.
    pub uf: Selection<StateCode>,
    /// City name, or the sentinel when unset.
    pub city: Selection<CityName>,
    /// Accepted category ids in selection order.
    pub items: Vec<CategoryId>,
    /// Latitude of the picked position.
    pub latitude: f64,
    /// Longitude of the picked position.
    pub longitude: f64,
}

impl SubmissionRecord {
    /// Whether state or city is still the placeholder.
    #[must_use]
    pub fn has_unset_location(&self) -> bool {
        self.uf.is_unset() || self.city.is_unset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_restores_previous_selection() {
        let mut ids: SelectedCategoryIds =
            [CategoryId(1), CategoryId(2), CategoryId(3)].into_iter().collect();
        let before = ids.clone();

        ids.toggle(CategoryId(2));
        assert_eq!(ids.as_slice(), &[CategoryId(1), CategoryId(3)]);

        ids.toggle(CategoryId(2));
        assert_eq!(ids.as_slice(), &[CategoryId(1), CategoryId(3), CategoryId(2)]);
        assert_eq!(ids.len(), before.len());
        assert!(before.as_slice().iter().all(|id| ids.contains(*id)));
        assert!(ids.as_slice().iter().all(|id| before.contains(*id)));

        ids.toggle(CategoryId(4));
        ids.toggle(CategoryId(4));
        assert_eq!(ids.as_slice(), &[CategoryId(1), CategoryId(3), CategoryId(2)]);
    }

    #[test]
    fn toggling_absent_id_appends() {
        let mut ids = SelectedCategoryIds::default();
        ids.toggle(CategoryId(5));
        ids.toggle(CategoryId(1));
        assert_eq!(ids.as_slice(), &[CategoryId(5), CategoryId(1)]);
    }

    #[test]
    fn sentinel_parses_as_unset() {
        assert!(Selection::<StateCode>::from_value("0").is_unset());
        assert_eq!(
            Selection::<CityName>::from_value("Campinas"),
            Selection::Chosen(CityName::from("Campinas"))
        );
    }

    #[test]
    fn record_serializes_wire_shape() {
        let record = SubmissionRecord {
            name: "ONG X".to_owned(),
            email: "a@b.com".to_owned(),
            whatsapp: "1111".to_owned(),
            uf: Selection::Chosen(StateCode::from("SP")),
            city: Selection::Unset,
            items: vec![CategoryId(1), CategoryId(2)],
            latitude: -22.9,
            longitude: -47.0,
        };

        let json = serde_json::to_value(&record).expect("record serializes");
        assert_eq!(
            json,
            serde_json::json!({
                "name": "ONG X",
                "email": "a@b.com",
                "whatsapp": "1111",
                "uf": "SP",
                "city": "0",
                "items": [1, 2],
                "latitude": -22.9,
                "longitude": -47.0
            })
        );
        assert!(record.has_unset_location());
    }

    #[test]
    fn category_reads_camel_case_image_url() {
        let item: CategoryItem =
            serde_json::from_str(r#"{"id":1,"title":"Lâmpadas","imageUrl":"x"}"#)
                .expect("category parses");
        assert_eq!(item.image_url, "x");
        assert_eq!(item.id, CategoryId(1));
    }

    #[test]
    fn category_accepts_any_integer_id() {
        let items: Vec<CategoryItem> = serde_json::from_str(
            r#"[{"id":-1,"title":"Óleo","imageUrl":"a"},{"id":5000000000,"title":"Papel","imageUrl":"b"}]"#,
        )
        .expect("catalog parses");
        let ids: Vec<CategoryId> = items.iter().map(|item| item.id).collect();
        assert_eq!(ids, [CategoryId(-1), CategoryId(5_000_000_000)]);
    }
}
