/// A mailing address as submitted through the search form.
/// Every field must be present and non-empty; nothing beyond that is checked.
#[derive(Debug, Clone, PartialEq, Eq, FromForm)]
pub struct AddressInput {
    #[field(validate = len(1..))]
    pub street: String,
    #[field(validate = len(1..))]
    pub city: String,
    /// Two-letter postal code or free text.
    #[field(validate = len(1..))]
    pub state: String,
    #[field(validate = len(1..))]
    pub zip: String,
}

impl AddressInput {
    /// The free-text query understood by the civic-information service.
    /// The service is sensitive to field order: street, city, state, zip.
    pub fn to_query(&self) -> String {
        [
            self.street.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.zip.as_str(),
        ]
        .join(" ")
    }
}
