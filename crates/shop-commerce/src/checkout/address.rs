//! Billing details.

use serde::{Deserialize, Serialize};

use crate::auth::User;
use crate::error::CheckoutError;

/// Billing contact and address, in the order service's field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address1: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub country: String,
}

impl BillingDetails {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Prefill name and email from the signed-in customer.
    pub fn for_user(user: &User) -> Self {
        let (first, last) = user.name_parts();
        Self::new(first, last, user.email.clone())
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_address(
        mut self,
        address1: impl Into<String>,
        city: impl Into<String>,
        postcode: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        self.address1 = address1.into();
        self.city = city.into();
        self.postcode = postcode.into();
        self.country = country.into();
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Required: first name, last name, email, phone, address, city.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let required = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address1", &self.address1),
            ("city", &self.city),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(CheckoutError::MissingField(*field)),
            None if !self.email.contains('@') => Err(CheckoutError::MissingField("email")),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> BillingDetails {
        BillingDetails::new("Aysel", "Mammadova", "aysel@example.com")
            .with_phone("+994501234567")
            .with_address("28 May St", "Baku", "AZ1000", "AZ")
    }

    #[test]
    fn test_validate() {
        assert!(complete().validate().is_ok());

        let mut missing = complete();
        missing.city = "  ".into();
        assert_eq!(missing.validate(), Err(CheckoutError::MissingField("city")));

        let mut bad_email = complete();
        bad_email.email = "nope".into();
        assert_eq!(bad_email.validate(), Err(CheckoutError::MissingField("email")));
    }

    #[test]
    fn test_for_user_splits_name() {
        let billing = BillingDetails::for_user(&User::new("1", "Aysel Mammadova", "a@b.az"));
        assert_eq!(billing.first_name, "Aysel");
        assert_eq!(billing.last_name, "Mammadova");
        assert_eq!(billing.full_name(), "Aysel Mammadova");
    }
}
