//! Shipping details collected at checkout.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::checkout::PaymentMethod;
use crate::CommerceError;

/// A delivery location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Create coordinates, rejecting values outside the valid range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CommerceError> {
        let coordinates = Self {
            latitude,
            longitude,
        };
        coordinates.validate()?;
        Ok(coordinates)
    }

    /// Check the latitude/longitude ranges.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let lat_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let lon_ok = self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(CommerceError::InvalidCoordinates {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// Checkout form state.
///
/// Fields start empty and are filled as the shopper types; [`validate`]
/// decides whether the form can be submitted.
///
/// [`validate`]: CheckoutForm::validate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutForm {
    pub full_name: String,
    pub address: String,
    pub phone: String,
    pub payment_method: Option<PaymentMethod>,
    pub location: Option<Coordinates>,
}

impl CheckoutForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    pub fn location(mut self, location: Coordinates) -> Self {
        self.location = Some(location);
        self
    }

    /// Contact and payment fields that are still empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.full_name.trim().is_empty() {
            missing.push("full name");
        }
        if self.address.trim().is_empty() {
            missing.push("address");
        }
        if self.phone.trim().is_empty() {
            missing.push("phone");
        }
        if self.payment_method.is_none() {
            missing.push("payment method");
        }
        missing
    }

    /// Check the form is ready to submit.
    ///
    /// Contact and payment fields are checked before the delivery location.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(CommerceError::CheckoutIncomplete(missing.join(", ")));
        }
        match self.location {
            Some(location) => location.validate(),
            None => Err(CommerceError::CheckoutIncomplete(
                "delivery location".to_string(),
            )),
        }
    }

    /// Check if the form can be submitted.
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> CheckoutForm {
        CheckoutForm::new()
            .full_name("Thandi Nkosi")
            .address("12 Long St, Cape Town")
            .phone("0821234567")
            .payment_method(PaymentMethod::Cash)
            .location(Coordinates::new(-33.92, 18.42).unwrap())
    }

    #[test]
    fn test_complete_form_validates() {
        assert!(filled().validate().is_ok());
    }

    #[test]
    fn test_missing_fields_listed_together() {
        let form = CheckoutForm::new().full_name("Thandi").phone("   ");
        match form.validate() {
            Err(CommerceError::CheckoutIncomplete(fields)) => {
                assert_eq!(fields, "address, phone, payment method");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_location_checked_after_fields() {
        let mut form = filled();
        form.location = None;
        match form.validate() {
            Err(CommerceError::CheckoutIncomplete(fields)) => {
                assert_eq!(fields, "delivery location");
            }
            other => panic!("unexpected result: {other:?}"),
        }

        form.full_name.clear();
        assert!(matches!(
            form.validate(),
            Err(CommerceError::CheckoutIncomplete(f)) if f == "full name"
        ));
    }

    #[test]
    fn test_coordinate_ranges() {
        assert!(Coordinates::new(90.0, -180.0).is_ok());
        assert!(Coordinates::new(90.5, 0.0).is_err());
        assert!(Coordinates::new(0.0, 181.0).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_coordinates_display() {
        let c = Coordinates::new(-33.924868, 18.424061).unwrap();
        assert_eq!(c.to_string(), "-33.92487, 18.42406");
    }
}
