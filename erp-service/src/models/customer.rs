//! Customer model for erp-service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Customer segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CustomerType {
    #[default]
    Retail,
    Wholesale,
    Contractor,
    Government,
    Reseller,
    Other,
}

impl CustomerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerType::Retail => "Retail",
            CustomerType::Wholesale => "Wholesale",
            CustomerType::Contractor => "Contractor",
            CustomerType::Government => "Government",
            CustomerType::Reseller => "Reseller",
            CustomerType::Other => "Other",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "Wholesale" => CustomerType::Wholesale,
            "Contractor" => CustomerType::Contractor,
            "Government" => CustomerType::Government,
            "Reseller" => CustomerType::Reseller,
            "Other" => CustomerType::Other,
            _ => CustomerType::Retail,
        }
    }
}

/// Agreed payment terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentTerms {
    #[serde(rename = "Net 7")]
    Net7,
    #[serde(rename = "Net 15")]
    Net15,
    #[default]
    #[serde(rename = "Net 30")]
    Net30,
    #[serde(rename = "Net 60")]
    Net60,
    #[serde(rename = "Due on Receipt")]
    DueOnReceipt,
    Custom,
}

impl PaymentTerms {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentTerms::Net7 => "Net 7",
            PaymentTerms::Net15 => "Net 15",
            PaymentTerms::Net30 => "Net 30",
            PaymentTerms::Net60 => "Net 60",
            PaymentTerms::DueOnReceipt => "Due on Receipt",
            PaymentTerms::Custom => "Custom",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "Net 7" => PaymentTerms::Net7,
            "Net 15" => PaymentTerms::Net15,
            "Net 60" => PaymentTerms::Net60,
            "Due on Receipt" => PaymentTerms::DueOnReceipt,
            "Custom" => PaymentTerms::Custom,
            _ => PaymentTerms::Net30,
        }
    }
}

/// Customer record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub customer_id: Uuid,
    pub company_name: String,
    pub contact_person: String,
    pub email: Option<String>,
    pub phone: String,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub tax_id: Option<String>,
    pub customer_type: String,
    pub payment_terms: String,
    pub credit_limit: Decimal,
    pub notes: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl Customer {
    pub fn customer_type(&self) -> CustomerType {
        CustomerType::from_string(&self.customer_type)
    }

    pub fn payment_terms(&self) -> PaymentTerms {
        PaymentTerms::from_string(&self.payment_terms)
    }
}

/// Input for creating or replacing a customer.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomerInput {
    #[validate(custom(function = "not_blank"))]
    pub company_name: String,
    #[validate(custom(function = "not_blank"))]
    pub contact_person: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub phone: String,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub tax_id: Option<String>,
    #[serde(default)]
    pub customer_type: CustomerType,
    #[serde(default)]
    pub payment_terms: PaymentTerms,
    #[serde(default)]
    #[validate(custom(function = "non_negative"))]
    pub credit_limit: Decimal,
    pub notes: Option<String>,
}

impl CustomerInput {
    /// Trim free-text fields and drop empty optionals.
    pub fn normalized(mut self) -> Self {
        fn clean(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }

        self.company_name = self.company_name.trim().to_string();
        self.contact_person = self.contact_person.trim().to_string();
        self.phone = self.phone.trim().to_string();
        self.email = clean(self.email);
        self.address_line1 = clean(self.address_line1);
        self.address_line2 = clean(self.address_line2);
        self.city = clean(self.city);
        self.state = clean(self.state);
        self.postal_code = clean(self.postal_code);
        self.tax_id = clean(self.tax_id);
        self.notes = clean(self.notes);
        self
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("non_negative"));
    }
    Ok(())
}
