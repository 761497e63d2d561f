//! Wire schemas. Field names are camelCase; ids are decimal strings.

use serde::{Deserialize, Serialize};

use crate::entity::{app_user, payment, property, tenant};
use crate::store::PropertyStatus;
use crate::store::payments::{DEFAULT_PAYMENT_STATUS, NewPayment};
use crate::store::properties::{DEFAULT_PROPERTY_TYPE, NewProperty, PropertyPatch};
use crate::store::summary::PortfolioSummary;
use crate::store::tenants::NewTenant;
use crate::validation::ValidationError;

const ID_REASON: &str = "must be an integer id";
const STATUS_REASON: &str = "must be \"vacant\" or \"occupied\"";

/// A reference id as clients send it: either `"3"` or `3`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Int(i64),
    Text(String),
}

impl WireId {
    pub fn parse(&self) -> Option<i32> {
        match self {
            WireId::Int(n) => i32::try_from(*n).ok(),
            WireId::Text(s) => s.trim().parse().ok(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse an optional reference id, recording it as invalid when unparseable.
fn reference(errs: &mut ValidationError, field: &'static str, value: Option<WireId>) -> Option<i32> {
    let id = value?;
    let parsed = id.parse();
    if parsed.is_none() {
        errs.invalid(field, ID_REASON);
    }
    parsed
}

// ---------- auth requests ----------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, ValidationError> {
        let mut errs = ValidationError::default();
        let email = errs.required_str("email", self.email);
        let password = errs.required_str("password", self.password);
        let name = errs.required_str("name", self.name);
        let (Some(email), Some(password), Some(name)) = (email, password, name) else {
            return Err(errs);
        };
        Ok(Registration {
            email,
            password,
            name,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn validate(self) -> Result<(String, String), ValidationError> {
        let mut errs = ValidationError::default();
        let email = errs.required_str("email", self.email);
        let password = errs.required_str("password", self.password);
        match (email, password) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(errs),
        }
    }
}

// ---------- auth responses ----------

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Clone)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl From<app_user::Model> for UserResponse {
    fn from(m: app_user::Model) -> Self {
        Self {
            id: m.id.to_string(),
            email: m.email,
            name: m.name,
        }
    }
}

// ---------- property requests ----------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyRequest {
    pub address: Option<String>,
    pub unit_count: Option<i32>,
    pub monthly_rent: Option<f64>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub image_url: Option<String>,
}

impl CreatePropertyRequest {
    pub fn validate(self) -> Result<NewProperty, ValidationError> {
        let mut errs = ValidationError::default();

        let address = errs.required_str("address", self.address);
        let monthly_rent = errs.required("monthlyRent", self.monthly_rent);
        if let Some(rent) = monthly_rent
            && rent <= 0.0
        {
            errs.invalid("monthlyRent", "must be greater than 0");
        }

        let unit_count = self.unit_count.unwrap_or(1);
        if unit_count < 1 {
            errs.invalid("unitCount", "must be at least 1");
        }

        let status = match self.status.as_deref() {
            None => PropertyStatus::Vacant,
            Some(s) => PropertyStatus::parse(s).unwrap_or_else(|| {
                errs.invalid("status", STATUS_REASON);
                PropertyStatus::Vacant
            }),
        };

        let (Some(address), Some(monthly_rent)) = (address, monthly_rent) else {
            return Err(errs);
        };
        errs.into_result()?;

        Ok(NewProperty {
            address,
            unit_count,
            monthly_rent,
            status,
            property_type: non_blank(self.property_type)
                .unwrap_or_else(|| DEFAULT_PROPERTY_TYPE.to_string()),
            image_url: non_blank(self.image_url),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePropertyRequest {
    pub address: Option<String>,
    pub unit_count: Option<i32>,
    pub monthly_rent: Option<f64>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub image_url: Option<String>,
}

impl UpdatePropertyRequest {
    pub fn validate(self) -> Result<PropertyPatch, ValidationError> {
        let mut errs = ValidationError::default();

        if matches!(self.address.as_deref(), Some(a) if a.trim().is_empty()) {
            errs.invalid("address", "must not be blank");
        }
        if matches!(self.unit_count, Some(n) if n < 1) {
            errs.invalid("unitCount", "must be at least 1");
        }
        if matches!(self.monthly_rent, Some(r) if r <= 0.0) {
            errs.invalid("monthlyRent", "must be greater than 0");
        }
        let status = match self.status.as_deref() {
            None => None,
            Some(s) => {
                let parsed = PropertyStatus::parse(s);
                if parsed.is_none() {
                    errs.invalid("status", STATUS_REASON);
                }
                parsed
            }
        };
        errs.into_result()?;

        Ok(PropertyPatch {
            address: self.address,
            unit_count: self.unit_count,
            monthly_rent: self.monthly_rent,
            status,
            property_type: non_blank(self.property_type),
            image_url: self.image_url,
        })
    }
}

// ---------- property responses ----------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyResponse {
    pub id: String,
    pub address: String,
    pub unit_count: i32,
    pub monthly_rent: f64,
    pub status: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub image_url: Option<String>,
}

impl From<property::Model> for PropertyResponse {
    fn from(m: property::Model) -> Self {
        Self {
            id: m.id.to_string(),
            address: m.address,
            unit_count: m.unit_count,
            monthly_rent: m.monthly_rent,
            status: m.status,
            property_type: m.property_type,
            image_url: m.image_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ---------- tenants ----------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub property_id: Option<WireId>,
    pub lease_start: Option<String>,
    pub lease_end: Option<String>,
    pub avatar: Option<String>,
}

impl CreateTenantRequest {
    pub fn validate(self) -> Result<NewTenant, ValidationError> {
        let mut errs = ValidationError::default();
        let name = errs.required_str("name", self.name);
        let property_id = reference(&mut errs, "propertyId", self.property_id);

        let Some(name) = name else {
            return Err(errs);
        };
        errs.into_result()?;

        Ok(NewTenant {
            name,
            email: non_blank(self.email),
            property_id,
            lease_start: non_blank(self.lease_start),
            lease_end: non_blank(self.lease_end),
            avatar: non_blank(self.avatar),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantResponse {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub property_id: Option<String>,
    pub lease_start: Option<String>,
    pub lease_end: Option<String>,
    pub avatar: Option<String>,
}

impl From<tenant::Model> for TenantResponse {
    fn from(m: tenant::Model) -> Self {
        Self {
            id: m.id.to_string(),
            name: m.name,
            email: m.email,
            property_id: m.property_id.map(|id| id.to_string()),
            lease_start: m.lease_start,
            lease_end: m.lease_end,
            avatar: m.avatar,
        }
    }
}

// ---------- payments ----------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub property_id: Option<WireId>,
    pub tenant_id: Option<WireId>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub status: Option<String>,
}

impl CreatePaymentRequest {
    pub fn validate(self) -> Result<NewPayment, ValidationError> {
        let mut errs = ValidationError::default();
        let property_id = errs.required("propertyId", self.property_id);
        let tenant_id = errs.required("tenantId", self.tenant_id);
        let amount = errs.required("amount", self.amount);

        let property_id = reference(&mut errs, "propertyId", property_id);
        let tenant_id = reference(&mut errs, "tenantId", tenant_id);
        if let Some(a) = amount
            && a <= 0.0
        {
            errs.invalid("amount", "must be greater than 0");
        }

        let (Some(property_id), Some(tenant_id), Some(amount)) = (property_id, tenant_id, amount)
        else {
            return Err(errs);
        };
        errs.into_result()?;

        Ok(NewPayment {
            property_id,
            tenant_id,
            amount,
            date: non_blank(self.date),
            status: non_blank(self.status).unwrap_or_else(|| DEFAULT_PAYMENT_STATUS.to_string()),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: String,
    pub property_id: String,
    pub tenant_id: String,
    pub amount: f64,
    pub date: Option<String>,
    pub status: String,
}

impl From<payment::Model> for PaymentResponse {
    fn from(m: payment::Model) -> Self {
        Self {
            id: m.id.to_string(),
            property_id: m.property_id.to_string(),
            tenant_id: m.tenant_id.to_string(),
            amount: m.amount,
            date: m.date,
            status: m.status,
        }
    }
}

// ---------- dashboard ----------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStatsResponse {
    pub total_properties: u64,
    pub occupied_properties: u64,
    pub vacant_properties: u64,
    pub total_monthly_revenue: f64,
    pub pending_payments: u64,
    pub total_tenants: u64,
}

impl From<PortfolioSummary> for PortfolioStatsResponse {
    fn from(s: PortfolioSummary) -> Self {
        Self {
            total_properties: s.total_properties,
            occupied_properties: s.occupied_properties,
            vacant_properties: s.vacant_properties,
            total_monthly_revenue: s.total_monthly_revenue,
            pending_payments: s.pending_payments,
            total_tenants: s.total_tenants,
        }
    }
}
