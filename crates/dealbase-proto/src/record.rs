//! Record, input, and patch types for the three entity kinds.

use std::fmt;
use std::str::FromStr;

use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use crate::error::Error;
use crate::money::Money;
use crate::patch::Patch;
use crate::time::Timestamp;

/// Store-assigned record identifier. Allocation starts at 1, so 0 is never
/// a valid id.
pub type RecordId = u64;

/// Pipeline status of a deal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Archive,
    Serialize,
    Deserialize,
    SerdeSerialize,
    SerdeDeserialize,
)]
pub enum DealStatus {
    /// Freshly created, not yet qualified.
    #[default]
    New,
    /// Qualified as a real opportunity.
    Qualified,
    /// Proposal sent.
    Proposal,
    /// Closed won.
    Won,
    /// Closed lost.
    Lost,
}

impl DealStatus {
    /// All statuses, in pipeline order.
    pub const ALL: [DealStatus; 5] = [
        DealStatus::New,
        DealStatus::Qualified,
        DealStatus::Proposal,
        DealStatus::Won,
        DealStatus::Lost,
    ];

    /// The canonical name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStatus::New => "New",
            DealStatus::Qualified => "Qualified",
            DealStatus::Proposal => "Proposal",
            DealStatus::Won => "Won",
            DealStatus::Lost => "Lost",
        }
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DealStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DealStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::InvalidMessage(format!("unknown deal status: {}", s)))
    }
}

/// A company record.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct Company {
    pub id: RecordId,
    pub name: String,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A customer record. `company_id` always resolves to an existing company.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct Customer {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company_id: RecordId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A deal record. Both references always resolve to existing rows.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct Deal {
    pub id: RecordId,
    pub description: String,
    pub amount: Money,
    pub status: DealStatus,
    pub customer_id: RecordId,
    pub company_id: RecordId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating a company.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct NewCompany {
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl NewCompany {
    /// Create an input with only the required name; optional fields null.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            industry: None,
            website: None,
            phone: None,
            address: None,
        }
    }
}

/// Input for creating a customer.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub company_id: RecordId,
}

/// Input for creating a deal. `status` defaults to [`DealStatus::New`] when
/// unspecified.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct NewDeal {
    pub description: String,
    pub amount: Money,
    #[serde(default)]
    pub status: DealStatus,
    pub customer_id: RecordId,
    pub company_id: RecordId,
}

/// Sparse update for a company. Absent fields stay unchanged.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct CompanyPatch {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub industry: Patch<Option<String>>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub website: Patch<Option<String>>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub phone: Patch<Option<String>>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub address: Patch<Option<String>>,
}

impl CompanyPatch {
    /// An empty patch for the given record.
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            name: Patch::Keep,
            industry: Patch::Keep,
            website: Patch::Keep,
            phone: Patch::Keep,
            address: Patch::Keep,
        }
    }

    /// Replace the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Patch::Set(name.into());
        self
    }

    /// Replace or clear the industry.
    pub fn with_industry(mut self, industry: Option<String>) -> Self {
        self.industry = Patch::Set(industry);
        self
    }

    /// Replace or clear the website.
    pub fn with_website(mut self, website: Option<String>) -> Self {
        self.website = Patch::Set(website);
        self
    }

    /// Replace or clear the phone number.
    pub fn with_phone(mut self, phone: Option<String>) -> Self {
        self.phone = Patch::Set(phone);
        self
    }

    /// Replace or clear the address.
    pub fn with_address(mut self, address: Option<String>) -> Self {
        self.address = Patch::Set(address);
        self
    }
}

/// Sparse update for a customer.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct CustomerPatch {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub email: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub phone: Patch<Option<String>>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub company_id: Patch<RecordId>,
}

impl CustomerPatch {
    /// An empty patch for the given record.
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            name: Patch::Keep,
            email: Patch::Keep,
            phone: Patch::Keep,
            company_id: Patch::Keep,
        }
    }

    /// Replace the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Patch::Set(name.into());
        self
    }

    /// Replace the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Patch::Set(email.into());
        self
    }

    /// Replace or clear the phone number.
    pub fn with_phone(mut self, phone: Option<String>) -> Self {
        self.phone = Patch::Set(phone);
        self
    }

    /// Move the customer to another company.
    pub fn with_company(mut self, company_id: RecordId) -> Self {
        self.company_id = Patch::Set(company_id);
        self
    }
}

/// Sparse update for a deal.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct DealPatch {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub description: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub amount: Patch<Money>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub status: Patch<DealStatus>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub customer_id: Patch<RecordId>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub company_id: Patch<RecordId>,
}

impl DealPatch {
    /// An empty patch for the given record.
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            description: Patch::Keep,
            amount: Patch::Keep,
            status: Patch::Keep,
            customer_id: Patch::Keep,
            company_id: Patch::Keep,
        }
    }

    /// Replace the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Patch::Set(description.into());
        self
    }

    /// Replace the amount.
    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = Patch::Set(amount);
        self
    }

    /// Move the deal to another pipeline status.
    pub fn with_status(mut self, status: DealStatus) -> Self {
        self.status = Patch::Set(status);
        self
    }

    /// Reassign the deal to another customer.
    pub fn with_customer(mut self, customer_id: RecordId) -> Self {
        self.customer_id = Patch::Set(customer_id);
        self
    }

    /// Reassign the deal to another company.
    pub fn with_company(mut self, company_id: RecordId) -> Self {
        self.company_id = Patch::Set(company_id);
        self
    }
}

/// Row codec: records are stored in the entity store as rkyv-archived
/// bytes. The store treats them as opaque blobs.
macro_rules! impl_row_codec {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $ty {
                /// Serialize this record for storage.
                pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
                    rkyv::to_bytes::<rkyv::rancor::Error>(self)
                        .map(|bytes| bytes.to_vec())
                        .map_err(|e| Error::Serialization(e.to_string()))
                }

                /// Deserialize a stored record.
                pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
                    // Copy into an aligned buffer for rkyv access.
                    let mut aligned: rkyv::util::AlignedVec<16> = rkyv::util::AlignedVec::new();
                    aligned.extend_from_slice(bytes);
                    rkyv::from_bytes::<Self, rkyv::rancor::Error>(&aligned)
                        .map_err(|e| Error::Deserialization(e.to_string()))
                }
            }
        )+
    };
}

impl_row_codec!(Company, Customer, Deal);

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_deal() -> Deal {
        Deal {
            id: 7,
            description: "Annual license".to_string(),
            amount: Money::from_minor_units(1234567),
            status: DealStatus::Proposal,
            customer_id: 3,
            company_id: 1,
            created_at: Timestamp::from_micros(1_000),
            updated_at: Timestamp::from_micros(2_000),
        }
    }

    #[test]
    fn test_status_default_is_new() {
        assert_eq!(DealStatus::default(), DealStatus::New);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Qualified".parse::<DealStatus>().unwrap(), DealStatus::Qualified);
        assert!("qualified".parse::<DealStatus>().is_err());
    }

    #[test]
    fn test_new_deal_status_defaults_in_json() {
        let input: NewDeal = serde_json::from_str(
            r#"{"description": "d", "amount": 10.0, "customer_id": 1, "company_id": 1}"#,
        )
        .unwrap();
        assert_eq!(input.status, DealStatus::New);
    }

    #[test]
    fn test_row_codec_roundtrip() {
        let deal = sample_deal();
        let bytes = deal.to_bytes().unwrap();
        assert_eq!(Deal::from_bytes(&bytes).unwrap(), deal);
    }

    #[test]
    fn test_row_codec_rejects_garbage() {
        assert!(Deal::from_bytes(&[0, 1, 2]).is_err());
    }

    #[test]
    fn test_company_patch_json_tristate() {
        let patch: CompanyPatch =
            serde_json::from_str(r#"{"id": 4, "industry": null, "name": "Acme"}"#).unwrap();
        assert_eq!(patch.id, 4);
        assert_eq!(patch.name, Patch::Set("Acme".to_string()));
        assert_eq!(patch.industry, Patch::Set(None));
        assert!(patch.website.is_keep());
        assert!(patch.phone.is_keep());
        assert!(patch.address.is_keep());
    }

    #[test]
    fn test_patch_builders() {
        let patch = DealPatch::new(9)
            .with_status(DealStatus::Won)
            .with_amount(Money::from_minor_units(500));
        assert_eq!(patch.id, 9);
        assert_eq!(patch.status, Patch::Set(DealStatus::Won));
        assert!(patch.description.is_keep());
        assert!(patch.customer_id.is_keep());
    }

    #[test]
    fn test_patch_rkyv_roundtrip() {
        let patch = CustomerPatch::new(2)
            .with_email("ada@acme.test")
            .with_phone(None);
        let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&patch).unwrap();
        let back: CustomerPatch =
            rkyv::from_bytes::<CustomerPatch, rkyv::rancor::Error>(&bytes).unwrap();
        assert_eq!(back, patch);
        assert_eq!(back.phone, Patch::Set(None));
        assert!(back.company_id.is_keep());
    }
}
