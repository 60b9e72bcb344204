use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Commission, CommissionKind, MemberId, MemberProfile, ServiceItem, ServiceItemId,
};

/// Row shape of the staff table (`nhan_su`) as served by the REST API.
/// Column names follow the hosted schema; the commission columns are
/// nullable because most rows predate the commission feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRow {
    pub id: MemberId,
    #[serde(rename = "ho_ten")]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(rename = "hoa_hong_gia_tri", default)]
    pub commission_amount: Option<f64>,
    #[serde(rename = "hoa_hong_loai", default)]
    pub commission_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MemberRow {
    /// Null or unrecognized unit columns decode as "no commission".
    pub fn commission(&self) -> Commission {
        let kind = self
            .commission_kind
            .as_deref()
            .and_then(CommissionKind::from_wire);
        match (self.commission_amount, kind) {
            (Some(amount), Some(kind)) => Commission::new(amount, kind),
            _ => Commission::zero(),
        }
    }

    pub fn profile(&self) -> MemberProfile {
        MemberProfile {
            member_id: self.id,
            name: self.full_name.clone(),
            avatar_url: self
                .avatar_url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
        }
    }
}

/// Row shape of the service item table (`hang_muc_dich_vu`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceItemRow {
    pub id: ServiceItemId,
    #[serde(rename = "ten")]
    pub name: String,
    #[serde(rename = "don_gia", default)]
    pub unit_price: Option<f64>,
}

impl ServiceItemRow {
    pub fn item(&self) -> ServiceItem {
        ServiceItem {
            service_item_id: self.id,
            name: self.name.clone(),
            unit_price: self.unit_price.filter(|p| p.is_finite()),
        }
    }
}

/// PATCH payload writing a member's commission columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionUpdate {
    #[serde(rename = "hoa_hong_gia_tri")]
    pub amount: f64,
    #[serde(rename = "hoa_hong_loai")]
    pub kind: CommissionKind,
    pub updated_at: DateTime<Utc>,
}

impl CommissionUpdate {
    pub fn new(commission: Commission) -> Self {
        Self {
            amount: commission.amount,
            kind: commission.kind,
            updated_at: Utc::now(),
        }
    }

    /// Payload that removes a commission (writes the zero state).
    pub fn clear() -> Self {
        Self::new(Commission::zero())
    }
}
