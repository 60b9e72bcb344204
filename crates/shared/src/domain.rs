use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(MemberId);
id_newtype!(ServiceItemId);

/// Unit of a commission value: an absolute amount in dong, or a percentage
/// of a reference price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionKind {
    #[default]
    Money,
    Percent,
}

impl CommissionKind {
    pub fn as_wire(self) -> &'static str {
        match self {
            CommissionKind::Money => "money",
            CommissionKind::Percent => "percent",
        }
    }

    /// Tolerant decode for the unit column; `None` for null or unknown text.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "money" => Some(CommissionKind::Money),
            "percent" => Some(CommissionKind::Percent),
            _ => None,
        }
    }

    /// Unit marker shown on toggle buttons and in CLI output.
    pub fn symbol(self) -> &'static str {
        match self {
            CommissionKind::Money => "₫",
            CommissionKind::Percent => "%",
        }
    }
}

/// A commission value. The amount is always finite and non-negative;
/// constructors coerce anything else to zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Commission {
    pub amount: f64,
    pub kind: CommissionKind,
}

impl Commission {
    pub fn new(amount: f64, kind: CommissionKind) -> Self {
        let amount = if amount.is_finite() && amount > 0.0 {
            amount
        } else {
            0.0
        };
        Self { amount, kind }
    }

    pub fn money(amount: f64) -> Self {
        Self::new(amount, CommissionKind::Money)
    }

    pub fn percent(amount: f64) -> Self {
        Self::new(amount, CommissionKind::Percent)
    }

    /// The "no commission" state.
    pub fn zero() -> Self {
        Self {
            amount: 0.0,
            kind: CommissionKind::Money,
        }
    }

    pub fn is_zero(self) -> bool {
        self.amount == 0.0
    }
}

impl Default for Commission {
    fn default() -> Self {
        Self::zero()
    }
}

/// Display identity of a staff member: the name is always present, the
/// avatar may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub member_id: MemberId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl MemberProfile {
    /// Badge letter used when no avatar image is available.
    pub fn initial(&self) -> String {
        self.name
            .trim()
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "?".to_string())
    }
}

/// A sellable service line; its unit price is the reference for converting
/// commissions between money and percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub service_item_id: ServiceItemId,
    pub name: String,
    pub unit_price: Option<f64>,
}

impl ServiceItem {
    /// Price usable as a conversion reference. Missing, zero, and negative
    /// prices cannot anchor a conversion.
    pub fn reference_price(&self) -> Option<f64> {
        self.unit_price.filter(|p| p.is_finite() && *p > 0.0)
    }
}
