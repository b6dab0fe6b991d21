//! Subscription and plan records consumed by the group-session fan-out.
//!
//! Subscriptions are read-mostly inputs here; the only mutation this engine
//! performs is the expiry sweep.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::SessionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    Cancelled,
}

/// A client's subscription to a provider's plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub client_id: Uuid,
    pub provider_id: Uuid,
    pub plan_id: Uuid,
    pub status: SubscriptionStatus,
    pub sessions_remaining: u32,
    pub start_date: NaiveDate,
    pub expiry_date: NaiveDate,
}

impl Subscription {
    /// Whether this subscription can receive a group-session booking on `date`.
    pub fn eligible_on(&self, date: NaiveDate) -> bool {
        self.status == SubscriptionStatus::Active
            && self.sessions_remaining > 0
            && self.start_date <= date
            && date <= self.expiry_date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    Monthly,
    PerSession,
}

/// A provider-owned subscription plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub plan_type: PlanType,
    pub session_format: SessionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes_per_month: Option<u32>,
}

impl Plan {
    /// Per-session share of the monthly price, rounded to 2 decimals.
    /// Zero when either component is missing.
    pub fn price_per_session(&self) -> f64 {
        match (self.monthly_price, self.classes_per_month) {
            (Some(price), Some(classes)) if classes > 0 => {
                (price / classes as f64 * 100.0).round() / 100.0
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscription(status: SubscriptionStatus, remaining: u32) -> Subscription {
        Subscription {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            plan_id: Uuid::new_v4(),
            status,
            sessions_remaining: remaining,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        }
    }

    #[test]
    fn active_subscription_in_window_is_eligible() {
        let s = subscription(SubscriptionStatus::Active, 4);
        assert!(s.eligible_on(NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()));
    }

    #[test]
    fn exhausted_or_inactive_is_not_eligible() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        assert!(!subscription(SubscriptionStatus::Active, 0).eligible_on(date));
        assert!(!subscription(SubscriptionStatus::Expired, 4).eligible_on(date));
        assert!(!subscription(SubscriptionStatus::Cancelled, 4).eligible_on(date));
    }

    #[test]
    fn dates_outside_window_are_not_eligible() {
        let s = subscription(SubscriptionStatus::Active, 4);
        assert!(!s.eligible_on(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()));
        assert!(!s.eligible_on(NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()));
    }

    #[test]
    fn per_session_price_rounds_to_cents() {
        let plan = Plan {
            id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            plan_type: PlanType::Monthly,
            session_format: SessionType::OneToMany,
            monthly_price: Some(100.0),
            classes_per_month: Some(3),
        };
        assert_eq!(plan.price_per_session(), 33.33);
    }

    #[test]
    fn missing_price_components_yield_zero() {
        let plan = Plan {
            id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            plan_type: PlanType::Monthly,
            session_format: SessionType::OneToMany,
            monthly_price: None,
            classes_per_month: Some(4),
        };
        assert_eq!(plan.price_per_session(), 0.0);
    }
}
